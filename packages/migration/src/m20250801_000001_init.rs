use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Tenants {
    Table,
    Id,
    Name,
    Slug,
    Status,
    CurrentPlanCode,
    BillingStatus,
    BlockedAt,
    StripeCustomerId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    TenantId,
    Sub,
    Name,
    Email,
    Role,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Profiles {
    Table,
    Id,
    TenantId,
    UserId,
    Slug,
    DisplayName,
    Bio,
    ThemeConfig,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Offers {
    Table,
    Id,
    TenantId,
    ProfileId,
    Title,
    Description,
    PriceCents,
    Currency,
    Kind,
    Active,
    Position,
    Metadata,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Appointments {
    Table,
    Id,
    TenantId,
    OfferId,
    ProfileId,
    StartsAt,
    DurationMinutes,
    Status,
    ClientName,
    ClientEmail,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum ServiceAvailabilities {
    Table,
    Id,
    TenantId,
    OfferId,
    Weekday,
    StartMinute,
    EndMinute,
    DurationMinutes,
    Active,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Subscriptions {
    Table,
    Id,
    TenantId,
    ExternalId,
    PlanCode,
    Status,
    CurrentPeriodEnd,
    RawData,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Checkouts {
    Table,
    Id,
    TenantId,
    OfferId,
    StripeSessionId,
    StripePaymentIntentId,
    Status,
    AmountCents,
    Currency,
    RawData,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum RoadmapFeatures {
    Table,
    Id,
    Title,
    Description,
    Status,
    VotesCount,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum FeatureVotes {
    Table,
    FeatureId,
    UserId,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // tenants
        manager
            .create_table(
                Table::create()
                    .table(Tenants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tenants::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Tenants::Name).string().not_null())
                    .col(ColumnDef::new(Tenants::Slug).string().not_null())
                    .col(
                        ColumnDef::new(Tenants::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Tenants::CurrentPlanCode)
                            .string()
                            .not_null()
                            .default("start"),
                    )
                    .col(
                        ColumnDef::new(Tenants::BillingStatus)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Tenants::BlockedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Tenants::StripeCustomerId).string().null())
                    .col(
                        ColumnDef::new(Tenants::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Tenants::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tenants_slug_unique")
                    .table(Tenants::Table)
                    .col(Tenants::Slug)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // users
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Users::TenantId).big_integer().not_null())
                    .col(ColumnDef::new(Users::Sub).string().not_null())
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .col(
                        ColumnDef::new(Users::Role)
                            .string()
                            .not_null()
                            .default("admin"),
                    )
                    .col(
                        ColumnDef::new(Users::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_tenant_id")
                            .from(Users::Table, Users::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_sub_unique")
                    .table(Users::Table)
                    .col(Users::Sub)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_tenant_id")
                    .table(Users::Table)
                    .col(Users::TenantId)
                    .to_owned(),
            )
            .await?;

        // profiles
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Profiles::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Profiles::TenantId).big_integer().not_null())
                    .col(ColumnDef::new(Profiles::UserId).big_integer().null())
                    .col(ColumnDef::new(Profiles::Slug).string().not_null())
                    .col(ColumnDef::new(Profiles::DisplayName).string().not_null())
                    .col(ColumnDef::new(Profiles::Bio).text().null())
                    .col(ColumnDef::new(Profiles::ThemeConfig).json_binary().not_null())
                    .col(
                        ColumnDef::new(Profiles::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Profiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Profiles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profiles_tenant_id")
                            .from(Profiles::Table, Profiles::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profiles_user_id")
                            .from(Profiles::Table, Profiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_profiles_slug_unique")
                    .table(Profiles::Table)
                    .col(Profiles::Slug)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_profiles_tenant_id")
                    .table(Profiles::Table)
                    .col(Profiles::TenantId)
                    .to_owned(),
            )
            .await?;

        // offers
        manager
            .create_table(
                Table::create()
                    .table(Offers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Offers::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Offers::TenantId).big_integer().not_null())
                    .col(ColumnDef::new(Offers::ProfileId).big_integer().not_null())
                    .col(ColumnDef::new(Offers::Title).string().not_null())
                    .col(ColumnDef::new(Offers::Description).text().null())
                    .col(ColumnDef::new(Offers::PriceCents).integer().not_null())
                    .col(
                        ColumnDef::new(Offers::Currency)
                            .string()
                            .not_null()
                            .default("BRL"),
                    )
                    .col(
                        ColumnDef::new(Offers::Kind)
                            .string()
                            .not_null()
                            .default("digital_product"),
                    )
                    .col(
                        ColumnDef::new(Offers::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Offers::Position).integer().null())
                    .col(ColumnDef::new(Offers::Metadata).json_binary().not_null())
                    .col(
                        ColumnDef::new(Offers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Offers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_offers_tenant_id")
                            .from(Offers::Table, Offers::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_offers_profile_id")
                            .from(Offers::Table, Offers::ProfileId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_offers_tenant_id")
                    .table(Offers::Table)
                    .col(Offers::TenantId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_offers_profile_id")
                    .table(Offers::Table)
                    .col(Offers::ProfileId)
                    .to_owned(),
            )
            .await?;

        // appointments
        manager
            .create_table(
                Table::create()
                    .table(Appointments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Appointments::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Appointments::TenantId).big_integer().not_null())
                    .col(ColumnDef::new(Appointments::OfferId).big_integer().not_null())
                    .col(ColumnDef::new(Appointments::ProfileId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Appointments::StartsAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Appointments::DurationMinutes)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Appointments::Status)
                            .string()
                            .not_null()
                            .default("scheduled"),
                    )
                    .col(ColumnDef::new(Appointments::ClientName).string().null())
                    .col(ColumnDef::new(Appointments::ClientEmail).string().null())
                    .col(
                        ColumnDef::new(Appointments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Appointments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_appointments_tenant_id")
                            .from(Appointments::Table, Appointments::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_appointments_offer_id")
                            .from(Appointments::Table, Appointments::OfferId)
                            .to(Offers::Table, Offers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_appointments_profile_id")
                            .from(Appointments::Table, Appointments::ProfileId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_appointments_tenant_id")
                    .table(Appointments::Table)
                    .col(Appointments::TenantId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_appointments_offer_id_starts_at")
                    .table(Appointments::Table)
                    .col(Appointments::OfferId)
                    .col(Appointments::StartsAt)
                    .to_owned(),
            )
            .await?;

        // service_availabilities
        manager
            .create_table(
                Table::create()
                    .table(ServiceAvailabilities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ServiceAvailabilities::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(
                        ColumnDef::new(ServiceAvailabilities::TenantId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ServiceAvailabilities::OfferId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ServiceAvailabilities::Weekday)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ServiceAvailabilities::StartMinute)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ServiceAvailabilities::EndMinute)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ServiceAvailabilities::DurationMinutes)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ServiceAvailabilities::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ServiceAvailabilities::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ServiceAvailabilities::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_availabilities_tenant_id")
                            .from(
                                ServiceAvailabilities::Table,
                                ServiceAvailabilities::TenantId,
                            )
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_availabilities_offer_id")
                            .from(ServiceAvailabilities::Table, ServiceAvailabilities::OfferId)
                            .to(Offers::Table, Offers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_service_availabilities_offer_id")
                    .table(ServiceAvailabilities::Table)
                    .col(ServiceAvailabilities::OfferId)
                    .to_owned(),
            )
            .await?;

        // subscriptions
        manager
            .create_table(
                Table::create()
                    .table(Subscriptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Subscriptions::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(
                        ColumnDef::new(Subscriptions::TenantId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Subscriptions::ExternalId).string().not_null())
                    .col(ColumnDef::new(Subscriptions::PlanCode).string().not_null())
                    .col(ColumnDef::new(Subscriptions::Status).string().not_null())
                    .col(
                        ColumnDef::new(Subscriptions::CurrentPeriodEnd)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Subscriptions::RawData).json_binary().not_null())
                    .col(
                        ColumnDef::new(Subscriptions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Subscriptions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subscriptions_tenant_id")
                            .from(Subscriptions::Table, Subscriptions::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_subscriptions_external_id_unique")
                    .table(Subscriptions::Table)
                    .col(Subscriptions::ExternalId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // checkouts
        manager
            .create_table(
                Table::create()
                    .table(Checkouts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Checkouts::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Checkouts::TenantId).big_integer().not_null())
                    .col(ColumnDef::new(Checkouts::OfferId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Checkouts::StripeSessionId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Checkouts::StripePaymentIntentId)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Checkouts::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Checkouts::AmountCents).integer().not_null())
                    .col(
                        ColumnDef::new(Checkouts::Currency)
                            .string()
                            .not_null()
                            .default("BRL"),
                    )
                    .col(ColumnDef::new(Checkouts::RawData).json_binary().not_null())
                    .col(
                        ColumnDef::new(Checkouts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Checkouts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_checkouts_tenant_id")
                            .from(Checkouts::Table, Checkouts::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_checkouts_offer_id")
                            .from(Checkouts::Table, Checkouts::OfferId)
                            .to(Offers::Table, Offers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_checkouts_stripe_session_id_unique")
                    .table(Checkouts::Table)
                    .col(Checkouts::StripeSessionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_checkouts_stripe_payment_intent_id")
                    .table(Checkouts::Table)
                    .col(Checkouts::StripePaymentIntentId)
                    .to_owned(),
            )
            .await?;

        // roadmap_features
        manager
            .create_table(
                Table::create()
                    .table(RoadmapFeatures::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RoadmapFeatures::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RoadmapFeatures::Title).string().not_null())
                    .col(
                        ColumnDef::new(RoadmapFeatures::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(RoadmapFeatures::Status)
                            .string()
                            .not_null()
                            .default("planned"),
                    )
                    .col(
                        ColumnDef::new(RoadmapFeatures::VotesCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(RoadmapFeatures::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RoadmapFeatures::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // feature_votes (composite primary key: one vote per user per feature)
        manager
            .create_table(
                Table::create()
                    .table(FeatureVotes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(FeatureVotes::FeatureId).uuid().not_null())
                    .col(ColumnDef::new(FeatureVotes::UserId).string().not_null())
                    .col(
                        ColumnDef::new(FeatureVotes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(FeatureVotes::FeatureId)
                            .col(FeatureVotes::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_feature_votes_feature_id")
                            .from(FeatureVotes::Table, FeatureVotes::FeatureId)
                            .to(RoadmapFeatures::Table, RoadmapFeatures::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FeatureVotes::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(RoadmapFeatures::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Checkouts::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(Subscriptions::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(ServiceAvailabilities::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(Appointments::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Offers::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Profiles::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tenants::Table).if_exists().to_owned())
            .await?;

        Ok(())
    }
}
