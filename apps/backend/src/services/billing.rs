//! Billing orchestration: Checkout session creation and webhook event
//! application. The local `subscriptions`/`checkouts` tables mirror the
//! provider's state; the provider is the source of truth and webhooks drive
//! the sync.

use std::collections::HashMap;

use sea_orm::ConnectionTrait;
use serde::Deserialize;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::config::plans::{self, FREE_PLAN_CODE};
use crate::entities::{checkouts as checkout_entity, offers, tenants as tenant_entity};
use crate::error::AppError;
use crate::infra::stripe::{CheckoutSession, CheckoutSessionParams, StripeClient};
use crate::repos::{checkouts, subscriptions, tenants};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingInterval {
    Monthly,
    Yearly,
}

impl BillingInterval {
    fn stripe_interval(self) -> &'static str {
        match self {
            BillingInterval::Monthly => "month",
            BillingInterval::Yearly => "year",
        }
    }
}

/// Price in cents for a plan under a billing interval. `None` for plans
/// that cannot be purchased (the free tier).
pub fn plan_amount(plan: &plans::Plan, interval: BillingInterval) -> Option<i64> {
    let amount = match interval {
        BillingInterval::Monthly => plan.monthly_price_cents,
        BillingInterval::Yearly => plan.yearly_price_cents,
    };
    (amount > 0).then_some(amount)
}

/// Start a subscription Checkout for a plan upgrade. The tenant and plan
/// ride along as metadata so the webhook can attribute the result.
pub async fn create_plan_checkout(
    stripe: &StripeClient,
    tenant: &tenant_entity::Model,
    customer_email: &str,
    plan_code: &str,
    interval: BillingInterval,
    success_url: String,
    cancel_url: String,
) -> Result<CheckoutSession, AppError> {
    let plan = plans::find_plan(plan_code)
        .ok_or_else(|| AppError::bad_request("UNKNOWN_PLAN", format!("Unknown plan {plan_code:?}")))?;

    let amount = plan_amount(plan, interval).ok_or_else(|| {
        AppError::bad_request(
            "PLAN_NOT_PURCHASABLE",
            format!("Plan {plan_code:?} has no paid price"),
        )
    })?;

    let session = stripe
        .create_checkout_session(CheckoutSessionParams {
            mode: "subscription",
            product_name: format!("Vasta {}", plan.name),
            currency: "brl".to_string(),
            unit_amount: amount,
            recurring_interval: Some(interval.stripe_interval()),
            success_url,
            cancel_url,
            customer_email: Some(customer_email.to_string()),
            metadata: vec![
                ("tenant_id".to_string(), tenant.id.to_string()),
                ("plan_code".to_string(), plan.code.to_string()),
            ],
        })
        .await?;

    info!(tenant_id = tenant.id, plan = plan.code, session = %session.id, "plan checkout created");
    Ok(session)
}

/// Start a one-off payment Checkout for an offer and record the pending
/// checkout locally.
pub async fn create_offer_checkout<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    stripe: &StripeClient,
    tenant_id: i64,
    offer: &offers::Model,
    success_url: String,
    cancel_url: String,
) -> Result<(checkout_entity::Model, CheckoutSession), AppError> {
    let session = stripe
        .create_checkout_session(CheckoutSessionParams {
            mode: "payment",
            product_name: offer.title.clone(),
            currency: offer.currency.clone(),
            unit_amount: i64::from(offer.price_cents),
            recurring_interval: None,
            success_url,
            cancel_url,
            customer_email: None,
            metadata: vec![
                ("tenant_id".to_string(), tenant_id.to_string()),
                ("offer_id".to_string(), offer.id.to_string()),
            ],
        })
        .await?;

    let checkout = checkouts::create(
        conn,
        checkouts::CreateCheckout {
            tenant_id,
            offer_id: offer.id,
            stripe_session_id: session.id.clone(),
            amount_cents: offer.price_cents,
            currency: offer.currency.clone(),
        },
    )
    .await?;

    info!(tenant_id, offer_id = offer.id, session = %session.id, "offer checkout created");
    Ok((checkout, session))
}

// ----- webhook events -----

#[derive(Debug, Deserialize)]
pub struct StripeEvent {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: StripeEventData,
}

#[derive(Debug, Deserialize)]
pub struct StripeEventData {
    pub object: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct SessionObject {
    id: String,
    #[serde(default)]
    mode: String,
    #[serde(default)]
    customer: Option<String>,
    #[serde(default)]
    subscription: Option<String>,
    #[serde(default)]
    payment_intent: Option<String>,
    #[serde(default)]
    metadata: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct SubscriptionObject {
    id: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    customer: Option<String>,
    #[serde(default)]
    current_period_end: Option<i64>,
    #[serde(default)]
    metadata: HashMap<String, String>,
}

fn parse_object<T: serde::de::DeserializeOwned>(value: &serde_json::Value) -> Result<T, AppError> {
    serde_json::from_value(value.clone()).map_err(|e| {
        AppError::bad_request("WEBHOOK_PAYLOAD_INVALID", format!("Unparsable event object: {e}"))
    })
}

/// Apply one verified webhook event. Unknown event types are acknowledged
/// and skipped so the provider does not retry them forever.
pub async fn apply_webhook_event<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    stripe: &StripeClient,
    event: &StripeEvent,
) -> Result<(), AppError> {
    match event.event_type.as_str() {
        "checkout.session.completed" => {
            let session: SessionObject = parse_object(&event.data.object)?;
            apply_session_completed(conn, stripe, session, &event.data.object).await
        }
        "customer.subscription.created" | "customer.subscription.updated" => {
            let subscription: SubscriptionObject = parse_object(&event.data.object)?;
            apply_subscription_update(conn, subscription, &event.data.object, None).await
        }
        "customer.subscription.deleted" => {
            let subscription: SubscriptionObject = parse_object(&event.data.object)?;
            apply_subscription_update(conn, subscription, &event.data.object, Some("canceled")).await
        }
        other => {
            debug!(event = %event.id, event_type = other, "ignoring webhook event");
            Ok(())
        }
    }
}

async fn apply_session_completed<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    stripe: &StripeClient,
    session: SessionObject,
    raw: &serde_json::Value,
) -> Result<(), AppError> {
    // One-off offer purchase: settle the pending checkout row.
    if let Some(checkout) = checkouts::find_by_session_id(conn, &session.id).await? {
        checkouts::mark_paid(conn, checkout, session.payment_intent.clone(), raw.clone()).await?;
        info!(session = %session.id, "checkout settled");
    }

    if session.mode != "subscription" {
        return Ok(());
    }

    // Plan upgrade: attribute via metadata, then pull the subscription's
    // current state from the provider.
    let Some(tenant) = tenant_from_metadata(conn, &session.metadata).await? else {
        warn!(session = %session.id, "completed session without a resolvable tenant");
        return Ok(());
    };

    let needs_customer_link = tenant.stripe_customer_id.is_none();
    let tenant = match (&session.customer, needs_customer_link) {
        (Some(customer), true) => tenants::set_stripe_customer(conn, tenant, customer).await?,
        _ => tenant,
    };

    let Some(subscription_id) = session.subscription else {
        return Ok(());
    };

    let remote = stripe.retrieve_subscription(&subscription_id).await?;
    let plan_code = session
        .metadata
        .get("plan_code")
        .cloned()
        .unwrap_or_else(|| "pro".to_string());

    subscriptions::upsert(
        conn,
        subscriptions::SubscriptionUpdate {
            tenant_id: tenant.id,
            external_id: remote.id.clone(),
            plan_code: plan_code.clone(),
            status: remote.status.clone(),
            current_period_end: remote
                .current_period_end
                .and_then(|ts| OffsetDateTime::from_unix_timestamp(ts).ok()),
            raw_data: raw.clone(),
        },
    )
    .await?;

    let tenant_id = tenant.id;
    tenants::set_plan(conn, tenant, &plan_code, &remote.status).await?;
    info!(tenant_id, plan = %plan_code, "tenant plan updated from checkout");
    Ok(())
}

async fn apply_subscription_update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    subscription: SubscriptionObject,
    raw: &serde_json::Value,
    status_override: Option<&str>,
) -> Result<(), AppError> {
    let tenant = match tenant_from_metadata(conn, &subscription.metadata).await? {
        Some(tenant) => Some(tenant),
        None => match &subscription.customer {
            Some(customer) => tenants::find_by_stripe_customer(conn, customer).await?,
            None => None,
        },
    };

    let Some(tenant) = tenant else {
        warn!(subscription = %subscription.id, "subscription event without a resolvable tenant");
        return Ok(());
    };

    let status = status_override
        .map(str::to_string)
        .unwrap_or_else(|| subscription.status.clone());

    // Canceled subscriptions drop the tenant back to the free tier.
    let plan_code = if status == "canceled" {
        FREE_PLAN_CODE.to_string()
    } else {
        subscription
            .metadata
            .get("plan_code")
            .cloned()
            .unwrap_or_else(|| "pro".to_string())
    };

    subscriptions::upsert(
        conn,
        subscriptions::SubscriptionUpdate {
            tenant_id: tenant.id,
            external_id: subscription.id.clone(),
            plan_code: plan_code.clone(),
            status: status.clone(),
            current_period_end: subscription
                .current_period_end
                .and_then(|ts| OffsetDateTime::from_unix_timestamp(ts).ok()),
            raw_data: raw.clone(),
        },
    )
    .await?;

    let tenant_id = tenant.id;
    tenants::set_plan(conn, tenant, &plan_code, &status).await?;
    info!(tenant_id, plan = %plan_code, %status, "tenant plan synced from subscription event");
    Ok(())
}

async fn tenant_from_metadata<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    metadata: &HashMap<String, String>,
) -> Result<Option<tenant_entity::Model>, AppError> {
    let Some(tenant_id) = metadata.get("tenant_id").and_then(|v| v.parse::<i64>().ok()) else {
        return Ok(None);
    };
    tenants::find_by_id(conn, tenant_id).await
}

#[cfg(test)]
mod tests {
    use super::{plan_amount, BillingInterval, SessionObject, StripeEvent, SubscriptionObject};
    use crate::config::plans;

    #[test]
    fn billing_interval_deserializes_lowercase() {
        let monthly: BillingInterval = serde_json::from_str("\"monthly\"").unwrap();
        assert_eq!(monthly, BillingInterval::Monthly);
        assert!(serde_json::from_str::<BillingInterval>("\"weekly\"").is_err());
    }

    #[test]
    fn plan_amounts() {
        let pro = plans::find_plan("pro").unwrap();
        assert_eq!(plan_amount(pro, BillingInterval::Monthly), Some(4_900));
        assert_eq!(plan_amount(pro, BillingInterval::Yearly), Some(45_600));

        let start = plans::find_plan("start").unwrap();
        assert_eq!(plan_amount(start, BillingInterval::Monthly), None);
    }

    #[test]
    fn parses_a_checkout_completed_event() {
        let payload = serde_json::json!({
            "id": "evt_123",
            "type": "checkout.session.completed",
            "data": {
                "object": {
                    "id": "cs_test_1",
                    "mode": "subscription",
                    "customer": "cus_9",
                    "subscription": "sub_7",
                    "metadata": {"tenant_id": "42", "plan_code": "pro"}
                }
            }
        });

        let event: StripeEvent = serde_json::from_value(payload).unwrap();
        assert_eq!(event.event_type, "checkout.session.completed");

        let session: SessionObject = serde_json::from_value(event.data.object).unwrap();
        assert_eq!(session.id, "cs_test_1");
        assert_eq!(session.subscription.as_deref(), Some("sub_7"));
        assert_eq!(session.metadata.get("plan_code").unwrap(), "pro");
    }

    #[test]
    fn parses_a_subscription_event_with_missing_fields() {
        let object = serde_json::json!({"id": "sub_7", "status": "active"});

        let subscription: SubscriptionObject = serde_json::from_value(object).unwrap();
        assert_eq!(subscription.id, "sub_7");
        assert!(subscription.customer.is_none());
        assert!(subscription.metadata.is_empty());
    }
}
