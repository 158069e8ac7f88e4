pub mod appointments;
pub mod checkouts;
pub mod feature_votes;
pub mod offers;
pub mod profiles;
pub mod roadmap_features;
pub mod service_availabilities;
pub mod subscriptions;
pub mod tenants;
pub mod users;
