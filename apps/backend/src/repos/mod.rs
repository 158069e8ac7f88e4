//! Data access, one module per aggregate. Functions are generic over
//! `ConnectionTrait` so they run on a pooled connection or inside a
//! transaction alike.

pub mod appointments;
pub mod availability;
pub mod checkouts;
pub mod offers;
pub mod profiles;
pub mod roadmap;
pub mod subscriptions;
pub mod tenants;
pub mod users;
