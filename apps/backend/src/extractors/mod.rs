pub mod auth_user;
pub mod current_user;
pub mod validated_json;

pub use auth_user::AuthUser;
pub use current_user::CurrentUser;
pub use validated_json::ValidatedJson;
