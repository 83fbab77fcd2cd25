pub mod auth;
pub mod extract;

pub use auth::{jwt_auth_middleware, AuthUser};
pub use extract::ApiJson;
