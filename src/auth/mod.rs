//! Token issuance/verification and the authorization gate.

pub mod extract;
pub mod handlers;
pub mod service;

pub use extract::AdminUser;
pub use service::{Claims, TokenError, TokenService};
