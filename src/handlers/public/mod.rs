// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition plus the service banner and health probe.
//
// Security Level: None
// Route Prefix: /auth/*, /, /health

pub mod auth;
pub mod status;

pub use auth::*;
pub use status::{health, root};
