// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Read access to the setting timeline and session management for any
// signed-in user.
//
// Security Level: JWT Authentication Required
// Route Prefix: /api/*
// Middleware: jwt_auth_middleware (injects AuthUser)

pub mod auth;
pub mod settings;

pub use auth::*;
pub use settings::*;
