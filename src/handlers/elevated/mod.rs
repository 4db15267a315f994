// handlers/elevated/mod.rs - Elevated handlers (admin role required)
//
// Every mutation of the setting timeline lives here.
//
// Security Level: JWT Authentication + admin role
// Route Prefix: /api/admin/*
// Middleware: jwt_auth_middleware, then require_admin

pub mod settings;

pub use settings::*;
