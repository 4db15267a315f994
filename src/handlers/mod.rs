// handlers/mod.rs - 3-Tier Handler Architecture
//
// Public (no auth) → Protected (JWT auth) → Elevated (JWT auth + admin role)
//
pub mod public;    // Tier 1: No authentication required (/, /health, /auth/*)
pub mod protected; // Tier 2: JWT authentication required (/api/*)
pub mod elevated;  // Tier 3: Admin role required (/api/admin/*)

mod extract;

pub use extract::{parse_id, JsonBody};
