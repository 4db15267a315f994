pub mod user;

pub use user::{RefreshToken, Role, User};
