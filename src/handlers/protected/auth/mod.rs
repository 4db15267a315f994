pub mod session;

pub use session::whoami as session_whoami;
pub use session::logout as session_logout;
