pub mod login;
pub mod refresh;

pub use login::login as session_login;
pub use refresh::refresh as session_refresh;
