pub mod list;

pub use list::current as settings_current;
pub use list::list as settings_list;
