pub mod create;
pub mod delete;
pub mod recalculate;
pub mod update;

pub use create::create as setting_create;
pub use delete::delete as setting_delete;
pub use recalculate::recalculate as settings_recalculate;
pub use recalculate::refresh_active as settings_refresh;
pub use update::update as setting_update;
