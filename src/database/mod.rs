pub mod manager;
pub mod memory;
pub mod models;
pub mod settings;
pub mod store;
pub mod users;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::{MemorySettingStore, MemoryUserStore};
pub use settings::PgSettingStore;
pub use store::{SettingStore, TimelineTx, UserStore};
pub use users::PgUserStore;
