pub mod attendance;
pub mod classes;
pub mod common;
pub mod schedules;
pub mod settings;
pub mod subjects;
pub mod users;

pub use common::snapshot::{SNAPSHOT_VERSION, StoreSnapshot};
