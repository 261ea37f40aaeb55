pub mod commands;
pub mod events;
pub mod reducer;
pub mod store;

pub use commands::DashCommand;
pub use events::{DashEvent, SyncEvent};
pub use reducer::reduce;
pub use store::DashStore;
