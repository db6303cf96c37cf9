pub mod pool;
pub mod store;

pub use pool::{Acquisition, ResourcePool};
pub use store::InventoryStore;
