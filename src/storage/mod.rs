pub mod local;
pub mod snapshot;

pub use local::LocalStorage;
pub use snapshot::{Persistence, SavedRequestSnapshot};
