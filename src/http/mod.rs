pub mod builder;
pub mod client;
pub mod executor;

pub use builder::{PreparedRequest, prepare};
pub use executor::{execute, send};
