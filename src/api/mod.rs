pub mod client;
pub mod collections;

pub use client::ApiClient;
pub use collections::{CollectionsClient, Deleted};
