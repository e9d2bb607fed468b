pub mod app_state;
pub mod collection;
pub mod key_value;
pub mod request_state;
pub mod response_state;
pub mod store;
pub mod workspace;
