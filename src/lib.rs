//! Core of an API workspace: edit HTTP requests, send them, and keep them
//! organized in collections backed by a REST service.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod event;
pub mod http;
pub mod state;
pub mod storage;

pub use app::App;
pub use config::Config;
pub use error::AppError;
pub use event::Event;
