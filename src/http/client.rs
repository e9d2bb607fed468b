use reqwest::Client;

use crate::error::AppError;

const USER_AGENT: &str = concat!("api-haven/", env!("CARGO_PKG_VERSION"));

/// Shared client for ad-hoc sends and backend calls. No request timeout is
/// set; the transport default applies.
pub fn build_client() -> Result<Client, AppError> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .use_rustls_tls()
        .build()?;
    Ok(client)
}
