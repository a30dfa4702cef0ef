use std::{sync::Arc, time::Duration};

use log::debug;
use reqwest::{cookie::Jar, Client};

use super::transport::{TransportError, TransportErrorKind};

static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

/// Transport settings shared by every client built for one deployment.
#[derive(Clone, Debug, Default)]
pub struct HttpSettings {
    pub timeout: Option<Duration>,
    pub accept_invalid_certs: bool,
}

/// Creates the HTTP client backing one session. The cookie jar is shared
/// with the caller so the session cookie can be inspected and seeded.
pub fn session_http_client(
    jar: Arc<Jar>,
    settings: &HttpSettings,
) -> Result<Client, TransportError> {
    debug!("creating session HTTP client");

    let mut builder = reqwest::ClientBuilder::new()
        .cookie_provider(jar)
        .user_agent(APP_USER_AGENT)
        .danger_accept_invalid_certs(settings.accept_invalid_certs);

    if let Some(timeout) = settings.timeout {
        builder = builder.timeout(timeout);
    }

    builder.build().map_err(|e| {
        TransportError::new(
            TransportErrorKind::Request,
            format!("cannot create HTTP client: {e}"),
        )
    })
}

/// Creates a cookie-less client, used for calls outside the API session.
pub fn http_client_factory(timeout: Option<Duration>) -> Result<Client, TransportError> {
    debug!("creating HTTP client");

    let mut builder = reqwest::ClientBuilder::new().user_agent(APP_USER_AGENT);

    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    builder.build().map_err(|e| {
        TransportError::new(
            TransportErrorKind::Request,
            format!("cannot create HTTP client: {e}"),
        )
    })
}
