use std::sync::Arc;

use authentication_error::AuthenticationError;
use common::{LoginPayload, LoginResult};
use log::{debug, info, warn};
use reqwest::{
    cookie::{CookieStore, Jar},
    Url,
};

use crate::core::{
    api_client::ApiClient,
    common::{
        build_url,
        http_client_factory::{session_http_client, HttpSettings},
        token_preview,
        transport::{classify, parse_body, ApiOutcome, TransportError, TransportErrorKind},
    },
};

pub mod authentication_error;
pub mod common;
pub mod session;
pub use common::Credentials;
pub use session::{Session, SessionCookie};

const LOGIN_ROUTE: &str = "api/account/login";

/// Cookie name used by stock deployments when none is configured.
pub const DEFAULT_SESSION_COOKIE: &str = "OCSESSID";

pub struct Authenticator {
    base_url: String,
    credentials: Credentials,
    cookie_name: String,
    settings: HttpSettings,
}

impl Authenticator {
    pub fn new(
        base_url: String,
        credentials: Credentials,
        cookie_name: String,
        settings: HttpSettings,
    ) -> Self {
        debug!("initialized API authenticator for: {base_url}");
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            cookie_name,
            settings,
        }
    }

    /// Performs the login handshake and hands the session to a new client.
    pub async fn login(&self) -> Result<ApiClient, Box<dyn std::error::Error + Send + Sync>> {
        let session = self.open_session().await?;
        Ok(ApiClient::new(session))
    }

    pub async fn open_session(&self) -> Result<Session, Box<dyn std::error::Error + Send + Sync>> {
        info!("logging in as: {}", self.credentials.username);

        let jar = Arc::new(Jar::default());
        let http = session_http_client(jar.clone(), &self.settings)?;

        let payload = LoginPayload {
            username: &self.credentials.username,
            key: &self.credentials.key,
        };

        let resp = http
            .post(build_url(&self.base_url, LOGIN_ROUTE))
            .form(&payload)
            .send()
            .await
            .map_err(TransportError::from)?;

        let status = resp.status();
        let body = resp.text().await.map_err(TransportError::from)?;
        debug!("login response [{status}]");

        let result = match classify::<LoginResult>(parse_body(status, &body)?)? {
            ApiOutcome::Rejected(e) => {
                return Err(Box::new(AuthenticationError::with_messages(
                    "Login failed".to_string(),
                    e.messages,
                )))
            }
            ApiOutcome::Success(r) => r,
        };

        if !status.is_success() {
            return Err(Box::new(AuthenticationError::new(format!(
                "Login rejected with status {status}"
            ))));
        }

        let token = match result.api_token.filter(|t| !t.trim().is_empty()) {
            Some(t) => t,
            None => {
                return Err(Box::new(AuthenticationError::new(
                    "No api_token in login response".to_string(),
                )))
            }
        };

        let cookie = self.bind_session_cookie(&jar, &token)?;

        info!("login successful, token: {}", token_preview(&token));

        Ok(Session::new(
            self.base_url.clone(),
            self.credentials.clone(),
            token,
            cookie,
            http,
            jar,
        ))
    }

    /// Makes sure the jar carries the session cookie for the base URL.
    ///
    /// Some deployments answer from a differently-addressed host and the
    /// automatic cookie is then not replayed; in that case the token is set
    /// as the cookie value explicitly.
    fn bind_session_cookie(&self, jar: &Jar, token: &str) -> Result<SessionCookie, TransportError> {
        let url = Url::parse(&self.base_url).map_err(|e| {
            TransportError::new(
                TransportErrorKind::Request,
                format!("invalid base url {}: {e}", self.base_url),
            )
        })?;

        let host = url.host_str().unwrap_or_default().to_string();

        let existing = jar
            .cookies(&url)
            .and_then(|h| h.to_str().ok().map(str::to_owned))
            .and_then(|h| session::find_cookie(&h, &self.cookie_name));

        if let Some(value) = existing {
            debug!("session cookie {} retained from login response", self.cookie_name);
            return Ok(SessionCookie {
                name: self.cookie_name.clone(),
                value,
                domain: host,
                path: "/".to_string(),
            });
        }

        warn!(
            "login response did not leave a {} cookie, setting it from the token",
            self.cookie_name
        );

        // IP literals cannot carry a Domain attribute, the cookie stays host-only
        let raw = match url.domain() {
            Some(domain) => format!("{}={token}; Domain={domain}; Path=/", self.cookie_name),
            None => format!("{}={token}; Path=/", self.cookie_name),
        };
        jar.add_cookie_str(&raw, &url);

        Ok(SessionCookie {
            name: self.cookie_name.clone(),
            value: token.to_string(),
            domain: host,
            path: "/".to_string(),
        })
    }
}
