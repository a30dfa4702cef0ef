use std::sync::Arc;

use reqwest::{
    cookie::{CookieStore, Jar},
    Client, Url,
};

use super::common::Credentials;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
}

/// An authenticated session: created by a successful login, then owned by
/// exactly one [`ApiClient`](crate::core::api_client::ApiClient).
///
/// There is no expiry tracking. Once the server drops the session, calls
/// simply come back rejected.
pub struct Session {
    base_url: String,
    credentials: Credentials,
    token: String,
    cookie: SessionCookie,
    http: Client,
    jar: Arc<Jar>,
}

impl Session {
    pub(super) fn new(
        base_url: String,
        credentials: Credentials,
        token: String,
        cookie: SessionCookie,
        http: Client,
        jar: Arc<Jar>,
    ) -> Self {
        Self {
            base_url,
            credentials,
            token,
            cookie,
            http,
            jar,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn username(&self) -> &str {
        &self.credentials.username
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn cookie(&self) -> &SessionCookie {
        &self.cookie
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// The `Cookie` header the jar would attach to a request on the base URL.
    pub fn cookie_header(&self) -> Option<String> {
        let url = Url::parse(&self.base_url).ok()?;
        self.jar
            .cookies(&url)
            .and_then(|h| h.to_str().ok().map(str::to_owned))
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials)
            .field("cookie", &self.cookie.name)
            .finish_non_exhaustive()
    }
}

/// Value of the cookie `name` in a `Cookie` header, if present.
pub fn find_cookie(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(n, _)| *n == name)
        .map(|(_, v)| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::find_cookie;

    #[test]
    fn find_cookie_picks_the_named_pair() {
        let header = "language=en-gb; OCSESSID=abc123; currency=USD";
        assert_eq!(Some("abc123".to_string()), find_cookie(header, "OCSESSID"));
        assert_eq!(None, find_cookie(header, "PHPSESSID"));
    }
}
