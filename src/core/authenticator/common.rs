use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug)]
pub struct LoginPayload<'a> {
    pub username: &'a str,
    pub key: &'a str,
}

#[derive(Deserialize, Clone, Debug)]
pub struct LoginResult {
    pub api_token: Option<String>,
}

#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub key: String,
}

impl Credentials {
    pub fn new(username: String, key: String) -> Self {
        Self { username, key }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("key", &"<redacted>")
            .finish()
    }
}
