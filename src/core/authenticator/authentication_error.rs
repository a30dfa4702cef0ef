/// Login was refused, or the server answered without a session token.
#[derive(Debug)]
pub struct AuthenticationError {
    reason: String,
    messages: Vec<String>,
}

impl AuthenticationError {
    pub fn new(reason: String) -> Self {
        Self {
            reason,
            messages: vec![],
        }
    }

    pub fn with_messages(reason: String, messages: Vec<String>) -> Self {
        Self { reason, messages }
    }

    /// Messages returned by the server, untouched.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.messages.is_empty() {
            return write!(f, "{}", self.reason);
        }
        write!(f, "{}: {}", self.reason, self.messages.join("; "))
    }
}

impl std::error::Error for AuthenticationError {}
