use serde::Deserialize;

#[derive(Deserialize, Clone, Debug)]
pub struct ApiConfiguration {
    pub base_url: Option<String>,
    pub username: Option<String>,
    pub key: Option<String>,
    pub session_cookie: Option<String>,
    /// request timeout in seconds, the transport default applies when unset
    pub timeout: Option<u64>,
    pub accept_invalid_certs: Option<bool>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct AnalysisConfiguration {
    pub enabled: Option<bool>,
    pub ollama_host: Option<String>,
    pub model: Option<String>,
    pub timeout: Option<u64>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct LogConfiguration {
    pub level: Option<String>,
    pub retention: Option<usize>,
    pub directory: Option<String>,
}
