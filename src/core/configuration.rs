use std::{path::Path, time::Duration};

use log::debug;
use reqwest::Url;
use serde::Deserialize;
use tokio::{fs::File, io::AsyncReadExt};

use super::{
    authenticator::{Credentials, DEFAULT_SESSION_COOKIE},
    common::http_client_factory::HttpSettings,
};

pub mod sections;
pub use sections::{AnalysisConfiguration, ApiConfiguration, LogConfiguration};

pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "tinyllama";
const DEFAULT_ANALYSIS_TIMEOUT: u64 = 30;

#[derive(Deserialize, Clone, Debug)]
pub struct Configuration {
    pub api: ApiConfiguration,
    #[serde(default)]
    pub analysis: AnalysisConfiguration,
    #[serde(default)]
    pub log: LogConfiguration,
}

impl Configuration {
    pub fn assert_base_url_is_valid(&self) -> Result<(), String> {
        let raw = match self.api.base_url.as_deref().map(str::trim) {
            None | Some("") => return Err("api.base_url is missing".to_string()),
            Some(u) => u,
        };

        let url = Url::parse(raw).map_err(|e| format!("api.base_url is invalid: {e}"))?;

        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(format!("api.base_url has unsupported scheme {other}")),
        }
    }

    pub fn assert_credentials_are_present(&self) -> Result<(), String> {
        let blank = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());

        if blank(&self.api.username) {
            return Err("api.username is missing".to_string());
        }
        if blank(&self.api.key) {
            return Err("api.key is missing".to_string());
        }
        Ok(())
    }

    pub fn base_url(&self) -> Result<String, String> {
        self.assert_base_url_is_valid()?;
        Ok(self.api.base_url.clone().unwrap_or_default().trim().to_string())
    }

    pub fn credentials(&self) -> Result<Credentials, String> {
        self.assert_credentials_are_present()?;
        Ok(Credentials::new(
            self.api.username.clone().unwrap_or_default(),
            self.api.key.clone().unwrap_or_default(),
        ))
    }

    pub fn session_cookie(&self) -> String {
        self.api
            .session_cookie
            .clone()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SESSION_COOKIE.to_string())
    }

    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            timeout: self.api.timeout.map(Duration::from_secs),
            accept_invalid_certs: self.api.accept_invalid_certs.unwrap_or(false),
        }
    }

    pub fn analysis_enabled(&self) -> bool {
        self.analysis.enabled.unwrap_or(true)
    }

    pub fn ollama_host(&self) -> String {
        self.analysis
            .ollama_host
            .clone()
            .unwrap_or_else(|| DEFAULT_OLLAMA_HOST.to_string())
    }

    pub fn model(&self) -> String {
        self.analysis
            .model
            .clone()
            .unwrap_or_else(|| DEFAULT_MODEL.to_string())
    }

    pub fn analysis_timeout(&self) -> Duration {
        Duration::from_secs(self.analysis.timeout.unwrap_or(DEFAULT_ANALYSIS_TIMEOUT))
    }

    /// Applies `ENABLE_AI_ANALYSIS` and `OLLAMA_HOST` on top of the file values.
    pub fn apply_environment<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(enabled) = lookup("ENABLE_AI_ANALYSIS") {
            debug!("ENABLE_AI_ANALYSIS={enabled}");
            self.analysis.enabled = Some(enabled.trim().eq_ignore_ascii_case("true"));
        }

        if let Some(host) = lookup("OLLAMA_HOST").filter(|h| !h.trim().is_empty()) {
            debug!("OLLAMA_HOST={host}");
            self.analysis.ollama_host = Some(host);
        }
    }
}

pub async fn get_configuration(
    file_path: String,
) -> Result<Configuration, Box<dyn std::error::Error + Send + Sync>> {
    let path = Path::new(&file_path);

    if !path.exists() {
        return Err(Box::new(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("configuration file is missing: {file_path}"),
        )));
    }

    let mut file = File::open(path).await?;
    let mut buffer = vec![];

    file.read_to_end(&mut buffer).await?;

    let content = String::from_utf8(buffer)?;

    let mut conf = toml::from_str::<Configuration>(&content)?;
    conf.apply_environment(|k| std::env::var(k).ok());

    Ok(conf)
}
