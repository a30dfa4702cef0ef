pub mod analysis;
pub mod api_client;
pub mod authenticator;
pub mod cli;
pub mod common;
pub mod configuration;
pub mod core;
pub mod logger;
