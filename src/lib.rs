//! Session client for the OpenCart storefront API, with the configuration,
//! logging and failure-analysis pieces used by the test tooling around it.

pub mod core;
