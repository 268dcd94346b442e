pub mod archive;
pub mod config;
pub mod download_client;
pub mod error;
pub mod fetch_settings;
pub mod fetcher;
pub mod github;
pub mod logging;
pub mod platform;

#[cfg(test)]
pub mod test_helpers;
