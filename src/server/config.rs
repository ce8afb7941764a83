//! Server configuration.

use crate::layout::{DeckOptions, DEFAULT_MAX_PER_SLIDE, DEFAULT_SECTION};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

/// Settings for the HTTP service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listen address
    pub address: IpAddr,

    /// Listen port
    pub port: u16,

    /// Directory generated decks are written to and served from
    pub public_dir: PathBuf,

    /// Origin used in returned URLs.
    ///
    /// When unset, URLs are built from the request's `Host` header, with
    /// `https` only if `X-Forwarded-Proto` says so. Set this in deployments
    /// where clients do not reach the service directly.
    pub base_url: Option<String>,

    /// Custom `.pptx`/`.potx` template; the built-in one when unset
    pub template: Option<PathBuf>,

    pub max_per_slide: usize,
    pub default_section: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8000,
            public_dir: PathBuf::from("public"),
            base_url: None,
            template: None,
            max_per_slide: DEFAULT_MAX_PER_SLIDE,
            default_section: DEFAULT_SECTION.to_string(),
        }
    }
}

impl ServerConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the listen address and port.
    pub fn with_bind(mut self, address: IpAddr, port: u16) -> Self {
        self.address = address;
        self.port = port;
        self
    }

    /// Set the output directory.
    pub fn with_public_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.public_dir = dir.into();
        self
    }

    /// Set the origin used in returned URLs.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Use a template file instead of the built-in template.
    pub fn with_template(mut self, path: impl Into<PathBuf>) -> Self {
        self.template = Some(path.into());
        self
    }

    /// Set the page size.
    pub fn with_max_per_slide(mut self, max: usize) -> Self {
        self.max_per_slide = max;
        self
    }

    /// Set the section name for flat bullet lists.
    pub fn with_default_section(mut self, name: impl Into<String>) -> Self {
        self.default_section = name.into();
        self
    }

    /// Deck options derived from this configuration.
    pub fn deck_options(&self) -> DeckOptions {
        DeckOptions::new()
            .with_max_per_slide(self.max_per_slide)
            .with_default_section(self.default_section.clone())
    }

    /// Origin for requests that carry no `Host` header.
    pub(crate) fn fallback_origin(&self) -> String {
        format!("http://{}:{}", self.address, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8000);
        assert_eq!(config.public_dir, PathBuf::from("public"));
        assert_eq!(config.fallback_origin(), "http://127.0.0.1:8000");
        assert_eq!(config.deck_options().max_per_slide, 5);
    }

    #[test]
    fn test_builder() {
        let config = ServerConfig::new()
            .with_bind(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 9000)
            .with_base_url("https://decks.example.com")
            .with_max_per_slide(3)
            .with_default_section("Agenda");
        assert_eq!(config.base_url.as_deref(), Some("https://decks.example.com"));
        let options = config.deck_options();
        assert_eq!(options.max_per_slide, 3);
        assert_eq!(options.default_section, "Agenda");
    }
}
