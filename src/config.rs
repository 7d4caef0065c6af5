use std::env;

use anyhow::Result;

use crate::pdf::science_parse::{DEFAULT_SCIENCE_PARSE_PORT, DEFAULT_SCIENCE_PARSE_URL};
use crate::tagging::ucrel::DEFAULT_UCREL_API_URL;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Command
/// line flags override the Science Parse settings.
#[derive(Debug, Clone)]
pub struct Config {
    /// Science Parse host, scheme included (SCIENCE_PARSE_URL)
    pub science_parse_url: String,
    /// Science Parse port (SCIENCE_PARSE_PORT)
    pub science_parse_port: String,
    /// Base URL of the UCREL tagging API (UCREL_API_URL)
    pub ucrel_api_url: String,
    /// Contact email the UCREL API requires with every request (UCREL_API_EMAIL)
    pub ucrel_api_email: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything but the UCREL email has a default; the email is only
    /// needed by commands that tag text.
    pub fn load() -> Result<Self> {
        Ok(Self {
            science_parse_url: env::var("SCIENCE_PARSE_URL")
                .unwrap_or_else(|_| DEFAULT_SCIENCE_PARSE_URL.to_string()),
            science_parse_port: env::var("SCIENCE_PARSE_PORT")
                .unwrap_or_else(|_| DEFAULT_SCIENCE_PARSE_PORT.to_string()),
            ucrel_api_url: env::var("UCREL_API_URL")
                .unwrap_or_else(|_| DEFAULT_UCREL_API_URL.to_string()),
            ucrel_api_email: env::var("UCREL_API_EMAIL").unwrap_or_default(),
        })
    }

    /// Check that the UCREL API email is configured.
    /// Call this before any operation that sends text to the tagger.
    pub fn require_tagger(&self) -> Result<()> {
        if self.ucrel_api_email.trim().is_empty() {
            anyhow::bail!(
                "UCREL_API_EMAIL not set. The UCREL tagging API needs a contact email.\n\
                 Add it to your .env file."
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_tagger_needs_email() {
        let mut config = Config {
            science_parse_url: DEFAULT_SCIENCE_PARSE_URL.to_string(),
            science_parse_port: DEFAULT_SCIENCE_PARSE_PORT.to_string(),
            ucrel_api_url: DEFAULT_UCREL_API_URL.to_string(),
            ucrel_api_email: "  ".to_string(),
        };
        assert!(config.require_tagger().is_err());

        config.ucrel_api_email = "someone@example.ac.uk".to_string();
        assert!(config.require_tagger().is_ok());
    }
}
