use crate::constants::{
    CHAT_SYSTEM_PROMPT, DEFAULT_CHAT_API_URL, DEFAULT_CHAT_MAX_TOKENS, DEFAULT_CHAT_MODEL,
    DEFAULT_CHAT_TEMPERATURE, DEFAULT_CSV_FILE_NAME, DEFAULT_PUBLIC_URL,
};
use crate::error::{Error, Result};
use crate::utils::{get_csv_file_name, get_public_url};

/// Where CSV and prediction files are fetched from
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Public data root, e.g. "http://localhost:9876"
    pub public_url: String,

    /// CSV name under the public root (a leading `/` is tolerated)
    pub csv_file_name: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            public_url: DEFAULT_PUBLIC_URL.to_string(),
            csv_file_name: DEFAULT_CSV_FILE_NAME.to_string(),
        }
    }
}

impl IngestConfig {
    pub fn new(public_url: String, csv_file_name: String) -> Self {
        Self {
            public_url,
            csv_file_name,
        }
    }

    /// Read `STOCK_PUBLIC_URL` / `STOCK_CSV_FILE`, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            public_url: get_public_url(),
            csv_file_name: get_csv_file_name(),
        }
    }

    /// Check the public root is an http(s) URL and strip trailing slashes
    pub fn validated(mut self) -> Result<Self> {
        let url = self.public_url.trim().trim_end_matches('/').to_string();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(Error::Config(format!(
                "Invalid public_url: must start with http:// or https://, got: '{}'",
                self.public_url
            )));
        }
        self.public_url = url;
        Ok(self)
    }
}

/// Chat assistant endpoint and sampling settings
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub system_prompt: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_CHAT_API_URL.to_string(),
            api_key: String::new(),
            model: DEFAULT_CHAT_MODEL.to_string(),
            max_tokens: DEFAULT_CHAT_MAX_TOKENS,
            temperature: DEFAULT_CHAT_TEMPERATURE,
            system_prompt: CHAT_SYSTEM_PROMPT.to_string(),
        }
    }
}

impl ChatConfig {
    /// Read `DEEPSEEK_API_URL` and `DEEPSEEK_API_KEY`; the key is required
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("DEEPSEEK_API_KEY")
            .map_err(|_| Error::Config("DEEPSEEK_API_KEY is not set".to_string()))?;
        let api_url =
            std::env::var("DEEPSEEK_API_URL").unwrap_or_else(|_| DEFAULT_CHAT_API_URL.to_string());

        Ok(Self {
            api_url,
            api_key,
            ..Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validated_trims_trailing_slash() {
        let config = IngestConfig::new("http://localhost:9876/".to_string(), "stock.csv".to_string())
            .validated()
            .unwrap();
        assert_eq!(config.public_url, "http://localhost:9876");
    }

    #[test]
    fn test_validated_rejects_non_http() {
        let result = IngestConfig::new("ftp://example.com".to_string(), "stock.csv".to_string()).validated();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_chat_defaults() {
        let config = ChatConfig::default();
        assert_eq!(config.model, "deepseek-chat");
        assert_eq!(config.max_tokens, 1000);
        assert!((config.temperature - 0.7).abs() < f32::EPSILON);
    }
}
