//! Client configuration for NCBI E-utilities requests
//!
//! NCBI asks every client to identify itself with a contact email and a tool
//! name; an API key is optional and raises the allowed request rate.

use std::time::Duration;

/// Default E-utilities endpoint
pub const DEFAULT_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// Contact email used when the caller supplies none
pub const DEFAULT_EMAIL: &str = "user@example.com";

/// Tool name reported to NCBI
pub const DEFAULT_TOOL: &str = "pubmed-paper-fetcher";

/// Configuration shared by the search and fetch requests
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// NCBI API key (optional)
    pub api_key: Option<String>,
    /// Contact email sent with every request
    pub email: String,
    /// Tool name sent with every request
    pub tool: Option<String>,
    /// Override for the E-utilities base URL (used by mocked tests)
    pub base_url: Option<String>,
    /// Per-request HTTP timeout
    pub timeout: Duration,
    /// Custom user agent
    pub user_agent: Option<String>,
}

impl ClientConfig {
    /// Create a configuration with NCBI defaults and no API key
    ///
    /// # Example
    ///
    /// ```
    /// use pubmed_paper_fetcher::ClientConfig;
    ///
    /// let config = ClientConfig::new()
    ///     .with_email("researcher@university.edu")
    ///     .with_api_key("your_api_key_here");
    /// assert_eq!(config.email, "researcher@university.edu");
    /// ```
    pub fn new() -> Self {
        Self {
            api_key: None,
            email: DEFAULT_EMAIL.to_string(),
            tool: None,
            base_url: None,
            timeout: Duration::from_secs(30),
            user_agent: None,
        }
    }

    pub fn with_api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_email<S: Into<String>>(mut self, email: S) -> Self {
        self.email = email.into();
        self
    }

    pub fn with_tool<S: Into<String>>(mut self, tool: S) -> Self {
        self.tool = Some(tool.into());
        self
    }

    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Base URL without a trailing slash
    pub fn effective_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("{}/{}", DEFAULT_TOOL, env!("CARGO_PKG_VERSION")))
    }

    pub fn effective_tool(&self) -> &str {
        self.tool.as_deref().unwrap_or(DEFAULT_TOOL)
    }

    /// Identification parameters appended to every E-utilities URL
    ///
    /// Empty API keys are treated as absent.
    pub fn build_api_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("email".to_string(), self.email.clone()),
            ("tool".to_string(), self.effective_tool().to_string()),
        ];

        if let Some(key) = self.api_key.as_deref().filter(|k| !k.is_empty()) {
            params.push(("api_key".to_string(), key.to_string()));
        }

        params
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}
