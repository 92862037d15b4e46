// Configuration for the Vensys client

/// Configuration for one site's Vensys API connection
#[derive(Clone, Debug)]
pub struct VensysClientConfig {
    /// Base URL (e.g. "https://customer.vensys.de")
    pub base_url: String,
    /// API key sent as a bearer token, empty for none
    pub api_key: String,
    /// Connection timeout in milliseconds (default: 5000)
    pub connect_timeout_ms: u64,
    /// Read timeout in milliseconds (default: 30000)
    pub read_timeout_ms: u64,
}

impl Default for VensysClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:9090".to_string(),
            api_key: String::new(),
            connect_timeout_ms: 5000,
            read_timeout_ms: 30000,
        }
    }
}

impl VensysClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Default::default()
        }
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = api_key.to_string();
        self
    }

    pub fn with_timeouts(mut self, connect_ms: u64, read_ms: u64) -> Self {
        self.connect_timeout_ms = connect_ms;
        self.read_timeout_ms = read_ms;
        self
    }
}
