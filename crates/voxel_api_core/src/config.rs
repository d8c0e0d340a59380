/// Endpoint used when neither an argument nor `VOXEL_API_ADDRESS` is given.
pub const DEFAULT_ENDPOINT: &str = "tcp://127.0.0.1:4455";

/// Environment variable overriding the endpoint.
pub const ENDPOINT_ENV: &str = "VOXEL_API_ADDRESS";

/// Connection settings for [`crate::ApiClient`].
///
/// There is deliberately no timeout here: a request blocks until the server
/// replies, and a stalled server stalls the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub endpoint: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl ApiConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    pub fn from_env() -> Self {
        let endpoint = std::env::var(ENDPOINT_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        Self { endpoint }
    }

    /// An explicit address (e.g. from the command line) wins over the environment.
    pub fn resolve(address: Option<String>) -> Self {
        match address {
            Some(endpoint) => Self::new(endpoint),
            None => Self::from_env(),
        }
    }
}
