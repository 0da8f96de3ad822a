/// Which credential the harness talks to the service with. Admin scope is
/// selected per harness instance, never inherited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialScope {
    Regular,
    Admin,
}

impl Default for CredentialScope {
    fn default() -> Self {
        Self::Regular
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: String,
    pub auth_token: Option<String>,
    pub request_timeout_seconds: u64,
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            auth_token: None,
            request_timeout_seconds: 30,
        }
    }
}
