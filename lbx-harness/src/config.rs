use std::time::Duration;

use envconfig::Envconfig;
use lbx_client::{ClientConfig, CredentialScope};

use crate::errors::HarnessError;

#[derive(Debug, Clone, Envconfig)]
pub struct HarnessConfig {
    #[envconfig(from = "LBX_ENDPOINT", default = "http://127.0.0.1:9696")]
    pub endpoint: String,

    #[envconfig(from = "LBX_AUTH_TOKEN")]
    pub auth_token: Option<String>,

    #[envconfig(from = "LBX_ADMIN_AUTH_TOKEN")]
    pub admin_auth_token: Option<String>,

    /// Seconds between status reads while waiting for convergence.
    #[envconfig(from = "LBX_BUILD_INTERVAL", default = "1")]
    pub build_interval_seconds: u64,

    /// Seconds a single wait may run before giving up.
    #[envconfig(from = "LBX_BUILD_TIMEOUT", default = "600")]
    pub build_timeout_seconds: u64,

    #[envconfig(from = "LBX_REQUEST_TIMEOUT", default = "30")]
    pub request_timeout_seconds: u64,
}

impl HarnessConfig {
    /// Load configuration from environment variables only
    pub fn load_from_env() -> Result<Self, HarnessError> {
        Self::init_from_env().map_err(|e| HarnessError::config(e.to_string()))
    }

    pub fn wait(&self) -> WaitSettings {
        WaitSettings {
            build_interval: Duration::from_secs(self.build_interval_seconds),
            build_timeout: Duration::from_secs(self.build_timeout_seconds),
        }
    }

    /// Client configuration for the requested credential scope. Admin scope
    /// requires LBX_ADMIN_AUTH_TOKEN to be set.
    pub fn client(
        &self,
        scope: CredentialScope,
    ) -> Result<ClientConfig, HarnessError> {
        let auth_token = match scope {
            CredentialScope::Regular => self.auth_token.clone(),
            CredentialScope::Admin => Some(
                self.admin_auth_token.clone().ok_or_else(|| {
                    HarnessError::config(
                        "LBX_ADMIN_AUTH_TOKEN is required for the admin scope",
                    )
                })?,
            ),
        };
        Ok(ClientConfig {
            endpoint: self.endpoint.clone(),
            auth_token,
            request_timeout_seconds: self.request_timeout_seconds,
        })
    }
}

/// Poll interval and deadline for status waits.
#[derive(Debug, Clone)]
pub struct WaitSettings {
    pub build_interval: Duration,
    pub build_timeout: Duration,
}

impl Default for WaitSettings {
    fn default() -> Self {
        Self {
            build_interval: Duration::from_secs(1),
            build_timeout: Duration::from_secs(600),
        }
    }
}
