use lbx_client::ClientError;
use lbx_models::{OperatingStatus, ProvisioningStatus};
use thiserror::Error;

use crate::verify::TreeLevel;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("load balancer {id} not found")]
    NotFound { id: String },

    #[error(
        "wait for load balancer ran for {timeout_secs} seconds and did not observe {id} reach {provisioning}/{operating}"
    )]
    ConvergenceTimeout {
        id: String,
        provisioning: ProvisioningStatus,
        operating: OperatingStatus,
        timeout_secs: u64,
    },

    #[error("waited {timeout_secs} seconds for load balancer {id} to be deleted")]
    DeletionTimeout { id: String, timeout_secs: u64 },

    #[error("status tree mismatch at {level} level: {reason}")]
    StatusTreeMismatch { level: TreeLevel, reason: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("client error: {0}")]
    Client(#[from] ClientError),
}

impl HarnessError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
