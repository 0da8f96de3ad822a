use lbx_client::LoadBalancerClient;
use lbx_models::{LoadBalancer, OperatingStatus, ProvisioningStatus};
use tracing::debug;

use crate::config::WaitSettings;
use crate::errors::HarnessError;

/// What a wait is trying to observe: convergence on a status pair, or the
/// disappearance of the record after a delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitKind {
    Convergence,
    Deletion,
}

/// Status pair a wait looks for.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusTarget {
    pub provisioning: ProvisioningStatus,
    pub operating: OperatingStatus,
}

impl Default for StatusTarget {
    fn default() -> Self {
        Self {
            provisioning: ProvisioningStatus::Active,
            operating: OperatingStatus::Online,
        }
    }
}

/// Result of one status read, as fed into the machine.
#[derive(Debug)]
pub enum ReadOutcome {
    Found(LoadBalancer),
    Missing,
}

/// Terminal states of a wait.
#[derive(Debug)]
pub enum WaitVerdict {
    /// The record matched the target pair.
    Converged(Box<LoadBalancer>),
    /// The record disappeared while a deletion wait was running.
    Absent,
    /// The record disappeared while a convergence wait was running. The
    /// caller fails immediately; a vanished record is never retried.
    Vanished,
}

/// Pure transition function of a wait. The async driver owns the clock and
/// the deadline; the machine only decides whether a read is terminal.
#[derive(Debug, Clone)]
pub struct WaitMachine {
    pub kind: WaitKind,
    pub target: StatusTarget,
}

impl WaitMachine {
    pub fn new(kind: WaitKind, target: StatusTarget) -> Self {
        Self { kind, target }
    }

    pub fn observe(&self, outcome: ReadOutcome) -> Option<WaitVerdict> {
        match outcome {
            ReadOutcome::Found(lb) => {
                if lb.provisioning_status == self.target.provisioning
                    && lb.operating_status == self.target.operating
                {
                    Some(WaitVerdict::Converged(Box::new(lb)))
                } else {
                    None
                }
            }
            ReadOutcome::Missing => match self.kind {
                WaitKind::Deletion => Some(WaitVerdict::Absent),
                WaitKind::Convergence => Some(WaitVerdict::Vanished),
            },
        }
    }
}

/// Poll the load balancer until the machine reaches a verdict or the
/// deadline passes. Read errors other than absence propagate right away.
pub(crate) async fn drive(
    client: &dyn LoadBalancerClient,
    settings: &WaitSettings,
    id: &str,
    machine: WaitMachine,
) -> Result<WaitVerdict, HarnessError> {
    let deadline = tokio::time::Instant::now() + settings.build_timeout;
    debug!(lb_id = %id, kind = ?machine.kind, "waiting on load balancer status");
    loop {
        let outcome = match client.get(id).await {
            Ok(lb) => ReadOutcome::Found(lb),
            Err(e) if e.is_not_found() => ReadOutcome::Missing,
            Err(e) => return Err(e.into()),
        };
        if let Some(verdict) = machine.observe(outcome) {
            return Ok(verdict);
        }
        if tokio::time::Instant::now() >= deadline {
            return Err(timeout_error(&machine, settings, id));
        }
        tokio::time::sleep(settings.build_interval).await;
    }
}

fn timeout_error(
    machine: &WaitMachine,
    settings: &WaitSettings,
    id: &str,
) -> HarnessError {
    let timeout_secs = settings.build_timeout.as_secs();
    match machine.kind {
        WaitKind::Deletion => HarnessError::DeletionTimeout {
            id: id.to_string(),
            timeout_secs,
        },
        WaitKind::Convergence => HarnessError::ConvergenceTimeout {
            id: id.to_string(),
            provisioning: machine.target.provisioning.clone(),
            operating: machine.target.operating.clone(),
            timeout_secs,
        },
    }
}
