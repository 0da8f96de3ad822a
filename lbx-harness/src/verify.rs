use lbx_models::{
    MemberStatus, OperatingStatus, PoolStatus, ProvisioningStatus, StatusTree,
};

use crate::errors::HarnessError;
use crate::lifecycle::LbHarness;

/// Level of the status tree a mismatch was detected at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeLevel {
    LoadBalancer,
    Listeners,
    Pools,
    Members,
    HealthMonitor,
}

impl TreeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LoadBalancer => "load balancer",
            Self::Listeners => "listener",
            Self::Pools => "pool",
            Self::Members => "member",
            Self::HealthMonitor => "health monitor",
        }
    }
}

impl std::fmt::Display for TreeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expected shape of a status tree. Levels left unset are not checked.
/// Pools and members are matched against the tree level flattened across
/// their parents.
#[derive(Debug, Clone, Default)]
pub struct ExpectedStatusTree {
    pub listener_ids: Option<Vec<String>>,
    pub pool_ids: Option<Vec<String>>,
    pub member_ids: Option<Vec<String>>,
    pub health_monitor_id: Option<String>,
}

impl ExpectedStatusTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listeners<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.listener_ids =
            Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn pools<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pool_ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn members<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.member_ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn health_monitor(mut self, id: impl Into<String>) -> Self {
        self.health_monitor_id = Some(id.into());
        self
    }
}

impl LbHarness {
    /// Fetch the status tree of a load balancer and verify it against the
    /// expected shape. The first mismatch wins.
    pub async fn check_status_tree(
        &self,
        lb_id: &str,
        expected: &ExpectedStatusTree,
    ) -> Result<(), HarnessError> {
        let tree =
            self.clients().load_balancers.status_tree(lb_id).await?;
        verify_status_tree(&tree, expected)
    }
}

/// Verify a status tree against the expected shape: the root must report
/// ACTIVE/ONLINE, and every provided level must match in count, membership
/// and statuses. Health monitors are checked on provisioning status alone.
pub fn verify_status_tree(
    tree: &StatusTree,
    expected: &ExpectedStatusTree,
) -> Result<(), HarnessError> {
    let lb = &tree.loadbalancer;
    check_converged(
        TreeLevel::LoadBalancer,
        &lb.id,
        &lb.provisioning_status,
        Some(&lb.operating_status),
    )?;

    if let Some(expected_ids) = &expected.listener_ids {
        if expected_ids.len() != lb.listeners.len() {
            return Err(count_mismatch(
                TreeLevel::Listeners,
                expected_ids.len(),
                lb.listeners.len(),
            ));
        }
        for id in expected_ids {
            let listener = lb
                .listeners
                .iter()
                .find(|l| &l.id == id)
                .ok_or_else(|| missing(TreeLevel::Listeners, id))?;
            check_converged(
                TreeLevel::Listeners,
                id,
                &listener.provisioning_status,
                Some(&listener.operating_status),
            )?;
        }
    }

    let pools: Vec<&PoolStatus> =
        lb.listeners.iter().flat_map(|l| l.pools.iter()).collect();
    if let Some(expected_ids) = &expected.pool_ids {
        if expected_ids.len() != pools.len() {
            return Err(count_mismatch(
                TreeLevel::Pools,
                expected_ids.len(),
                pools.len(),
            ));
        }
        for id in expected_ids {
            let pool = pools
                .iter()
                .find(|p| &p.id == id)
                .ok_or_else(|| missing(TreeLevel::Pools, id))?;
            check_converged(
                TreeLevel::Pools,
                id,
                &pool.provisioning_status,
                Some(&pool.operating_status),
            )?;
        }
    }

    let members: Vec<&MemberStatus> =
        pools.iter().flat_map(|p| p.members.iter()).collect();
    if let Some(expected_ids) = &expected.member_ids {
        if expected_ids.len() != members.len() {
            return Err(count_mismatch(
                TreeLevel::Members,
                expected_ids.len(),
                members.len(),
            ));
        }
        for id in expected_ids {
            let member = members
                .iter()
                .find(|m| &m.id == id)
                .ok_or_else(|| missing(TreeLevel::Members, id))?;
            check_converged(
                TreeLevel::Members,
                id,
                &member.provisioning_status,
                Some(&member.operating_status),
            )?;
        }
    }

    if let Some(expected_id) = &expected.health_monitor_id {
        let monitor = pools
            .iter()
            .filter_map(|p| p.healthmonitor.as_ref())
            .find(|m| &m.id == expected_id)
            .ok_or_else(|| missing(TreeLevel::HealthMonitor, expected_id))?;
        check_converged(
            TreeLevel::HealthMonitor,
            expected_id,
            &monitor.provisioning_status,
            None,
        )?;
    }

    Ok(())
}

fn check_converged(
    level: TreeLevel,
    id: &str,
    provisioning: &ProvisioningStatus,
    operating: Option<&OperatingStatus>,
) -> Result<(), HarnessError> {
    if *provisioning != ProvisioningStatus::Active {
        return Err(HarnessError::StatusTreeMismatch {
            level,
            reason: format!("{level} {id} is {provisioning}"),
        });
    }
    if let Some(operating) = operating {
        if *operating != OperatingStatus::Online {
            return Err(HarnessError::StatusTreeMismatch {
                level,
                reason: format!("{level} {id} is {operating}"),
            });
        }
    }
    Ok(())
}

fn count_mismatch(
    level: TreeLevel,
    expected: usize,
    actual: usize,
) -> HarnessError {
    HarnessError::StatusTreeMismatch {
        level,
        reason: format!("expected {expected} entries, found {actual}"),
    }
}

fn missing(level: TreeLevel, id: &str) -> HarnessError {
    HarnessError::StatusTreeMismatch {
        level,
        reason: format!("{level} {id} not present in tree"),
    }
}
