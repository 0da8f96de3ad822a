//! Nested status view of a whole load balancer hierarchy, as returned by the
//! statuses endpoint in a single read.

use serde::{Deserialize, Serialize};

use crate::enums::{OperatingStatus, ProvisioningStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusTree {
    pub loadbalancer: LoadBalancerStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadBalancerStatus {
    pub id: String,
    pub provisioning_status: ProvisioningStatus,
    pub operating_status: OperatingStatus,
    #[serde(default)]
    pub listeners: Vec<ListenerStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListenerStatus {
    pub id: String,
    pub provisioning_status: ProvisioningStatus,
    pub operating_status: OperatingStatus,
    #[serde(default)]
    pub pools: Vec<PoolStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolStatus {
    pub id: String,
    pub provisioning_status: ProvisioningStatus,
    pub operating_status: OperatingStatus,
    pub healthmonitor: Option<HealthMonitorStatus>,
    #[serde(default)]
    pub members: Vec<MemberStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberStatus {
    pub id: String,
    pub provisioning_status: ProvisioningStatus,
    pub operating_status: OperatingStatus,
}

/// Health monitors report only a provisioning status in the tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthMonitorStatus {
    pub id: String,
    pub provisioning_status: ProvisioningStatus,
}
