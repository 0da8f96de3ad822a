use serde::{Deserialize, Serialize};

use crate::enums::{
    LbAlgorithm, MonitorType, OperatingStatus, Protocol, ProvisioningStatus,
};

/// Reference to another resource by id, as embedded in relationship lists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceRef {
    pub id: String,
}

impl ResourceRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Root of the resource hierarchy. Owns the virtual IP and aggregates the
/// provisioning and operating statuses of everything beneath it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadBalancer {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub vip_address: Option<String>,
    pub vip_subnet_id: Option<String>,
    pub vip_port_id: Option<String>,
    pub admin_state_up: bool,
    pub provisioning_status: ProvisioningStatus,
    pub operating_status: OperatingStatus,
    #[serde(default)]
    pub listeners: Vec<ResourceRef>,
}

/// Protocol endpoint attached to a load balancer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listener {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub protocol: Protocol,
    pub protocol_port: u16,
    pub admin_state_up: bool,
    pub provisioning_status: ProvisioningStatus,
    pub operating_status: OperatingStatus,
    #[serde(default)]
    pub loadbalancers: Vec<ResourceRef>,
}

/// Backend group a listener forwards to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pool {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub protocol: Protocol,
    pub lb_algorithm: LbAlgorithm,
    pub admin_state_up: bool,
    pub provisioning_status: ProvisioningStatus,
    pub operating_status: OperatingStatus,
    pub healthmonitor_id: Option<String>,
    #[serde(default)]
    pub members: Vec<ResourceRef>,
    #[serde(default)]
    pub listeners: Vec<ResourceRef>,
}

/// Single backend endpoint inside a pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub address: String,
    pub protocol_port: u16,
    #[serde(default)]
    pub weight: u32,
    pub subnet_id: Option<String>,
    pub admin_state_up: bool,
    pub provisioning_status: ProvisioningStatus,
    pub operating_status: OperatingStatus,
}

/// Health check policy for a pool. Carries no operating status; only its
/// provisioning status participates in convergence checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthMonitor {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: MonitorType,
    pub delay: u32,
    pub timeout: u32,
    pub max_retries: u32,
    pub pool_id: Option<String>,
    pub admin_state_up: bool,
    pub provisioning_status: ProvisioningStatus,
}
