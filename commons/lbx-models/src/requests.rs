//! Request payloads for create and update calls. Optional fields are left
//! off the wire entirely when unset so the service applies its defaults.

use serde::{Deserialize, Serialize};

use crate::enums::{LbAlgorithm, MonitorType, Protocol};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadBalancerCreate {
    pub vip_subnet_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_state_up: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
}

impl LoadBalancerCreate {
    pub fn new(vip_subnet_id: impl Into<String>) -> Self {
        Self {
            vip_subnet_id: vip_subnet_id.into(),
            name: None,
            description: None,
            vip_address: None,
            admin_state_up: None,
            tenant_id: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadBalancerUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_state_up: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListenerCreate {
    pub loadbalancer_id: String,
    pub protocol: Protocol,
    pub protocol_port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_state_up: Option<bool>,
}

impl ListenerCreate {
    pub fn new(
        loadbalancer_id: impl Into<String>,
        protocol: Protocol,
        protocol_port: u16,
    ) -> Self {
        Self {
            loadbalancer_id: loadbalancer_id.into(),
            protocol,
            protocol_port,
            name: None,
            description: None,
            admin_state_up: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListenerUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_state_up: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolCreate {
    pub listener_id: String,
    pub protocol: Protocol,
    pub lb_algorithm: LbAlgorithm,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_state_up: Option<bool>,
}

impl PoolCreate {
    pub fn new(
        listener_id: impl Into<String>,
        protocol: Protocol,
        lb_algorithm: LbAlgorithm,
    ) -> Self {
        Self {
            listener_id: listener_id.into(),
            protocol,
            lb_algorithm,
            name: None,
            description: None,
            admin_state_up: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoolUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lb_algorithm: Option<LbAlgorithm>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_state_up: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberCreate {
    pub address: String,
    pub protocol_port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnet_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_state_up: Option<bool>,
}

impl MemberCreate {
    pub fn new(address: impl Into<String>, protocol_port: u16) -> Self {
        Self {
            address: address.into(),
            protocol_port,
            subnet_id: None,
            weight: None,
            admin_state_up: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemberUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_state_up: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthMonitorCreate {
    pub pool_id: String,
    #[serde(rename = "type")]
    pub kind: MonitorType,
    pub delay: u32,
    pub timeout: u32,
    pub max_retries: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_codes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_state_up: Option<bool>,
}

impl HealthMonitorCreate {
    pub fn new(
        pool_id: impl Into<String>,
        kind: MonitorType,
        delay: u32,
        timeout: u32,
        max_retries: u32,
    ) -> Self {
        Self {
            pool_id: pool_id.into(),
            kind,
            delay,
            timeout,
            max_retries,
            http_method: None,
            url_path: None,
            expected_codes: None,
            admin_state_up: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthMonitorUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_state_up: Option<bool>,
}
