use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ProvisioningStatus {
    #[serde(rename = "PENDING_CREATE")]
    PendingCreate,
    #[serde(rename = "ACTIVE")]
    Active,
    #[serde(rename = "PENDING_UPDATE")]
    PendingUpdate,
    #[serde(rename = "PENDING_DELETE")]
    PendingDelete,
    #[serde(rename = "ERROR")]
    Error,
    #[serde(rename = "DELETED")]
    Deleted,
}

impl Default for ProvisioningStatus {
    fn default() -> Self {
        Self::PendingCreate
    }
}

impl ProvisioningStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingCreate => "PENDING_CREATE",
            Self::Active => "ACTIVE",
            Self::PendingUpdate => "PENDING_UPDATE",
            Self::PendingDelete => "PENDING_DELETE",
            Self::Error => "ERROR",
            Self::Deleted => "DELETED",
        }
    }
}

impl std::fmt::Display for ProvisioningStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum OperatingStatus {
    #[serde(rename = "ONLINE")]
    Online,
    #[serde(rename = "OFFLINE")]
    Offline,
    #[serde(rename = "DEGRADED")]
    Degraded,
    #[serde(rename = "ERROR")]
    Error,
    #[serde(rename = "NO_MONITOR")]
    NoMonitor,
}

impl Default for OperatingStatus {
    fn default() -> Self {
        Self::Offline
    }
}

impl OperatingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "ONLINE",
            Self::Offline => "OFFLINE",
            Self::Degraded => "DEGRADED",
            Self::Error => "ERROR",
            Self::NoMonitor => "NO_MONITOR",
        }
    }
}

impl std::fmt::Display for OperatingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Protocol {
    #[serde(rename = "HTTP")]
    Http,
    #[serde(rename = "HTTPS")]
    Https,
    #[serde(rename = "TCP")]
    Tcp,
    #[serde(rename = "TERMINATED_HTTPS")]
    TerminatedHttps,
}

impl Default for Protocol {
    fn default() -> Self {
        Self::Http
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum LbAlgorithm {
    #[serde(rename = "ROUND_ROBIN")]
    RoundRobin,
    #[serde(rename = "LEAST_CONNECTIONS")]
    LeastConnections,
    #[serde(rename = "SOURCE_IP")]
    SourceIp,
}

impl Default for LbAlgorithm {
    fn default() -> Self {
        Self::RoundRobin
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum MonitorType {
    #[serde(rename = "HTTP")]
    Http,
    #[serde(rename = "HTTPS")]
    Https,
    #[serde(rename = "TCP")]
    Tcp,
    #[serde(rename = "PING")]
    Ping,
}

impl Default for MonitorType {
    fn default() -> Self {
        Self::Http
    }
}

/// Resource kinds of the load balancer hierarchy, used for error reporting
/// and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    LoadBalancer,
    Listener,
    Pool,
    Member,
    HealthMonitor,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LoadBalancer => "load balancer",
            Self::Listener => "listener",
            Self::Pool => "pool",
            Self::Member => "member",
            Self::HealthMonitor => "health monitor",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
