use std::sync::Arc;

use async_trait::async_trait;
use lbx_models::{
    HealthMonitor, HealthMonitorCreate, HealthMonitorUpdate, Listener,
    ListenerCreate, ListenerUpdate, LoadBalancer, LoadBalancerCreate,
    LoadBalancerUpdate, Member, MemberCreate, MemberUpdate, Pool, PoolCreate,
    PoolUpdate, StatusTree,
};

use crate::error::ClientError;

#[async_trait]
pub trait LoadBalancerClient: Send + Sync {
    async fn create(
        &self,
        req: &LoadBalancerCreate,
    ) -> Result<LoadBalancer, ClientError>;

    async fn get(&self, id: &str) -> Result<LoadBalancer, ClientError>;

    async fn update(
        &self,
        id: &str,
        req: &LoadBalancerUpdate,
    ) -> Result<LoadBalancer, ClientError>;

    async fn delete(&self, id: &str) -> Result<(), ClientError>;

    /// One read covering the statuses of the whole hierarchy under this
    /// load balancer.
    async fn status_tree(&self, id: &str) -> Result<StatusTree, ClientError>;
}

#[async_trait]
pub trait ListenerClient: Send + Sync {
    async fn create(
        &self,
        req: &ListenerCreate,
    ) -> Result<Listener, ClientError>;

    async fn update(
        &self,
        id: &str,
        req: &ListenerUpdate,
    ) -> Result<Listener, ClientError>;

    async fn delete(&self, id: &str) -> Result<(), ClientError>;
}

#[async_trait]
pub trait PoolClient: Send + Sync {
    async fn create(&self, req: &PoolCreate) -> Result<Pool, ClientError>;

    async fn update(
        &self,
        id: &str,
        req: &PoolUpdate,
    ) -> Result<Pool, ClientError>;

    async fn delete(&self, id: &str) -> Result<(), ClientError>;
}

/// Members live under their owning pool on the wire, so every operation
/// takes the pool id.
#[async_trait]
pub trait MemberClient: Send + Sync {
    async fn create(
        &self,
        pool_id: &str,
        req: &MemberCreate,
    ) -> Result<Member, ClientError>;

    async fn update(
        &self,
        pool_id: &str,
        id: &str,
        req: &MemberUpdate,
    ) -> Result<Member, ClientError>;

    async fn delete(&self, pool_id: &str, id: &str)
    -> Result<(), ClientError>;
}

#[async_trait]
pub trait HealthMonitorClient: Send + Sync {
    async fn create(
        &self,
        req: &HealthMonitorCreate,
    ) -> Result<HealthMonitor, ClientError>;

    async fn update(
        &self,
        id: &str,
        req: &HealthMonitorUpdate,
    ) -> Result<HealthMonitor, ClientError>;

    async fn delete(&self, id: &str) -> Result<(), ClientError>;
}

/// All five resource clients bundled for the layers above. The fields stay
/// independent trait objects so tests can back them with a single fake.
#[derive(Clone)]
pub struct ClientSet {
    pub load_balancers: Arc<dyn LoadBalancerClient>,
    pub listeners: Arc<dyn ListenerClient>,
    pub pools: Arc<dyn PoolClient>,
    pub members: Arc<dyn MemberClient>,
    pub health_monitors: Arc<dyn HealthMonitorClient>,
}
