use lbx_client::{ClientSet, CredentialScope};
use lbx_models::{
    HealthMonitor, HealthMonitorCreate, HealthMonitorUpdate, Listener,
    ListenerCreate, ListenerUpdate, LoadBalancer, LoadBalancerCreate,
    LoadBalancerUpdate, Member, MemberCreate, MemberUpdate, Pool, PoolCreate,
    PoolUpdate,
};
use tracing::info;

use crate::cleanup::CleanupContext;
use crate::config::{HarnessConfig, WaitSettings};
use crate::errors::HarnessError;
use crate::poller::{self, StatusTarget, WaitKind, WaitMachine, WaitVerdict};

/// Drives a load balancer service through lifecycle operations. Every
/// mutation of a nested resource is followed by a wait on the owning load
/// balancer when `wait` is set, so operations never overlap an in-flight
/// provisioning transition.
pub struct LbHarness {
    clients: ClientSet,
    wait: WaitSettings,
}

impl LbHarness {
    pub fn new(clients: ClientSet, wait: WaitSettings) -> Self {
        Self { clients, wait }
    }

    pub fn from_config(
        config: &HarnessConfig,
        scope: CredentialScope,
    ) -> Result<Self, HarnessError> {
        let clients = ClientSet::http(&config.client(scope)?)?;
        Ok(Self::new(clients, config.wait()))
    }

    pub fn clients(&self) -> &ClientSet {
        &self.clients
    }

    pub fn wait_settings(&self) -> &WaitSettings {
        &self.wait
    }

    /// Wait until the load balancer reports ACTIVE/ONLINE.
    pub async fn wait_for_load_balancer(
        &self,
        id: &str,
    ) -> Result<LoadBalancer, HarnessError> {
        self.wait_for_load_balancer_status(id, &StatusTarget::default())
            .await
    }

    /// Wait until the load balancer reports the given status pair. A record
    /// that disappears mid-wait fails immediately with NotFound.
    pub async fn wait_for_load_balancer_status(
        &self,
        id: &str,
        target: &StatusTarget,
    ) -> Result<LoadBalancer, HarnessError> {
        let machine =
            WaitMachine::new(WaitKind::Convergence, target.clone());
        let verdict = poller::drive(
            self.clients.load_balancers.as_ref(),
            &self.wait,
            id,
            machine,
        )
        .await?;
        match verdict {
            WaitVerdict::Converged(lb) => Ok(*lb),
            WaitVerdict::Vanished | WaitVerdict::Absent => {
                Err(HarnessError::NotFound { id: id.to_string() })
            }
        }
    }

    /// Wait until the load balancer record is gone (or settled, if the
    /// service reports it back at the target pair instead of removing it).
    pub async fn wait_for_deletion(
        &self,
        id: &str,
    ) -> Result<(), HarnessError> {
        let machine =
            WaitMachine::new(WaitKind::Deletion, StatusTarget::default());
        poller::drive(
            self.clients.load_balancers.as_ref(),
            &self.wait,
            id,
            machine,
        )
        .await?;
        Ok(())
    }

    async fn settle_owner(
        &self,
        lb_id: &str,
        wait: bool,
    ) -> Result<(), HarnessError> {
        if wait {
            self.wait_for_load_balancer(lb_id).await?;
        }
        Ok(())
    }

    /// Create a load balancer and register it for teardown. The id is
    /// registered before the wait so a stuck record still gets torn down.
    /// With `wait` set, the returned record is the converged read-back, so
    /// side effects of provisioning (the VIP port id) are populated.
    pub async fn create_load_balancer(
        &self,
        cleanup: &CleanupContext,
        req: &LoadBalancerCreate,
        wait: bool,
    ) -> Result<LoadBalancer, HarnessError> {
        let lb = self.clients.load_balancers.create(req).await?;
        info!(lb_id = %lb.id, "created load balancer");
        cleanup.register(&lb.id);
        if wait {
            return self.wait_for_load_balancer(&lb.id).await;
        }
        Ok(lb)
    }

    pub async fn update_load_balancer(
        &self,
        id: &str,
        req: &LoadBalancerUpdate,
        wait: bool,
    ) -> Result<LoadBalancer, HarnessError> {
        let lb = self.clients.load_balancers.update(id, req).await?;
        info!(lb_id = %id, "updated load balancer");
        if wait {
            return self.wait_for_load_balancer(id).await;
        }
        Ok(lb)
    }

    pub async fn delete_load_balancer(
        &self,
        id: &str,
        wait: bool,
    ) -> Result<(), HarnessError> {
        self.clients.load_balancers.delete(id).await?;
        info!(lb_id = %id, "deleted load balancer");
        if wait {
            self.wait_for_deletion(id).await?;
        }
        Ok(())
    }

    pub async fn create_listener(
        &self,
        lb_id: &str,
        req: &ListenerCreate,
        wait: bool,
    ) -> Result<Listener, HarnessError> {
        let listener = self.clients.listeners.create(req).await?;
        info!(lb_id = %lb_id, listener_id = %listener.id, "created listener");
        self.settle_owner(lb_id, wait).await?;
        Ok(listener)
    }

    pub async fn update_listener(
        &self,
        lb_id: &str,
        id: &str,
        req: &ListenerUpdate,
        wait: bool,
    ) -> Result<Listener, HarnessError> {
        let listener = self.clients.listeners.update(id, req).await?;
        info!(lb_id = %lb_id, listener_id = %id, "updated listener");
        self.settle_owner(lb_id, wait).await?;
        Ok(listener)
    }

    pub async fn delete_listener(
        &self,
        lb_id: &str,
        id: &str,
        wait: bool,
    ) -> Result<(), HarnessError> {
        self.clients.listeners.delete(id).await?;
        info!(lb_id = %lb_id, listener_id = %id, "deleted listener");
        self.settle_owner(lb_id, wait).await
    }

    pub async fn create_pool(
        &self,
        lb_id: &str,
        req: &PoolCreate,
        wait: bool,
    ) -> Result<Pool, HarnessError> {
        let pool = self.clients.pools.create(req).await?;
        info!(lb_id = %lb_id, pool_id = %pool.id, "created pool");
        self.settle_owner(lb_id, wait).await?;
        Ok(pool)
    }

    pub async fn update_pool(
        &self,
        lb_id: &str,
        id: &str,
        req: &PoolUpdate,
        wait: bool,
    ) -> Result<Pool, HarnessError> {
        let pool = self.clients.pools.update(id, req).await?;
        info!(lb_id = %lb_id, pool_id = %id, "updated pool");
        self.settle_owner(lb_id, wait).await?;
        Ok(pool)
    }

    pub async fn delete_pool(
        &self,
        lb_id: &str,
        id: &str,
        wait: bool,
    ) -> Result<(), HarnessError> {
        self.clients.pools.delete(id).await?;
        info!(lb_id = %lb_id, pool_id = %id, "deleted pool");
        self.settle_owner(lb_id, wait).await
    }

    pub async fn create_member(
        &self,
        lb_id: &str,
        pool_id: &str,
        req: &MemberCreate,
        wait: bool,
    ) -> Result<Member, HarnessError> {
        let member = self.clients.members.create(pool_id, req).await?;
        info!(lb_id = %lb_id, pool_id = %pool_id, member_id = %member.id, "created member");
        self.settle_owner(lb_id, wait).await?;
        Ok(member)
    }

    pub async fn update_member(
        &self,
        lb_id: &str,
        pool_id: &str,
        id: &str,
        req: &MemberUpdate,
        wait: bool,
    ) -> Result<Member, HarnessError> {
        let member = self.clients.members.update(pool_id, id, req).await?;
        info!(lb_id = %lb_id, pool_id = %pool_id, member_id = %id, "updated member");
        self.settle_owner(lb_id, wait).await?;
        Ok(member)
    }

    pub async fn delete_member(
        &self,
        lb_id: &str,
        pool_id: &str,
        id: &str,
        wait: bool,
    ) -> Result<(), HarnessError> {
        self.clients.members.delete(pool_id, id).await?;
        info!(lb_id = %lb_id, pool_id = %pool_id, member_id = %id, "deleted member");
        self.settle_owner(lb_id, wait).await
    }

    pub async fn create_health_monitor(
        &self,
        lb_id: &str,
        req: &HealthMonitorCreate,
        wait: bool,
    ) -> Result<HealthMonitor, HarnessError> {
        let monitor = self.clients.health_monitors.create(req).await?;
        info!(lb_id = %lb_id, monitor_id = %monitor.id, "created health monitor");
        self.settle_owner(lb_id, wait).await?;
        Ok(monitor)
    }

    pub async fn update_health_monitor(
        &self,
        lb_id: &str,
        id: &str,
        req: &HealthMonitorUpdate,
        wait: bool,
    ) -> Result<HealthMonitor, HarnessError> {
        let monitor = self.clients.health_monitors.update(id, req).await?;
        info!(lb_id = %lb_id, monitor_id = %id, "updated health monitor");
        self.settle_owner(lb_id, wait).await?;
        Ok(monitor)
    }

    pub async fn delete_health_monitor(
        &self,
        lb_id: &str,
        id: &str,
        wait: bool,
    ) -> Result<(), HarnessError> {
        self.clients.health_monitors.delete(id).await?;
        info!(lb_id = %lb_id, monitor_id = %id, "deleted health monitor");
        self.settle_owner(lb_id, wait).await
    }
}
