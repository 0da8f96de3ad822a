use std::sync::{Mutex, PoisonError};

use lbx_client::ClientError;
use tracing::{debug, info, warn};

use crate::lifecycle::LbHarness;

/// Registry of load balancers to tear down. Creations register into it by
/// reference; [`LbHarness::cleanup_all`] consumes it by value, so a context
/// cannot be walked twice.
#[derive(Debug, Default)]
pub struct CleanupContext {
    pending: Mutex<Vec<String>>,
}

impl CleanupContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, lb_id: &str) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(lb_id.to_string());
    }

    /// Snapshot of the registered ids, oldest first.
    pub fn pending(&self) -> Vec<String> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn into_ids(self) -> Vec<String> {
        self.pending
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl LbHarness {
    /// Tear down every registered load balancer, children first: health
    /// monitor, then members, then the pool, then listeners, then the load
    /// balancer itself, re-waiting on the owner between deletions. Teardown
    /// is best effort: resources that are already gone are skipped quietly
    /// and any other failure is logged without stopping the walk.
    pub async fn cleanup_all(&self, cleanup: CleanupContext) {
        for lb_id in cleanup.into_ids() {
            self.teardown_load_balancer(&lb_id).await;
        }
    }

    async fn teardown_load_balancer(&self, lb_id: &str) {
        let tree =
            match self.clients().load_balancers.status_tree(lb_id).await {
                Ok(tree) => tree,
                Err(e) if e.is_not_found() => {
                    debug!(lb_id = %lb_id, "load balancer already gone");
                    return;
                }
                Err(e) => {
                    warn!(lb_id = %lb_id, error = %e, "could not fetch status tree, skipping teardown");
                    return;
                }
            };

        for listener in &tree.loadbalancer.listeners {
            for pool in &listener.pools {
                if let Some(monitor) = &pool.healthmonitor {
                    let result = self
                        .clients()
                        .health_monitors
                        .delete(&monitor.id)
                        .await;
                    self.settle_after(
                        lb_id,
                        "health monitor",
                        &monitor.id,
                        result,
                    )
                    .await;
                }
                for member in &pool.members {
                    let result = self
                        .clients()
                        .members
                        .delete(&pool.id, &member.id)
                        .await;
                    self.settle_after(lb_id, "member", &member.id, result)
                        .await;
                }
                let result = self.clients().pools.delete(&pool.id).await;
                self.settle_after(lb_id, "pool", &pool.id, result).await;
            }
            let result = self.clients().listeners.delete(&listener.id).await;
            self.settle_after(lb_id, "listener", &listener.id, result)
                .await;
        }

        match self.clients().load_balancers.delete(lb_id).await {
            Ok(()) => {
                if let Err(e) = self.wait_for_deletion(lb_id).await {
                    warn!(lb_id = %lb_id, error = %e, "load balancer deletion did not settle");
                } else {
                    info!(lb_id = %lb_id, "load balancer torn down");
                }
            }
            Err(e) if e.is_not_found() => {
                debug!(lb_id = %lb_id, "load balancer already gone");
            }
            Err(e) => {
                warn!(lb_id = %lb_id, error = %e, "failed deleting load balancer");
            }
        }
    }

    /// Apply the outcome of one child deletion: re-wait on the owner after a
    /// successful delete, skip resources that are already gone, and log any
    /// other failure.
    async fn settle_after(
        &self,
        lb_id: &str,
        what: &str,
        id: &str,
        result: Result<(), ClientError>,
    ) {
        match result {
            Ok(()) => {
                debug!(lb_id = %lb_id, "deleted {} {}", what, id);
                if let Err(e) = self.wait_for_load_balancer(lb_id).await {
                    warn!(lb_id = %lb_id, error = %e, "load balancer did not settle during teardown");
                }
            }
            Err(e) if e.is_not_found() => {
                debug!(lb_id = %lb_id, "{} {} already gone", what, id);
            }
            Err(e) => {
                warn!(lb_id = %lb_id, error = %e, "failed deleting {} {}", what, id);
            }
        }
    }
}
