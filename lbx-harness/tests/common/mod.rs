#![allow(dead_code)]

//! In-memory load balancer service for integration tests. Keeps real
//! parent/child relationships, scripts status transitions per load balancer
//! and records every API call so tests can assert ordering.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lbx_client::{
    ClientError, ClientSet, HealthMonitorClient, ListenerClient,
    LoadBalancerClient, MemberClient, PoolClient,
};
use lbx_models::{
    HealthMonitor, HealthMonitorCreate, HealthMonitorStatus,
    HealthMonitorUpdate, Listener, ListenerCreate, ListenerStatus,
    ListenerUpdate, LoadBalancer, LoadBalancerCreate, LoadBalancerStatus,
    LoadBalancerUpdate, Member, MemberCreate, MemberStatus, MemberUpdate,
    OperatingStatus, Pool, PoolCreate, PoolStatus, PoolUpdate,
    ProvisioningStatus, ResourceKind, ResourceRef, StatusTree,
};

type StatusPair = (ProvisioningStatus, OperatingStatus);

#[derive(Default)]
struct FakeState {
    next_id: u64,
    load_balancers: BTreeMap<String, LoadBalancer>,
    listeners: BTreeMap<String, Listener>,
    pools: BTreeMap<String, Pool>,
    /// Members are keyed `"{pool_id}/{member_id}"`.
    members: BTreeMap<String, Member>,
    health_monitors: BTreeMap<String, HealthMonitor>,
    /// Per-LB statuses to report on upcoming reads, oldest first. The last
    /// popped pair sticks.
    scripts: BTreeMap<String, VecDeque<StatusPair>>,
    /// LBs whose record survives this many reads after deletion before the
    /// service reports it gone.
    draining: BTreeMap<String, u32>,
    deletion_delays: BTreeMap<String, u32>,
    /// One-shot failures keyed (operation, id), injected as API errors.
    failures: BTreeMap<(String, String), u16>,
    ops: Vec<(String, String)>,
}

pub struct FakeLbService {
    state: Mutex<FakeState>,
}

impl FakeLbService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(FakeState::default()),
        })
    }

    /// Every recorded (operation, id) pair in call order.
    pub fn ops(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().ops.clone()
    }

    pub fn count_ops(&self, op: &str, id: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .ops
            .iter()
            .filter(|(o, i)| o == op && i == id)
            .count()
    }

    pub fn has_load_balancer(&self, id: &str) -> bool {
        self.state.lock().unwrap().load_balancers.contains_key(id)
    }

    pub fn has_pool(&self, id: &str) -> bool {
        self.state.lock().unwrap().pools.contains_key(id)
    }

    /// Replace the scripted status transitions for upcoming reads of an LB.
    pub fn script_status(&self, id: &str, pairs: &[StatusPair]) {
        let mut state = self.state.lock().unwrap();
        state
            .scripts
            .insert(id.to_string(), pairs.iter().cloned().collect());
    }

    /// Pin the reported statuses of an LB, dropping any remaining script.
    pub fn set_status(
        &self,
        id: &str,
        provisioning: ProvisioningStatus,
        operating: OperatingStatus,
    ) {
        let mut state = self.state.lock().unwrap();
        state.scripts.remove(id);
        if let Some(lb) = state.load_balancers.get_mut(id) {
            lb.provisioning_status = provisioning;
            lb.operating_status = operating;
        }
    }

    /// Fail the next matching call once with the given HTTP status.
    pub fn fail_once(&self, op: &str, id: &str, status: u16) {
        let mut state = self.state.lock().unwrap();
        state
            .failures
            .insert((op.to_string(), id.to_string()), status);
    }

    /// Keep the LB record around for `polls` reads after deletion before
    /// reporting it gone.
    pub fn delay_deletion(&self, id: &str, polls: u32) {
        let mut state = self.state.lock().unwrap();
        state.deletion_delays.insert(id.to_string(), polls);
    }

    /// Make the LB record disappear after `polls` more reads, as if someone
    /// else deleted it mid-wait.
    pub fn vanish_after(&self, id: &str, polls: u32) {
        let mut state = self.state.lock().unwrap();
        state.draining.insert(id.to_string(), polls);
    }

    pub fn client_set(self: &Arc<Self>) -> ClientSet {
        ClientSet {
            load_balancers: self.clone(),
            listeners: self.clone(),
            pools: self.clone(),
            members: self.clone(),
            health_monitors: self.clone(),
        }
    }
}

impl FakeState {
    fn fresh_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn record(&mut self, op: &str, id: &str) {
        self.ops.push((op.to_string(), id.to_string()));
    }

    /// Injected 404s surface the way the HTTP client maps them: as absence
    /// of the addressed resource.
    fn take_failure(
        &mut self,
        op: &str,
        id: &str,
        kind: ResourceKind,
    ) -> Result<(), ClientError> {
        if let Some(status) =
            self.failures.remove(&(op.to_string(), id.to_string()))
        {
            if status == 404 {
                return Err(ClientError::not_found(kind, id));
            }
            return Err(ClientError::api(status, "injected failure"));
        }
        Ok(())
    }

    /// A mutation under an LB puts it back into a provisioning transition
    /// that converges on the next read.
    fn touch(&mut self, lb_id: &str) {
        if let Some(lb) = self.load_balancers.get_mut(lb_id) {
            lb.provisioning_status = ProvisioningStatus::PendingUpdate;
            self.scripts.insert(
                lb_id.to_string(),
                VecDeque::from([(
                    ProvisioningStatus::Active,
                    OperatingStatus::Online,
                )]),
            );
        }
    }

    fn lb_of_listener(&self, listener_id: &str) -> Option<String> {
        self.listeners
            .get(listener_id)
            .and_then(|l| l.loadbalancers.first())
            .map(|r| r.id.clone())
    }

    fn lb_of_pool(&self, pool_id: &str) -> Option<String> {
        self.pools
            .get(pool_id)
            .and_then(|p| p.listeners.first())
            .and_then(|r| self.lb_of_listener(&r.id))
    }
}

#[async_trait]
impl LoadBalancerClient for FakeLbService {
    async fn create(
        &self,
        req: &LoadBalancerCreate,
    ) -> Result<LoadBalancer, ClientError> {
        let mut state = self.state.lock().unwrap();
        let id = state.fresh_id("lb");
        state.record("create-loadbalancer", &id);
        let n = state.next_id;
        let lb = LoadBalancer {
            id: id.clone(),
            name: req.name.clone().unwrap_or_default(),
            description: req.description.clone().unwrap_or_default(),
            vip_address: Some(
                req.vip_address
                    .clone()
                    .unwrap_or_else(|| format!("10.0.0.{n}")),
            ),
            vip_subnet_id: Some(req.vip_subnet_id.clone()),
            vip_port_id: Some(format!("port-{n}")),
            admin_state_up: req.admin_state_up.unwrap_or(true),
            provisioning_status: ProvisioningStatus::PendingCreate,
            operating_status: OperatingStatus::Offline,
            listeners: vec![],
        };
        state.load_balancers.insert(id.clone(), lb.clone());
        state.scripts.insert(
            id,
            VecDeque::from([(
                ProvisioningStatus::Active,
                OperatingStatus::Online,
            )]),
        );
        Ok(lb)
    }

    async fn get(&self, id: &str) -> Result<LoadBalancer, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.record("get-loadbalancer", id);
        state.take_failure("get-loadbalancer", id, ResourceKind::LoadBalancer)?;
        if let Some(remaining) = state.draining.get(id).copied() {
            if remaining <= 1 {
                state.draining.remove(id);
                state.load_balancers.remove(id);
                state.scripts.remove(id);
                return Err(ClientError::not_found(
                    ResourceKind::LoadBalancer,
                    id,
                ));
            }
            state.draining.insert(id.to_string(), remaining - 1);
        }
        if let Some((provisioning, operating)) =
            state.scripts.get_mut(id).and_then(|s| s.pop_front())
        {
            if let Some(lb) = state.load_balancers.get_mut(id) {
                lb.provisioning_status = provisioning;
                lb.operating_status = operating;
            }
        }
        state
            .load_balancers
            .get(id)
            .cloned()
            .ok_or_else(|| {
                ClientError::not_found(ResourceKind::LoadBalancer, id)
            })
    }

    async fn update(
        &self,
        id: &str,
        req: &LoadBalancerUpdate,
    ) -> Result<LoadBalancer, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.record("update-loadbalancer", id);
        state.take_failure(
            "update-loadbalancer",
            id,
            ResourceKind::LoadBalancer,
        )?;
        let lb = state.load_balancers.get_mut(id).ok_or_else(|| {
            ClientError::not_found(ResourceKind::LoadBalancer, id)
        })?;
        if let Some(name) = &req.name {
            lb.name = name.clone();
        }
        if let Some(description) = &req.description {
            lb.description = description.clone();
        }
        if let Some(admin_state_up) = req.admin_state_up {
            lb.admin_state_up = admin_state_up;
        }
        let updated = lb.clone();
        state.touch(id);
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<(), ClientError> {
        let mut state = self.state.lock().unwrap();
        state.record("delete-loadbalancer", id);
        state.take_failure(
            "delete-loadbalancer",
            id,
            ResourceKind::LoadBalancer,
        )?;
        if !state.load_balancers.contains_key(id) {
            return Err(ClientError::not_found(
                ResourceKind::LoadBalancer,
                id,
            ));
        }
        if let Some(polls) = state.deletion_delays.remove(id) {
            state.draining.insert(id.to_string(), polls);
            state.scripts.remove(id);
            if let Some(lb) = state.load_balancers.get_mut(id) {
                lb.provisioning_status = ProvisioningStatus::PendingDelete;
            }
        } else {
            state.load_balancers.remove(id);
            state.scripts.remove(id);
        }
        Ok(())
    }

    async fn status_tree(&self, id: &str) -> Result<StatusTree, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.record("status-tree", id);
        state.take_failure("status-tree", id, ResourceKind::LoadBalancer)?;
        let lb = state.load_balancers.get(id).ok_or_else(|| {
            ClientError::not_found(ResourceKind::LoadBalancer, id)
        })?;

        let mut listeners = Vec::new();
        for listener_ref in &lb.listeners {
            let Some(listener) = state.listeners.get(&listener_ref.id)
            else {
                continue;
            };
            let mut pools = Vec::new();
            for (pool_id, pool) in &state.pools {
                if !pool.listeners.iter().any(|r| r.id == listener.id) {
                    continue;
                }
                let healthmonitor = pool
                    .healthmonitor_id
                    .as_ref()
                    .and_then(|hm_id| state.health_monitors.get(hm_id))
                    .map(|hm| HealthMonitorStatus {
                        id: hm.id.clone(),
                        provisioning_status: hm.provisioning_status.clone(),
                    });
                let prefix = format!("{pool_id}/");
                let members = state
                    .members
                    .iter()
                    .filter(|(key, _)| key.starts_with(&prefix))
                    .map(|(_, m)| MemberStatus {
                        id: m.id.clone(),
                        provisioning_status: m.provisioning_status.clone(),
                        operating_status: m.operating_status.clone(),
                    })
                    .collect();
                pools.push(PoolStatus {
                    id: pool.id.clone(),
                    provisioning_status: pool.provisioning_status.clone(),
                    operating_status: pool.operating_status.clone(),
                    healthmonitor,
                    members,
                });
            }
            listeners.push(ListenerStatus {
                id: listener.id.clone(),
                provisioning_status: listener.provisioning_status.clone(),
                operating_status: listener.operating_status.clone(),
                pools,
            });
        }

        Ok(StatusTree {
            loadbalancer: LoadBalancerStatus {
                id: lb.id.clone(),
                provisioning_status: lb.provisioning_status.clone(),
                operating_status: lb.operating_status.clone(),
                listeners,
            },
        })
    }
}

#[async_trait]
impl ListenerClient for FakeLbService {
    async fn create(
        &self,
        req: &ListenerCreate,
    ) -> Result<Listener, ClientError> {
        let mut state = self.state.lock().unwrap();
        if !state.load_balancers.contains_key(&req.loadbalancer_id) {
            return Err(ClientError::api(404, "owning load balancer absent"));
        }
        let id = state.fresh_id("li");
        state.record("create-listener", &id);
        let listener = Listener {
            id: id.clone(),
            name: req.name.clone().unwrap_or_default(),
            description: req.description.clone().unwrap_or_default(),
            protocol: req.protocol.clone(),
            protocol_port: req.protocol_port,
            admin_state_up: req.admin_state_up.unwrap_or(true),
            provisioning_status: ProvisioningStatus::Active,
            operating_status: OperatingStatus::Online,
            loadbalancers: vec![ResourceRef::new(&req.loadbalancer_id)],
        };
        state.listeners.insert(id.clone(), listener.clone());
        if let Some(lb) = state.load_balancers.get_mut(&req.loadbalancer_id)
        {
            lb.listeners.push(ResourceRef::new(&id));
        }
        state.touch(&req.loadbalancer_id);
        Ok(listener)
    }

    async fn update(
        &self,
        id: &str,
        req: &ListenerUpdate,
    ) -> Result<Listener, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.record("update-listener", id);
        state.take_failure("update-listener", id, ResourceKind::Listener)?;
        let listener = state.listeners.get_mut(id).ok_or_else(|| {
            ClientError::not_found(ResourceKind::Listener, id)
        })?;
        if let Some(name) = &req.name {
            listener.name = name.clone();
        }
        if let Some(description) = &req.description {
            listener.description = description.clone();
        }
        if let Some(admin_state_up) = req.admin_state_up {
            listener.admin_state_up = admin_state_up;
        }
        let updated = listener.clone();
        if let Some(lb_id) = state.lb_of_listener(id) {
            state.touch(&lb_id);
        }
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<(), ClientError> {
        let mut state = self.state.lock().unwrap();
        state.record("delete-listener", id);
        state.take_failure("delete-listener", id, ResourceKind::Listener)?;
        let owner = state.lb_of_listener(id);
        if state.listeners.remove(id).is_none() {
            return Err(ClientError::not_found(ResourceKind::Listener, id));
        }
        if let Some(lb_id) = owner {
            if let Some(lb) = state.load_balancers.get_mut(&lb_id) {
                lb.listeners.retain(|r| r.id != id);
            }
            state.touch(&lb_id);
        }
        Ok(())
    }
}

#[async_trait]
impl PoolClient for FakeLbService {
    async fn create(&self, req: &PoolCreate) -> Result<Pool, ClientError> {
        let mut state = self.state.lock().unwrap();
        if !state.listeners.contains_key(&req.listener_id) {
            return Err(ClientError::api(404, "owning listener absent"));
        }
        let id = state.fresh_id("po");
        state.record("create-pool", &id);
        let pool = Pool {
            id: id.clone(),
            name: req.name.clone().unwrap_or_default(),
            description: req.description.clone().unwrap_or_default(),
            protocol: req.protocol.clone(),
            lb_algorithm: req.lb_algorithm.clone(),
            admin_state_up: req.admin_state_up.unwrap_or(true),
            provisioning_status: ProvisioningStatus::Active,
            operating_status: OperatingStatus::Online,
            healthmonitor_id: None,
            members: vec![],
            listeners: vec![ResourceRef::new(&req.listener_id)],
        };
        state.pools.insert(id.clone(), pool.clone());
        if let Some(lb_id) = state.lb_of_listener(&req.listener_id) {
            state.touch(&lb_id);
        }
        Ok(pool)
    }

    async fn update(
        &self,
        id: &str,
        req: &PoolUpdate,
    ) -> Result<Pool, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.record("update-pool", id);
        state.take_failure("update-pool", id, ResourceKind::Pool)?;
        let pool = state
            .pools
            .get_mut(id)
            .ok_or_else(|| ClientError::not_found(ResourceKind::Pool, id))?;
        if let Some(name) = &req.name {
            pool.name = name.clone();
        }
        if let Some(description) = &req.description {
            pool.description = description.clone();
        }
        if let Some(lb_algorithm) = &req.lb_algorithm {
            pool.lb_algorithm = lb_algorithm.clone();
        }
        if let Some(admin_state_up) = req.admin_state_up {
            pool.admin_state_up = admin_state_up;
        }
        let updated = pool.clone();
        if let Some(lb_id) = state.lb_of_pool(id) {
            state.touch(&lb_id);
        }
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<(), ClientError> {
        let mut state = self.state.lock().unwrap();
        state.record("delete-pool", id);
        state.take_failure("delete-pool", id, ResourceKind::Pool)?;
        let owner = state.lb_of_pool(id);
        if state.pools.remove(id).is_none() {
            return Err(ClientError::not_found(ResourceKind::Pool, id));
        }
        if let Some(lb_id) = owner {
            state.touch(&lb_id);
        }
        Ok(())
    }
}

#[async_trait]
impl MemberClient for FakeLbService {
    async fn create(
        &self,
        pool_id: &str,
        req: &MemberCreate,
    ) -> Result<Member, ClientError> {
        let mut state = self.state.lock().unwrap();
        if !state.pools.contains_key(pool_id) {
            return Err(ClientError::api(404, "owning pool absent"));
        }
        let id = state.fresh_id("me");
        state.record("create-member", &id);
        let member = Member {
            id: id.clone(),
            address: req.address.clone(),
            protocol_port: req.protocol_port,
            weight: req.weight.unwrap_or(1),
            subnet_id: req.subnet_id.clone(),
            admin_state_up: req.admin_state_up.unwrap_or(true),
            provisioning_status: ProvisioningStatus::Active,
            operating_status: OperatingStatus::Online,
        };
        state
            .members
            .insert(format!("{pool_id}/{id}"), member.clone());
        if let Some(pool) = state.pools.get_mut(pool_id) {
            pool.members.push(ResourceRef::new(&id));
        }
        if let Some(lb_id) = state.lb_of_pool(pool_id) {
            state.touch(&lb_id);
        }
        Ok(member)
    }

    async fn update(
        &self,
        pool_id: &str,
        id: &str,
        req: &MemberUpdate,
    ) -> Result<Member, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.record("update-member", id);
        state.take_failure("update-member", id, ResourceKind::Member)?;
        let member = state
            .members
            .get_mut(&format!("{pool_id}/{id}"))
            .ok_or_else(|| {
                ClientError::not_found(ResourceKind::Member, id)
            })?;
        if let Some(weight) = req.weight {
            member.weight = weight;
        }
        if let Some(admin_state_up) = req.admin_state_up {
            member.admin_state_up = admin_state_up;
        }
        let updated = member.clone();
        if let Some(lb_id) = state.lb_of_pool(pool_id) {
            state.touch(&lb_id);
        }
        Ok(updated)
    }

    async fn delete(
        &self,
        pool_id: &str,
        id: &str,
    ) -> Result<(), ClientError> {
        let mut state = self.state.lock().unwrap();
        state.record("delete-member", id);
        state.take_failure("delete-member", id, ResourceKind::Member)?;
        if state.members.remove(&format!("{pool_id}/{id}")).is_none() {
            return Err(ClientError::not_found(ResourceKind::Member, id));
        }
        if let Some(pool) = state.pools.get_mut(pool_id) {
            pool.members.retain(|r| r.id != id);
        }
        if let Some(lb_id) = state.lb_of_pool(pool_id) {
            state.touch(&lb_id);
        }
        Ok(())
    }
}

#[async_trait]
impl HealthMonitorClient for FakeLbService {
    async fn create(
        &self,
        req: &HealthMonitorCreate,
    ) -> Result<HealthMonitor, ClientError> {
        let mut state = self.state.lock().unwrap();
        if !state.pools.contains_key(&req.pool_id) {
            return Err(ClientError::api(404, "owning pool absent"));
        }
        let id = state.fresh_id("hm");
        state.record("create-healthmonitor", &id);
        let monitor = HealthMonitor {
            id: id.clone(),
            kind: req.kind.clone(),
            delay: req.delay,
            timeout: req.timeout,
            max_retries: req.max_retries,
            pool_id: Some(req.pool_id.clone()),
            admin_state_up: req.admin_state_up.unwrap_or(true),
            provisioning_status: ProvisioningStatus::Active,
        };
        state.health_monitors.insert(id.clone(), monitor.clone());
        if let Some(pool) = state.pools.get_mut(&req.pool_id) {
            pool.healthmonitor_id = Some(id);
        }
        if let Some(lb_id) = state.lb_of_pool(&req.pool_id) {
            state.touch(&lb_id);
        }
        Ok(monitor)
    }

    async fn update(
        &self,
        id: &str,
        req: &HealthMonitorUpdate,
    ) -> Result<HealthMonitor, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.record("update-healthmonitor", id);
        state.take_failure(
            "update-healthmonitor",
            id,
            ResourceKind::HealthMonitor,
        )?;
        let monitor = state.health_monitors.get_mut(id).ok_or_else(|| {
            ClientError::not_found(ResourceKind::HealthMonitor, id)
        })?;
        if let Some(delay) = req.delay {
            monitor.delay = delay;
        }
        if let Some(timeout) = req.timeout {
            monitor.timeout = timeout;
        }
        if let Some(max_retries) = req.max_retries {
            monitor.max_retries = max_retries;
        }
        if let Some(admin_state_up) = req.admin_state_up {
            monitor.admin_state_up = admin_state_up;
        }
        let updated = monitor.clone();
        let owner = updated.pool_id.clone();
        if let Some(lb_id) =
            owner.as_deref().and_then(|p| state.lb_of_pool(p))
        {
            state.touch(&lb_id);
        }
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<(), ClientError> {
        let mut state = self.state.lock().unwrap();
        state.record("delete-healthmonitor", id);
        state.take_failure(
            "delete-healthmonitor",
            id,
            ResourceKind::HealthMonitor,
        )?;
        let Some(monitor) = state.health_monitors.remove(id) else {
            return Err(ClientError::not_found(
                ResourceKind::HealthMonitor,
                id,
            ));
        };
        if let Some(pool_id) = &monitor.pool_id {
            if let Some(pool) = state.pools.get_mut(pool_id) {
                pool.healthmonitor_id = None;
            }
            if let Some(lb_id) = state.lb_of_pool(pool_id) {
                state.touch(&lb_id);
            }
        }
        Ok(())
    }
}
