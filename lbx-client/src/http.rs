use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lbx_models::{
    HealthMonitor, HealthMonitorCreate, HealthMonitorUpdate, Listener,
    ListenerCreate, ListenerUpdate, LoadBalancer, LoadBalancerCreate,
    LoadBalancerUpdate, Member, MemberCreate, MemberUpdate, Pool, PoolCreate,
    PoolUpdate, ResourceKind, StatusTree,
};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::traits::{
    ClientSet, HealthMonitorClient, ListenerClient, LoadBalancerClient,
    MemberClient, PoolClient,
};

const API_PREFIX: &str = "/v2.0/lbaas";

/// Shared HTTP plumbing for the per-resource clients: base URL joining,
/// auth header, request timeout, and response-to-error mapping.
pub struct HttpTransport {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        if config.endpoint.is_empty() {
            return Err(ClientError::config("endpoint is not configured"));
        }
        let client = Client::builder()
            .user_agent("lbx-client/0.1.0")
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}{}", self.base_url, API_PREFIX, path);
        let mut builder = self.client.request(method, url);
        if let Some(token) = &self.auth_token {
            builder = builder.header("X-Auth-Token", token);
        }
        builder
    }

    async fn get_json<T>(
        &self,
        kind: ResourceKind,
        id: &str,
        path: &str,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        let response = self.request(Method::GET, path).send().await?;
        self.handle(Some((kind, id)), response).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response =
            self.request(Method::POST, path).json(body).send().await?;
        self.handle(None, response).await
    }

    async fn put_json<B, T>(
        &self,
        kind: ResourceKind,
        id: &str,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response =
            self.request(Method::PUT, path).json(body).send().await?;
        self.handle(Some((kind, id)), response).await
    }

    async fn delete(
        &self,
        kind: ResourceKind,
        id: &str,
        path: &str,
    ) -> Result<(), ClientError> {
        let response = self.request(Method::DELETE, path).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::not_found(kind, id));
        }
        if status.is_success() {
            return Ok(());
        }
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        Err(ClientError::api(status.as_u16(), message))
    }

    /// Map a response to a typed record. A 404 on an addressed resource
    /// becomes NotFound; any other non-success status becomes an Api error
    /// carrying the body.
    async fn handle<T>(
        &self,
        not_found: Option<(ResourceKind, &str)>,
        response: Response,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            if let Some((kind, id)) = not_found {
                return Err(ClientError::not_found(kind, id));
            }
        }
        if status.is_success() {
            let text = response.text().await?;
            serde_json::from_str(&text).map_err(ClientError::Serialization)
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            Err(ClientError::api(status.as_u16(), message))
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct LoadBalancerEnvelope<T> {
    loadbalancer: T,
}

#[derive(Debug, Serialize, Deserialize)]
struct ListenerEnvelope<T> {
    listener: T,
}

#[derive(Debug, Serialize, Deserialize)]
struct PoolEnvelope<T> {
    pool: T,
}

#[derive(Debug, Serialize, Deserialize)]
struct MemberEnvelope<T> {
    member: T,
}

#[derive(Debug, Serialize, Deserialize)]
struct HealthMonitorEnvelope<T> {
    healthmonitor: T,
}

#[derive(Debug, Deserialize)]
struct StatusesEnvelope {
    statuses: StatusTree,
}

pub struct HttpLoadBalancerClient {
    transport: Arc<HttpTransport>,
}

#[async_trait]
impl LoadBalancerClient for HttpLoadBalancerClient {
    async fn create(
        &self,
        req: &LoadBalancerCreate,
    ) -> Result<LoadBalancer, ClientError> {
        let env: LoadBalancerEnvelope<LoadBalancer> = self
            .transport
            .post_json(
                "/loadbalancers",
                &LoadBalancerEnvelope { loadbalancer: req },
            )
            .await?;
        Ok(env.loadbalancer)
    }

    async fn get(&self, id: &str) -> Result<LoadBalancer, ClientError> {
        let env: LoadBalancerEnvelope<Option<LoadBalancer>> = self
            .transport
            .get_json(
                ResourceKind::LoadBalancer,
                id,
                &format!("/loadbalancers/{id}"),
            )
            .await?;
        env.loadbalancer.ok_or_else(|| {
            ClientError::not_found(ResourceKind::LoadBalancer, id)
        })
    }

    async fn update(
        &self,
        id: &str,
        req: &LoadBalancerUpdate,
    ) -> Result<LoadBalancer, ClientError> {
        let env: LoadBalancerEnvelope<LoadBalancer> = self
            .transport
            .put_json(
                ResourceKind::LoadBalancer,
                id,
                &format!("/loadbalancers/{id}"),
                &LoadBalancerEnvelope { loadbalancer: req },
            )
            .await?;
        Ok(env.loadbalancer)
    }

    async fn delete(&self, id: &str) -> Result<(), ClientError> {
        self.transport
            .delete(
                ResourceKind::LoadBalancer,
                id,
                &format!("/loadbalancers/{id}"),
            )
            .await
    }

    async fn status_tree(&self, id: &str) -> Result<StatusTree, ClientError> {
        let env: StatusesEnvelope = self
            .transport
            .get_json(
                ResourceKind::LoadBalancer,
                id,
                &format!("/loadbalancers/{id}/statuses"),
            )
            .await?;
        Ok(env.statuses)
    }
}

pub struct HttpListenerClient {
    transport: Arc<HttpTransport>,
}

#[async_trait]
impl ListenerClient for HttpListenerClient {
    async fn create(
        &self,
        req: &ListenerCreate,
    ) -> Result<Listener, ClientError> {
        let env: ListenerEnvelope<Listener> = self
            .transport
            .post_json("/listeners", &ListenerEnvelope { listener: req })
            .await?;
        Ok(env.listener)
    }

    async fn update(
        &self,
        id: &str,
        req: &ListenerUpdate,
    ) -> Result<Listener, ClientError> {
        let env: ListenerEnvelope<Listener> = self
            .transport
            .put_json(
                ResourceKind::Listener,
                id,
                &format!("/listeners/{id}"),
                &ListenerEnvelope { listener: req },
            )
            .await?;
        Ok(env.listener)
    }

    async fn delete(&self, id: &str) -> Result<(), ClientError> {
        self.transport
            .delete(ResourceKind::Listener, id, &format!("/listeners/{id}"))
            .await
    }
}

pub struct HttpPoolClient {
    transport: Arc<HttpTransport>,
}

#[async_trait]
impl PoolClient for HttpPoolClient {
    async fn create(&self, req: &PoolCreate) -> Result<Pool, ClientError> {
        let env: PoolEnvelope<Pool> = self
            .transport
            .post_json("/pools", &PoolEnvelope { pool: req })
            .await?;
        Ok(env.pool)
    }

    async fn update(
        &self,
        id: &str,
        req: &PoolUpdate,
    ) -> Result<Pool, ClientError> {
        let env: PoolEnvelope<Pool> = self
            .transport
            .put_json(
                ResourceKind::Pool,
                id,
                &format!("/pools/{id}"),
                &PoolEnvelope { pool: req },
            )
            .await?;
        Ok(env.pool)
    }

    async fn delete(&self, id: &str) -> Result<(), ClientError> {
        self.transport
            .delete(ResourceKind::Pool, id, &format!("/pools/{id}"))
            .await
    }
}

pub struct HttpMemberClient {
    transport: Arc<HttpTransport>,
}

#[async_trait]
impl MemberClient for HttpMemberClient {
    async fn create(
        &self,
        pool_id: &str,
        req: &MemberCreate,
    ) -> Result<Member, ClientError> {
        let env: MemberEnvelope<Member> = self
            .transport
            .post_json(
                &format!("/pools/{pool_id}/members"),
                &MemberEnvelope { member: req },
            )
            .await?;
        Ok(env.member)
    }

    async fn update(
        &self,
        pool_id: &str,
        id: &str,
        req: &MemberUpdate,
    ) -> Result<Member, ClientError> {
        let env: MemberEnvelope<Member> = self
            .transport
            .put_json(
                ResourceKind::Member,
                id,
                &format!("/pools/{pool_id}/members/{id}"),
                &MemberEnvelope { member: req },
            )
            .await?;
        Ok(env.member)
    }

    async fn delete(
        &self,
        pool_id: &str,
        id: &str,
    ) -> Result<(), ClientError> {
        self.transport
            .delete(
                ResourceKind::Member,
                id,
                &format!("/pools/{pool_id}/members/{id}"),
            )
            .await
    }
}

pub struct HttpHealthMonitorClient {
    transport: Arc<HttpTransport>,
}

#[async_trait]
impl HealthMonitorClient for HttpHealthMonitorClient {
    async fn create(
        &self,
        req: &HealthMonitorCreate,
    ) -> Result<HealthMonitor, ClientError> {
        let env: HealthMonitorEnvelope<HealthMonitor> = self
            .transport
            .post_json(
                "/healthmonitors",
                &HealthMonitorEnvelope { healthmonitor: req },
            )
            .await?;
        Ok(env.healthmonitor)
    }

    async fn update(
        &self,
        id: &str,
        req: &HealthMonitorUpdate,
    ) -> Result<HealthMonitor, ClientError> {
        let env: HealthMonitorEnvelope<HealthMonitor> = self
            .transport
            .put_json(
                ResourceKind::HealthMonitor,
                id,
                &format!("/healthmonitors/{id}"),
                &HealthMonitorEnvelope { healthmonitor: req },
            )
            .await?;
        Ok(env.healthmonitor)
    }

    async fn delete(&self, id: &str) -> Result<(), ClientError> {
        self.transport
            .delete(
                ResourceKind::HealthMonitor,
                id,
                &format!("/healthmonitors/{id}"),
            )
            .await
    }
}

impl ClientSet {
    /// Build the full client set over one shared HTTP transport.
    pub fn http(config: &ClientConfig) -> Result<Self, ClientError> {
        let transport = Arc::new(HttpTransport::new(config)?);
        Ok(Self {
            load_balancers: Arc::new(HttpLoadBalancerClient {
                transport: transport.clone(),
            }),
            listeners: Arc::new(HttpListenerClient {
                transport: transport.clone(),
            }),
            pools: Arc::new(HttpPoolClient {
                transport: transport.clone(),
            }),
            members: Arc::new(HttpMemberClient {
                transport: transport.clone(),
            }),
            health_monitors: Arc::new(HttpHealthMonitorClient { transport }),
        })
    }
}
