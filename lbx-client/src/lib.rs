pub mod config;
pub mod error;
pub mod http;
pub mod traits;

pub use config::{ClientConfig, CredentialScope};
pub use error::ClientError;
pub use http::HttpTransport;
pub use traits::{
    ClientSet, HealthMonitorClient, ListenerClient, LoadBalancerClient,
    MemberClient, PoolClient,
};
