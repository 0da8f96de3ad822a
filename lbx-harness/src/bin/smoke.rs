use clap::Parser;
use lbx_client::CredentialScope;
use lbx_harness::{
    CleanupContext, ExpectedStatusTree, HarnessConfig, HarnessError,
    LbHarness,
};
use lbx_models::{
    HealthMonitorCreate, LbAlgorithm, ListenerCreate, LoadBalancerCreate,
    LoadBalancerUpdate, MemberCreate, MonitorType, PoolCreate, Protocol,
};
use tracing::level_filters::LevelFilter;
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Drives one full load balancer lifecycle against a live endpoint, checks
/// the status tree, then tears everything down again.
#[derive(clap::Parser, Clone, Debug)]
#[clap(author, version, about, long_about = None)]
struct SmokeArgs {
    /// Endpoint override. Falls back to LBX_ENDPOINT.
    #[clap(long)]
    endpoint: Option<String>,

    /// Use the admin credential scope (requires LBX_ADMIN_AUTH_TOKEN).
    #[clap(long)]
    admin: bool,

    /// Subnet the VIP is allocated from.
    #[clap(long, default_value = "private-subnet")]
    vip_subnet_id: String,

    /// Address of the single backend member.
    #[clap(long, default_value = "10.0.1.10")]
    member_address: String,

    /// Leave the created resources in place instead of tearing them down.
    #[clap(long)]
    keep: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_log();
    let args = SmokeArgs::parse();

    let mut config = HarnessConfig::load_from_env()?;
    if let Some(endpoint) = &args.endpoint {
        config.endpoint = endpoint.clone();
    }
    let scope = if args.admin {
        CredentialScope::Admin
    } else {
        CredentialScope::Regular
    };
    let harness = LbHarness::from_config(&config, scope)?;

    let cleanup = CleanupContext::new();
    let outcome = drive_lifecycle(&harness, &cleanup, &args).await;

    if args.keep {
        info!(
            pending = cleanup.pending().len(),
            "keeping resources in place as requested"
        );
    } else {
        harness.cleanup_all(cleanup).await;
    }

    match outcome {
        Ok(lb_id) => {
            info!(lb_id = %lb_id, "smoke run passed");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "smoke run failed");
            Err(e.into())
        }
    }
}

async fn drive_lifecycle(
    harness: &LbHarness,
    cleanup: &CleanupContext,
    args: &SmokeArgs,
) -> Result<String, HarnessError> {
    let name = format!("lbx-smoke-{:08x}", rand::random::<u32>());

    let mut create = LoadBalancerCreate::new(&args.vip_subnet_id);
    create.name = Some(name.clone());
    let lb = harness.create_load_balancer(cleanup, &create, true).await?;
    info!(lb_id = %lb.id, vip = ?lb.vip_address, "load balancer is up");

    let listener = harness
        .create_listener(
            &lb.id,
            &ListenerCreate::new(&lb.id, Protocol::Http, 80),
            true,
        )
        .await?;
    let pool = harness
        .create_pool(
            &lb.id,
            &PoolCreate::new(
                &listener.id,
                Protocol::Http,
                LbAlgorithm::RoundRobin,
            ),
            true,
        )
        .await?;

    let mut member_req = MemberCreate::new(&args.member_address, 80);
    member_req.subnet_id = Some(args.vip_subnet_id.clone());
    let member = harness
        .create_member(&lb.id, &pool.id, &member_req, true)
        .await?;
    let monitor = harness
        .create_health_monitor(
            &lb.id,
            &HealthMonitorCreate::new(&pool.id, MonitorType::Ping, 3, 3, 2),
            true,
        )
        .await?;

    let expected = ExpectedStatusTree::new()
        .listeners([listener.id.clone()])
        .pools([pool.id.clone()])
        .members([member.id.clone()])
        .health_monitor(monitor.id.clone());
    harness.check_status_tree(&lb.id, &expected).await?;
    info!(lb_id = %lb.id, "status tree checks out after provisioning");

    let rename = LoadBalancerUpdate {
        name: Some(format!("{name}-renamed")),
        ..Default::default()
    };
    harness.update_load_balancer(&lb.id, &rename, true).await?;
    harness.check_status_tree(&lb.id, &expected).await?;
    info!(lb_id = %lb.id, "status tree checks out after update");

    Ok(lb.id)
}

fn init_log() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LBX_LOG")
                .from_env_lossy(),
        )
        .init();
}
