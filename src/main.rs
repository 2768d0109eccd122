use std::sync::Arc;

use tokio::sync::RwLock;

use pro_onboard::accounts::AccountStore;
use pro_onboard::api::{ApiState, registry_routes};
use pro_onboard::config::RegistryConfig;
use pro_onboard::content::ContentStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = RegistryConfig::from_env();

    eprintln!("📋 Pro Onboard v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Data dir: {}", config.data_dir.display());
    eprintln!("   Context API: http://0.0.0.0:{}/api/context", config.port);
    eprintln!("   Admin API: http://0.0.0.0:{}/api/admin", config.port);
    eprintln!("   Agent API: http://0.0.0.0:{}/api/agent", config.port);

    // Stores are built once here and handed to the router; no implicit
    // singletons anywhere below this point.
    let content = ContentStore::load(&config.data_dir);
    let accounts = AccountStore::load(&config.data_dir, content.feature_ids());

    eprintln!(
        "   Loaded: {} features, {} items, {} pros\n",
        content.all_features().len(),
        content.all_items().len(),
        accounts.all().len()
    );

    let state = ApiState {
        content: Arc::new(RwLock::new(content)),
        accounts: Arc::new(RwLock::new(accounts)),
        config: config.clone(),
    };

    let app = registry_routes(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!(port = config.port, "Registry server started");
    axum::serve(listener, app).await?;

    Ok(())
}
