//! `charms-resolve`: resolves one user's avatar and prints the bound profile.

mod cli;
mod config;

use std::sync::Arc;

use anyhow::Context;
use charms_identity::{
    AvatarResolver, HttpProfileApi, IdentitySeed, InMemoryProfileStore, PersistOutcome,
    ResolverConfig, Session,
};
use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::Cli;
use config::Config;

fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false).with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn build_resolver(config: &Config) -> anyhow::Result<Arc<AvatarResolver>> {
    let resolver_config = ResolverConfig {
        persist_discovered: config.persist_discovered,
        ..Default::default()
    };

    let resolver = match &config.fixture {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading fixture {}", path.display()))?;
            let fixture: serde_json::Value = serde_json::from_str(&raw)
                .with_context(|| format!("parsing fixture {}", path.display()))?;
            let store = Arc::new(InMemoryProfileStore::from_fixture(&fixture)?);
            tracing::info!("Serving lookups from fixture {}", path.display());
            AvatarResolver::with_config(store.clone(), store.clone(), store, resolver_config)
        }
        None => {
            let api = Arc::new(HttpProfileApi::new(config.api_url.as_str()));
            tracing::info!("Using profile API at {}", api.base_url());
            AvatarResolver::with_config(api.clone(), api.clone(), api, resolver_config)
        }
    };

    Ok(Arc::new(resolver))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let mut config = Config::from_env();
    config.apply_cli(&cli);
    init_tracing(&config.log_format);

    let resolver = build_resolver(&config)?;

    let mut seed = IdentitySeed::new(cli.user_id.as_str());
    seed.name = cli.name.clone();
    seed.avatar = cli.avatar.clone();

    let mut session = Session::bootstrap(seed, resolver);
    let result = session.refresh().await;
    tracing::info!(
        resolved = result.resolved,
        persisted = result.persisted,
        "Resolution finished"
    );

    for outcome in session.flush_pending_writes().await {
        if let PersistOutcome::Failed(reason) = outcome {
            tracing::warn!("Avatar write-back failed: {}", reason);
        }
    }

    println!("{}", serde_json::to_string_pretty(&session.view())?);
    session.end();
    Ok(())
}
