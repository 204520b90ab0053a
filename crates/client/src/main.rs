//! `skirmish`: runs one scripted encounter against the bundled content.

mod config;
mod presenter;
mod skirmish;

use std::sync::Arc;

use anyhow::{Context, Result};
use combat_content::ContentFactory;
use combat_runtime::{InMemoryPlayerRepo, InMemoryReferenceRepo, Runtime, RuntimeConfig};
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::ClientConfig;
use crate::presenter::ConsolePresenter;
use crate::skirmish::{Ending, Skirmish};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from_env();
    let bundle = ContentFactory::new(&config.data_dir)
        .load_all()
        .with_context(|| format!("loading content from {}", config.data_dir.display()))?;

    let mut combat = bundle.config.clone();
    if let Some(tick_ms) = config.tick_ms {
        combat = combat.with_gauge_tick_ms(tick_ms);
    }
    if let Some(variance) = config.variance {
        combat = combat.with_variance(variance);
    }

    let players = Arc::new(InMemoryPlayerRepo::new(&bundle.classes));
    let runtime = Runtime::builder()
        .config(RuntimeConfig {
            combat,
            battle_seed: config.seed,
            ..RuntimeConfig::default()
        })
        .players(players.clone())
        .reference(Arc::new(InMemoryReferenceRepo::from_bundle(&bundle)))
        .presenter(Arc::new(ConsolePresenter::new(config.json)))
        .build()?;

    let skirmish = Skirmish::new(runtime, players, bundle.abilities.clone(), config.max_turns);
    let session = skirmish.assemble(&bundle.classes)?;
    let ending = skirmish.run(&session, config.enemy).await?;

    tracing::info!(?ending, "skirmish finished");
    anyhow::ensure!(ending != Ending::Defeat, "the party was wiped out");
    Ok(())
}
