//! Skirmish configuration structures and loaders.
use std::env;
use std::path::PathBuf;

use combat_core::EnemyId;

/// Configuration for one scripted skirmish.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub data_dir: PathBuf,
    pub enemy: EnemyId,
    /// Fixed battle seed. Fresh entropy per battle when unset.
    pub seed: Option<u64>,
    /// Overrides the gauge cadence from `combat.toml`.
    pub tick_ms: Option<u64>,
    /// Overrides the damage variance from `combat.toml`.
    pub variance: Option<f64>,
    /// Player turns before the skirmish gives up and flees.
    pub max_turns: u32,
    /// Print views as JSON lines instead of text.
    pub json: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../combat/content/data")),
            enemy: EnemyId(1),
            seed: None,
            tick_ms: None,
            variance: None,
            max_turns: 40,
            json: false,
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `SKIRMISH_DATA_DIR` - Content directory (default: bundled data)
    /// - `SKIRMISH_ENEMY` - Enemy id to fight (default: 1)
    /// - `SKIRMISH_SEED` - Fixed battle seed (default: random)
    /// - `SKIRMISH_TICK_MS` - Gauge tick in milliseconds (default: from content)
    /// - `SKIRMISH_VARIANCE` - Damage variance (default: from content)
    /// - `SKIRMISH_MAX_TURNS` - Turn limit before fleeing (default: 40)
    /// - `SKIRMISH_JSON` - Print views as JSON lines (default: false)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("SKIRMISH_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(enemy) = read_env::<u32>("SKIRMISH_ENEMY") {
            config.enemy = EnemyId(enemy);
        }
        config.seed = read_env::<u64>("SKIRMISH_SEED");
        config.tick_ms = read_env::<u64>("SKIRMISH_TICK_MS");
        config.variance = read_env::<f64>("SKIRMISH_VARIANCE");
        if let Some(turns) = read_env::<u32>("SKIRMISH_MAX_TURNS") {
            config.max_turns = turns.max(1);
        }
        if let Some(json) = read_env::<bool>("SKIRMISH_JSON") {
            config.json = json;
        } else if env::var("SKIRMISH_JSON").is_ok() {
            config.json = true;
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
