/// Balance constants and tunable parameters for combat resolution.
///
/// Every field has a default matching the live game; content files only need
/// to name the values they override.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Symmetric damage variance, e.g. `0.1` for ±10%. Zero disables it.
    pub damage_variance: f64,

    /// Default multiplier for a `weak` elemental relation.
    pub weak_multiplier: f64,
    /// Default multiplier for a `resist` elemental relation.
    pub resist_multiplier: f64,
    /// Fraction of absorbed damage converted into healing.
    pub absorb_multiplier: f64,

    /// Scheduler cadence in milliseconds.
    pub gauge_tick_ms: u64,
    /// Gauge maximum for players without an explicit override.
    pub player_gauge_max: f64,
    /// Gauge maximum for the enemy.
    pub enemy_gauge_max: f64,
    /// Minimum interval between gauge-driven view refreshes, in milliseconds.
    pub view_refresh_ms: u64,

    /// Effective speed lead required for a bonus action.
    pub speed_advantage_threshold: i32,
    /// Incoming damage divisor while a Barrier is active.
    pub barrier_divisor: u32,

    /// Lower bound of a steal, as a fraction of the target's pool.
    pub steal_min_fraction: f64,
    /// Upper bound of a steal, as a fraction of the target's pool.
    pub steal_max_fraction: f64,
    /// Payouts for the lucky-seven roll.
    pub lucky_payouts: Vec<u32>,

    /// Class base speed used when a class row is missing.
    pub default_class_speed: i32,
    /// Default accuracy for abilities without an override.
    pub default_accuracy: i32,

    /// Lines retained in a session's battle log.
    pub log_capacity: usize,
    /// Lines shown in a rendered battle view.
    pub view_log_lines: usize,
}

impl CombatConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_WEAK_MULTIPLIER: f64 = 1.5;
    pub const DEFAULT_RESIST_MULTIPLIER: f64 = 0.5;
    pub const DEFAULT_ABSORB_MULTIPLIER: f64 = 1.0;
    pub const DEFAULT_GAUGE_TICK_MS: u64 = 1000;
    pub const DEFAULT_GAUGE_MAX: f64 = 5.0;
    pub const DEFAULT_SPEED_ADVANTAGE: i32 = 10;
    pub const DEFAULT_CLASS_SPEED: i32 = 10;

    pub fn new() -> Self {
        Self {
            damage_variance: 0.0,
            weak_multiplier: Self::DEFAULT_WEAK_MULTIPLIER,
            resist_multiplier: Self::DEFAULT_RESIST_MULTIPLIER,
            absorb_multiplier: Self::DEFAULT_ABSORB_MULTIPLIER,
            gauge_tick_ms: Self::DEFAULT_GAUGE_TICK_MS,
            player_gauge_max: Self::DEFAULT_GAUGE_MAX,
            enemy_gauge_max: Self::DEFAULT_GAUGE_MAX,
            view_refresh_ms: 2000,
            speed_advantage_threshold: Self::DEFAULT_SPEED_ADVANTAGE,
            barrier_divisor: 2,
            steal_min_fraction: 0.10,
            steal_max_fraction: 0.25,
            lucky_payouts: vec![7, 77, 777, 7777],
            default_class_speed: Self::DEFAULT_CLASS_SPEED,
            default_accuracy: 100,
            log_capacity: 10,
            view_log_lines: 5,
        }
    }

    pub fn with_variance(mut self, variance: f64) -> Self {
        self.damage_variance = variance.max(0.0);
        self
    }

    pub fn with_gauge_tick_ms(mut self, tick_ms: u64) -> Self {
        self.gauge_tick_ms = tick_ms.max(1);
        self
    }

    /// Scheduler cadence in seconds, as used by gauge increments.
    pub fn gauge_interval_secs(&self) -> f64 {
        self.gauge_tick_ms as f64 / 1000.0
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
