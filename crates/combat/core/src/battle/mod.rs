//! Pure battle bookkeeping: gauges, cooldowns, turn order, enemy choice,
//! speed edges and the per-session battle record.

mod cooldown;
mod enemy_ai;
mod gauge;
mod log;
mod record;
mod speed;
mod turn;

pub use cooldown::{Cooldowns, cooldown_multiplier};
pub use enemy_ai::{EnemyChoice, EnemyMove, Fallback, choose_enemy_ability};
pub use gauge::{Gauge, GaugeBoard, Participant};
pub use log::BattleLog;
pub use record::{BattleRecord, Rewards};
pub use speed::{SpeedContext, SpeedEdge, check_speed_advantage};
pub use turn::next_living;
