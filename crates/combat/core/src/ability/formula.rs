//! Damage formulas.

use crate::rng::Dice;
use crate::stats::{ScalingStat, StatBlock};

/// Ratio-form scaling damage.
///
/// ```text
/// A = offense(stat) + base_damage
/// D = matching defense
/// damage = A * (A / (A + D)) * factor * variance_roll
/// ```
///
/// The ratio is `1.0` when `A + D` is zero. With a positive `variance` the
/// result is multiplied by a uniform draw from `[1 - variance, 1 + variance]`.
/// The result is truncated and floored at 1.
pub fn scaled_damage(
    attacker: &StatBlock,
    defender: &StatBlock,
    base_damage: u32,
    stat: ScalingStat,
    factor: f64,
    variance: f64,
    dice: &mut Dice<'_>,
) -> u32 {
    let attack = f64::from(attacker.offense(stat).max(0)) + f64::from(base_damage);
    let defense = f64::from(defender.defense_against(stat).max(0));

    let total = attack + defense;
    let ratio = if total > 0.0 { attack / total } else { 1.0 };
    let mut damage = attack * ratio * factor;

    if variance > 0.0 {
        damage *= dice.uniform(1.0 - variance, 1.0 + variance);
    }

    (damage.max(0.0) as u32).max(1)
}

/// Scales an amount by a multiplier, truncating toward zero.
pub fn scale(amount: u32, multiplier: f64) -> u32 {
    (f64::from(amount) * multiplier).max(0.0) as u32
}
