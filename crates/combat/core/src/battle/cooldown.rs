use std::collections::BTreeMap;

use crate::ability::AbilityId;

/// Remaining cooldown per ability, in turns.
///
/// Values are fractional because speed-scaled reduction is. Entries that
/// reach zero are dropped, so a value is never negative.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cooldowns {
    entries: BTreeMap<AbilityId, f64>,
}

impl Cooldowns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts `ability`'s cooldown at exactly `turns`.
    pub fn set(&mut self, ability: AbilityId, turns: u32) {
        if turns == 0 {
            self.entries.remove(&ability);
        } else {
            self.entries.insert(ability, f64::from(turns));
        }
    }

    /// Reduces every cooldown except `except` by `amount`, flooring at zero.
    pub fn reduce_by(&mut self, amount: f64, except: Option<AbilityId>) {
        let amount = amount.max(0.0);
        for (id, remaining) in self.entries.iter_mut() {
            if Some(*id) == except {
                continue;
            }
            *remaining = (*remaining - amount).max(0.0);
        }
        self.entries.retain(|_, remaining| *remaining > 0.0);
    }

    /// One enemy turn's worth of recovery.
    pub fn decrement(&mut self) {
        self.reduce_by(1.0, None);
    }

    pub fn remaining(&self, ability: AbilityId) -> f64 {
        self.entries.get(&ability).copied().unwrap_or(0.0)
    }

    pub fn is_ready(&self, ability: AbilityId) -> bool {
        self.remaining(ability) <= 0.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (AbilityId, f64)> + '_ {
        self.entries.iter().map(|(id, r)| (*id, *r))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Cooldown recovery per action: effective speed over class base speed.
///
/// A non-positive base counts as 1.
pub fn cooldown_multiplier(effective_speed: i32, class_base_speed: i32) -> f64 {
    f64::from(effective_speed.max(0)) / f64::from(class_base_speed.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIRE: AbilityId = AbilityId(2);
    const HASTE: AbilityId = AbilityId(33);

    #[test]
    fn set_is_exact_and_reduction_spares_the_used_ability() {
        let mut cds = Cooldowns::new();
        cds.set(HASTE, 3);
        cds.set(FIRE, 4);
        cds.reduce_by(cooldown_multiplier(20, 10), Some(FIRE));
        assert_eq!(cds.remaining(FIRE), 4.0);
        assert_eq!(cds.remaining(HASTE), 1.0);
    }

    #[test]
    fn reduction_never_goes_negative() {
        let mut cds = Cooldowns::new();
        cds.set(FIRE, 1);
        cds.reduce_by(5.5, None);
        assert_eq!(cds.remaining(FIRE), 0.0);
        assert!(cds.is_ready(FIRE));
        assert!(cds.is_empty());

        cds.reduce_by(-3.0, None);
        assert!(cds.is_empty());
    }

    #[test]
    fn zero_cooldown_leaves_no_entry() {
        let mut cds = Cooldowns::new();
        cds.set(FIRE, 0);
        assert!(cds.is_ready(FIRE));
        assert!(cds.is_empty());
    }

    #[test]
    fn multiplier_follows_speed_ratio() {
        assert_eq!(cooldown_multiplier(10, 10), 1.0);
        assert_eq!(cooldown_multiplier(15, 10), 1.5);
        assert_eq!(cooldown_multiplier(5, 0), 5.0);
    }
}
