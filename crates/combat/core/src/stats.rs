//! Offensive/defensive stat blocks and status-driven modifiers.
//!
//! Stats are never stored in modified form. Each resolution, gauge increment
//! or cooldown reduction recomputes the effective block from the base block
//! and the afflicted side's active effects via [`apply_modifiers`].

/// The seven stats that feed the damage, hit and gauge formulas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatBlock {
    pub attack_power: i32,
    pub magic_power: i32,
    pub defense: i32,
    pub magic_defense: i32,
    pub accuracy: i32,
    pub evasion: i32,
    pub speed: i32,
}

impl StatBlock {
    /// Offensive value for the given scaling stat.
    pub fn offense(&self, stat: ScalingStat) -> i32 {
        match stat {
            ScalingStat::AttackPower => self.attack_power,
            ScalingStat::MagicPower => self.magic_power,
        }
    }

    /// Defensive value matched against the given scaling stat.
    pub fn defense_against(&self, stat: ScalingStat) -> i32 {
        match stat {
            ScalingStat::AttackPower => self.defense,
            ScalingStat::MagicPower => self.magic_defense,
        }
    }
}

/// The offensive stat an ability's damage formula is keyed to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ScalingStat {
    #[default]
    AttackPower,
    MagicPower,
}

impl ScalingStat {
    /// Parses the stored key (`"attack_power"` / `"magic_power"`).
    ///
    /// Unknown keys fall back to attack power.
    pub fn from_key(key: &str) -> Self {
        match key {
            "magic_power" => Self::MagicPower,
            _ => Self::AttackPower,
        }
    }
}

/// Up/down stat adjustments carried by one status effect.
///
/// Ups add; downs subtract and clamp the stat at zero. Each effect is applied
/// in list order, so a later down can clamp a value an earlier up raised.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatModifiers {
    pub attack_power_up: u32,
    pub attack_power_down: u32,
    pub magic_power_up: u32,
    pub magic_power_down: u32,
    pub defense_up: u32,
    pub defense_down: u32,
    pub magic_defense_up: u32,
    pub magic_defense_down: u32,
    pub speed_up: u32,
    pub speed_down: u32,
}

impl StatModifiers {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Applies this effect's adjustments to `stats` in place.
    pub fn apply_to(&self, stats: &mut StatBlock) {
        adjust(&mut stats.attack_power, self.attack_power_up, self.attack_power_down);
        adjust(&mut stats.magic_power, self.magic_power_up, self.magic_power_down);
        adjust(&mut stats.defense, self.defense_up, self.defense_down);
        adjust(&mut stats.magic_defense, self.magic_defense_up, self.magic_defense_down);
        adjust(&mut stats.speed, self.speed_up, self.speed_down);
    }

    /// Overlays non-zero fields of `other` onto `self`.
    pub fn overlay(&mut self, other: &StatModifiers) {
        let pairs: [(&mut u32, u32); 10] = [
            (&mut self.attack_power_up, other.attack_power_up),
            (&mut self.attack_power_down, other.attack_power_down),
            (&mut self.magic_power_up, other.magic_power_up),
            (&mut self.magic_power_down, other.magic_power_down),
            (&mut self.defense_up, other.defense_up),
            (&mut self.defense_down, other.defense_down),
            (&mut self.magic_defense_up, other.magic_defense_up),
            (&mut self.magic_defense_down, other.magic_defense_down),
            (&mut self.speed_up, other.speed_up),
            (&mut self.speed_down, other.speed_down),
        ];
        for (slot, value) in pairs {
            if value != 0 {
                *slot = value;
            }
        }
    }
}

fn adjust(value: &mut i32, up: u32, down: u32) {
    if up > 0 {
        *value = value.saturating_add(up as i32);
    }
    if down > 0 {
        *value = value.saturating_sub(down as i32).max(0);
    }
}

/// Returns `base` with every modifier in `mods` applied in order.
pub fn apply_modifiers<'a, I>(base: &StatBlock, mods: I) -> StatBlock
where
    I: IntoIterator<Item = &'a StatModifiers>,
{
    let mut out = *base;
    for m in mods {
        m.apply_to(&mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> StatBlock {
        StatBlock {
            attack_power: 10,
            magic_power: 10,
            defense: 10,
            magic_defense: 10,
            accuracy: 100,
            evasion: 0,
            speed: 10,
        }
    }

    #[test]
    fn ups_add_and_downs_subtract() {
        let buff = StatModifiers {
            attack_power_up: 5,
            defense_down: 5,
            ..Default::default()
        };
        let stats = apply_modifiers(&base(), [&buff]);
        assert_eq!(stats.attack_power, 15);
        assert_eq!(stats.defense, 5);
        assert_eq!(stats.magic_power, 10);
    }

    #[test]
    fn downs_clamp_at_zero() {
        let slow = StatModifiers {
            speed_down: 30,
            ..Default::default()
        };
        let stats = apply_modifiers(&base(), [&slow]);
        assert_eq!(stats.speed, 0);
    }

    #[test]
    fn modifiers_stack_in_list_order() {
        let haste = StatModifiers {
            speed_up: 10,
            ..Default::default()
        };
        let slow = StatModifiers {
            speed_down: 5,
            ..Default::default()
        };
        let stats = apply_modifiers(&base(), [&haste, &slow]);
        assert_eq!(stats.speed, 15);
    }

    #[test]
    fn scaling_stat_matches_defense() {
        let mut stats = base();
        stats.magic_defense = 3;
        assert_eq!(stats.defense_against(ScalingStat::MagicPower), 3);
        assert_eq!(stats.defense_against(ScalingStat::AttackPower), 10);
        assert_eq!(ScalingStat::from_key("magic_power"), ScalingStat::MagicPower);
        assert_eq!(ScalingStat::from_key("bogus"), ScalingStat::AttackPower);
    }
}
