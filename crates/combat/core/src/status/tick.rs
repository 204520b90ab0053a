use crate::combatant::Pool;

use super::{PeriodicTick, StatusEffects};

/// One narrated tick event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickLine {
    Damaged { effect: String, amount: u32 },
    Healed { effect: String, amount: u32 },
    WoreOff { effect: String },
}

/// What a tick did to the afflicted pool.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub lines: Vec<TickLine>,
    pub damage: u32,
    pub healed: u32,
}

impl TickReport {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn expired(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().filter_map(|line| match line {
            TickLine::WoreOff { effect } => Some(effect.as_str()),
            _ => None,
        })
    }

    /// Renders each line for the battle log. `subject` names the afflicted
    /// combatant, or `None` for the acting player ("you").
    pub fn narrate(&self, subject: Option<&str>) -> Vec<String> {
        self.lines
            .iter()
            .map(|line| match (line, subject) {
                (TickLine::Damaged { effect, amount }, Some(who)) => {
                    format!("{effect} deals {amount} damage to {who}!")
                }
                (TickLine::Damaged { effect, amount }, None) => {
                    format!("{effect} deals {amount} damage to you!")
                }
                (TickLine::Healed { effect, amount }, Some(who)) => {
                    format!("{effect} heals {who} for {amount} HP!")
                }
                (TickLine::Healed { effect, amount }, None) => {
                    format!("{effect} heals you for {amount} HP!")
                }
                (TickLine::WoreOff { effect }, _) => format!("{effect} has worn off."),
            })
            .collect()
    }
}

impl StatusEffects {
    /// Applies one tick of every instance to `hp`.
    ///
    /// Every instance is applied and narrated before any is removed, so a
    /// list that empties during the tick is fully reported.
    pub fn tick(&mut self, hp: &mut Pool) -> TickReport {
        let mut report = TickReport::default();

        for effect in self.entries.iter_mut() {
            match effect.tick {
                PeriodicTick::Damage(amount) if amount > 0 => {
                    let dealt = hp.drain(amount);
                    report.damage += dealt;
                    report.lines.push(TickLine::Damaged {
                        effect: effect.name.clone(),
                        amount: dealt,
                    });
                }
                PeriodicTick::Heal(amount) if amount > 0 => {
                    let healed = hp.restore(amount);
                    report.healed += healed;
                    report.lines.push(TickLine::Healed {
                        effect: effect.name.clone(),
                        amount: healed,
                    });
                }
                _ => {}
            }

            effect.remaining = effect.remaining.saturating_sub(1);
            if effect.remaining == 0 {
                report.lines.push(TickLine::WoreOff {
                    effect: effect.name.clone(),
                });
            }
        }

        self.entries.retain(|e| e.remaining > 0);
        report
    }
}

#[cfg(test)]
mod tests {
    use crate::status::{EffectSide, StatusEffect};

    use super::*;

    fn poison(remaining: u32, per_tick: u32) -> StatusEffect {
        StatusEffect::new("Poison", remaining, EffectSide::Opposing)
            .with_tick(PeriodicTick::Damage(per_tick))
    }

    #[test]
    fn last_turn_applies_once_then_is_gone() {
        let mut list = StatusEffects::new();
        list.insert(poison(1, 5));
        let mut hp = Pool::new(20, 20);

        let first = list.tick(&mut hp);
        assert_eq!(hp.current(), 15);
        assert_eq!(first.damage, 5);
        assert_eq!(first.expired().collect::<Vec<_>>(), vec!["Poison"]);
        assert!(list.is_empty());

        let second = list.tick(&mut hp);
        assert!(second.is_empty());
        assert_eq!(hp.current(), 15);
    }

    #[test]
    fn tick_never_leaves_pool_bounds() {
        let mut list = StatusEffects::new();
        list.insert(poison(3, 50));
        list.insert(
            StatusEffect::new("Regen", 3, EffectSide::Caster).with_tick(PeriodicTick::Heal(500)),
        );
        let mut hp = Pool::new(10, 40);

        let report = list.tick(&mut hp);
        // Poison drains to zero first, Regen then refills to max.
        assert_eq!(report.damage, 10);
        assert_eq!(report.healed, 40);
        assert_eq!(hp.current(), 40);
        assert_eq!(list.len(), 2);
        assert!(list.iter().all(|e| e.remaining == 2));
    }

    #[test]
    fn every_instance_is_reported_before_removal() {
        let mut list = StatusEffects::new();
        list.insert(poison(1, 2));
        list.insert(StatusEffect::new("Haste", 1, EffectSide::Caster));
        let mut hp = Pool::new(10, 10);

        let report = list.tick(&mut hp);
        let lines = report.narrate(Some("Goblin"));
        assert_eq!(
            lines,
            vec![
                "Poison deals 2 damage to Goblin!".to_string(),
                "Poison has worn off.".to_string(),
                "Haste has worn off.".to_string(),
            ]
        );
        assert!(list.is_empty());
    }
}
