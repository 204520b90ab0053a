use crate::combatant::{Element, ElementalRelation, RelationKind};
use crate::config::CombatConfig;

use super::formula::scale;
use super::result::{Outcome, Recipient};

/// Applies a target's relation to a damaging outcome.
///
/// Weak and resist rescale the amount. Immune zeroes it. Absorb turns damage
/// into a heal for the target (and damage-over-time into heal-over-time).
/// Non-damaging outcomes pass through untouched.
pub(crate) fn apply_relation(
    outcome: Outcome,
    element: Element,
    relation: ElementalRelation,
    target_name: &str,
    config: &CombatConfig,
    logs: &mut Vec<String>,
) -> Outcome {
    let factor = relation.factor(config);

    let outcome = match outcome {
        Outcome::Damage { amount, hits } => match relation.kind {
            RelationKind::Absorb => {
                let healed = scale(amount, factor);
                logs.push(format!(
                    "{target_name} absorbs {element} and recovers {healed} HP!"
                ));
                return Outcome::Heal {
                    amount: healed,
                    recipient: Recipient::Target,
                };
            }
            _ => Outcome::Damage {
                amount: scale(amount, factor),
                hits,
            },
        },
        Outcome::Mug { damage, stolen } => match relation.kind {
            RelationKind::Absorb => {
                let healed = scale(damage, factor);
                logs.push(format!(
                    "{target_name} absorbs {element} and recovers {healed} HP!"
                ));
                return Outcome::Heal {
                    amount: healed,
                    recipient: Recipient::Target,
                };
            }
            _ => Outcome::Mug {
                damage: scale(damage, factor),
                stolen,
            },
        },
        Outcome::DamageOverTime {
            per_tick,
            duration,
            name,
        } => match relation.kind {
            RelationKind::Absorb => {
                let per_tick = scale(per_tick, factor);
                logs.push(format!(
                    "{target_name} absorbs {element} and is bolstered by {name}!"
                ));
                return Outcome::HealOverTime {
                    per_tick,
                    duration,
                    name,
                    recipient: Recipient::Target,
                };
            }
            _ => Outcome::DamageOverTime {
                per_tick: scale(per_tick, factor),
                duration,
                name,
            },
        },
        other => return other,
    };

    match relation.kind {
        RelationKind::Weak => logs.push(format!("{target_name} is weak to {element}!")),
        RelationKind::Resist => logs.push(format!("{target_name} resists {element}.")),
        RelationKind::Immune => logs.push(format!("{target_name} is immune to {element}!")),
        RelationKind::Normal | RelationKind::Absorb => {}
    }
    outcome
}
