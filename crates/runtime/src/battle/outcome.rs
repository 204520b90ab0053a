//! Applies a resolved [`AbilityResult`] to both sides of an exchange.
//!
//! Resolution is pure; this is where health, resource, currency and effect
//! lists actually move.

use combat_core::{
    AbilityResult, BattleLog, Combatant, EffectSide, Outcome, Pool, Recipient, StatusEffects,
    StatusFlags,
};

use crate::repository::PlayerRecord;

/// Mutable view of one side of an exchange.
pub(crate) struct Party<'a> {
    pub name: &'a str,
    pub hp: &'a mut Pool,
    pub resource: &'a mut Pool,
    pub currency: &'a mut u32,
    pub effects: &'a mut StatusEffects,
}

impl<'a> Party<'a> {
    pub fn record(record: &'a mut PlayerRecord, effects: &'a mut StatusEffects) -> Self {
        Self {
            name: &record.name,
            hp: &mut record.hp,
            resource: &mut record.resource,
            currency: &mut record.currency,
            effects,
        }
    }

    pub fn combatant(combatant: &'a mut Combatant, effects: &'a mut StatusEffects) -> Self {
        Self {
            name: &combatant.name,
            hp: &mut combatant.hp,
            resource: &mut combatant.resource,
            currency: &mut combatant.currency,
            effects,
        }
    }

    fn reborrow(&mut self) -> Party<'_> {
        Party {
            name: self.name,
            hp: &mut *self.hp,
            resource: &mut *self.resource,
            currency: &mut *self.currency,
            effects: &mut *self.effects,
        }
    }
}

/// What the application changed, for events and tracing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Applied {
    pub damage: u32,
    pub healed: u32,
    pub stolen: u32,
}

/// Applies `result` of an ability `actor` aimed at its own side
/// (`own_side`) or at `opponent`.
///
/// `barrier_divisor` is set only when the opponent may shield itself with a
/// barrier, which is the case for enemy actions against a player.
pub(crate) fn apply_result<'a>(
    result: &AbilityResult,
    own_side: bool,
    actor: &mut Party<'a>,
    opponent: &mut Party<'a>,
    barrier_divisor: Option<u32>,
    log: &mut BattleLog,
) -> Applied {
    log.extend(result.logs.iter().cloned());
    let mut applied = Applied::default();
    let shield = if own_side { None } else { barrier_divisor };

    match &result.outcome {
        Outcome::Miss | Outcome::Scan(_) | Outcome::StatusOnly => {}
        Outcome::Damage { amount, .. } => {
            let target = if own_side { &mut *actor } else { &mut *opponent };
            applied.damage = strike(target, *amount, shield, log);
        }
        Outcome::Heal { amount, recipient } => {
            let target = match (recipient, own_side) {
                (Recipient::Actor, _) | (Recipient::Target, true) => &mut *actor,
                (Recipient::Target, false) => &mut *opponent,
            };
            applied.healed = target.hp.restore(*amount);
        }
        Outcome::SetHp { value } => {
            let target = if own_side { &mut *actor } else { &mut *opponent };
            let before = target.hp.current();
            target.hp.set(*value);
            applied.damage = before.saturating_sub(target.hp.current());
        }
        Outcome::DamageOverTime { per_tick, name, .. } => {
            if *per_tick > 0 {
                let target = if own_side { &mut *actor } else { &mut *opponent };
                let dealt = target.hp.drain(*per_tick);
                log.push(format!("{name} deals {dealt} damage to {}!", target.name));
                applied.damage = dealt;
            }
        }
        Outcome::HealOverTime {
            per_tick,
            name,
            recipient,
            ..
        } => {
            let target = match (recipient, own_side) {
                (Recipient::Actor, _) | (Recipient::Target, true) => &mut *actor,
                (Recipient::Target, false) => &mut *opponent,
            };
            let healed = target.hp.restore(*per_tick);
            if healed > 0 {
                log.push(format!("{name} heals {} for {healed} HP!", target.name));
            }
            applied.healed = healed;
        }
        Outcome::Drain { amount } => {
            if !own_side {
                let taken = opponent.resource.drain(*amount);
                actor.resource.restore(taken);
            }
        }
        Outcome::Steal { amount } => {
            if !own_side {
                applied.stolen = transfer(opponent, actor, *amount);
            }
        }
        Outcome::Mug { damage, stolen } => {
            if !own_side {
                applied.damage = strike(opponent, *damage, shield, log);
                applied.stolen = transfer(opponent, actor, *stolen);
            }
        }
    }

    if result.siphon > 0 {
        applied.healed += actor.hp.restore(result.siphon);
    }

    for effect in &result.status_effects {
        match effect.side {
            EffectSide::Caster => actor.effects.insert(effect.clone()),
            EffectSide::Opposing => opponent.effects.insert(effect.clone()),
        }
    }

    applied
}

/// Applies an ability `actor` aimed at itself with nobody opposite, as
/// outside battle. Effects meant for an opponent are dropped.
pub(crate) fn apply_to_self(
    result: &AbilityResult,
    actor: &mut Party<'_>,
    log: &mut BattleLog,
) -> Applied {
    let mut hp = Pool::default();
    let mut resource = Pool::default();
    let mut currency = 0;
    let mut effects = StatusEffects::new();
    let mut actor = actor.reborrow();
    let mut nobody = Party {
        name: actor.name,
        hp: &mut hp,
        resource: &mut resource,
        currency: &mut currency,
        effects: &mut effects,
    };
    apply_result(result, true, &mut actor, &mut nobody, None, log)
}

fn strike(
    target: &mut Party<'_>,
    amount: u32,
    barrier_divisor: Option<u32>,
    log: &mut BattleLog,
) -> u32 {
    let mut amount = amount;
    if let Some(divisor) = barrier_divisor
        && divisor > 1
        && amount > 0
        && target.effects.has_flag(StatusFlags::BARRIER)
    {
        amount /= divisor;
        log.push(format!(
            "Barrier halves the incoming damage! {} takes {amount}.",
            target.name
        ));
    }
    target.hp.drain(amount)
}

/// Moves up to `amount` currency. Never takes more than `from` holds.
fn transfer(from: &mut Party<'_>, to: &mut Party<'_>, amount: u32) -> u32 {
    let taken = amount.min(*from.currency);
    *from.currency -= taken;
    *to.currency = to.currency.saturating_add(taken);
    taken
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{PeriodicTick, StatusEffect};

    struct Side {
        hp: Pool,
        resource: Pool,
        currency: u32,
        effects: StatusEffects,
    }

    impl Side {
        fn new(hp: u32, currency: u32) -> Self {
            Self {
                hp: Pool::full(hp),
                resource: Pool::full(10),
                currency,
                effects: StatusEffects::new(),
            }
        }

        fn party<'a>(&'a mut self, name: &'a str) -> Party<'a> {
            Party {
                name,
                hp: &mut self.hp,
                resource: &mut self.resource,
                currency: &mut self.currency,
                effects: &mut self.effects,
            }
        }
    }

    fn result(outcome: Outcome) -> AbilityResult {
        AbilityResult {
            outcome,
            logs: vec!["resolved".into()],
            status_effects: Vec::new(),
            siphon: 0,
            relation: None,
        }
    }

    #[test]
    fn barrier_halves_enemy_damage() {
        let mut enemy = Side::new(50, 0);
        let mut player = Side::new(50, 0);
        player
            .effects
            .insert(StatusEffect::new("Barrier", 2, EffectSide::Caster));
        let mut log = BattleLog::with_capacity(10);

        let applied = apply_result(
            &result(Outcome::Damage { amount: 11, hits: 1 }),
            false,
            &mut enemy.party("Ogre"),
            &mut player.party("Ash"),
            Some(2),
            &mut log,
        );
        assert_eq!(applied.damage, 5);
        assert_eq!(player.hp.current(), 45);
        assert_eq!(
            log.recent(1),
            vec!["Barrier halves the incoming damage! Ash takes 5.".to_string()]
        );
    }

    #[test]
    fn player_damage_ignores_the_enemy_barrier() {
        let mut player = Side::new(50, 0);
        let mut enemy = Side::new(50, 0);
        enemy
            .effects
            .insert(StatusEffect::new("Barrier", 2, EffectSide::Caster));
        let mut log = BattleLog::with_capacity(10);

        apply_result(
            &result(Outcome::Damage { amount: 10, hits: 1 }),
            false,
            &mut player.party("Ash"),
            &mut enemy.party("Ogre"),
            None,
            &mut log,
        );
        assert_eq!(enemy.hp.current(), 40);
    }

    #[test]
    fn steal_moves_at_most_the_pool() {
        let mut thief = Side::new(30, 0);
        let mut mark = Side::new(30, 6);
        let mut log = BattleLog::with_capacity(10);

        let applied = apply_result(
            &result(Outcome::Mug {
                damage: 4,
                stolen: 9,
            }),
            false,
            &mut thief.party("Ash"),
            &mut mark.party("Goblin"),
            None,
            &mut log,
        );
        assert_eq!(applied.stolen, 6);
        assert_eq!(thief.currency, 6);
        assert_eq!(mark.currency, 0);
        assert_eq!(mark.hp.current(), 26);
    }

    #[test]
    fn dot_ticks_immediately_and_lands_with_full_duration() {
        let mut dot = result(Outcome::DamageOverTime {
            per_tick: 3,
            duration: 3,
            name: "Poison".into(),
        });
        dot.status_effects.push(
            StatusEffect::new("Poison", 3, EffectSide::Opposing)
                .with_tick(PeriodicTick::Damage(3)),
        );

        let mut caster = Side::new(30, 0);
        let mut victim = Side::new(30, 0);
        let mut log = BattleLog::with_capacity(10);
        apply_result(
            &dot,
            false,
            &mut caster.party("Ash"),
            &mut victim.party("Slime"),
            None,
            &mut log,
        );

        assert_eq!(victim.hp.current(), 27);
        assert_eq!(victim.effects.as_slice()[0].remaining, 3);
        assert!(caster.effects.is_empty());
        assert_eq!(
            log.recent(1),
            vec!["Poison deals 3 damage to Slime!".to_string()]
        );
    }

    #[test]
    fn siphon_and_self_heal_go_to_the_actor() {
        let mut actor = Side::new(30, 0);
        actor.hp.drain(20);
        let mut target = Side::new(30, 0);
        let mut log = BattleLog::with_capacity(10);

        let mut hit = result(Outcome::Damage { amount: 8, hits: 1 });
        hit.siphon = 4;
        apply_result(
            &hit,
            false,
            &mut actor.party("Ash"),
            &mut target.party("Slime"),
            None,
            &mut log,
        );
        assert_eq!(actor.hp.current(), 14);
        assert_eq!(target.hp.current(), 22);

        apply_result(
            &result(Outcome::Heal {
                amount: 100,
                recipient: Recipient::Target,
            }),
            true,
            &mut actor.party("Ash"),
            &mut target.party("Slime"),
            None,
            &mut log,
        );
        assert_eq!(actor.hp.current(), 30);
        assert_eq!(target.hp.current(), 22);
    }
}
