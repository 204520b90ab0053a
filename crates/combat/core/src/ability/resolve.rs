use crate::combatant::Combatant;
use crate::config::CombatConfig;
use crate::rng::Dice;
use crate::stats::ScalingStat;
use crate::status::{PeriodicTick, StatusCatalog, StatusEffect};

use super::effect::{HotAmount, Modifiers, OutcomeSpec, Siphon};
use super::elemental::apply_relation;
use super::formula::{scale, scaled_damage};
use super::result::{AbilityResult, Outcome, Recipient, ScanReport};
use super::AbilityDescriptor;

/// Stateless resolver for ability use.
///
/// Holds only borrowed configuration and an optional status catalog used to
/// enrich emitted effects.
pub struct AbilityEngine<'a> {
    config: &'a CombatConfig,
    catalog: Option<&'a dyn StatusCatalog>,
}

impl<'a> AbilityEngine<'a> {
    pub fn new(config: &'a CombatConfig) -> Self {
        Self {
            config,
            catalog: None,
        }
    }

    pub fn with_catalog(mut self, catalog: &'a dyn StatusCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Resolves `ability` from `actor` against `target`.
    ///
    /// The first applicable step wins: conditional self-heal, accuracy roll,
    /// set-HP-to-one, the decoded effect, then the physical fallback.
    /// Post-outcome modifiers and status emission follow.
    pub fn resolve(
        &self,
        actor: &Combatant,
        target: &Combatant,
        ability: &AbilityDescriptor,
        dice: &mut Dice<'_>,
    ) -> AbilityResult {
        let name = ability.name.as_str();
        let mut logs = Vec::new();

        if let Some(gate) = ability.self_heal {
            if actor.hp.fraction() <= gate.threshold {
                let amount = scale(actor.hp.max(), gate.amount);
                logs.push(format!("{name} heals for {amount} HP."));
                let mut result = AbilityResult::new(
                    Outcome::Heal {
                        amount,
                        recipient: Recipient::Actor,
                    },
                    logs,
                );
                self.attach_statuses(&mut result, ability);
                return result;
            }
        }

        let accuracy = ability.accuracy.unwrap_or(actor.stats.accuracy);
        let chance = (accuracy - target.stats.evasion).max(0);
        if dice.d100() as i32 > chance {
            logs.push(format!("{name} misses!"));
            return AbilityResult::new(Outcome::Miss, logs);
        }

        if ability.sets_hp_to_one {
            logs.push(format!("{name} shatters guard and sets HP to 1!"));
            let mut result = AbilityResult::new(Outcome::SetHp { value: 1 }, logs);
            self.attach_statuses(&mut result, ability);
            return result;
        }

        let outcome = match &ability.effect.primary {
            Some(spec) => self.evaluate(spec, actor, target, ability, dice, &mut logs),
            None => {
                let amount = self.physical(actor, target, 0, dice);
                logs.push(format!("{name} deals {amount} damage."));
                Outcome::Damage { amount, hits: 1 }
            }
        };

        let mut result = self.finish(outcome, actor, target, ability, logs);
        self.attach_statuses(&mut result, ability);
        result
    }

    /// Basic attack: no accuracy roll, physical scaling, no element.
    pub fn plain_attack(
        &self,
        actor: &Combatant,
        target: &Combatant,
        dice: &mut Dice<'_>,
    ) -> AbilityResult {
        let amount = self.physical(actor, target, 0, dice);
        let logs = vec![format!("{} attacks for {amount} damage.", actor.name)];
        AbilityResult::new(Outcome::Damage { amount, hits: 1 }, logs)
    }

    fn physical(&self, actor: &Combatant, target: &Combatant, base: u32, dice: &mut Dice<'_>) -> u32 {
        scaled_damage(
            &actor.stats,
            &target.stats,
            base,
            ScalingStat::AttackPower,
            1.0,
            self.config.damage_variance,
            dice,
        )
    }

    fn steal_amount(&self, pool: u32, dice: &mut Dice<'_>) -> u32 {
        if pool == 0 {
            return 0;
        }
        let low = scale(pool, self.config.steal_min_fraction).max(1);
        let high = scale(pool, self.config.steal_max_fraction).max(low);
        dice.range(low, high).min(pool)
    }

    fn evaluate(
        &self,
        spec: &OutcomeSpec,
        actor: &Combatant,
        target: &Combatant,
        ability: &AbilityDescriptor,
        dice: &mut Dice<'_>,
        logs: &mut Vec<String>,
    ) -> Outcome {
        let name = ability.name.as_str();
        let variance = self.config.damage_variance;

        match spec {
            OutcomeSpec::Scan => {
                let report = ScanReport {
                    name: target.name.clone(),
                    hp: target.hp.current(),
                    max_hp: target.hp.max(),
                    relations: target.resistances.iter().map(|(e, r)| (*e, *r)).collect(),
                };
                logs.push(format!(
                    "{name} reveals {}: {}/{} HP.",
                    report.name, report.hp, report.max_hp
                ));
                for (element, relation) in &report.relations {
                    logs.push(format!("  {element}: {}", relation.kind));
                }
                Outcome::Scan(report)
            }
            OutcomeSpec::MultiHit {
                hits,
                base_damage,
                stat,
                factor,
            } => {
                let hits = (*hits).max(1);
                let amount = (0..hits)
                    .map(|_| {
                        scaled_damage(
                            &actor.stats,
                            &target.stats,
                            *base_damage,
                            *stat,
                            *factor,
                            variance,
                            dice,
                        )
                    })
                    .sum();
                logs.push(format!("{name} strikes {hits} times for {amount} damage."));
                Outcome::Damage { amount, hits }
            }
            OutcomeSpec::FlatDamage { amount } => {
                logs.push(format!("{name} deals {amount} damage."));
                Outcome::Damage {
                    amount: *amount,
                    hits: 1,
                }
            }
            OutcomeSpec::Scaling {
                base_damage,
                stat,
                factor,
            } => {
                let amount = scaled_damage(
                    &actor.stats,
                    &target.stats,
                    *base_damage,
                    *stat,
                    *factor,
                    variance,
                    dice,
                );
                logs.push(format!("{name} deals {amount} damage."));
                Outcome::Damage { amount, hits: 1 }
            }
            OutcomeSpec::FlatHeal { amount } => {
                logs.push(format!("{name} heals for {amount} HP."));
                Outcome::Heal {
                    amount: *amount,
                    recipient: Recipient::Target,
                }
            }
            OutcomeSpec::PercentHeal { fraction } => {
                let amount = scale(target.hp.current(), *fraction);
                logs.push(format!("{name} heals for {amount} HP."));
                Outcome::Heal {
                    amount,
                    recipient: Recipient::Target,
                }
            }
            OutcomeSpec::Lucky => {
                let hp = actor.hp.current();
                let payouts = &self.config.lucky_payouts;
                if !hp.to_string().contains('7') || payouts.is_empty() {
                    logs.push(format!("{name}: no 7 in {hp}, deals 1."));
                    Outcome::Damage { amount: 1, hits: 1 }
                } else {
                    let amount = payouts[dice.pick(payouts.len())];
                    logs.push(format!("{name} JACKPOT! Deals {amount}."));
                    Outcome::Damage { amount, hits: 1 }
                }
            }
            OutcomeSpec::PercentDamage { fraction } => {
                let amount = scale(target.hp.current(), *fraction);
                logs.push(format!(
                    "{name} deals {amount} ({}%).",
                    (fraction * 100.0).round() as i64
                ));
                Outcome::Damage { amount, hits: 1 }
            }
            OutcomeSpec::ResourceDrain { amount } => {
                let amount = (*amount).min(target.resource.current());
                logs.push(format!("{name} drains {amount} from {}.", target.name));
                Outcome::Drain { amount }
            }
            OutcomeSpec::DamageOverTime {
                name: dot_name,
                per_tick,
                duration,
            } => Outcome::DamageOverTime {
                per_tick: *per_tick,
                duration: *duration,
                name: dot_name.clone().unwrap_or_else(|| name.to_string()),
            },
            OutcomeSpec::HealOverTime {
                name: hot_name,
                amount,
                duration,
            } => {
                let per_tick = match amount {
                    HotAmount::Flat(value) => *value,
                    HotAmount::PercentMax(fraction) => scale(target.hp.max(), *fraction),
                };
                Outcome::HealOverTime {
                    per_tick,
                    duration: *duration,
                    name: hot_name.clone().unwrap_or_else(|| name.to_string()),
                    recipient: Recipient::Target,
                }
            }
            OutcomeSpec::Steal => {
                let amount = self.steal_amount(target.currency, dice);
                if amount == 0 {
                    logs.push(format!("{name} finds nothing to steal."));
                } else {
                    logs.push(format!("{name} pilfers {amount} gil!"));
                }
                Outcome::Steal { amount }
            }
            OutcomeSpec::Mug { base_damage } => {
                let damage = self.physical(actor, target, *base_damage, dice);
                let stolen = self.steal_amount(target.currency, dice);
                logs.push(format!("{name} deals {damage} and pilfers {stolen} gil!"));
                Outcome::Mug { damage, stolen }
            }
            OutcomeSpec::StatusOnly => {
                logs.push(format!("{name} takes effect."));
                Outcome::StatusOnly
            }
        }
    }

    /// Post-outcome modifiers (execute, role, element, siphon) plus the
    /// periodic status for DoT/HoT outcomes.
    fn finish(
        &self,
        outcome: Outcome,
        actor: &Combatant,
        target: &Combatant,
        ability: &AbilityDescriptor,
        mut logs: Vec<String>,
    ) -> AbilityResult {
        let modifiers = &ability.effect.modifiers;
        let mut outcome = apply_damage_bonuses(outcome, modifiers, target, &mut logs);

        let mut relation_kind = None;
        if let Some(element) = ability.element {
            let relation = target.resistances.relation(element);
            relation_kind = Some(relation.kind);
            outcome = apply_relation(
                outcome,
                element,
                relation,
                &target.name,
                self.config,
                &mut logs,
            );
        }

        let siphon = match (&outcome, modifiers.siphon) {
            (Outcome::Damage { amount, .. }, Some(siphon))
            | (Outcome::Mug { damage: amount, .. }, Some(siphon)) => {
                let drained = match siphon {
                    Siphon::Flat(value) => value.min(*amount),
                    Siphon::Percent(fraction) => scale(*amount, fraction),
                };
                if drained > 0 {
                    logs.push(format!("{} siphons {drained} HP.", actor.name));
                }
                drained
            }
            _ => 0,
        };

        let side = ability.target.effect_side();
        let mut status_effects = Vec::new();
        match &outcome {
            Outcome::DamageOverTime {
                per_tick,
                duration,
                name,
            } if *per_tick > 0 && *duration > 0 => {
                logs.push(format!("{} applies {name} for {duration} turn(s).", ability.name));
                status_effects.push(
                    StatusEffect::new(name.clone(), *duration, side)
                        .with_tick(PeriodicTick::Damage(*per_tick)),
                );
            }
            Outcome::HealOverTime {
                per_tick,
                duration,
                name,
                ..
            } if *duration > 0 => {
                logs.push(format!("{} grants {name} for {duration} turn(s).", ability.name));
                // Lands with the target, so an absorbed DoT stays on the opposing side.
                status_effects.push(
                    StatusEffect::new(name.clone(), *duration, side)
                        .with_tick(PeriodicTick::Heal(*per_tick)),
                );
            }
            _ => {}
        }

        let mut result = AbilityResult::new(outcome, logs);
        result.siphon = siphon;
        result.relation = relation_kind;
        result.status_effects = status_effects;
        result
    }

    /// Data-driven seed, then table links merged by name, then catalog
    /// enrichment.
    fn attach_statuses(&self, result: &mut AbilityResult, ability: &AbilityDescriptor) {
        let side = ability.target.effect_side();

        if let Some(seed) = &ability.effect.status {
            if seed.duration > 0 {
                let name = seed.name.clone().unwrap_or_else(|| ability.name.clone());
                push_merged(
                    &mut result.status_effects,
                    StatusEffect::new(name, seed.duration, side).with_modifiers(seed.modifiers),
                );
            }
        }

        for link in &ability.linked_statuses {
            if link.duration == 0 {
                continue;
            }
            let effect = match self.catalog.and_then(|c| c.by_name(&link.name)) {
                Some(template) => template.instantiate(link.duration, side),
                None => StatusEffect::new(link.name.clone(), link.duration, side),
            };
            push_merged(&mut result.status_effects, effect);
        }

        if let Some(catalog) = self.catalog {
            for effect in &mut result.status_effects {
                if let Some(template) = catalog.by_name(&effect.name) {
                    effect.merge_metadata(template);
                }
            }
        }
    }
}

fn apply_damage_bonuses(
    outcome: Outcome,
    modifiers: &Modifiers,
    target: &Combatant,
    logs: &mut Vec<String>,
) -> Outcome {
    let mut multiplier = 1.0;
    if let Some(execute) = modifiers.execute {
        if target.hp.fraction() <= execute.threshold {
            multiplier *= execute.multiplier;
            logs.push("A finishing blow!".to_string());
        }
    }
    if let Some(bonus) = &modifiers.role_bonus {
        if bonus.roles.contains(&target.role) {
            multiplier *= bonus.multiplier;
        }
    }
    if multiplier == 1.0 {
        return outcome;
    }

    match outcome {
        Outcome::Damage { amount, hits } => Outcome::Damage {
            amount: scale(amount, multiplier),
            hits,
        },
        Outcome::Mug { damage, stolen } => Outcome::Mug {
            damage: scale(damage, multiplier),
            stolen,
        },
        other => other,
    }
}

/// Same-named instances merge: the incoming one overwrites id, icon and
/// duration of the existing entry.
fn push_merged(effects: &mut Vec<StatusEffect>, incoming: StatusEffect) {
    match effects.iter_mut().find(|e| e.name == incoming.name) {
        Some(existing) => {
            if incoming.id.is_some() {
                existing.id = incoming.id;
            }
            if !incoming.icon.is_empty() {
                existing.icon = incoming.icon;
            }
            existing.remaining = incoming.remaining;
            existing.modifiers.overlay(&incoming.modifiers);
            existing.flags |= incoming.flags;
        }
        None => effects.push(incoming),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::{
        AbilityId, EffectDescriptor, ExecuteBonus, HealGate, ResultKind, RoleBonus, StatusLink,
        TargetClass,
    };
    use crate::combatant::{
        Element, ElementalRelation, EnemyId, PlayerId, Pool, RelationKind, ResistanceProfile, Role,
    };
    use crate::rng::{PcgRng, RngOracle};
    use crate::stats::{StatBlock, StatModifiers};
    use crate::status::{EffectSide, StatusFlags, StatusTemplate};

    /// Oracle that always returns the same raw value.
    struct Fixed(u32);

    impl RngOracle for Fixed {
        fn next_u32(&self, _seed: u64) -> u32 {
            self.0
        }
    }

    fn hero(attack: i32) -> Combatant {
        Combatant::player(
            PlayerId(1),
            "Hero",
            Pool::full(100),
            StatBlock {
                attack_power: attack,
                magic_power: attack,
                accuracy: 100,
                speed: 10,
                ..Default::default()
            },
        )
    }

    fn goblin(defense: i32, resistances: ResistanceProfile) -> Combatant {
        let mut enemy = Combatant::enemy(
            EnemyId(1),
            "Goblin",
            Pool::full(50),
            StatBlock {
                defense,
                magic_defense: defense,
                ..Default::default()
            },
        );
        enemy.resistances = resistances;
        enemy.currency = 100;
        enemy
    }

    fn fire(base: u32) -> AbilityDescriptor {
        AbilityDescriptor::new(AbilityId(2), "Fire")
            .with_element(Element::Fire)
            .with_effect(EffectDescriptor::with(OutcomeSpec::Scaling {
                base_damage: base,
                stat: ScalingStat::MagicPower,
                factor: 1.0,
            }))
    }

    fn resolve(actor: &Combatant, target: &Combatant, ability: &AbilityDescriptor) -> AbilityResult {
        let config = CombatConfig::default();
        let rng = PcgRng;
        let mut dice = Dice::new(&rng, 42, 1, 1);
        AbilityEngine::new(&config).resolve(actor, target, ability, &mut dice)
    }

    #[test]
    fn scaling_damage_matches_ratio_formula() {
        let result = resolve(&hero(10), &goblin(0, ResistanceProfile::new()), &fire(0));
        assert_eq!(result.kind(), ResultKind::Damage);
        assert_eq!(result.amount(), 10);
        assert_eq!(result.relation, Some(RelationKind::Normal));
    }

    #[test]
    fn weak_relation_scales_up() {
        let weak = ResistanceProfile::new()
            .with(Element::Fire, ElementalRelation::new(RelationKind::Weak));
        let result = resolve(&hero(10), &goblin(0, weak), &fire(0));
        assert_eq!(result.amount(), 15);
    }

    #[test]
    fn resist_relation_scales_down() {
        let resist = ResistanceProfile::new()
            .with(Element::Fire, ElementalRelation::new(RelationKind::Resist));
        let result = resolve(&hero(10), &goblin(0, resist), &fire(0));
        assert_eq!(result.amount(), 5);
    }

    #[test]
    fn immune_relation_zeroes_damage() {
        let immune = ResistanceProfile::new()
            .with(Element::Fire, ElementalRelation::new(RelationKind::Immune));
        for attack in [1, 10, 500] {
            let result = resolve(&hero(attack), &goblin(3, immune.clone()), &fire(20));
            assert_eq!(result.kind(), ResultKind::Damage);
            assert_eq!(result.amount(), 0);
        }
    }

    #[test]
    fn absorb_relation_flips_to_heal() {
        let absorb = ResistanceProfile::new()
            .with(Element::Fire, ElementalRelation::new(RelationKind::Absorb));
        let result = resolve(&hero(10), &goblin(0, absorb), &fire(0));
        assert_eq!(
            result.outcome,
            Outcome::Heal {
                amount: 10,
                recipient: Recipient::Target
            }
        );
        assert!(result.logs.iter().any(|l| l.contains("absorbs")));
    }

    #[test]
    fn immune_dot_emits_no_status() {
        let immune = ResistanceProfile::new()
            .with(Element::Fire, ElementalRelation::new(RelationKind::Immune));
        let burn = AbilityDescriptor::new(AbilityId(9), "Burn")
            .with_element(Element::Fire)
            .with_effect(EffectDescriptor::with(OutcomeSpec::DamageOverTime {
                name: None,
                per_tick: 6,
                duration: 3,
            }));
        let result = resolve(&hero(10), &goblin(0, immune), &burn);
        assert_eq!(result.kind(), ResultKind::Dot);
        assert_eq!(result.amount(), 0);
        assert!(result.status_effects.is_empty());
    }

    #[test]
    fn dot_emits_periodic_status_on_opposing_side() {
        let poison = AbilityDescriptor::new(AbilityId(35), "Poison").with_effect(
            EffectDescriptor::with(OutcomeSpec::DamageOverTime {
                name: Some("Poisoned".into()),
                per_tick: 4,
                duration: 3,
            }),
        );
        let result = resolve(&hero(10), &goblin(0, ResistanceProfile::new()), &poison);
        assert_eq!(result.status_effects.len(), 1);
        let status = &result.status_effects[0];
        assert_eq!(status.name, "Poisoned");
        assert_eq!(status.remaining, 3);
        assert_eq!(status.tick, PeriodicTick::Damage(4));
        assert_eq!(status.side, EffectSide::Opposing);
    }

    #[test]
    fn missing_descriptor_falls_back_to_physical() {
        let jab = AbilityDescriptor::new(AbilityId(3), "Jab");
        let result = resolve(&hero(10), &goblin(0, ResistanceProfile::new()), &jab);
        assert_eq!(result.kind(), ResultKind::Damage);
        assert_eq!(result.amount(), 10);
    }

    #[test]
    fn accuracy_below_evasion_always_misses() {
        let mut target = goblin(0, ResistanceProfile::new());
        target.stats.evasion = 100;
        let result = resolve(&hero(10), &target, &fire(0).with_accuracy(90));
        assert!(result.is_miss());
        assert!(result.status_effects.is_empty());
    }

    #[test]
    fn set_hp_beats_effect_descriptor() {
        let mut breaker = fire(0);
        breaker.sets_hp_to_one = true;
        let result = resolve(&hero(10), &goblin(0, ResistanceProfile::new()), &breaker);
        assert_eq!(result.outcome, Outcome::SetHp { value: 1 });
    }

    #[test]
    fn conditional_self_heal_fires_under_threshold() {
        let mut actor = goblin(0, ResistanceProfile::new());
        actor.hp = Pool::new(10, 50);
        let mut mend = AbilityDescriptor::new(AbilityId(40), "Mend");
        mend.self_heal = Some(HealGate {
            threshold: 0.5,
            amount: 0.3,
        });
        let result = resolve(&actor, &hero(10), &mend);
        assert_eq!(
            result.outcome,
            Outcome::Heal {
                amount: 15,
                recipient: Recipient::Actor
            }
        );
    }

    #[test]
    fn execute_and_role_bonus_stack_before_element() {
        let weak = ResistanceProfile::new()
            .with(Element::Fire, ElementalRelation::new(RelationKind::Weak));
        let mut boss = goblin(0, weak);
        boss.role = Role::Boss;
        boss.hp = Pool::new(5, 50);
        let ability = fire(0).with_effect(
            EffectDescriptor::with(OutcomeSpec::Scaling {
                base_damage: 0,
                stat: ScalingStat::MagicPower,
                factor: 1.0,
            })
            .with_modifiers(Modifiers {
                execute: Some(ExecuteBonus {
                    threshold: 0.2,
                    multiplier: 2.0,
                }),
                role_bonus: Some(RoleBonus {
                    roles: vec![Role::Boss],
                    multiplier: 2.0,
                }),
                siphon: Some(Siphon::Percent(0.5)),
            }),
        );
        let result = resolve(&hero(10), &boss, &ability);
        // 10 * 2 (execute) * 2 (boss) * 1.5 (weak)
        assert_eq!(result.amount(), 60);
        assert_eq!(result.siphon, 30);
    }

    #[test]
    fn lucky_without_seven_deals_one() {
        let mut actor = hero(10);
        actor.hp = Pool::new(42, 100);
        let lucky = AbilityDescriptor::new(AbilityId(50), "Lucky Seven")
            .with_effect(EffectDescriptor::with(OutcomeSpec::Lucky));
        let result = resolve(&actor, &goblin(0, ResistanceProfile::new()), &lucky);
        assert_eq!(result.amount(), 1);

        actor.hp = Pool::new(77, 100);
        let result = resolve(&actor, &goblin(0, ResistanceProfile::new()), &lucky);
        assert!([7, 77, 777, 7777].contains(&result.amount()));
    }

    #[test]
    fn steal_takes_a_bounded_share() {
        let config = CombatConfig::default();
        let engine = AbilityEngine::new(&config);
        let steal = AbilityDescriptor::new(AbilityId(8), "Steal")
            .with_effect(EffectDescriptor::with(OutcomeSpec::Steal));
        let rng = PcgRng;
        for nonce in 0..30 {
            let mut dice = Dice::new(&rng, 5, nonce, 1);
            let result = engine.resolve(&hero(10), &goblin(0, ResistanceProfile::new()), &steal, &mut dice);
            assert!((10..=25).contains(&result.amount()), "stole {}", result.amount());
        }

        let mut broke = goblin(0, ResistanceProfile::new());
        broke.currency = 0;
        let mut dice = Dice::new(&rng, 5, 0, 1);
        let result = engine.resolve(&hero(10), &broke, &steal, &mut dice);
        assert_eq!(result.outcome, Outcome::Steal { amount: 0 });
    }

    #[test]
    fn table_links_merge_with_data_driven_status() {
        struct Catalog(Vec<StatusTemplate>);
        impl StatusCatalog for Catalog {
            fn by_name(&self, name: &str) -> Option<&StatusTemplate> {
                self.0.iter().find(|t| t.name == name)
            }
            fn by_id(&self, id: u32) -> Option<&StatusTemplate> {
                self.0.iter().find(|t| t.id == id)
            }
        }
        let catalog = Catalog(vec![StatusTemplate {
            id: 4,
            name: "Berserk".into(),
            icon: "💪".into(),
            modifiers: StatModifiers::default(),
            flags: StatusFlags::empty(),
        }]);

        let mut berserk = AbilityDescriptor::new(AbilityId(10), "Berserk")
            .with_target(TargetClass::SelfOnly)
            .with_effect(
                EffectDescriptor::with(OutcomeSpec::StatusOnly).with_status(crate::ability::StatusSeed {
                    name: None,
                    duration: 2,
                    modifiers: StatModifiers {
                        attack_power_up: 50,
                        defense_down: 20,
                        ..Default::default()
                    },
                }),
            );
        berserk.linked_statuses.push(StatusLink {
            name: "Berserk".into(),
            duration: 3,
        });

        let config = CombatConfig::default();
        let rng = Fixed(0);
        let mut dice = Dice::new(&rng, 0, 0, 0);
        let actor = hero(10);
        let result = AbilityEngine::new(&config)
            .with_catalog(&catalog)
            .resolve(&actor, &actor, &berserk, &mut dice);

        assert_eq!(result.kind(), ResultKind::StatusOnly);
        assert_eq!(result.status_effects.len(), 1);
        let status = &result.status_effects[0];
        assert_eq!(status.id, Some(4));
        assert_eq!(status.icon, "💪");
        assert_eq!(status.remaining, 3);
        assert_eq!(status.modifiers.attack_power_up, 50);
        assert_eq!(status.side, EffectSide::Caster);
    }

    #[test]
    fn plain_attack_never_misses_and_ignores_element() {
        let config = CombatConfig::default();
        let rng = Fixed(u32::MAX);
        let mut dice = Dice::new(&rng, 0, 0, 0);
        let mut target = goblin(0, ResistanceProfile::new());
        target.stats.evasion = 100;
        let result = AbilityEngine::new(&config).plain_attack(&hero(10), &target, &mut dice);
        assert_eq!(result.outcome, Outcome::Damage { amount: 10, hits: 1 });
    }
}
