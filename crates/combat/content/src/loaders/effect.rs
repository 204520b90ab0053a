//! Decoding of stored effect bags.
//!
//! Abilities store their effect as a JSON object of loosely-typed keys, for
//! example `{"fire_damage": 30}` or `{"attack_power": 50, "defense_down": 20}`.
//! Every recognised key contributes a candidate outcome; the highest
//! precedence candidate becomes the primary outcome. Stat keys build a status
//! seed instead.

use combat_core::ability::{
    ExecuteBonus, HotAmount, Modifiers, OutcomeSpec, RoleBonus, Siphon, StatusSeed,
};
use combat_core::{EffectDescriptor, Role, ScalingStat, StatModifiers};
use serde_json::{Map, Value};

/// Duration used when a bag names a timed effect without one.
pub const DEFAULT_EFFECT_DURATION: u32 = 3;

/// Damage keys that are not `<element>_damage` shorthands.
const RESERVED_DAMAGE_KEYS: [&str; 3] = ["base_damage", "flat_damage", "percent_damage"];

/// Decodes a raw effect bag.
///
/// An empty string is an absent descriptor. Malformed input is logged and
/// also treated as absent, so the ability resolves as a physical attack.
pub fn decode_effect(raw: &str) -> EffectDescriptor {
    let raw = raw.trim();
    if raw.is_empty() || raw == "null" {
        return EffectDescriptor::empty();
    }

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(bag)) => decode_bag(&bag),
        Ok(other) => {
            tracing::warn!(target: "combat::content", value = %other, "effect bag is not an object");
            EffectDescriptor::empty()
        }
        Err(error) => {
            tracing::warn!(target: "combat::content", %error, raw, "malformed effect bag");
            EffectDescriptor::empty()
        }
    }
}

/// Decodes an already-parsed bag.
pub fn decode_bag(bag: &Map<String, Value>) -> EffectDescriptor {
    let stat_override = bag
        .get("scaling_stat")
        .and_then(Value::as_str)
        .map(ScalingStat::from_key);
    let factor = number(bag, "scaling_factor").unwrap_or(1.0);
    let mut candidates = Vec::new();

    if flag(bag, "scan") {
        candidates.push(OutcomeSpec::Scan);
    }
    if let Some(hits) = uint(bag, "hits").filter(|h| *h > 0) {
        candidates.push(OutcomeSpec::MultiHit {
            hits,
            base_damage: uint(bag, "base_damage").or_else(|| uint(bag, "damage")).unwrap_or(0),
            stat: stat_override.unwrap_or_default(),
            factor,
        });
    }
    if let Some(amount) = uint(bag, "flat_damage") {
        candidates.push(OutcomeSpec::FlatDamage { amount });
    }
    if let Some(base_damage) = uint(bag, "base_damage").or_else(|| uint(bag, "damage")) {
        candidates.push(OutcomeSpec::Scaling {
            base_damage,
            stat: stat_override.unwrap_or_default(),
            factor,
        });
    }
    // `fire_damage`, `lightning_damage`, ... are magic-scaled shorthands.
    if let Some(base_damage) = elemental_damage(bag) {
        candidates.push(OutcomeSpec::Scaling {
            base_damage,
            stat: stat_override.unwrap_or(ScalingStat::MagicPower),
            factor,
        });
    }
    if let Some(amount) = uint(bag, "heal") {
        candidates.push(OutcomeSpec::FlatHeal { amount });
    }
    if let Some(fraction) = number(bag, "percent_heal") {
        candidates.push(OutcomeSpec::PercentHeal { fraction });
    }
    if flag(bag, "lucky_7") {
        candidates.push(OutcomeSpec::Lucky);
    }
    if let Some(fraction) = number(bag, "percent_damage") {
        candidates.push(OutcomeSpec::PercentDamage { fraction });
    }
    if let Some(amount) = uint(bag, "drain").or_else(|| uint(bag, "resource_drain")) {
        candidates.push(OutcomeSpec::ResourceDrain { amount });
    }
    if let Some(dot) = bag.get("damage_over_time").and_then(|v| damage_over_time(bag, v)) {
        candidates.push(dot);
    }
    if let Some(hot) = bag.get("healing_over_time").and_then(|v| heal_over_time(bag, v)) {
        candidates.push(hot);
    }
    if flag(bag, "pilfer_gil") {
        candidates.push(OutcomeSpec::Steal);
    }
    if let Some(mug) = bag.get("mug").and_then(mug) {
        candidates.push(mug);
    }

    let status = status_seed(bag);
    if flag(bag, "status_only") || status.is_some() {
        candidates.push(OutcomeSpec::StatusOnly);
    }

    let mut descriptor =
        EffectDescriptor::from_candidates(candidates).with_modifiers(modifiers(bag));
    if let Some(seed) = status {
        descriptor = descriptor.with_status(seed);
    }
    descriptor
}

fn elemental_damage(bag: &Map<String, Value>) -> Option<u32> {
    bag.iter()
        .filter(|(key, _)| key.ends_with("_damage") && !RESERVED_DAMAGE_KEYS.contains(&key.as_str()))
        .find_map(|(_, value)| as_uint(value))
}

fn damage_over_time(bag: &Map<String, Value>, value: &Value) -> Option<OutcomeSpec> {
    match value {
        Value::Object(inner) => Some(OutcomeSpec::DamageOverTime {
            name: text(inner, "name"),
            per_tick: uint(inner, "damage_per_turn").or_else(|| uint(inner, "per_tick"))?,
            duration: uint(inner, "duration").unwrap_or(DEFAULT_EFFECT_DURATION),
        }),
        other => Some(OutcomeSpec::DamageOverTime {
            name: text(bag, "dot_name"),
            per_tick: as_uint(other)?,
            duration: uint(bag, "duration").unwrap_or(DEFAULT_EFFECT_DURATION),
        }),
    }
}

fn heal_over_time(bag: &Map<String, Value>, value: &Value) -> Option<OutcomeSpec> {
    match value {
        Value::Object(inner) => {
            let amount = match (uint(inner, "heal_per_turn"), number(inner, "percent")) {
                (Some(flat), _) => HotAmount::Flat(flat),
                (None, Some(fraction)) => HotAmount::PercentMax(fraction),
                (None, None) => return None,
            };
            Some(OutcomeSpec::HealOverTime {
                name: text(inner, "name"),
                amount,
                duration: uint(inner, "duration").unwrap_or(DEFAULT_EFFECT_DURATION),
            })
        }
        other => {
            let raw = other.as_f64()?;
            // Fractions under one are a share of max HP, whole numbers are flat.
            let amount = if raw < 1.0 {
                HotAmount::PercentMax(raw)
            } else {
                HotAmount::Flat(as_uint(other)?)
            };
            Some(OutcomeSpec::HealOverTime {
                name: text(bag, "hot_name"),
                amount,
                duration: uint(bag, "duration").unwrap_or(DEFAULT_EFFECT_DURATION),
            })
        }
    }
}

fn mug(value: &Value) -> Option<OutcomeSpec> {
    let base_damage = match value {
        Value::Object(inner) => uint(inner, "damage").unwrap_or(0),
        Value::Bool(true) => 0,
        other => as_uint(other)?,
    };
    Some(OutcomeSpec::Mug { base_damage })
}

fn modifiers(bag: &Map<String, Value>) -> Modifiers {
    let execute = bag.get("execute").and_then(Value::as_object).and_then(|inner| {
        Some(ExecuteBonus {
            threshold: number(inner, "threshold")?,
            multiplier: number(inner, "multiplier")?,
        })
    });

    let role_bonus = bag.get("bonus_vs").and_then(Value::as_object).and_then(|inner| {
        let roles: Vec<Role> = inner
            .get("roles")
            .and_then(Value::as_array)?
            .iter()
            .filter_map(Value::as_str)
            .filter_map(|r| r.parse().ok())
            .collect();
        if roles.is_empty() {
            return None;
        }
        Some(RoleBonus {
            roles,
            multiplier: number(inner, "multiplier")?,
        })
    });

    let siphon = uint(bag, "siphon")
        .map(Siphon::Flat)
        .or_else(|| number(bag, "siphon_pct").map(Siphon::Percent));

    Modifiers {
        execute,
        role_bonus,
        siphon,
    }
}

/// Stat keys: `<stat>_up`, `<stat>_down`, or a bare `<stat>` meaning up.
fn status_seed(bag: &Map<String, Value>) -> Option<StatusSeed> {
    let mut mods = StatModifiers::default();
    {
        let set = |stat: &str, up: &mut u32, down: &mut u32| {
            if let Some(v) = uint(bag, &format!("{stat}_up")).or_else(|| uint(bag, stat)) {
                *up = v;
            }
            if let Some(v) = uint(bag, &format!("{stat}_down")) {
                *down = v;
            }
        };
        set("attack_power", &mut mods.attack_power_up, &mut mods.attack_power_down);
        set("magic_power", &mut mods.magic_power_up, &mut mods.magic_power_down);
        set("defense", &mut mods.defense_up, &mut mods.defense_down);
        set("magic_defense", &mut mods.magic_defense_up, &mut mods.magic_defense_down);
        set("speed", &mut mods.speed_up, &mut mods.speed_down);
    }

    if mods.is_empty() {
        return None;
    }
    Some(StatusSeed {
        name: text(bag, "status_name"),
        duration: uint(bag, "status_duration")
            .or_else(|| uint(bag, "duration"))
            .unwrap_or(DEFAULT_EFFECT_DURATION),
        modifiers: mods,
    })
}

// ============================================================================
// Value helpers
// ============================================================================

fn as_uint(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64))
            .map(|n| n.min(u64::from(u32::MAX)) as u32),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn uint(bag: &Map<String, Value>, key: &str) -> Option<u32> {
    bag.get(key).and_then(as_uint)
}

fn number(bag: &Map<String, Value>, key: &str) -> Option<f64> {
    match bag.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn flag(bag: &Map<String, Value>, key: &str) -> bool {
    match bag.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => false,
    }
}

fn text(bag: &Map<String, Value>, key: &str) -> Option<String> {
    bag.get(key).and_then(Value::as_str).map(str::to_owned)
}
