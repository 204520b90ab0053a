use crate::status::StatusEffects;

/// Side granted a bonus action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpeedEdge {
    Player,
    Enemy,
}

/// Effective speeds and effect lists of both sides at a decision point.
#[derive(Clone, Copy, Debug)]
pub struct SpeedContext<'a> {
    pub player_speed: i32,
    pub enemy_speed: i32,
    pub player_effects: &'a StatusEffects,
    pub enemy_effects: &'a StatusEffects,
}

/// Grants at most one bonus action per enemy cycle.
///
/// Only `actor`, the side that just acted, may earn the bonus. It qualifies
/// when its effective speed leads by at least `threshold` and a speed effect
/// is working in its favour (its own speed-up or the other side's
/// speed-down). Granting sets `bonus_used`; the caller clears it when the
/// enemy finishes an action.
pub fn check_speed_advantage(
    ctx: SpeedContext<'_>,
    actor: SpeedEdge,
    threshold: i32,
    bonus_used: &mut bool,
) -> Option<SpeedEdge> {
    if *bonus_used {
        return None;
    }

    let (own, other, own_effects, other_effects) = match actor {
        SpeedEdge::Player => (
            ctx.player_speed,
            ctx.enemy_speed,
            ctx.player_effects,
            ctx.enemy_effects,
        ),
        SpeedEdge::Enemy => (
            ctx.enemy_speed,
            ctx.player_speed,
            ctx.enemy_effects,
            ctx.player_effects,
        ),
    };
    let favoured = own_effects.any_speed_up() || other_effects.any_speed_down();
    if own < other.saturating_add(threshold) || !favoured {
        return None;
    }

    *bonus_used = true;
    Some(actor)
}
