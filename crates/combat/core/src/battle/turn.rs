use crate::combatant::PlayerId;

/// Next living player after `current` in join order, wrapping.
///
/// With no `current` (or one not in `order`) the first living player is
/// chosen. A lone survivor advances to itself. Returns `None` when nobody is
/// alive.
pub fn next_living<F>(order: &[PlayerId], current: Option<PlayerId>, is_alive: F) -> Option<PlayerId>
where
    F: Fn(PlayerId) -> bool,
{
    let start = current.and_then(|c| order.iter().position(|id| *id == c));

    match start {
        Some(pos) => (1..=order.len())
            .map(|step| order[(pos + step) % order.len()])
            .find(|id| is_alive(*id)),
        None => order.iter().copied().find(|id| is_alive(*id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: PlayerId = PlayerId(1);
    const B: PlayerId = PlayerId(2);
    const C: PlayerId = PlayerId(3);

    #[test]
    fn advances_in_join_order() {
        assert_eq!(next_living(&[A, B], Some(A), |_| true), Some(B));
        assert_eq!(next_living(&[A, B], Some(B), |_| true), Some(A));
    }

    #[test]
    fn skips_fainted_players_and_wraps() {
        assert_eq!(next_living(&[A, B], Some(A), |id| id != B), Some(A));
        assert_eq!(next_living(&[A, B, C], Some(A), |id| id != B), Some(C));
        assert_eq!(next_living(&[A, B, C], Some(C), |id| id != A), Some(B));
    }

    #[test]
    fn fainted_current_hands_to_next_after_it() {
        assert_eq!(next_living(&[A, B, C], Some(B), |id| id != B), Some(C));
    }

    #[test]
    fn unknown_or_missing_current_starts_from_the_top() {
        assert_eq!(next_living(&[A, B], None, |_| true), Some(A));
        assert_eq!(next_living(&[A, B], Some(PlayerId(9)), |id| id == B), Some(B));
        assert_eq!(next_living(&[A, B], Some(A), |_| false), None);
        assert_eq!(next_living(&[], None, |_| true), None);
    }
}
