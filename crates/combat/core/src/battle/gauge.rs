//! ATB gauge arithmetic.
//!
//! The scheduler owns the cadence; this module owns the numbers. One call to
//! [`GaugeBoard::advance`] is one scheduler tick: every living participant's
//! gauge is incremented first, then the ready list is built in join order
//! with the enemy last.

use crate::combatant::PlayerId;

/// A participant on the gauge board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Participant {
    Player(PlayerId),
    Enemy,
}

/// One readiness gauge.
///
/// Reaching `max` fires once, resets the value to zero and latches `ready`.
/// A ready gauge does not fill again until [`Gauge::reset`] clears the latch,
/// which happens when the participant acts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gauge {
    value: f64,
    max: f64,
    ready: bool,
}

impl Gauge {
    pub fn new(max: f64) -> Self {
        Self {
            value: 0.0,
            max: if max > 0.0 { max } else { 1.0 },
            ready: false,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Fill ratio in `[0, 1]`; a latched gauge reads full.
    pub fn fraction(&self) -> f64 {
        if self.ready {
            1.0
        } else {
            (self.value / self.max).clamp(0.0, 1.0)
        }
    }

    /// Adds `amount`. Returns `true` on the tick the gauge crosses `max`.
    fn fill(&mut self, amount: f64) -> bool {
        if self.ready {
            return false;
        }
        self.value += amount.max(0.0);
        if self.value >= self.max {
            self.value = 0.0;
            self.ready = true;
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.value = 0.0;
        self.ready = false;
    }
}

/// Gauges for every player in join order plus the enemy.
#[derive(Clone, Debug, PartialEq)]
pub struct GaugeBoard {
    players: Vec<(PlayerId, Gauge)>,
    enemy: Gauge,
}

impl GaugeBoard {
    pub fn new(players: &[PlayerId], player_max: f64, enemy_max: f64) -> Self {
        Self {
            players: players.iter().map(|id| (*id, Gauge::new(player_max))).collect(),
            enemy: Gauge::new(enemy_max),
        }
    }

    /// Overrides one player's gauge maximum.
    pub fn set_player_max(&mut self, player: PlayerId, max: f64) {
        if let Some((_, gauge)) = self.players.iter_mut().find(|(id, _)| *id == player) {
            *gauge = Gauge::new(max);
        }
    }

    /// Adds a late joiner at the end of the join order.
    pub fn ensure_player(&mut self, player: PlayerId, max: f64) {
        if !self.players.iter().any(|(id, _)| *id == player) {
            self.players.push((player, Gauge::new(max)));
        }
    }

    /// One tick.
    ///
    /// `living` holds `(player, effective_speed)` for players still standing;
    /// players not listed do not fill. `enemy_speed` is `None` once the enemy
    /// is down. Returns participants that became ready this tick, players in
    /// join order followed by the enemy.
    pub fn advance(
        &mut self,
        living: &[(PlayerId, i32)],
        enemy_speed: Option<i32>,
        interval_secs: f64,
    ) -> Vec<Participant> {
        let mut crossed = Vec::new();

        for (id, gauge) in &mut self.players {
            let Some((_, speed)) = living.iter().find(|(pid, _)| pid == id) else {
                continue;
            };
            if gauge.fill(f64::from((*speed).max(0)) * interval_secs) {
                crossed.push(Participant::Player(*id));
            }
        }
        if let Some(speed) = enemy_speed {
            if self.enemy.fill(f64::from(speed.max(0)) * interval_secs) {
                crossed.push(Participant::Enemy);
            }
        }

        crossed
    }

    pub fn reset(&mut self, participant: Participant) {
        if let Some(gauge) = self.gauge_mut(participant) {
            gauge.reset();
        }
    }

    pub fn gauge(&self, participant: Participant) -> Option<&Gauge> {
        match participant {
            Participant::Enemy => Some(&self.enemy),
            Participant::Player(pid) => self
                .players
                .iter()
                .find(|(id, _)| *id == pid)
                .map(|(_, g)| g),
        }
    }

    fn gauge_mut(&mut self, participant: Participant) -> Option<&mut Gauge> {
        match participant {
            Participant::Enemy => Some(&mut self.enemy),
            Participant::Player(pid) => self
                .players
                .iter_mut()
                .find(|(id, _)| *id == pid)
                .map(|(_, g)| g),
        }
    }

    pub fn is_ready(&self, participant: Participant) -> bool {
        self.gauge(participant).is_some_and(Gauge::is_ready)
    }

    /// Whole-unit gauge readings, used to decide whether a redraw is due.
    pub fn display_levels(&self) -> Vec<u32> {
        self.players
            .iter()
            .map(|(_, g)| g)
            .chain(std::iter::once(&self.enemy))
            .map(|g| if g.ready { g.max as u32 } else { g.value as u32 })
            .collect()
    }

    pub fn players(&self) -> impl Iterator<Item = (PlayerId, &Gauge)> {
        self.players.iter().map(|(id, g)| (*id, g))
    }
}
