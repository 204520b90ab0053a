use std::collections::{BTreeMap, HashMap};

use combat_content::TranceTemplate;
use combat_core::{AbilityId, BattleLog, BattleRecord, Cooldowns, PlayerId, StatBlock};

/// What the scheduler needs to know about a party member without a
/// repository round trip.
#[derive(Clone, Debug, PartialEq)]
pub struct RosterEntry {
    pub name: String,
    pub stats: StatBlock,
    pub alive: bool,
}

/// A player's active trance.
#[derive(Clone, Debug, PartialEq)]
pub struct TranceState {
    pub trance_id: u32,
    pub name: String,
    pub remaining: u32,
    pub max: u32,
    pub abilities: Vec<AbilityId>,
}

impl TranceState {
    pub fn enter(template: &TranceTemplate) -> Self {
        Self {
            trance_id: template.id,
            name: template.name.clone(),
            remaining: template.duration,
            max: template.duration,
            abilities: template.abilities.clone(),
        }
    }

    pub fn grants(&self, ability: AbilityId) -> bool {
        self.abilities.contains(&ability)
    }

    /// Spends one turn and returns what is left.
    pub fn count_down(&mut self) -> u32 {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining
    }
}

/// Mutable state of one session.
#[derive(Debug)]
pub struct SessionState {
    /// Join order. Turns advance through it, wrapping.
    pub players: Vec<PlayerId>,
    pub current: Option<PlayerId>,
    pub battle: Option<BattleRecord>,
    pub log: BattleLog,
    /// Player cooldowns outlive battles: out-of-battle casts count too.
    pub cooldowns: HashMap<PlayerId, Cooldowns>,
    pub roster: BTreeMap<PlayerId, RosterEntry>,
    /// Bumped on every battle start.
    pub epoch: u64,
    /// Set when the acting player fell and a living ally may take over.
    pub awaiting_pass: bool,
    /// Trances outlive battles and end only by counting down.
    pub trances: HashMap<PlayerId, TranceState>,
}

impl SessionState {
    pub fn new(players: Vec<PlayerId>, log_capacity: usize) -> Self {
        let current = players.first().copied();
        Self {
            players,
            current,
            battle: None,
            log: BattleLog::with_capacity(log_capacity),
            cooldowns: HashMap::new(),
            roster: BTreeMap::new(),
            epoch: 0,
            awaiting_pass: false,
            trances: HashMap::new(),
        }
    }

    pub fn in_battle(&self) -> bool {
        self.battle.is_some()
    }

    pub fn is_turn_of(&self, player: PlayerId) -> bool {
        self.current == Some(player)
    }

    pub fn cooldowns_mut(&mut self, player: PlayerId) -> &mut Cooldowns {
        self.cooldowns.entry(player).or_default()
    }

    pub fn cooldown_remaining(&self, player: PlayerId, ability: AbilityId) -> f64 {
        self.cooldowns
            .get(&player)
            .map_or(0.0, |cds| cds.remaining(ability))
    }

    /// Whether `player`'s active trance lends them `ability`.
    pub fn trance_grants(&self, player: PlayerId, ability: AbilityId) -> bool {
        self.trances
            .get(&player)
            .is_some_and(|trance| trance.grants(ability))
    }

    /// Adds a player at the end of the join order.
    pub fn join(&mut self, player: PlayerId) {
        if !self.players.contains(&player) {
            self.players.push(player);
        }
        if self.current.is_none() {
            self.current = Some(player);
        }
    }

    /// Players that the roster still counts as standing.
    pub fn living(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players
            .iter()
            .copied()
            .filter(|id| self.roster.get(id).is_some_and(|entry| entry.alive))
    }

    pub fn player_name(&self, player: PlayerId) -> String {
        self.roster
            .get(&player)
            .map_or_else(|| player.to_string(), |entry| entry.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trance_counts_down_to_zero_and_stays_there() {
        let template = TranceTemplate {
            id: 1,
            name: "Berserker Trance".into(),
            duration: 2,
            abilities: vec![AbilityId(6)],
        };
        let mut trance = TranceState::enter(&template);
        assert_eq!((trance.remaining, trance.max), (2, 2));
        assert!(trance.grants(AbilityId(6)));
        assert!(!trance.grants(AbilityId(7)));

        assert_eq!(trance.count_down(), 1);
        assert_eq!(trance.count_down(), 0);
        assert_eq!(trance.count_down(), 0);
    }

    #[test]
    fn trance_abilities_belong_to_their_holder() {
        let template = TranceTemplate {
            id: 1,
            name: "Berserker Trance".into(),
            duration: 3,
            abilities: vec![AbilityId(6)],
        };
        let mut state = SessionState::new(vec![PlayerId(1), PlayerId(2)], 10);
        state
            .trances
            .insert(PlayerId(1), TranceState::enter(&template));
        assert!(state.trance_grants(PlayerId(1), AbilityId(6)));
        assert!(!state.trance_grants(PlayerId(2), AbilityId(6)));
    }
}
