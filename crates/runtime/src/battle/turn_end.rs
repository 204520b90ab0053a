use combat_core::Rejection;
use combat_core::battle::next_living;

use super::BattleOrchestrator;
use crate::api::Result;
use crate::session::{SessionId, SessionState};

impl BattleOrchestrator {
    /// Turn-end bookkeeping: world ticks outside battle and the outgoing
    /// player's trance countdown, then the turn moves to the next living
    /// player in join order and the view is rendered.
    ///
    /// In battle the player effect list follows the turn: the outgoing
    /// owner's list is persisted and the incoming player's is loaded.
    /// Returns [`Rejection::NoLivingAlly`] when nobody is left standing.
    pub(super) async fn turn_end(
        &self,
        session: SessionId,
        state: &mut SessionState,
    ) -> Result<Option<Rejection>> {
        let outgoing = state.current;
        if !state.in_battle()
            && let Some(player) = outgoing
        {
            self.status.tick_world(session, player, &mut state.log).await?;
        }

        self.refresh_roster(session, state).await?;
        if let Some(player) = outgoing {
            self.count_down_trance(state, player);
        }
        let Some(next) = next_living(&state.players, outgoing, |id| {
            state.roster.get(&id).is_some_and(|entry| entry.alive)
        }) else {
            tracing::info!(target: "combat::orchestrator", session = %session, "no living ally");
            return Ok(Some(Rejection::NoLivingAlly));
        };

        if let Some(battle) = state.battle.as_mut()
            && battle.effects_owner != next
        {
            self.players
                .save_effects(session, battle.effects_owner, &battle.player_effects)
                .await?;
            let mut incoming = self
                .players
                .fetch(session, next)
                .await?
                .map(|record| record.effects)
                .unwrap_or_default();
            incoming.merge_metadata(self.reference.status_catalog().as_ref());
            battle.player_effects = incoming;
            battle.effects_owner = next;
        }

        state.current = Some(next);
        state.awaiting_pass = false;
        if outgoing != Some(next) && !state.in_battle() {
            self.status.tick_world(session, next, &mut state.log).await?;
        }

        tracing::debug!(
            target: "combat::orchestrator",
            session = %session,
            player = %next,
            "turn passed"
        );
        self.render(session, state).await?;
        Ok(None)
    }
}
