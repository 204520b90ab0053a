//! Class trances: entering one and counting it down.

use combat_core::{PlayerId, Rejection};

use super::{ActionOutcome, BattleOrchestrator};
use crate::api::Result;
use crate::session::{SessionId, SessionState, TranceState};

impl BattleOrchestrator {
    /// Puts `player` into their class trance, in or out of battle.
    ///
    /// The trance lasts its template duration in the holder's turns and lends
    /// its abilities for that long. Entering again while active restarts it.
    /// Returns [`ActionOutcome::Refreshed`] once the view is redrawn.
    pub async fn activate_trance(
        &self,
        session: SessionId,
        player: PlayerId,
    ) -> Result<ActionOutcome> {
        let Some(handle) = self.session(session) else {
            return self
                .reject(session, Some(player), Rejection::SessionNotFound)
                .await;
        };
        let mut state = handle.lock().await;

        let Some(record) = self.players.fetch(session, player).await? else {
            return self
                .reject(session, Some(player), Rejection::PlayerNotFound { player })
                .await;
        };
        if !record.is_alive() {
            return self
                .reject(session, Some(player), Rejection::ActorDefeated { player })
                .await;
        }
        let Some(template) = self.players.trance(session, player).await? else {
            return self
                .reject(session, Some(player), Rejection::NoTrance { player })
                .await;
        };

        let trance = TranceState::enter(&template);
        state
            .log
            .push(format!("✨ {} has entered {}!", record.name, trance.name));
        tracing::info!(
            target: "combat::orchestrator",
            session = %session,
            player = %player,
            trance = %trance.name,
            turns = trance.remaining,
            "trance entered"
        );
        state.trances.insert(player, trance);

        self.render(session, &state).await?;
        Ok(ActionOutcome::Refreshed)
    }

    /// Spends one turn of `player`'s trance at the end of their turn.
    pub(super) fn count_down_trance(&self, state: &mut SessionState, player: PlayerId) {
        let name = state.player_name(player);
        let Some(trance) = state.trances.get_mut(&player) else {
            return;
        };
        let remaining = trance.count_down();
        if remaining > 0 {
            let line = format!(
                "✨ {name}'s {} has {remaining} turn(s) remaining.",
                trance.name
            );
            state.log.push(line);
            return;
        }

        let line = format!("✨ {name}'s {} has ended.", trance.name);
        state.trances.remove(&player);
        state.log.push(line);
        tracing::debug!(target: "combat::orchestrator", player = %player, "trance ended");
    }
}
