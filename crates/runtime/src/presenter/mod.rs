//! Presentation contract.
//!
//! The orchestrator builds plain view structs and hands them to a
//! [`BattlePresenter`]. Rendering backends (chat embeds, terminals, test
//! recorders) live outside this crate.

mod view;

use async_trait::async_trait;
use combat_core::{PlayerId, Rejection};

pub use view::{
    ActionButton, BattleView, EffectBadge, FieldView, GaugeReading, PlayerPanel, TerminalView,
    TranceView,
};

use crate::api::PresenterError;
use crate::session::SessionId;

#[async_trait]
pub trait BattlePresenter: Send + Sync {
    async fn render_battle(
        &self,
        session: SessionId,
        view: &BattleView,
    ) -> Result<(), PresenterError>;

    /// Out-of-battle state of the acting player.
    async fn render_field(&self, session: SessionId, view: &FieldView) -> Result<(), PresenterError>;

    async fn render_terminal(
        &self,
        session: SessionId,
        view: &TerminalView,
    ) -> Result<(), PresenterError>;

    /// Tells `player` (or the whole session) why a request was refused.
    async fn reject(
        &self,
        session: SessionId,
        player: Option<PlayerId>,
        rejection: &Rejection,
    ) -> Result<(), PresenterError>;
}
