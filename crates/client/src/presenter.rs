//! Console rendering of battle views.

use async_trait::async_trait;
use combat_core::{PlayerId, Pool, Rejection};
use combat_runtime::{
    BattlePresenter, BattleView, FieldView, PresenterError, SessionId, TerminalView,
};
use serde::Serialize;

/// Prints every view to stdout, either as text or as JSON lines.
pub struct ConsolePresenter {
    json: bool,
}

impl ConsolePresenter {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    fn emit<T: Serialize>(
        &self,
        kind: &str,
        view: &T,
        text: impl FnOnce() -> String,
    ) -> Result<(), PresenterError> {
        if self.json {
            let line =
                serde_json::to_string(view).map_err(|e| PresenterError::new(e.to_string()))?;
            println!("{{\"{kind}\":{line}}}");
        } else {
            println!("{}", text());
        }
        Ok(())
    }
}

fn meter(pool: &Pool) -> String {
    format!("{}/{}", pool.current(), pool.max())
}

fn bar(fraction: f64) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * 10.0).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(10 - filled))
}

#[async_trait]
impl BattlePresenter for ConsolePresenter {
    async fn render_battle(
        &self,
        session: SessionId,
        view: &BattleView,
    ) -> Result<(), PresenterError> {
        self.emit("battle", view, || {
            let mut out = format!("== {session} | {} {} ==\n", view.enemy_name, meter(&view.enemy_hp));
            if let Some(player) = &view.player {
                out.push_str(&format!(
                    "{}: HP {} MP {}\n",
                    player.name,
                    meter(&player.hp),
                    meter(&player.resource)
                ));
            }
            if let Some(trance) = &view.trance {
                out.push_str(&format!(
                    "  {} ({}/{} turns)\n",
                    trance.name, trance.remaining, trance.max
                ));
            }
            for gauge in &view.gauges {
                out.push_str(&format!("  {:<14} {}\n", gauge.name, bar(gauge.fraction)));
            }
            if view.ready {
                out.push_str("  * ready to act\n");
            }
            for line in &view.log {
                out.push_str(&format!("  > {line}\n"));
            }
            out
        })
    }

    async fn render_field(
        &self,
        session: SessionId,
        view: &FieldView,
    ) -> Result<(), PresenterError> {
        self.emit("field", view, || {
            format!(
                "== {session} | {} HP {} ==",
                view.player.name,
                meter(&view.player.hp)
            )
        })
    }

    async fn render_terminal(
        &self,
        session: SessionId,
        view: &TerminalView,
    ) -> Result<(), PresenterError> {
        self.emit("terminal", view, || match view {
            TerminalView::Victory { enemy, log, .. } => {
                format!("== {session} | {enemy} defeated ==\n  > {}", log.join("\n  > "))
            }
            TerminalView::Defeat { log } => {
                format!("== {session} | party wiped ==\n  > {}", log.join("\n  > "))
            }
        })
    }

    async fn reject(
        &self,
        session: SessionId,
        player: Option<PlayerId>,
        rejection: &Rejection,
    ) -> Result<(), PresenterError> {
        tracing::warn!(session = %session, player = ?player, "{rejection}");
        Ok(())
    }
}
