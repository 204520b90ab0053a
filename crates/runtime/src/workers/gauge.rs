//! ATB gauge scheduler.
//!
//! Each active battle gets two tasks. The ticker wakes on a fixed cadence,
//! advances every gauge under the session lock and queues what happened. The
//! dispatcher drains that queue into a [`GaugeListener`] without holding the
//! lock, so a listener is free to lock the session itself.
//!
//! A `watch` flag cancels both tasks. Stopping never aborts a task: a
//! listener may stop its own scheduler from inside a callback.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use combat_core::{CombatConfig, Participant, PlayerId};
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, MissedTickBehavior};

use crate::session::{Session, SessionId, SessionState};

/// Receiver of scheduler signals.
///
/// `epoch` identifies the battle the signal was produced for; a listener
/// should ignore signals whose epoch no longer matches the session's battle.
#[async_trait]
pub trait GaugeListener: Send + Sync {
    async fn on_participant_ready(&self, session: SessionId, epoch: u64, player: PlayerId);

    async fn on_enemy_ready(&self, session: SessionId, epoch: u64);

    /// Gauge readings moved enough to be worth redrawing.
    async fn on_tick(&self, session: SessionId, epoch: u64);
}

/// Scheduler cadence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GaugeSettings {
    pub tick: Duration,
    /// Longest a redraw may be withheld when no displayed reading changed.
    pub view_refresh: Duration,
    /// Seconds of gauge fill credited per tick.
    pub interval_secs: f64,
    /// Queue depth between ticker and dispatcher.
    pub buffer: usize,
}

impl GaugeSettings {
    pub fn from_config(config: &CombatConfig, buffer: usize) -> Self {
        Self {
            tick: Duration::from_millis(config.gauge_tick_ms.max(1)),
            view_refresh: Duration::from_millis(config.view_refresh_ms),
            interval_secs: config.gauge_interval_secs(),
            buffer: buffer.max(1),
        }
    }
}

impl Default for GaugeSettings {
    fn default() -> Self {
        Self::from_config(&CombatConfig::default(), 32)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Signal {
    Ready(Participant),
    Refresh,
}

struct GaugeTask {
    generation: u64,
    epoch: u64,
    cancel: watch::Sender<bool>,
}

type TaskMap = Arc<Mutex<HashMap<SessionId, GaugeTask>>>;

/// Supervises at most one gauge task per session.
#[derive(Clone)]
pub struct GaugeScheduler {
    settings: GaugeSettings,
    tasks: TaskMap,
    generation: Arc<AtomicU64>,
}

impl GaugeScheduler {
    pub fn new(settings: GaugeSettings) -> Self {
        Self {
            settings,
            tasks: Arc::new(Mutex::new(HashMap::new())),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn settings(&self) -> &GaugeSettings {
        &self.settings
    }

    /// Starts ticking `session`'s battle `epoch`, replacing any running task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self, session: Arc<Session>, epoch: u64, listener: Arc<dyn GaugeListener>) {
        let id = session.id();
        self.stop(id);

        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let (cancel, ticker_cancel) = watch::channel(false);
        let dispatcher_cancel = cancel.subscribe();
        let (tx, rx) = mpsc::channel(self.settings.buffer);

        self.lock_tasks().insert(
            id,
            GaugeTask {
                generation,
                epoch,
                cancel,
            },
        );

        let ticker = Ticker {
            session,
            epoch,
            generation,
            settings: self.settings,
            tasks: Arc::clone(&self.tasks),
            tx,
            cancel: ticker_cancel,
        };
        tokio::spawn(ticker.run());
        tokio::spawn(dispatch(id, epoch, listener, rx, dispatcher_cancel));

        tracing::debug!(target: "combat::gauge", session = %id, epoch, "gauge scheduler started");
    }

    /// Cancels `session`'s task. Safe to call any number of times; returns
    /// whether a task was running.
    pub fn stop(&self, session: SessionId) -> bool {
        let Some(task) = self.lock_tasks().remove(&session) else {
            return false;
        };
        task.cancel.send_replace(true);
        tracing::debug!(
            target: "combat::gauge",
            session = %session,
            epoch = task.epoch,
            "gauge scheduler stopped"
        );
        true
    }

    /// Cancels every task. Returns how many were running.
    pub fn stop_all(&self) -> usize {
        let drained: Vec<GaugeTask> = self.lock_tasks().drain().map(|(_, task)| task).collect();
        for task in &drained {
            task.cancel.send_replace(true);
        }
        drained.len()
    }

    pub fn is_running(&self, session: SessionId) -> bool {
        self.lock_tasks().contains_key(&session)
    }

    /// Battle epoch the running task ticks, if any.
    pub fn running_epoch(&self, session: SessionId) -> Option<u64> {
        self.lock_tasks().get(&session).map(|task| task.epoch)
    }

    fn lock_tasks(&self) -> MutexGuard<'_, HashMap<SessionId, GaugeTask>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for GaugeScheduler {
    fn default() -> Self {
        Self::new(GaugeSettings::default())
    }
}

/// Result of one tick under the session lock.
struct Step {
    ready: Vec<Participant>,
    levels: Vec<u32>,
}

struct Ticker {
    session: Arc<Session>,
    epoch: u64,
    generation: u64,
    settings: GaugeSettings,
    tasks: TaskMap,
    tx: mpsc::Sender<Signal>,
    cancel: watch::Receiver<bool>,
}

impl Ticker {
    async fn run(mut self) {
        let id = self.session.id();
        let mut interval =
            tokio::time::interval_at(Instant::now() + self.settings.tick, self.settings.tick);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut last_levels: Vec<u32> = Vec::new();
        let mut last_refresh = Instant::now();

        loop {
            tokio::select! {
                biased;
                _ = self.cancel.changed() => break,
                _ = interval.tick() => {}
            }

            let step = {
                let mut state = self.session.lock().await;
                // Stopped while waiting for the lock.
                if *self.cancel.borrow() {
                    break;
                }
                advance(&mut state, self.epoch, self.settings.interval_secs)
            };

            let Some(step) = step else {
                tracing::debug!(
                    target: "combat::gauge",
                    session = %id,
                    epoch = self.epoch,
                    "battle cleared, gauge scheduler exiting"
                );
                self.forget(id);
                break;
            };

            let mut signals: Vec<Signal> = step.ready.into_iter().map(Signal::Ready).collect();
            let now = Instant::now();
            if step.levels != last_levels
                || now.duration_since(last_refresh) >= self.settings.view_refresh
            {
                last_levels = step.levels;
                last_refresh = now;
                signals.push(Signal::Refresh);
            }

            for signal in signals {
                if self.tx.send(signal).await.is_err() {
                    return;
                }
            }
        }
    }

    /// Drops this task's own entry. A newer task for the same session is
    /// left alone.
    fn forget(&self, id: SessionId) {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        if tasks
            .get(&id)
            .is_some_and(|task| task.generation == self.generation)
            && let Some(task) = tasks.remove(&id)
        {
            task.cancel.send_replace(true);
        }
    }
}

/// One scheduler tick for `epoch`. `None` once that battle is gone.
fn advance(state: &mut SessionState, epoch: u64, interval_secs: f64) -> Option<Step> {
    let SessionState { battle, roster, .. } = state;
    let record = battle.as_mut().filter(|record| record.epoch == epoch)?;

    let living: Vec<(PlayerId, i32)> = roster
        .iter()
        .filter(|(_, entry)| entry.alive)
        .map(|(id, entry)| {
            let stats = if *id == record.effects_owner {
                record.player_stats(&entry.stats)
            } else {
                entry.stats
            };
            (*id, stats.speed)
        })
        .collect();
    let enemy_speed = record
        .enemy
        .is_alive()
        .then(|| record.enemy_stats().speed);

    let ready = record.gauges.advance(&living, enemy_speed, interval_secs);
    Some(Step {
        ready,
        levels: record.gauges.display_levels(),
    })
}

async fn dispatch(
    id: SessionId,
    epoch: u64,
    listener: Arc<dyn GaugeListener>,
    mut rx: mpsc::Receiver<Signal>,
    mut cancel: watch::Receiver<bool>,
) {
    loop {
        let signal = tokio::select! {
            biased;
            _ = cancel.changed() => break,
            signal = rx.recv() => match signal {
                Some(signal) => signal,
                None => break,
            },
        };
        if *cancel.borrow() {
            break;
        }

        match signal {
            Signal::Ready(Participant::Player(player)) => {
                listener.on_participant_ready(id, epoch, player).await
            }
            Signal::Ready(Participant::Enemy) => listener.on_enemy_ready(id, epoch).await,
            Signal::Refresh => listener.on_tick(id, epoch).await,
        }
    }
}
