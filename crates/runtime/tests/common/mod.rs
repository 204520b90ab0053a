#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use combat_content::{
    AbilityBook, ClassTemplate, EnemyAbilityLink, EnemyTemplate, StatusTable, TranceTemplate,
};
use combat_core::{
    AbilityDescriptor, AbilityId, CombatConfig, EffectDescriptor, EnemyId, OutcomeSpec,
    Participant, PlayerId, Pool, Rejection, ResistanceProfile, Rewards, RngOracle, Role,
    StatBlock, StatusEffect, StatusEffects, StatusLink, TargetClass,
};
use combat_runtime::{
    BattlePresenter, BattleView, FieldView, InMemoryPlayerRepo, InMemoryReferenceRepo,
    PlayerRecord, PresenterError, Runtime, RuntimeConfig, SessionId, TerminalView,
};

pub const ASH: PlayerId = PlayerId(1);
pub const BRIE: PlayerId = PlayerId(2);

pub const FIRE: AbilityId = AbilityId(2);
pub const CURE: AbilityId = AbilityId(3);
pub const QUAKE: AbilityId = AbilityId(4);
/// Silences the enemy. Not in the warrior's list.
pub const HUSH: AbilityId = AbilityId(5);
/// Lent by the warrior's trance.
pub const RAGE: AbilityId = AbilityId(6);

pub const GOBLIN: EnemyId = EnemyId(1);
pub const OGRE: EnemyId = EnemyId(2);
pub const SLIME: EnemyId = EnemyId(3);
/// Fast enough to outpace a slowed warrior.
pub const WOLF: EnemyId = EnemyId(4);
/// Casts Fire when it can.
pub const WARLOCK: EnemyId = EnemyId(5);

/// Oracle that always returns the same value: every roll hits and weighted
/// picks take the first candidate.
pub struct Fixed(pub u32);

impl RngOracle for Fixed {
    fn next_u32(&self, _seed: u64) -> u32 {
        self.0
    }
}

#[derive(Default)]
pub struct RecordingPresenter {
    battles: Mutex<Vec<BattleView>>,
    fields: Mutex<Vec<FieldView>>,
    terminals: Mutex<Vec<TerminalView>>,
    rejections: Mutex<Vec<(Option<PlayerId>, Rejection)>>,
}

impl RecordingPresenter {
    pub fn last_battle(&self) -> Option<BattleView> {
        self.battles.lock().unwrap().last().cloned()
    }

    pub fn last_field(&self) -> Option<FieldView> {
        self.fields.lock().unwrap().last().cloned()
    }

    pub fn last_terminal(&self) -> Option<TerminalView> {
        self.terminals.lock().unwrap().last().cloned()
    }

    pub fn rejections(&self) -> Vec<(Option<PlayerId>, Rejection)> {
        self.rejections.lock().unwrap().clone()
    }
}

#[async_trait]
impl BattlePresenter for RecordingPresenter {
    async fn render_battle(
        &self,
        _session: SessionId,
        view: &BattleView,
    ) -> Result<(), PresenterError> {
        self.battles.lock().unwrap().push(view.clone());
        Ok(())
    }

    async fn render_field(&self, _session: SessionId, view: &FieldView) -> Result<(), PresenterError> {
        self.fields.lock().unwrap().push(view.clone());
        Ok(())
    }

    async fn render_terminal(
        &self,
        _session: SessionId,
        view: &TerminalView,
    ) -> Result<(), PresenterError> {
        self.terminals.lock().unwrap().push(view.clone());
        Ok(())
    }

    async fn reject(
        &self,
        _session: SessionId,
        player: Option<PlayerId>,
        rejection: &Rejection,
    ) -> Result<(), PresenterError> {
        self.rejections
            .lock()
            .unwrap()
            .push((player, rejection.clone()));
        Ok(())
    }
}

pub fn warrior() -> ClassTemplate {
    ClassTemplate {
        id: 1,
        name: "Warrior".into(),
        hp: 60,
        resource: 20,
        stats: StatBlock {
            attack_power: 10,
            accuracy: 100,
            speed: 10,
            ..Default::default()
        },
        base_speed: 10,
        abilities: vec![FIRE, CURE, QUAKE],
        trance: Some(TranceTemplate {
            id: 1,
            name: "Berserker Trance".into(),
            duration: 2,
            abilities: vec![RAGE],
        }),
    }
}

pub fn abilities() -> AbilityBook {
    AbilityBook::from_descriptors([
        AbilityDescriptor::new(FIRE, "Fire")
            .with_effect(EffectDescriptor::with(OutcomeSpec::FlatDamage { amount: 15 }))
            .with_cooldown(2),
        {
            let mut cure = AbilityDescriptor::new(CURE, "Cure")
                .with_effect(EffectDescriptor::with(OutcomeSpec::FlatHeal { amount: 20 }))
                .with_target(TargetClass::SelfOnly)
                .with_cooldown(1);
            cure.resource_cost = 5;
            cure
        },
        {
            let mut quake = AbilityDescriptor::new(QUAKE, "Quake")
                .with_effect(EffectDescriptor::with(OutcomeSpec::FlatDamage { amount: 100 }));
            quake.resource_cost = 50;
            quake
        },
        {
            let mut hush = AbilityDescriptor::new(HUSH, "Hush")
                .with_effect(EffectDescriptor::with(OutcomeSpec::StatusOnly));
            hush.linked_statuses.push(StatusLink {
                name: "Silence".into(),
                duration: 3,
            });
            hush
        },
        AbilityDescriptor::new(RAGE, "Rage")
            .with_effect(EffectDescriptor::with(OutcomeSpec::FlatDamage { amount: 30 }))
            .with_cooldown(1),
    ])
}

fn enemy(id: EnemyId, name: &str, hp: u32, attack_power: i32, speed: i32) -> EnemyTemplate {
    EnemyTemplate {
        id,
        name: name.into(),
        role: Role::Normal,
        hp,
        stats: StatBlock {
            attack_power,
            accuracy: 100,
            speed,
            ..Default::default()
        },
        resistances: ResistanceProfile::new(),
        abilities: Vec::new(),
        rewards: Rewards {
            experience: 10,
            currency: 7,
            loot: Some("Potion".into()),
        },
        currency: 20,
    }
}

pub fn enemies() -> Vec<EnemyTemplate> {
    vec![
        enemy(GOBLIN, "Goblin", 40, 5, 5),
        enemy(OGRE, "Ogre", 500, 100, 5),
        enemy(SLIME, "Slime", 10, 1, 1),
        enemy(WOLF, "Wolf", 100, 5, 20),
        {
            let mut warlock = enemy(WARLOCK, "Warlock", 100, 5, 5);
            warlock.abilities = vec![EnemyAbilityLink {
                ability: FIRE,
                weight: 1,
                heal: None,
                accuracy: None,
            }];
            warlock
        },
    ]
}

pub struct Harness {
    pub runtime: Runtime,
    pub players: Arc<InMemoryPlayerRepo>,
    pub presenter: Arc<RecordingPresenter>,
    pub session: SessionId,
}

impl Harness {
    pub async fn record(&self, player: PlayerId) -> PlayerRecord {
        use combat_runtime::PlayerRepository;
        self.players
            .fetch(self.session, player)
            .await
            .unwrap()
            .expect("player enrolled")
    }

    /// Re-enrolls `player` carrying `effects`. Call before the battle starts.
    pub async fn afflict(&self, player: PlayerId, effects: Vec<StatusEffect>) {
        let record = PlayerRecord {
            effects: StatusEffects::from_vec(effects),
            ..self.record(player).await
        };
        self.players.enroll(self.session, record).unwrap();
    }

    /// Teaches `player` an extra ability.
    pub async fn teach(&self, player: PlayerId, ability: AbilityId) {
        let mut record = self.record(player).await;
        record.abilities.push(ability);
        self.players.enroll(self.session, record).unwrap();
    }

    /// Every line the session log still holds, oldest first.
    pub async fn log(&self) -> Vec<String> {
        let handle = self.runtime.sessions().get(self.session).unwrap();
        let state = handle.lock().await;
        state.log.recent(usize::MAX)
    }

    /// Lets the paused clock run until `player`'s gauge is full.
    pub async fn until_ready(&self, player: PlayerId) {
        let handle = self.runtime.sessions().get(self.session).unwrap();
        for _ in 0..80 {
            {
                let state = handle.lock().await;
                let battle = state.battle.as_ref().expect("battle in progress");
                if battle.gauges.is_ready(Participant::Player(player)) {
                    return;
                }
            }
            tokio::time::sleep(Duration::from_millis(250)).await;
        }
        panic!("{player}'s gauge never filled");
    }
}

/// A runtime over in-memory content with one session holding `party`.
///
/// Gauges tick once a second. Tests run on a paused clock and wait with
/// [`Harness::until_ready`] before acting in battle.
pub fn harness(party: &[(PlayerId, &str)]) -> Harness {
    harness_with(party, CombatConfig::default())
}

pub fn harness_with(party: &[(PlayerId, &str)], combat: CombatConfig) -> Harness {
    harness_for(party, combat, warrior())
}

/// Like [`harness`], with every party member of `class`.
pub fn harness_for(party: &[(PlayerId, &str)], combat: CombatConfig, class: ClassTemplate) -> Harness {
    let players = Arc::new(InMemoryPlayerRepo::new(std::slice::from_ref(&class)));
    let reference = Arc::new(InMemoryReferenceRepo::new(
        abilities(),
        enemies(),
        StatusTable::default(),
    ));
    let presenter = Arc::new(RecordingPresenter::default());

    let runtime = Runtime::builder()
        .config(RuntimeConfig {
            combat,
            battle_seed: Some(7),
            ..RuntimeConfig::default()
        })
        .players(players.clone())
        .reference(reference)
        .presenter(presenter.clone())
        .rng(Arc::new(Fixed(0)))
        .build()
        .unwrap();

    let ids = party.iter().map(|(id, _)| *id).collect();
    let session = runtime.open_session("test-session", ids).id();
    for (id, name) in party {
        players
            .enroll(session, PlayerRecord::from_class(*id, *name, &class))
            .unwrap();
    }

    Harness {
        runtime,
        players,
        presenter,
        session,
    }
}

pub fn wounded(hp: u32, max: u32) -> Pool {
    Pool::new(hp, max)
}
