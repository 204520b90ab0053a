mod common;

use std::time::Duration;

use combat_content::ClassTemplate;
use combat_core::{
    AbilityId, CombatConfig, EffectSide, EnemyId, Participant, Pool, Rejection, Rewards, StatModifiers,
    StatusEffect, TargetClass,
};
use combat_runtime::{
    ActionOutcome, BattleEnd, BattleEvent, Event, GaugeEvent, PlayerAction, PlayerRecord,
    TerminalView, Topic,
};
use tokio::sync::broadcast::error::TryRecvError;

use common::*;

fn rejected_with(outcome: &ActionOutcome) -> &Rejection {
    match outcome {
        ActionOutcome::Rejected(rejection) => rejection,
        other => panic!("expected a rejection, got {other:?}"),
    }
}

fn count(log: &[String], line: &str) -> usize {
    log.iter().filter(|entry| *entry == line).count()
}

#[tokio::test(start_paused = true)]
async fn start_battle_renders_the_encounter_and_starts_gauges() {
    let h = harness(&[(ASH, "Ash")]);
    let orchestrator = h.runtime.orchestrator();
    let mut battle_events = h.runtime.subscribe(Topic::Battle);

    let outcome = orchestrator.start_battle(h.session, ASH, GOBLIN).await.unwrap();

    assert_eq!(outcome, ActionOutcome::Started);
    assert!(orchestrator.scheduler().is_running(h.session));
    let view = h.presenter.last_battle().expect("battle view rendered");
    assert_eq!(view.enemy_name, "Goblin");
    assert_eq!(view.enemy_hp, Pool::full(40));
    assert_eq!(view.current, Some(ASH));
    assert_eq!(view.log, vec!["A wild Goblin appears!".to_string()]);
    assert_eq!(view.actions.len(), 3);
    assert!(!view.ready);
    assert!(view.actions.iter().all(|action| !action.enabled));
    assert_eq!(view.trance, None);
    assert!(matches!(
        battle_events.try_recv(),
        Ok(Event::Battle(BattleEvent::Started { epoch: 1, .. }))
    ));

    let again = orchestrator.start_battle(h.session, ASH, GOBLIN).await.unwrap();
    assert_eq!(rejected_with(&again), &Rejection::BattleInProgress);

    orchestrator.teardown_session(h.session).await.unwrap();
}

#[tokio::test]
async fn unknown_enemy_is_rejected_without_opening_a_battle() {
    let h = harness(&[(ASH, "Ash")]);
    let orchestrator = h.runtime.orchestrator();

    let outcome = orchestrator
        .start_battle(h.session, ASH, EnemyId(404))
        .await
        .unwrap();

    assert_eq!(rejected_with(&outcome), &Rejection::EnemyNotFound);
    assert!(!orchestrator.scheduler().is_running(h.session));
    assert_eq!(h.presenter.rejections().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn attack_hits_the_enemy_and_the_enemy_answers() {
    let h = harness(&[(ASH, "Ash")]);
    let orchestrator = h.runtime.orchestrator();
    orchestrator.start_battle(h.session, ASH, GOBLIN).await.unwrap();
    h.until_ready(ASH).await;

    let outcome = orchestrator
        .handle_player_action(h.session, ASH, PlayerAction::Attack)
        .await
        .unwrap();

    assert_eq!(outcome, ActionOutcome::Continued);
    let view = h.presenter.last_battle().unwrap();
    assert_eq!(view.enemy_hp.current(), 30);
    assert!(view.log.contains(&"Ash attacks for 10 damage.".to_string()));
    assert!(view.log.contains(&"Goblin attacks for 5 damage.".to_string()));
    assert_eq!(h.record(ASH).await.hp.current(), 55);
    // A lone player keeps the turn.
    assert_eq!(view.current, Some(ASH));

    orchestrator.teardown_session(h.session).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn ability_on_cooldown_is_rejected_and_changes_nothing() {
    let h = harness(&[(ASH, "Ash")]);
    let orchestrator = h.runtime.orchestrator();
    orchestrator.start_battle(h.session, ASH, GOBLIN).await.unwrap();
    h.until_ready(ASH).await;

    let first = orchestrator
        .handle_player_action(h.session, ASH, PlayerAction::Ability(FIRE))
        .await
        .unwrap();
    assert_eq!(first, ActionOutcome::Continued);
    assert_eq!(h.presenter.last_battle().unwrap().enemy_hp.current(), 25);
    h.until_ready(ASH).await;

    let second = orchestrator
        .handle_player_action(h.session, ASH, PlayerAction::Ability(FIRE))
        .await
        .unwrap();

    match rejected_with(&second) {
        Rejection::OnCooldown { ability, remaining } => {
            assert_eq!(*ability, FIRE);
            assert_eq!(*remaining, 2.0);
        }
        other => panic!("unexpected rejection {other:?}"),
    }
    let handle = h.runtime.sessions().get(h.session).unwrap();
    let state = handle.lock().await;
    assert_eq!(state.battle.as_ref().unwrap().enemy.hp.current(), 25);
    drop(state);

    orchestrator.teardown_session(h.session).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn only_the_current_player_may_act() {
    let h = harness(&[(ASH, "Ash"), (BRIE, "Brie")]);
    let orchestrator = h.runtime.orchestrator();
    orchestrator.start_battle(h.session, ASH, GOBLIN).await.unwrap();

    let early = orchestrator
        .handle_player_action(h.session, BRIE, PlayerAction::Attack)
        .await
        .unwrap();
    assert_eq!(
        rejected_with(&early),
        &Rejection::NotYourTurn {
            requester: BRIE,
            current: Some(ASH),
        }
    );

    h.until_ready(ASH).await;
    orchestrator
        .handle_player_action(h.session, ASH, PlayerAction::Attack)
        .await
        .unwrap();

    let handle = h.runtime.sessions().get(h.session).unwrap();
    let state = handle.lock().await;
    assert_eq!(state.current, Some(BRIE));
    assert_eq!(state.battle.as_ref().unwrap().effects_owner, BRIE);
    drop(state);

    let late = orchestrator
        .handle_player_action(h.session, ASH, PlayerAction::Attack)
        .await
        .unwrap();
    assert!(matches!(
        rejected_with(&late),
        Rejection::NotYourTurn { requester, .. } if *requester == ASH
    ));

    orchestrator.teardown_session(h.session).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn resource_and_knowledge_are_checked_before_resolution() {
    let h = harness(&[(ASH, "Ash")]);
    let orchestrator = h.runtime.orchestrator();
    orchestrator.start_battle(h.session, ASH, GOBLIN).await.unwrap();
    h.until_ready(ASH).await;

    let quake = orchestrator
        .handle_player_action(h.session, ASH, PlayerAction::Ability(QUAKE))
        .await
        .unwrap();
    assert_eq!(
        rejected_with(&quake),
        &Rejection::InsufficientResource {
            needed: 50,
            available: 20,
        }
    );

    let unknown = orchestrator
        .handle_player_action(h.session, ASH, PlayerAction::Ability(AbilityId(99)))
        .await
        .unwrap();
    assert_eq!(
        rejected_with(&unknown),
        &Rejection::UnknownAbility {
            ability: AbilityId(99),
        }
    );
    assert_eq!(h.presenter.last_battle().unwrap().enemy_hp.current(), 40);

    orchestrator.teardown_session(h.session).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn felling_the_enemy_pays_out_and_ends_the_battle() {
    let h = harness(&[(ASH, "Ash")]);
    let orchestrator = h.runtime.orchestrator();
    let mut battle_events = h.runtime.subscribe(Topic::Battle);
    orchestrator.start_battle(h.session, ASH, SLIME).await.unwrap();
    h.until_ready(ASH).await;

    let outcome = orchestrator
        .handle_player_action(h.session, ASH, PlayerAction::Attack)
        .await
        .unwrap();

    let rewards = Rewards {
        experience: 10,
        currency: 7,
        loot: Some("Potion".into()),
    };
    assert_eq!(outcome, ActionOutcome::Victory(rewards.clone()));
    assert!(!orchestrator.scheduler().is_running(h.session));

    let record = h.record(ASH).await;
    assert_eq!(record.experience, 10);
    assert_eq!(record.currency, 7);
    assert_eq!(record.inventory, vec!["Potion".to_string()]);
    assert!(record.effects.is_empty());

    match h.presenter.last_terminal() {
        Some(TerminalView::Victory { enemy, rewards: paid, log }) => {
            assert_eq!(enemy, "Slime");
            assert_eq!(paid, rewards);
            assert!(log.contains(&"Slime was defeated!".to_string()));
        }
        other => panic!("expected a victory view, got {other:?}"),
    }

    let handle = h.runtime.sessions().get(h.session).unwrap();
    assert!(handle.lock().await.battle.is_none());

    let mut ended = None;
    while let Ok(event) = battle_events.try_recv() {
        if let Event::Battle(BattleEvent::Ended { outcome, .. }) = event {
            ended = Some(outcome);
        }
    }
    assert_eq!(ended, Some(BattleEnd::Victory));
}

#[tokio::test(start_paused = true)]
async fn fleeing_clears_the_battle_and_passes_the_turn() {
    let h = harness(&[(ASH, "Ash")]);
    let orchestrator = h.runtime.orchestrator();
    orchestrator.start_battle(h.session, ASH, GOBLIN).await.unwrap();
    h.until_ready(ASH).await;

    let outcome = orchestrator.handle_flee(h.session, ASH).await.unwrap();

    assert_eq!(outcome, ActionOutcome::Fled);
    assert!(!orchestrator.scheduler().is_running(h.session));
    let field = h.presenter.last_field().expect("field view rendered");
    assert!(field.log.contains(&"You fled the battle!".to_string()));

    let handle = h.runtime.sessions().get(h.session).unwrap();
    let state = handle.lock().await;
    assert!(state.battle.is_none());
    assert_eq!(state.current, Some(ASH));
    drop(state);

    let again = orchestrator.handle_flee(h.session, ASH).await.unwrap();
    assert_eq!(rejected_with(&again), &Rejection::NoActiveBattle);
}

#[tokio::test(start_paused = true)]
async fn a_lone_player_falling_ends_in_defeat() {
    let h = harness(&[(ASH, "Ash")]);
    let orchestrator = h.runtime.orchestrator();
    orchestrator.start_battle(h.session, ASH, OGRE).await.unwrap();
    h.until_ready(ASH).await;

    let outcome = orchestrator
        .handle_player_action(h.session, ASH, PlayerAction::Attack)
        .await
        .unwrap();

    assert_eq!(
        outcome,
        ActionOutcome::Defeat {
            allies_remaining: false,
        }
    );
    assert!(!orchestrator.scheduler().is_running(h.session));
    let record = h.record(ASH).await;
    assert!(record.dead);
    assert!(!record.is_alive());
    match h.presenter.last_terminal() {
        Some(TerminalView::Defeat { log }) => {
            assert!(log.contains(&"Ash has fallen!".to_string()));
        }
        other => panic!("expected a defeat view, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn a_fallen_player_passes_to_a_living_ally() {
    let h = harness(&[(ASH, "Ash"), (BRIE, "Brie")]);
    let orchestrator = h.runtime.orchestrator();
    orchestrator.start_battle(h.session, ASH, OGRE).await.unwrap();
    h.until_ready(ASH).await;

    let outcome = orchestrator
        .handle_player_action(h.session, ASH, PlayerAction::Attack)
        .await
        .unwrap();
    assert_eq!(
        outcome,
        ActionOutcome::Defeat {
            allies_remaining: true,
        }
    );
    let view = h.presenter.last_battle().unwrap();
    assert!(view.awaiting_pass);
    assert_eq!(view.enemy_hp.current(), 490);

    let retry = orchestrator
        .handle_player_action(h.session, ASH, PlayerAction::Attack)
        .await
        .unwrap();
    assert_eq!(
        rejected_with(&retry),
        &Rejection::ActorDefeated { player: ASH }
    );

    let passed = orchestrator.pass_turn(h.session, ASH).await.unwrap();
    assert_eq!(passed, ActionOutcome::Continued);

    let handle = h.runtime.sessions().get(h.session).unwrap();
    let state = handle.lock().await;
    assert_eq!(state.current, Some(BRIE));
    assert!(!state.awaiting_pass);
    assert_eq!(state.battle.as_ref().unwrap().effects_owner, BRIE);
    drop(state);

    orchestrator.teardown_session(h.session).await.unwrap();
}

#[tokio::test]
async fn self_abilities_work_outside_battle() {
    let h = harness(&[(ASH, "Ash")]);
    let orchestrator = h.runtime.orchestrator();
    let wounded = PlayerRecord {
        hp: Pool::new(30, 60),
        ..h.record(ASH).await
    };
    h.players.enroll(h.session, wounded).unwrap();

    let outcome = orchestrator
        .handle_player_action(h.session, ASH, PlayerAction::Ability(CURE))
        .await
        .unwrap();

    assert_eq!(outcome, ActionOutcome::Field);
    let record = h.record(ASH).await;
    assert_eq!(record.hp.current(), 50);
    assert_eq!(record.resource.current(), 15);
    let field = h.presenter.last_field().unwrap();
    assert_eq!(field.player.hp.current(), 50);
    let cure = field.actions.iter().find(|a| a.ability == CURE).unwrap();
    assert_eq!(cure.cooldown, 1.0);

    let fire = orchestrator
        .handle_player_action(h.session, ASH, PlayerAction::Ability(FIRE))
        .await
        .unwrap();
    assert_eq!(
        rejected_with(&fire),
        &Rejection::RequiresBattle {
            ability: FIRE,
            target: TargetClass::Enemy,
        }
    );

    let attack = orchestrator
        .handle_player_action(h.session, ASH, PlayerAction::Attack)
        .await
        .unwrap();
    assert_eq!(rejected_with(&attack), &Rejection::NoActiveBattle);
}

#[tokio::test(start_paused = true)]
async fn teardown_closes_the_session() {
    let h = harness(&[(ASH, "Ash")]);
    let orchestrator = h.runtime.orchestrator();
    let mut battle_events = h.runtime.subscribe(Topic::Battle);
    orchestrator.start_battle(h.session, ASH, GOBLIN).await.unwrap();

    orchestrator.teardown_session(h.session).await.unwrap();
    orchestrator.teardown_session(h.session).await.unwrap();

    assert!(h.runtime.sessions().get(h.session).is_none());
    assert!(!orchestrator.scheduler().is_running(h.session));
    let ended = std::iter::from_fn(|| battle_events.try_recv().ok()).any(|event| {
        matches!(
            event,
            Event::Battle(BattleEvent::Ended {
                outcome: BattleEnd::TornDown,
                ..
            })
        )
    });
    assert!(ended);

    let outcome = orchestrator
        .handle_player_action(h.session, ASH, PlayerAction::Attack)
        .await
        .unwrap();
    assert_eq!(rejected_with(&outcome), &Rejection::SessionNotFound);
}

#[tokio::test(start_paused = true)]
async fn gauges_fill_while_the_battle_is_open() {
    let h = harness(&[(ASH, "Ash")]);
    let orchestrator = h.runtime.orchestrator();
    let mut gauge_events = h.runtime.subscribe(Topic::Gauge);
    orchestrator.start_battle(h.session, ASH, GOBLIN).await.unwrap();

    tokio::time::sleep(Duration::from_millis(1500)).await;

    let mut ready = Vec::new();
    while let Ok(Event::Gauge(GaugeEvent::Ready {
        epoch, participant, ..
    })) = gauge_events.try_recv()
    {
        assert_eq!(epoch, 1);
        ready.push(participant);
    }
    assert_eq!(ready, vec![Participant::Player(ASH), Participant::Enemy]);

    let view = h.presenter.last_battle().unwrap();
    assert!(view.gauges.iter().all(|gauge| gauge.ready));
    assert!(view.ready);
    assert!(view.actions.iter().all(|action| action.enabled));

    orchestrator.handle_flee(h.session, ASH).await.unwrap();
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(matches!(gauge_events.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test(start_paused = true)]
async fn acting_before_the_gauge_fills_is_refused() {
    let h = harness(&[(ASH, "Ash")]);
    let orchestrator = h.runtime.orchestrator();
    orchestrator.start_battle(h.session, ASH, GOBLIN).await.unwrap();

    let attack = orchestrator
        .handle_player_action(h.session, ASH, PlayerAction::Attack)
        .await
        .unwrap();
    assert_eq!(rejected_with(&attack), &Rejection::NotReady { player: ASH });
    let flee = orchestrator.handle_flee(h.session, ASH).await.unwrap();
    assert_eq!(rejected_with(&flee), &Rejection::NotReady { player: ASH });
    assert_eq!(h.record(ASH).await.hp.current(), 60);

    h.until_ready(ASH).await;
    orchestrator.update_battle_view(h.session).await.unwrap();
    let view = h.presenter.last_battle().unwrap();
    assert!(view.ready);
    let fire = view.actions.iter().find(|action| action.ability == FIRE).unwrap();
    assert!(fire.enabled);

    let outcome = orchestrator
        .handle_player_action(h.session, ASH, PlayerAction::Attack)
        .await
        .unwrap();
    assert_eq!(outcome, ActionOutcome::Continued);
    let view = h.presenter.last_battle().unwrap();
    assert!(!view.ready);
    assert_eq!(view.enemy_hp.current(), 30);

    let again = orchestrator
        .handle_player_action(h.session, ASH, PlayerAction::Attack)
        .await
        .unwrap();
    assert_eq!(rejected_with(&again), &Rejection::NotReady { player: ASH });
    assert_eq!(h.presenter.last_battle().unwrap().enemy_hp.current(), 30);

    orchestrator.teardown_session(h.session).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn barrier_halves_what_the_enemy_deals() {
    let h = harness(&[(ASH, "Ash")]);
    let orchestrator = h.runtime.orchestrator();
    h.afflict(ASH, vec![StatusEffect::new("Barrier", 3, EffectSide::Caster)])
        .await;
    orchestrator.start_battle(h.session, ASH, GOBLIN).await.unwrap();
    h.until_ready(ASH).await;

    orchestrator
        .handle_player_action(h.session, ASH, PlayerAction::Attack)
        .await
        .unwrap();

    assert_eq!(h.record(ASH).await.hp.current(), 58);
    let log = h.log().await;
    assert_eq!(
        count(&log, "Barrier halves the incoming damage! Ash takes 2."),
        1
    );

    orchestrator.teardown_session(h.session).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn a_hasted_player_acts_again_once_per_enemy_cycle() {
    let h = harness(&[(ASH, "Ash")]);
    let orchestrator = h.runtime.orchestrator();
    let haste = StatusEffect::new("Haste", 5, EffectSide::Caster).with_modifiers(StatModifiers {
        speed_up: 10,
        ..Default::default()
    });
    h.afflict(ASH, vec![haste]).await;
    orchestrator.start_battle(h.session, ASH, GOBLIN).await.unwrap();
    h.until_ready(ASH).await;

    let first = orchestrator
        .handle_player_action(h.session, ASH, PlayerAction::Attack)
        .await
        .unwrap();
    assert_eq!(first, ActionOutcome::Continued);
    // The goblin was skipped and the gauge is still full.
    assert_eq!(h.record(ASH).await.hp.current(), 60);
    assert_eq!(count(&h.log().await, "Ash acts again with blistering speed!"), 1);
    {
        let handle = h.runtime.sessions().get(h.session).unwrap();
        let state = handle.lock().await;
        let battle = state.battle.as_ref().unwrap();
        assert!(battle.speed_bonus_used);
        assert!(battle.gauges.is_ready(Participant::Player(ASH)));
        assert_eq!(battle.enemy.hp.current(), 30);
    }

    let second = orchestrator
        .handle_player_action(h.session, ASH, PlayerAction::Attack)
        .await
        .unwrap();
    assert_eq!(second, ActionOutcome::Continued);
    assert_eq!(h.record(ASH).await.hp.current(), 55);
    let log = h.log().await;
    assert_eq!(count(&log, "Ash acts again with blistering speed!"), 1);
    assert_eq!(count(&log, "Goblin attacks for 5 damage."), 1);
    {
        let handle = h.runtime.sessions().get(h.session).unwrap();
        let state = handle.lock().await;
        let battle = state.battle.as_ref().unwrap();
        assert!(!battle.speed_bonus_used);
        assert!(!battle.gauges.is_ready(Participant::Player(ASH)));
        assert_eq!(battle.enemy.hp.current(), 20);
    }

    orchestrator.teardown_session(h.session).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn a_faster_enemy_strikes_twice_against_a_slowed_player() {
    let h = harness(&[(ASH, "Ash")]);
    let orchestrator = h.runtime.orchestrator();
    let slow = StatusEffect::new("Slow", 6, EffectSide::Opposing).with_modifiers(StatModifiers {
        speed_down: 5,
        ..Default::default()
    });
    h.afflict(ASH, vec![slow]).await;
    orchestrator.start_battle(h.session, ASH, WOLF).await.unwrap();
    h.until_ready(ASH).await;

    let outcome = orchestrator
        .handle_player_action(h.session, ASH, PlayerAction::Attack)
        .await
        .unwrap();

    assert_eq!(outcome, ActionOutcome::Continued);
    assert_eq!(h.record(ASH).await.hp.current(), 50);
    let log = h.log().await;
    assert_eq!(count(&log, "Wolf strikes again due to speed!"), 1);
    assert_eq!(count(&log, "Wolf attacks for 5 damage."), 2);
    {
        let handle = h.runtime.sessions().get(h.session).unwrap();
        let state = handle.lock().await;
        assert!(!state.battle.as_ref().unwrap().speed_bonus_used);
    }

    // The flag reset, so the next cycle earns the repeat again.
    h.until_ready(ASH).await;
    orchestrator
        .handle_player_action(h.session, ASH, PlayerAction::Attack)
        .await
        .unwrap();
    assert_eq!(h.record(ASH).await.hp.current(), 40);

    orchestrator.teardown_session(h.session).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn a_silenced_enemy_falls_back_to_plain_attacks() {
    let h = harness(&[(ASH, "Ash")]);
    let orchestrator = h.runtime.orchestrator();
    h.teach(ASH, HUSH).await;
    orchestrator.start_battle(h.session, ASH, WARLOCK).await.unwrap();
    h.until_ready(ASH).await;

    let outcome = orchestrator
        .handle_player_action(h.session, ASH, PlayerAction::Ability(HUSH))
        .await
        .unwrap();

    assert_eq!(outcome, ActionOutcome::Continued);
    // A plain attack instead of a 15 point Fire.
    assert_eq!(h.record(ASH).await.hp.current(), 55);
    let log = h.log().await;
    assert_eq!(count(&log, "Warlock is silenced and can only attack!"), 1);
    assert_eq!(count(&log, "Warlock attacks for 5 damage."), 1);
    let view = h.presenter.last_battle().unwrap();
    assert!(view.enemy_effects.iter().any(|badge| badge.name == "Silence"));
    {
        let handle = h.runtime.sessions().get(h.session).unwrap();
        let state = handle.lock().await;
        let battle = state.battle.as_ref().unwrap();
        assert_eq!(battle.enemy_cooldowns.remaining(FIRE), 0.0);
    }

    orchestrator.teardown_session(h.session).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn a_trance_lends_abilities_until_it_counts_down() {
    let h = harness(&[(ASH, "Ash")]);
    let orchestrator = h.runtime.orchestrator();
    orchestrator.start_battle(h.session, ASH, WOLF).await.unwrap();
    h.until_ready(ASH).await;

    let early = orchestrator
        .handle_player_action(h.session, ASH, PlayerAction::Ability(RAGE))
        .await
        .unwrap();
    assert_eq!(
        rejected_with(&early),
        &Rejection::UnknownAbility { ability: RAGE }
    );

    let entered = orchestrator.activate_trance(h.session, ASH).await.unwrap();
    assert_eq!(entered, ActionOutcome::Refreshed);
    assert_eq!(count(&h.log().await, "✨ Ash has entered Berserker Trance!"), 1);
    let trance = h.presenter.last_battle().unwrap().trance.expect("trance shown");
    assert_eq!(trance.name, "Berserker Trance");
    assert_eq!((trance.remaining, trance.max), (2, 2));
    assert_eq!(trance.actions.len(), 1);
    assert_eq!(trance.actions[0].ability, RAGE);
    assert!(trance.actions[0].enabled);

    let rage = orchestrator
        .handle_player_action(h.session, ASH, PlayerAction::Ability(RAGE))
        .await
        .unwrap();
    assert_eq!(rage, ActionOutcome::Continued);
    let view = h.presenter.last_battle().unwrap();
    assert_eq!(view.enemy_hp.current(), 70);
    assert_eq!(view.trance.map(|trance| trance.remaining), Some(1));
    assert_eq!(
        count(&h.log().await, "✨ Ash's Berserker Trance has 1 turn(s) remaining."),
        1
    );

    h.until_ready(ASH).await;
    orchestrator
        .handle_player_action(h.session, ASH, PlayerAction::Attack)
        .await
        .unwrap();

    assert_eq!(count(&h.log().await, "✨ Ash's Berserker Trance has ended."), 1);
    assert_eq!(h.presenter.last_battle().unwrap().trance, None);

    h.until_ready(ASH).await;
    let late = orchestrator
        .handle_player_action(h.session, ASH, PlayerAction::Ability(RAGE))
        .await
        .unwrap();
    assert_eq!(
        rejected_with(&late),
        &Rejection::UnknownAbility { ability: RAGE }
    );

    orchestrator.teardown_session(h.session).await.unwrap();
}

#[tokio::test]
async fn a_trance_outside_battle_counts_down_on_turn_end() {
    let h = harness(&[(ASH, "Ash")]);
    let orchestrator = h.runtime.orchestrator();

    orchestrator.activate_trance(h.session, ASH).await.unwrap();
    let field = h.presenter.last_field().expect("field view rendered");
    let trance = field.trance.expect("trance shown");
    assert_eq!(trance.remaining, 2);
    assert!(field.log.contains(&"✨ Ash has entered Berserker Trance!".to_string()));

    orchestrator.end_player_turn(h.session).await.unwrap();
    let field = h.presenter.last_field().unwrap();
    assert_eq!(field.trance.map(|trance| trance.remaining), Some(1));

    orchestrator.end_player_turn(h.session).await.unwrap();
    let field = h.presenter.last_field().unwrap();
    assert_eq!(field.trance, None);
    assert!(field.log.contains(&"✨ Ash's Berserker Trance has ended.".to_string()));
}

#[tokio::test]
async fn only_classes_with_a_trance_can_enter_one() {
    let plain = ClassTemplate {
        trance: None,
        ..warrior()
    };
    let h = harness_for(&[(ASH, "Ash")], CombatConfig::default(), plain);
    let orchestrator = h.runtime.orchestrator();

    let outcome = orchestrator.activate_trance(h.session, ASH).await.unwrap();

    assert_eq!(rejected_with(&outcome), &Rejection::NoTrance { player: ASH });
    let handle = h.runtime.sessions().get(h.session).unwrap();
    assert!(handle.lock().await.trances.is_empty());

    let missing = orchestrator
        .activate_trance(h.session, BRIE)
        .await
        .unwrap();
    assert_eq!(
        rejected_with(&missing),
        &Rejection::PlayerNotFound { player: BRIE }
    );
}
