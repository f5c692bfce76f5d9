//! End-to-end detection scenarios through the detector manager

mod common;

use fencing_web::config::EngineConfig;
use fencing_web::detection::{
    resolve, Action, ActionQuality, ActionResult, DetectorManager, CROSSOVER_MESSAGE,
};
use fencing_web::physics::Handedness;
use fencing_web::pose::{Landmark, LANDMARK_COUNT};
use fencing_web::synthetic::FencerPose;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn replay(
    manager: &mut DetectorManager,
    poses: &[FencerPose],
    start_ms: u64,
) -> Vec<ActionResult> {
    common::timed(poses, start_ms)
        .iter()
        .map(|(landmarks, ts)| manager.process_frame(landmarks, *ts))
        .collect()
}

fn completions(results: &[ActionResult]) -> Vec<&ActionResult> {
    results.iter().filter(|r| r.is_completed()).collect()
}

fn mixed_session() -> Vec<FencerPose> {
    let mut poses = common::lunge();
    let settle = *poses.last().unwrap();
    poses.extend(std::iter::repeat(settle).take(10));
    poses.extend(common::step(1.0));
    poses.extend(common::parry_riposte());
    poses
}

#[test]
fn lunge_round_trip() {
    let config = EngineConfig::default();
    let mut manager = DetectorManager::new(&config);
    let results = replay(&mut manager, &common::lunge(), 10_000);

    let done = completions(&results);
    assert_eq!(done.len(), 1);
    let ActionResult::Completed { action, quality, duration_ms, .. } = done[0] else {
        unreachable!()
    };
    assert_eq!(*action, Action::Lunge);
    assert!(matches!(quality, ActionQuality::Good | ActionQuality::Perfect));
    assert!(*duration_ms <= config.lunge.max_duration_ms);
}

#[test]
fn flunge_crossover_is_forced_poor() {
    let mut manager = DetectorManager::new(&EngineConfig::default());
    let results = replay(&mut manager, &common::flunge_crossover(), 0);
    let last = results.last().unwrap();
    assert_eq!(last.action(), Some(Action::Flunge));
    assert_eq!(last.quality(), Some(ActionQuality::Poor));
    assert_eq!(last.feedback(), Some(CROSSOVER_MESSAGE));
}

#[test]
fn advance_and_retreat_are_symmetric() {
    let mut manager = DetectorManager::new(&EngineConfig::default());
    let advance = replay(&mut manager, &common::step(1.0), 0);
    manager.reset();
    let retreat = replay(&mut manager, &common::step(-1.0), 0);

    let advance = completions(&advance);
    let retreat = completions(&retreat);
    assert_eq!(advance.len(), 1);
    assert_eq!(retreat.len(), 1);
    assert_eq!(advance[0].action(), Some(Action::Advance));
    assert_eq!(retreat[0].action(), Some(Action::Retreat));
    assert_eq!(advance[0].quality(), retreat[0].quality());
}

#[test]
fn parry_riposte_through_manager() {
    let mut manager = DetectorManager::new(&EngineConfig::default());
    let results = replay(&mut manager, &common::parry_riposte(), 0);
    let last = results.last().unwrap();
    assert_eq!(last.action(), Some(Action::Riposte));
    assert_eq!(last.quality(), Some(ActionQuality::Perfect));
}

#[test]
fn balestra_lunge_outranks_the_plain_lunge() {
    let mut manager = DetectorManager::new(&EngineConfig::default());
    let results = replay(&mut manager, &common::balestra_lunge(0.04), 0);

    let last = results.last().unwrap();
    assert_eq!(last.action(), Some(Action::BalestraLunge));
    assert!(last.is_completed());
    assert!(last.quality().unwrap().is_good());
    assert!(completions(&results)
        .iter()
        .all(|r| r.action() != Some(Action::Lunge)));
}

#[test]
fn balestra_jump_is_not_a_parry() {
    let mut manager = DetectorManager::new(&EngineConfig::default());
    for height in [0.04, 0.06] {
        manager.reset();
        let results = replay(&mut manager, &common::balestra_lunge(height), 0);
        let defensive = results
            .iter()
            .filter(|r| matches!(r.action(), Some(Action::Parry | Action::Riposte)))
            .count();
        assert_eq!(defensive, 0, "jump of {height} read as a parry");
    }
}

#[test]
fn advance_lunge_through_manager() {
    let mut manager = DetectorManager::new(&EngineConfig::default());
    let results = replay(&mut manager, &common::advance_lunge(), 0);

    let last = results.last().unwrap();
    assert!(last.is_completed());
    assert_eq!(last.action(), Some(Action::AdvanceLunge));
    assert_eq!(last.quality(), Some(ActionQuality::Good));
    assert_eq!(last.feedback(), Some("Reach further with the sword arm"));
}

#[test]
fn replay_is_deterministic() {
    let poses = mixed_session();
    let first = replay(&mut DetectorManager::new(&EngineConfig::default()), &poses, 0);
    let second = replay(&mut DetectorManager::new(&EngineConfig::default()), &poses, 0);
    assert_eq!(first, second);
    assert_eq!(completions(&first)[0].action(), Some(Action::Lunge));
}

#[test]
fn reset_matches_fresh_engine() {
    let poses = mixed_session();
    let fresh = replay(&mut DetectorManager::new(&EngineConfig::default()), &poses, 0);

    let mut manager = DetectorManager::new(&EngineConfig::default());
    replay(&mut manager, &common::lunge()[..9], 0);
    manager.reset();
    manager.reset();
    assert!(manager.all_idle());
    assert_eq!(manager.history_len(), 0);
    assert_eq!(replay(&mut manager, &poses, 0), fresh);
}

#[test]
fn completed_action_is_reported_once() {
    let mut manager = DetectorManager::new(&EngineConfig::default());
    let mut poses = common::lunge();
    let landed = *poses.last().unwrap();
    poses.extend(std::iter::repeat(landed).take(20));
    let results = replay(&mut manager, &poses, 0);
    assert_eq!(completions(&results).len(), 1);
}

#[test]
fn tracking_loss_clears_every_partial_phase() {
    let lunge = common::lunge();
    for cut in 7..lunge.len() {
        let mut manager = DetectorManager::new(&EngineConfig::default());
        replay(&mut manager, &lunge[..cut], 0);
        let landmarks = lunge[cut].landmarks();
        let lost = manager.process_frame(&landmarks[..LANDMARK_COUNT - 1], cut as u64 * 33);
        assert!(lost.is_none());
        assert!(manager.all_idle(), "detector left mid-phase after cut at {cut}");
        assert_eq!(manager.history_len(), 0);
    }
}

#[test]
fn left_handed_fencer_facing_left() {
    let config = EngineConfig {
        handedness: Handedness::Left,
        ..EngineConfig::default()
    };
    let mut manager = DetectorManager::new(&config);
    let results: Vec<ActionResult> = common::timed(&common::lunge(), 0)
        .iter()
        .map(|(landmarks, ts)| {
            manager.process_frame(&common::mirror_to_left_handed(landmarks), *ts)
        })
        .collect();

    let mut reference = DetectorManager::new(&EngineConfig::default());
    let right_handed = replay(&mut reference, &common::lunge(), 0);
    assert_eq!(results.last(), right_handed.last());
    assert_eq!(results.last().unwrap().action(), Some(Action::Lunge));
}

fn arb_landmarks() -> impl Strategy<Value = Vec<Landmark>> {
    prop::collection::vec((0.0f32..1.0, 0.0f32..1.0), LANDMARK_COUNT)
        .prop_map(|points| points.into_iter().map(|(x, y)| Landmark::new(x, y)).collect())
}

proptest! {
    #[test]
    fn short_history_is_always_none(
        frames in prop::collection::vec(arb_landmarks(), 1..=4)
    ) {
        let mut manager = DetectorManager::new(&EngineConfig::default());
        for (i, landmarks) in frames.iter().enumerate() {
            prop_assert!(manager.process_frame(landmarks, i as u64 * 33).is_none());
        }
    }

    #[test]
    fn perfect_beats_good(good_at in 0usize..7, perfect_at in 0usize..7) {
        prop_assume!(good_at != perfect_at);
        let mut results = vec![ActionResult::None; 7];
        results[good_at] = ActionResult::completed(Action::Lunge, ActionQuality::Good, None, 400);
        results[perfect_at] =
            ActionResult::completed(Action::Flunge, ActionQuality::Perfect, None, 300);
        prop_assert_eq!(resolve(&results).quality(), Some(ActionQuality::Perfect));
    }

    #[test]
    fn random_poses_never_panic(
        frames in prop::collection::vec(arb_landmarks(), 0..40)
    ) {
        let mut manager = DetectorManager::new(&EngineConfig::default());
        for (i, landmarks) in frames.iter().enumerate() {
            let _ = manager.process_frame(landmarks, i as u64 * 33);
        }
    }
}
