//! Session engine flows: state machine, spoken cues and recorder commands

mod common;

use fencing_web::config::EngineConfig;
use fencing_web::detection::Action;
use fencing_web::physics::Handedness;
use fencing_web::pose::Landmark;
use fencing_web::session::{FrameOutput, RecorderCommand, SessionEngine, SessionEvent, SessionState};
use fencing_web::synthetic::FencerPose;
use pretty_assertions::assert_eq;

fn attack_cycle() -> Vec<FencerPose> {
    let mut poses = vec![FencerPose::en_garde(0.40); 6];
    poses.extend(common::lunge());
    let landed = *poses.last().unwrap();
    poses.extend(std::iter::repeat(landed).take(12));
    poses
}

fn run(engine: &mut SessionEngine, frames: &[(Vec<Landmark>, u64)]) -> Vec<FrameOutput> {
    frames
        .iter()
        .map(|(landmarks, ts)| engine.process_frame(landmarks, *ts))
        .collect()
}

fn states(outputs: &[FrameOutput]) -> Vec<SessionState> {
    let mut seen: Vec<SessionState> = Vec::new();
    for output in outputs {
        if seen.last() != Some(&output.state) {
            seen.push(output.state);
        }
    }
    seen
}

fn spoken(outputs: &[FrameOutput]) -> Vec<String> {
    outputs
        .iter()
        .flat_map(|o| o.events.iter())
        .filter(|e| !matches!(e, SessionEvent::ContinuousFeedback { .. }))
        .filter_map(SessionEvent::spoken_text)
        .collect()
}

#[test]
fn attack_cycle_cues_and_recording() {
    let mut engine = SessionEngine::default();
    let outputs = run(&mut engine, &common::timed(&attack_cycle(), 0));

    use SessionState::*;
    assert_eq!(states(&outputs), vec![Idle, EnGarde, Lunging, Recovery, EnGarde]);

    let cues = spoken(&outputs);
    assert_eq!(cues.first().map(String::as_str), Some("En garde"));
    assert_eq!(cues.last().map(String::as_str), Some("En garde"));
    assert!(cues.iter().any(|c| c.contains("lunge")), "no lunge cue in {cues:?}");

    let commands: Vec<RecorderCommand> = outputs.iter().flat_map(|o| o.recorder.clone()).collect();
    assert_eq!(commands, vec![RecorderCommand::Start, RecorderCommand::Stop]);
    assert!(!engine.is_recording());
}

#[test]
fn left_handed_session_matches_right_handed() {
    let right = run(&mut SessionEngine::default(), &common::timed(&attack_cycle(), 0));

    let config = EngineConfig {
        handedness: Handedness::Left,
        ..EngineConfig::default()
    };
    let mirrored: Vec<(Vec<Landmark>, u64)> = common::timed(&attack_cycle(), 0)
        .into_iter()
        .map(|(landmarks, ts)| (common::mirror_to_left_handed(&landmarks), ts))
        .collect();
    let left = run(&mut SessionEngine::new(config), &mirrored);

    assert_eq!(states(&left), states(&right));
    let completed = |outputs: &[FrameOutput]| -> Vec<Option<Action>> {
        outputs
            .iter()
            .filter(|o| o.result.is_completed())
            .map(|o| o.result.action())
            .collect()
    };
    assert_eq!(completed(&left), vec![Some(Action::Lunge)]);
    assert_eq!(completed(&left), completed(&right));
}

#[test]
fn losing_the_fencer_mid_attack_discards_the_clip() {
    let mut engine = SessionEngine::default();
    let poses = attack_cycle();
    let frames = common::timed(&poses, 0);
    let lunging_at = run(&mut engine, &frames)
        .iter()
        .position(|o| o.state == SessionState::Lunging)
        .unwrap();

    engine.reset();
    run(&mut engine, &frames[..=lunging_at]);
    assert!(engine.is_recording());

    let lost = engine.process_frame(&[], frames[lunging_at].1 + 33);
    assert_eq!(lost.state, SessionState::Idle);
    assert_eq!(lost.recorder, vec![RecorderCommand::Discard]);
    assert!(!engine.is_recording());
}

#[test]
fn longer_stabilization_delays_en_garde() {
    let guard = common::timed(&[FencerPose::en_garde(0.40); 40], 0);
    let en_garde_at = |config: EngineConfig| {
        run(&mut SessionEngine::new(config), &guard)
            .iter()
            .position(|o| o.state == SessionState::EnGarde)
    };

    let default = en_garde_at(EngineConfig::default()).unwrap();
    let mut patient = EngineConfig::default();
    patient.session.stabilization_ms = 900;
    let json = patient.to_json().unwrap();
    let patient = en_garde_at(EngineConfig::from_json(&json).unwrap()).unwrap();

    assert!(patient > default);
    assert!(patient as u64 * common::FRAME_MS >= 900);
}

#[test]
fn reconfigure_starts_a_fresh_session() {
    let mut engine = SessionEngine::default();
    run(&mut engine, &common::timed(&[FencerPose::en_garde(0.40); 20], 0));
    assert_eq!(engine.state(), SessionState::EnGarde);

    engine.reconfigure(EngineConfig::default());
    assert_eq!(engine.state(), SessionState::Idle);
    assert_eq!(engine.manager().history_len(), 0);
}
