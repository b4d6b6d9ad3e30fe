use super::*;
use crate::config::OverlayConfig;
use crate::error::OverlayError;
use crate::faces::{CubeFaces, FaceObservation, SolutionProgress, TileColor, UNKNOWN_TINT};
use crate::instruction::Direction;
use crate::matrix_operations::{flatten_matrix_for_gpu, RenderMatrix};
use crate::moves::{Face, Modifier, MoveToken};
use crate::pose::{LatestPose, Pose};
use crate::primitives::{DrawEvent, DrawRecorder};
use crate::state::DisplayFlags;

const PROGRAM: ShaderProgram = ShaderProgram(3);

fn tracked_pose() -> Pose {
    Pose::new([0.5, -0.5, -12.0], [0.2, -0.4, 0.1])
}

fn composer(recorder: &DrawRecorder, now_millis: i64) -> FrameComposer {
    let mut composer =
        FrameComposer::new(OverlayConfig::default(), recorder.primitives(), PROGRAM, now_millis).unwrap();
    composer.on_surface_changed(1280, 720);
    composer
}

fn face_turn_inputs(sequence: &str) -> FrameInputs {
    FrameInputs {
        mode: AppMode::RotateFace,
        faces: CubeFaces::standard_solved(),
        solution: SolutionProgress::from_sequence(sequence),
        ..FrameInputs::default()
    }
}

fn kinds(events: &[DrawEvent]) -> Vec<Option<PrimitiveKind>> {
    events.iter().map(DrawEvent::kind).collect()
}

fn draw_of(events: &[DrawEvent], wanted: PrimitiveKind) -> (crate::primitives::MvpUniform, DrawStyle) {
    events
        .iter()
        .find_map(|event| match event {
            DrawEvent::Draw { kind, uniform, style, .. } if *kind == wanted => Some((*uniform, *style)),
            _ => None,
        })
        .unwrap()
}

fn assert_mvp_eq(actual: &[f32; 16], expected: &RenderMatrix) {
    let expected = flatten_matrix_for_gpu(expected);
    for (a, e) in actual.iter().zip(expected.iter()) {
        assert!((a - e).abs() <= 1e-5, "{actual:?} != {expected:?}");
    }
}

#[test]
fn lost_pose_clears_and_draws_nothing() {
    let recorder = DrawRecorder::new();
    let mut composer = composer(&recorder, 0);
    let mut surface = recorder.clone();
    let lost = |_: i64| -> Option<Pose> { None };

    let outcome = composer
        .compose_frame(10, &face_turn_inputs("F"), &lost, &mut surface)
        .unwrap();

    assert_eq!(outcome, FrameOutcome::Skipped);
    assert_eq!(recorder.take(), vec![DrawEvent::Clear]);
}

#[test]
fn face_turn_frame_draws_occlusion_arrow_then_pilot() {
    let recorder = DrawRecorder::new();
    let mut composer = composer(&recorder, 0);
    let mut surface = recorder.clone();
    let pose = tracked_pose();
    let poses = move |_: i64| Some(pose);
    let inputs = face_turn_inputs("F");

    composer.compose_frame(1_000, &inputs, &poses, &mut surface).unwrap();
    recorder.take();
    let outcome = composer.compose_frame(1_020, &inputs, &poses, &mut surface).unwrap();
    let events = recorder.take();

    assert_eq!(
        kinds(&events),
        vec![
            None,
            Some(PrimitiveKind::OcclusionCube),
            Some(PrimitiveKind::QuarterTurnArrow),
            Some(PrimitiveKind::PilotCube),
        ]
    );
    let token = MoveToken::new(Face::Front, Modifier::None);
    assert_eq!(
        outcome,
        FrameOutcome::Rendered(FrameReport {
            arrow: Some(ArrowKind::Edge {
                token,
                direction: Direction::Positive
            }),
            sweep_degrees: Some(2),
            pilot_cube: true,
            draw_calls: 3,
        })
    );

    let pipeline = composer.pipeline();
    let pv = pipeline.projection_view();
    let tracked = pipeline.tracked_mvp(&pv, pose.position, &pipeline.rotation_matrix(pose.rotation_vector));
    let placement = composer
        .encoder()
        .encode_move(token, &CubeFaces::standard_solved());
    let (arrow, style) = draw_of(&events, PrimitiveKind::QuarterTurnArrow);
    assert_eq!(style, DrawStyle::Tinted(TileColor::Green.rgba()));
    assert_mvp_eq(&arrow.mvp, &placement.model_view_projection(&tracked, 2.0));

    let (occlusion, style) = draw_of(&events, PrimitiveKind::OcclusionCube);
    assert_eq!(style, DrawStyle::Transparent);
    assert_mvp_eq(&occlusion.mvp, &tracked);
}

#[test]
fn half_turn_uses_half_turn_mesh() {
    let recorder = DrawRecorder::new();
    let mut composer = composer(&recorder, 0);
    let mut surface = recorder.clone();
    let pose = tracked_pose();

    composer
        .compose_frame(0, &face_turn_inputs("U2 R"), &move |_: i64| Some(pose), &mut surface)
        .unwrap();

    assert!(kinds(&recorder.take()).contains(&Some(PrimitiveKind::HalfTurnArrow)));
}

#[test]
fn cube_rotation_mode_draws_full_body_arrow() {
    let recorder = DrawRecorder::new();
    let mut composer = composer(&recorder, 0);
    let mut surface = recorder.clone();
    let mut faces = CubeFaces::new();
    faces.set(Face::Front, FaceObservation::uniform(TileColor::Green));
    let inputs = FrameInputs {
        mode: AppMode::RotateCube,
        faces,
        ..FrameInputs::default()
    };
    let pose = tracked_pose();

    let outcome = composer
        .compose_frame(50, &inputs, &move |_: i64| Some(pose), &mut surface)
        .unwrap();

    match outcome {
        FrameOutcome::Rendered(report) => {
            assert_eq!(report.arrow, Some(ArrowKind::FullBody { even_face_count: false }));
            assert_eq!(report.sweep_degrees, Some(0));
        }
        FrameOutcome::Skipped => panic!("frame should render"),
    }
    let (_, style) = draw_of(&recorder.take(), PrimitiveKind::QuarterTurnArrow);
    assert_eq!(style, DrawStyle::Tinted(crate::faces::NEUTRAL_TINT));
}

#[test]
fn test_arrow_takes_priority_and_runs_faster() {
    let recorder = DrawRecorder::new();
    let mut composer = composer(&recorder, 0);
    let mut surface = recorder.clone();
    let mut inputs = face_turn_inputs("F");
    inputs.display.camera_calibration_diagnostic = true;
    let pose = tracked_pose();
    let poses = move |_: i64| Some(pose);

    composer.compose_frame(0, &inputs, &poses, &mut surface).unwrap();
    let outcome = composer.compose_frame(100, &inputs, &poses, &mut surface).unwrap();

    // 100 ms at 20 ms per degree, sped up four times.
    assert_eq!(
        outcome,
        FrameOutcome::Rendered(FrameReport {
            arrow: Some(ArrowKind::Test),
            sweep_degrees: Some(20),
            pilot_cube: true,
            draw_calls: 3,
        })
    );
}

#[test]
fn overlay_cube_outside_instruction_modes_draws_cubes_only() {
    let recorder = DrawRecorder::new();
    let mut composer = composer(&recorder, 0);
    let mut surface = recorder.clone();
    let inputs = FrameInputs {
        mode: AppMode::WaitingMove,
        display: DisplayFlags {
            overlay_cube: true,
            ..DisplayFlags::default()
        },
        ..FrameInputs::default()
    };
    let pose = tracked_pose();

    composer
        .compose_frame(0, &inputs, &move |_: i64| Some(pose), &mut surface)
        .unwrap();

    let events = recorder.take();
    assert_eq!(
        kinds(&events),
        vec![
            None,
            Some(PrimitiveKind::OcclusionCube),
            Some(PrimitiveKind::OverlayCube),
            Some(PrimitiveKind::PilotCube),
        ]
    );
    assert_eq!(draw_of(&events, PrimitiveKind::OverlayCube).1, DrawStyle::Wireframe);
}

#[test]
fn idle_mode_without_overlay_draws_only_pilot_cube() {
    let recorder = DrawRecorder::new();
    let mut composer = composer(&recorder, 0);
    let mut surface = recorder.clone();
    let pose = tracked_pose();

    composer
        .compose_frame(0, &FrameInputs::default(), &move |_: i64| Some(pose), &mut surface)
        .unwrap();

    assert_eq!(kinds(&recorder.take()), vec![None, Some(PrimitiveKind::PilotCube)]);
}

#[test]
fn pilot_cube_respects_both_flags() {
    let recorder = DrawRecorder::new();
    let mut composer = composer(&recorder, 0);
    let mut surface = recorder.clone();
    let pose = tracked_pose();
    let poses = move |_: i64| Some(pose);

    for (menu, request) in [(false, true), (true, false), (false, false)] {
        let mut inputs = face_turn_inputs("R");
        inputs.display.pilot_cube = menu;
        inputs.display.render_pilot_cube = request;
        composer.compose_frame(0, &inputs, &poses, &mut surface).unwrap();
        assert!(!kinds(&recorder.take()).contains(&Some(PrimitiveKind::PilotCube)));
    }
}

#[test]
fn pilot_cube_ignores_tracked_position() {
    let recorder = DrawRecorder::new();
    let mut composer = composer(&recorder, 0);
    let mut surface = recorder.clone();
    let inputs = FrameInputs {
        pilot_rotation: [0.0, 0.3, 0.0],
        ..FrameInputs::default()
    };

    let mut pilots = Vec::new();
    for position in [[0.0, 0.0, -10.0], [4.0, -2.0, -30.0]] {
        let pose = Pose::new(position, [0.1, 0.7, -0.2]);
        composer
            .compose_frame(0, &inputs, &move |_: i64| Some(pose), &mut surface)
            .unwrap();
        pilots.push(draw_of(&recorder.take(), PrimitiveKind::PilotCube).0);
    }
    assert_eq!(pilots[0], pilots[1]);
}

#[test]
fn malformed_move_fails_before_any_draw() {
    let recorder = DrawRecorder::new();
    let mut composer = composer(&recorder, 0);
    let mut surface = recorder.clone();
    let pose = tracked_pose();

    let err = composer
        .compose_frame(0, &face_turn_inputs("X2"), &move |_: i64| Some(pose), &mut surface)
        .unwrap_err();

    assert!(matches!(err, OverlayError::MalformedMove { .. }));
    assert_eq!(recorder.take(), vec![DrawEvent::Clear]);
}

#[test]
fn exhausted_solution_is_reported() {
    let recorder = DrawRecorder::new();
    let mut composer = composer(&recorder, 0);
    let mut surface = recorder.clone();
    let mut inputs = face_turn_inputs("F");
    inputs.solution.advance();
    let pose = tracked_pose();

    let err = composer
        .compose_frame(0, &inputs, &move |_: i64| Some(pose), &mut surface)
        .unwrap_err();

    assert_eq!(err, OverlayError::NoPendingMove { index: 1, len: 1 });
}

#[test]
fn unrecognized_center_tints_edge_arrow_grey() {
    let recorder = DrawRecorder::new();
    let mut composer = composer(&recorder, 0);
    let mut surface = recorder.clone();
    let mut inputs = face_turn_inputs("L'");
    inputs.faces.clear(Face::Left);
    let pose = tracked_pose();

    composer
        .compose_frame(0, &inputs, &move |_: i64| Some(pose), &mut surface)
        .unwrap();

    let (_, style) = draw_of(&recorder.take(), PrimitiveKind::QuarterTurnArrow);
    assert_eq!(style, DrawStyle::Tinted(UNKNOWN_TINT));
}

#[test]
fn leaving_instruction_mode_while_tracking_is_lost_restarts_sweep() {
    let recorder = DrawRecorder::new();
    let mut composer = composer(&recorder, 0);
    let mut surface = recorder.clone();
    let source = LatestPose::new();
    let publisher = source.publisher();
    let inputs = face_turn_inputs("B");

    publisher.publish(Some(tracked_pose()));
    composer.compose_frame(0, &inputs, &source, &mut surface).unwrap();

    publisher.publish(None);
    let waiting = FrameInputs {
        mode: AppMode::WaitingMove,
        ..inputs.clone()
    };
    let skipped = composer.compose_frame(400, &waiting, &source, &mut surface).unwrap();
    assert_eq!(skipped, FrameOutcome::Skipped);
    assert!(!composer.clock().is_active());

    publisher.publish(Some(tracked_pose()));
    let outcome = composer.compose_frame(1_000, &inputs, &source, &mut surface).unwrap();
    match outcome {
        FrameOutcome::Rendered(report) => assert_eq!(report.sweep_degrees, Some(0)),
        FrameOutcome::Skipped => panic!("frame should render"),
    }
}

#[test]
fn resize_changes_projection_used_for_draws() {
    let recorder = DrawRecorder::new();
    let mut composer = composer(&recorder, 0);
    let mut surface = recorder.clone();
    let pose = tracked_pose();
    let poses = move |_: i64| Some(pose);

    composer.compose_frame(0, &FrameInputs::default(), &poses, &mut surface).unwrap();
    let wide = draw_of(&recorder.take(), PrimitiveKind::PilotCube).0;

    let viewport = composer.on_surface_changed(720, 1280);
    assert_eq!(viewport.height, 1280);
    composer.compose_frame(0, &FrameInputs::default(), &poses, &mut surface).unwrap();
    let tall = draw_of(&recorder.take(), PrimitiveKind::PilotCube).0;

    assert_ne!(wide.mvp, tall.mvp);
}

#[test]
fn invalid_config_is_rejected_at_construction() {
    let recorder = DrawRecorder::new();
    let config = OverlayConfig {
        diagnostic_rate_divisor_ms: 0,
        ..OverlayConfig::default()
    };
    assert!(matches!(
        FrameComposer::new(config, recorder.primitives(), PROGRAM, 0),
        Err(OverlayError::InvalidConfig(_))
    ));
}
