use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use cube_guide_overlay::faces::FaceRecognitionStatus;
use cube_guide_overlay::moves::Face;
use cube_guide_overlay::overlay::canvas::DrawList;
use cube_guide_overlay::overlay::snapshot::{ActiveFaceMetrics, LatticeFit, OverlaySnapshot, TimingSnapshot};
use cube_guide_overlay::primitives::DrawEvent;
use cube_guide_overlay::*;

const FRAMES: usize = 180;
const FRAME_MILLIS: u64 = 16;
const ESTIMATOR_MILLIS: u64 = 33;
const SOLUTION: &str = "R U R' U' F2";

/// Stand-in for the vision thread: a slowly tumbling cube that drops out of
/// tracking now and then, explores all faces, then walks through a solution.
fn estimator(poses: LatestPose, inputs: SnapshotHandoff<FrameInputs>, running: Arc<AtomicBool>) {
    let scheme = CubeFaces::standard_solved();
    let mut step: usize = 0;
    while running.load(Ordering::Relaxed) {
        let lost = step % 40 >= 36;
        let angle = step as f64 * 0.02;
        let pose = Pose::new([0.0, 0.0, -12.0], [0.3 * angle.sin(), angle, 0.0]);
        poses.publish((!lost).then_some(pose));

        let mut frame = FrameInputs::default();
        let seen = (step / 10).min(Face::ALL.len());
        for face in &Face::ALL[..seen] {
            if let Some(observation) = scheme.face(*face) {
                frame.faces.set(*face, observation.clone());
            }
        }
        if seen < Face::ALL.len() {
            frame.mode = AppMode::RotateCube;
        } else {
            let mut solution = SolutionProgress::from_sequence(SOLUTION);
            for _ in 0..(step.saturating_sub(60) / 12) {
                solution.advance();
            }
            frame.mode = if solution.is_complete() {
                AppMode::Done
            } else {
                AppMode::RotateFace
            };
            frame.solution = solution;
        }
        frame.display.overlay_cube = step % 100 < 20;
        frame.display_mode = DisplayMode::ALL[(step / 25) % DisplayMode::ALL.len()];
        inputs.publish(frame);

        step += 1;
        thread::sleep(Duration::from_millis(ESTIMATOR_MILLIS));
    }
}

fn active_face(faces: &CubeFaces) -> ActiveFaceMetrics {
    let front = faces
        .face(Face::Front)
        .cloned()
        .unwrap_or_default();
    ActiveFaceMetrics {
        status: front.status,
        lattice: LatticeFit {
            origin: cgmath::Point2::new(520.0, 300.0),
            alpha_angle: 0.05,
            beta_angle: 1.62,
            alpha_length: 64.0,
            beta_length: 62.0,
            gamma_ratio: 0.97,
            sigma: 9.0,
        },
        observed: front.observed,
        ..ActiveFaceMetrics::default()
    }
}

fn run() -> OverlayResult<()> {
    let clock = SystemClock;
    let recorder = DrawRecorder::new();
    let mut surface = recorder.clone();
    let mut composer = FrameComposer::new(
        OverlayConfig::default(),
        recorder.primitives(),
        ShaderProgram(1),
        clock.now_millis(),
    )?;
    composer.on_surface_changed(1280, 720);

    let poses = LatestPose::new();
    let inputs = SnapshotHandoff::new(FrameInputs::default());
    let running = Arc::new(AtomicBool::new(true));
    let producer = {
        let poses = poses.publisher();
        let inputs = inputs.clone();
        let running = Arc::clone(&running);
        thread::spawn(move || estimator(poses, inputs, running))
    };

    let compositor = DiagnosticOverlayCompositor::default();
    let mut timing = TimingSnapshot::new();
    let mut draws: BTreeMap<String, usize> = BTreeMap::new();
    let mut skipped = 0;
    let mut failed = 0;
    let mut overlay_primitives = 0;

    for _ in 0..FRAMES {
        let now = clock.now_millis();
        let frame = inputs.latest();

        match composer.compose_frame(now, &frame, &poses, &mut surface) {
            Ok(FrameOutcome::Skipped) => skipped += 1,
            Ok(FrameOutcome::Rendered(report)) => {
                log::trace!("{} draws, arrow {:?}", report.draw_calls, report.arrow);
            }
            Err(err) => {
                log::warn!("frame failed: {err}");
                failed += 1;
            }
        }
        for event in recorder.take() {
            if let DrawEvent::Draw { kind, .. } = event {
                *draws.entry(format!("{kind:?}")).or_default() += 1;
            }
        }

        let face = active_face(&frame.faces);
        let mut canvas = DrawList::new();
        compositor.render(
            &mut canvas,
            frame.display_mode,
            &OverlaySnapshot {
                active_face: (face.status != FaceRecognitionStatus::Unknown).then_some(&face),
                faces: &frame.faces,
                timing: &timing,
            },
        );
        overlay_primitives += canvas.len();

        timing.record("compose", (clock.now_millis() - now) as f64);
        timing.end_frame();
        thread::sleep(Duration::from_millis(FRAME_MILLIS));
    }

    running.store(false, Ordering::Relaxed);
    if producer.join().is_err() {
        log::error!("estimator thread panicked");
    }

    log::info!("{FRAMES} frames: {skipped} skipped, {failed} failed");
    for (kind, count) in &draws {
        log::info!("  {kind}: {count} draws");
    }
    log::info!("{overlay_primitives} diagnostic overlay primitives");
    Ok(())
}

fn main() {
    init_logging();
    if let Err(err) = run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}
