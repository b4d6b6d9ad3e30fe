//! Augmented-reality guidance overlay for a hand-held Rubik cube.
//!
//! A tracked pose comes in from the vision thread; arrows, an occlusion cube
//! and a pilot cube go out as draw calls against the host's primitive layer.

pub mod animation;
pub mod composer;
pub mod config;
pub mod error;
pub mod faces;
pub mod handoff;
pub mod instruction;
pub mod matrix_operations;
pub mod moves;
pub mod overlay;
pub mod pipeline;
pub mod pose;
pub mod primitives;
pub mod rotation_vector;
pub mod state;

pub use animation::{AnimationClock, Clock, ManualClock, SystemClock};
pub use composer::{FrameComposer, FrameOutcome, FrameReport};
pub use config::OverlayConfig;
pub use error::{OverlayError, OverlayResult};
pub use faces::{CubeFaces, FaceStateSource, SolutionProgress, TileColor};
pub use handoff::SnapshotHandoff;
pub use instruction::{ArrowKind, ArrowPlacement, Direction, MoveInstructionEncoder};
pub use overlay::DiagnosticOverlayCompositor;
pub use pipeline::{PoseTransformPipeline, Viewport};
pub use pose::{LatestPose, Pose, PoseSource};
pub use primitives::{DrawRecorder, PrimitiveKind, Primitives, ShaderProgram};
pub use rotation_vector::{rotation_vector_to_render_matrix, Rodrigues};
pub use state::{AppMode, DisplayFlags, DisplayMode, FrameInputs};

/// Installs the platform logger. Safe to call more than once.
pub fn init_logging() {
    cfg_if::cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            if console_log::init_with_level(log::Level::Debug).is_err() {
                log::debug!("logger was already installed");
            }
        } else {
            if env_logger::try_init().is_err() {
                log::debug!("logger was already installed");
            }
        }
    }
}
