use crate::animation::AnimationClock;
use crate::config::OverlayConfig;
use crate::error::OverlayResult;
use crate::faces::FaceStateSource;
use crate::instruction::{ArrowKind, ArrowPlacement, MoveInstructionEncoder};
use crate::pipeline::{PoseTransformPipeline, Viewport};
use crate::pose::PoseSource;
use crate::primitives::{DrawStyle, FrameSurface, PrimitiveKind, Primitives, ShaderProgram};
use crate::state::{AppMode, FrameInputs};

#[cfg(test)]
mod tests;

/// What a composed frame ended up drawing.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrameReport {
    pub arrow: Option<ArrowKind>,
    /// Angle handed to the arrow, after any test-arrow speed-up.
    pub sweep_degrees: Option<i32>,
    pub pilot_cube: bool,
    pub draw_calls: usize,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FrameOutcome {
    /// No pose was available; only the clear was issued.
    Skipped,
    Rendered(FrameReport),
}

/// Per-frame orchestration of the 3D guidance overlay.
///
/// Runs on the render thread only. Everything it reads from other threads
/// arrives as a [`FrameInputs`] snapshot and a [`PoseSource`].
pub struct FrameComposer {
    config: OverlayConfig,
    pipeline: PoseTransformPipeline,
    clock: AnimationClock,
    encoder: MoveInstructionEncoder,
    primitives: Primitives,
    program: ShaderProgram,
}

impl FrameComposer {
    pub fn new(
        config: OverlayConfig,
        primitives: Primitives,
        program: ShaderProgram,
        now_millis: i64,
    ) -> OverlayResult<Self> {
        config.validate()?;
        let pipeline = PoseTransformPipeline::from_config(&config);
        let encoder = MoveInstructionEncoder::standard(&config)?;
        Ok(Self::from_parts(config, pipeline, encoder, primitives, program, now_millis))
    }

    pub fn from_parts(
        config: OverlayConfig,
        pipeline: PoseTransformPipeline,
        encoder: MoveInstructionEncoder,
        primitives: Primitives,
        program: ShaderProgram,
        now_millis: i64,
    ) -> Self {
        Self {
            config,
            pipeline,
            clock: AnimationClock::new(now_millis),
            encoder,
            primitives,
            program,
        }
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn pipeline(&self) -> &PoseTransformPipeline {
        &self.pipeline
    }

    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    pub fn encoder(&self) -> &MoveInstructionEncoder {
        &self.encoder
    }

    /// Host resize callback.
    pub fn on_surface_changed(&mut self, width: u32, height: u32) -> Viewport {
        let viewport = self.pipeline.resize(width, height);
        log::info!("surface changed to {}x{}", viewport.width, viewport.height);
        viewport
    }

    pub fn compose_frame(
        &mut self,
        now_millis: i64,
        inputs: &FrameInputs,
        poses: &dyn PoseSource,
        surface: &mut dyn FrameSurface,
    ) -> OverlayResult<FrameOutcome> {
        surface.clear_color_and_depth();

        // Mode changes must reset the sweep even while tracking is lost.
        let instructing = inputs.mode.is_rotation_instruction();
        self.clock.update(instructing, now_millis);

        let Some(pose) = poses.current_pose(now_millis) else {
            log::trace!("no pose at {now_millis} ms, frame skipped");
            return Ok(FrameOutcome::Skipped);
        };

        let pv = self.pipeline.projection_view();
        let rotation = self.pipeline.rotation_matrix(pose.rotation_vector);
        let mut report = FrameReport {
            arrow: None,
            sweep_degrees: None,
            pilot_cube: false,
            draw_calls: 0,
        };

        if inputs.display.overlay_cube || instructing {
            // Resolve the arrow first so a bad move leaves nothing half drawn.
            let arrow = self.select_arrow(now_millis, inputs)?;
            let tracked = self.pipeline.tracked_mvp(&pv, pose.position, &rotation);

            self.primitives
                .get_mut(PrimitiveKind::OcclusionCube)
                .draw(&tracked, DrawStyle::Transparent, self.program);
            report.draw_calls += 1;

            if inputs.display.overlay_cube {
                self.primitives
                    .get_mut(PrimitiveKind::OverlayCube)
                    .draw(&tracked, DrawStyle::Wireframe, self.program);
                report.draw_calls += 1;
            }

            if let Some((placement, sweep)) = arrow {
                let mvp = placement.model_view_projection(&tracked, sweep as f32);
                self.primitives
                    .get_mut(PrimitiveKind::arrow(placement.mesh))
                    .draw(&mvp, DrawStyle::Tinted(placement.tint), self.program);
                report.draw_calls += 1;
                report.arrow = Some(placement.kind);
                report.sweep_degrees = Some(sweep);
            }
        }

        if inputs.display.pilot_cube_visible() {
            let extra = self.pipeline.rotation_matrix(inputs.pilot_rotation);
            let mvp = self.pipeline.pilot_mvp(&pv, &rotation, &extra);
            self.primitives
                .get_mut(PrimitiveKind::PilotCube)
                .draw(&mvp, DrawStyle::Opaque, self.program);
            report.draw_calls += 1;
            report.pilot_cube = true;
        }

        Ok(FrameOutcome::Rendered(report))
    }

    /// Test arrow wins over the mode-selected instruction arrow.
    fn select_arrow(
        &self,
        now_millis: i64,
        inputs: &FrameInputs,
    ) -> OverlayResult<Option<(ArrowPlacement, i32)>> {
        let diagnostic = inputs.display.camera_calibration_diagnostic;
        let angle = self
            .clock
            .angle_degrees(now_millis, self.config.rate_divisor_ms(diagnostic));

        if diagnostic {
            let sweep = angle * self.config.test_arrow_speed_multiplier;
            return Ok(Some((self.encoder.encode_test_arrow(), sweep)));
        }

        let placement = match inputs.mode {
            AppMode::RotateCube => self
                .encoder
                .encode_full_body(inputs.faces.observed_face_count()),
            AppMode::RotateFace => {
                let mnemonic = inputs.solution.current_mnemonic()?;
                self.encoder.encode_mnemonic(mnemonic, &inputs.faces)?
            }
            _ => return Ok(None),
        };
        Ok(Some((placement, angle)))
    }
}
