use cgmath::{perspective, Deg, Vector3};

use crate::config::{CameraConfig, OverlayConfig};
use crate::matrix_operations::{look_at_view, multiply, translate, RenderMatrix};
use crate::pose::Pose;
use crate::rotation_vector::{rotation_vector_to_render_matrix, Rodrigues, RotationVectorToMatrix3x3};

/// Render surface size in pixels. Height is never zero.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height: height.max(1),
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

/// Produces the projection matching the camera used for pose estimation.
pub trait CameraCalibration {
    fn projection_matrix(&self, viewport: Viewport) -> RenderMatrix;
}

/// Pinhole projection from a vertical field of view.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FieldOfViewCalibration {
    pub camera: CameraConfig,
}

impl FieldOfViewCalibration {
    pub fn new(camera: CameraConfig) -> Self {
        Self { camera }
    }
}

impl CameraCalibration for FieldOfViewCalibration {
    fn projection_matrix(&self, viewport: Viewport) -> RenderMatrix {
        // Zero-width surfaces show up during window setup.
        let aspect = viewport.aspect().max(f32::EPSILON);
        perspective(
            Deg(self.camera.field_of_view_y_degrees),
            aspect,
            self.camera.near,
            self.camera.far,
        )
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DrawTarget {
    OcclusionCube,
    OverlayCube,
    Arrow,
    /// Tracks rotation only, shown at a fixed offset.
    PilotCube,
}

/// Builds model-view-projection matrices from tracked poses.
///
/// The projection is cached and only recomputed on resize; the view is a
/// fixed look-at down -Z.
pub struct PoseTransformPipeline {
    calibration: Box<dyn CameraCalibration + Send>,
    exp_map: Box<dyn RotationVectorToMatrix3x3 + Send>,
    viewport: Viewport,
    projection: RenderMatrix,
    view: RenderMatrix,
    pilot_offset: Vector3<f32>,
}

impl PoseTransformPipeline {
    pub fn new(
        calibration: Box<dyn CameraCalibration + Send>,
        exp_map: Box<dyn RotationVectorToMatrix3x3 + Send>,
        pilot_offset: Vector3<f32>,
    ) -> Self {
        let viewport = Viewport::default();
        let projection = calibration.projection_matrix(viewport);
        Self {
            calibration,
            exp_map,
            viewport,
            projection,
            view: look_at_view(),
            pilot_offset,
        }
    }

    pub fn from_config(config: &OverlayConfig) -> Self {
        Self::new(
            Box::new(FieldOfViewCalibration::new(config.camera)),
            Box::new(Rodrigues),
            config.pilot_cube_offset,
        )
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Viewport {
        self.viewport = Viewport::new(width, height);
        self.projection = self.calibration.projection_matrix(self.viewport);
        log::debug!(
            "projection recomputed for {}x{}",
            self.viewport.width,
            self.viewport.height
        );
        self.viewport
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn projection(&self) -> &RenderMatrix {
        &self.projection
    }

    pub fn view(&self) -> &RenderMatrix {
        &self.view
    }

    pub fn projection_view(&self) -> RenderMatrix {
        multiply(&self.projection, &self.view)
    }

    pub fn rotation_matrix(&self, rotation_vector: [f64; 3]) -> RenderMatrix {
        rotation_vector_to_render_matrix(rotation_vector, self.exp_map.as_ref())
    }

    /// `pv * T(position) * R`.
    pub fn tracked_mvp(&self, pv: &RenderMatrix, position: [f32; 3], rotation: &RenderMatrix) -> RenderMatrix {
        let translated = translate(pv, position[0], position[1], position[2]);
        multiply(&translated, rotation)
    }

    /// `pv * T(pilot offset) * R * extra`. The tracked position is never used.
    pub fn pilot_mvp(&self, pv: &RenderMatrix, rotation: &RenderMatrix, extra: &RenderMatrix) -> RenderMatrix {
        let translated = translate(pv, self.pilot_offset.x, self.pilot_offset.y, self.pilot_offset.z);
        multiply(&multiply(&translated, rotation), extra)
    }

    /// One-shot matrix for `target`; `pilot_rotation` only affects the pilot cube.
    pub fn model_view_projection(&self, target: DrawTarget, pose: &Pose, pilot_rotation: [f64; 3]) -> RenderMatrix {
        let pv = self.projection_view();
        let rotation = self.rotation_matrix(pose.rotation_vector);
        match target {
            DrawTarget::PilotCube => {
                let extra = self.rotation_matrix(pilot_rotation);
                self.pilot_mvp(&pv, &rotation, &extra)
            }
            DrawTarget::OcclusionCube | DrawTarget::OverlayCube | DrawTarget::Arrow => {
                self.tracked_mvp(&pv, pose.position, &rotation)
            }
        }
    }
}
