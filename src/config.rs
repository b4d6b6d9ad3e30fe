use cgmath::Vector3;

use crate::error::{OverlayError, OverlayResult};

/// Milliseconds per degree of arrow sweep in normal operation.
pub const NORMAL_RATE_DIVISOR_MS: i64 = 10;
/// Milliseconds per degree while the camera-calibration diagnostic is on.
pub const DIAGNOSTIC_RATE_DIVISOR_MS: i64 = 20;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CameraConfig {
    pub field_of_view_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            field_of_view_y_degrees: 45.0,
            near: 0.5,
            far: 100.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct OverlayConfig {
    pub normal_rate_divisor_ms: i64,
    pub diagnostic_rate_divisor_ms: i64,
    /// Test arrow sweeps this many times faster than the instruction arrows.
    pub test_arrow_speed_multiplier: i32,
    /// Pilot cube sits here regardless of the tracked position.
    pub pilot_cube_offset: Vector3<f32>,
    /// Distance from cube center to the face an edge arrow is drawn on.
    pub face_offset: f32,
    pub edge_arrow_scale: Vector3<f32>,
    pub full_body_arrow_scale: Vector3<f32>,
    pub test_arrow_scale: Vector3<f32>,
    /// Full-body sweep starts this many degrees before zero.
    pub full_body_sweep_start_degrees: f32,
    pub cosmetic_face_offset_degrees: f32,
    pub camera: CameraConfig,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            normal_rate_divisor_ms: NORMAL_RATE_DIVISOR_MS,
            diagnostic_rate_divisor_ms: DIAGNOSTIC_RATE_DIVISOR_MS,
            test_arrow_speed_multiplier: 4,
            pilot_cube_offset: Vector3::new(-6.0, 0.0, -15.0),
            face_offset: 2.0,
            edge_arrow_scale: Vector3::new(1.5, 1.5, 1.0),
            full_body_arrow_scale: Vector3::new(2.0, 2.0, 3.0),
            test_arrow_scale: Vector3::new(2.0, 2.0, 0.5),
            full_body_sweep_start_degrees: -60.0,
            cosmetic_face_offset_degrees: 30.0,
            camera: CameraConfig::default(),
        }
    }
}

impl OverlayConfig {
    pub fn validate(&self) -> OverlayResult<()> {
        if self.normal_rate_divisor_ms <= 0 || self.diagnostic_rate_divisor_ms <= 0 {
            return Err(OverlayError::invalid_config(format!(
                "rate divisors must be positive (normal {}, diagnostic {})",
                self.normal_rate_divisor_ms, self.diagnostic_rate_divisor_ms
            )));
        }
        if self.test_arrow_speed_multiplier <= 0 {
            return Err(OverlayError::invalid_config(
                "test arrow speed multiplier must be positive",
            ));
        }

        let vectors = [
            ("pilot_cube_offset", self.pilot_cube_offset),
            ("edge_arrow_scale", self.edge_arrow_scale),
            ("full_body_arrow_scale", self.full_body_arrow_scale),
            ("test_arrow_scale", self.test_arrow_scale),
        ];
        for (name, v) in vectors {
            if !(v.x.is_finite() && v.y.is_finite() && v.z.is_finite()) {
                return Err(OverlayError::invalid_config(format!("{name} is not finite")));
            }
        }
        let scalars = [
            ("face_offset", self.face_offset),
            ("full_body_sweep_start_degrees", self.full_body_sweep_start_degrees),
            ("cosmetic_face_offset_degrees", self.cosmetic_face_offset_degrees),
        ];
        for (name, value) in scalars {
            if !value.is_finite() {
                return Err(OverlayError::invalid_config(format!("{name} is not finite")));
            }
        }

        let camera = &self.camera;
        if !(camera.field_of_view_y_degrees > 0.0 && camera.field_of_view_y_degrees < 180.0) {
            return Err(OverlayError::invalid_config(format!(
                "field of view {} must be in (0, 180) degrees",
                camera.field_of_view_y_degrees
            )));
        }
        if !(camera.near > 0.0 && camera.far > camera.near && camera.far.is_finite()) {
            return Err(OverlayError::invalid_config(format!(
                "clip range {}..{} must satisfy 0 < near < far",
                camera.near, camera.far
            )));
        }
        Ok(())
    }

    pub fn rate_divisor_ms(&self, diagnostic: bool) -> i64 {
        if diagnostic {
            self.diagnostic_rate_divisor_ms
        } else {
            self.normal_rate_divisor_ms
        }
    }
}
