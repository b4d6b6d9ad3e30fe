use cgmath::{InnerSpace, Matrix3, Rad, Vector3};

use crate::matrix_operations::{identity_matrix, RenderMatrix};

/// Row-major 3x3 rotation matrix as produced by the vision library.
pub type VisionMatrix3 = [[f64; 3]; 3];

const IDENTITY3: VisionMatrix3 = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// Exponential map from an axis-angle vector to a 3x3 rotation.
///
/// Returns `None` when the result is undefined for the given input.
pub trait RotationVectorToMatrix3x3 {
    fn rotation_matrix(&self, rotation_vector: [f64; 3]) -> Option<VisionMatrix3>;
}

/// Rodrigues' formula via `cgmath`.
#[derive(Copy, Clone, Debug, Default)]
pub struct Rodrigues;

impl RotationVectorToMatrix3x3 for Rodrigues {
    fn rotation_matrix(&self, rotation_vector: [f64; 3]) -> Option<VisionMatrix3> {
        if rotation_vector.iter().any(|c| !c.is_finite()) {
            return None;
        }
        let v = Vector3::from(rotation_vector);
        let theta = v.magnitude();
        if theta < 1e-12 {
            return Some(IDENTITY3);
        }
        let m = Matrix3::from_axis_angle(v / theta, Rad(theta));
        // cgmath indexes columns first.
        Some(std::array::from_fn(|r| std::array::from_fn(|c| m[c][r])))
    }
}

/// Converts a vision-space rotation vector into a 4x4 render-space rotation.
///
/// Element (r, c) of the 3x3 block lands at linear index `r + c * 4`; the
/// homogeneous row and column are {0, 0, 0, 1}. The block is copied as-is:
/// a non-orthonormal result from `exp_map` is an upstream defect and is not
/// repaired here. Non-finite input, or an undefined result, yields identity.
pub fn rotation_vector_to_render_matrix(
    rotation_vector: [f64; 3],
    exp_map: &dyn RotationVectorToMatrix3x3,
) -> RenderMatrix {
    if rotation_vector.iter().any(|c| !c.is_finite()) {
        log::warn!("non-finite rotation vector {rotation_vector:?}, using identity rotation");
        return identity_matrix();
    }

    let Some(rotation) = exp_map.rotation_matrix(rotation_vector) else {
        log::warn!("rotation vector {rotation_vector:?} has no defined rotation, using identity");
        return identity_matrix();
    };
    if rotation.iter().flatten().any(|e| !e.is_finite()) {
        log::warn!("rotation matrix for {rotation_vector:?} is not finite, using identity");
        return identity_matrix();
    }

    let mut render = [0.0f32; 16];
    render[3 * 4 + 3] = 1.0;
    for r in 0..3 {
        for c in 0..3 {
            render[r + c * 4] = rotation[r][c] as f32;
        }
    }
    RenderMatrix::from(render_columns(render))
}

fn render_columns(flat: [f32; 16]) -> [[f32; 4]; 4] {
    std::array::from_fn(|c| std::array::from_fn(|r| flat[r + c * 4]))
}
