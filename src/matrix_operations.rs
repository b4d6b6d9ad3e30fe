use cgmath::{Deg, InnerSpace, Matrix4, Point3, SquareMatrix, Vector3};

/// 4x4 homogeneous matrix, column-major, in render convention.
pub type RenderMatrix = Matrix4<f32>;

pub const X_AXIS: Vector3<f32> = Vector3 { x: 1.0, y: 0.0, z: 0.0 };
pub const Y_AXIS: Vector3<f32> = Vector3 { x: 0.0, y: 1.0, z: 0.0 };
pub const Z_AXIS: Vector3<f32> = Vector3 { x: 0.0, y: 0.0, z: 1.0 };

pub fn identity_matrix() -> RenderMatrix {
    RenderMatrix::identity()
}

/// Right-multiplies `m` by a translation.
pub fn translate(m: &RenderMatrix, x: f32, y: f32, z: f32) -> RenderMatrix {
    *m * Matrix4::from_translation(Vector3::new(x, y, z))
}

/// Right-multiplies `m` by a rotation of `degrees` around `axis`.
///
/// The axis does not need to be normalized. A zero axis leaves `m` unchanged.
pub fn rotate(m: &RenderMatrix, degrees: f32, axis: Vector3<f32>) -> RenderMatrix {
    let length = axis.magnitude();
    if length <= f32::EPSILON || !length.is_finite() {
        return *m;
    }
    *m * Matrix4::from_axis_angle(axis / length, Deg(degrees))
}

/// Right-multiplies `m` by a non-uniform scale.
pub fn scale(m: &RenderMatrix, x: f32, y: f32, z: f32) -> RenderMatrix {
    *m * Matrix4::from_nonuniform_scale(x, y, z)
}

/// Right-multiplies `m` by an arbitrary matrix, e.g. a pose rotation.
pub fn multiply(m: &RenderMatrix, rhs: &RenderMatrix) -> RenderMatrix {
    *m * *rhs
}

/// Camera at the origin looking down -Z with +Y up.
pub fn look_at_view() -> RenderMatrix {
    Matrix4::look_at_rh(
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(0.0, 0.0, -1.0),
        Vector3::new(0.0, 1.0, 0.0),
    )
}

/// Column-major element array, linear index `row + col * 4`.
pub fn flatten_matrix_for_gpu(m: &RenderMatrix) -> [f32; 16] {
    *AsRef::<[f32; 16]>::as_ref(m)
}

/// Element (row, col) of a render matrix.
pub fn element(m: &RenderMatrix, row: usize, col: usize) -> f32 {
    m[col][row]
}

pub fn approx_eq(a: &RenderMatrix, b: &RenderMatrix, epsilon: f32) -> bool {
    flatten_matrix_for_gpu(a)
        .iter()
        .zip(flatten_matrix_for_gpu(b).iter())
        .all(|(x, y)| (x - y).abs() <= epsilon)
}

/// A single step of a model transform, applied by right-multiplication.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TransformOp {
    Translate(Vector3<f32>),
    Rotate { degrees: f32, axis: Vector3<f32> },
    Scale(Vector3<f32>),
}

impl TransformOp {
    pub fn rotate(degrees: f32, axis: Vector3<f32>) -> Self {
        Self::Rotate { degrees, axis }
    }

    pub fn apply(&self, m: &RenderMatrix) -> RenderMatrix {
        match *self {
            Self::Translate(v) => translate(m, v.x, v.y, v.z),
            Self::Rotate { degrees, axis } => rotate(m, degrees, axis),
            Self::Scale(v) => scale(m, v.x, v.y, v.z),
        }
    }
}

pub fn apply_ops(m: &RenderMatrix, ops: &[TransformOp]) -> RenderMatrix {
    ops.iter().fold(*m, |acc, op| op.apply(&acc))
}
