use cgmath::Vector3;

use crate::config::OverlayConfig;
use crate::error::{OverlayError, OverlayResult};
use crate::faces::{FaceStateSource, Rgba, NEUTRAL_TINT, UNKNOWN_TINT};
use crate::matrix_operations::{apply_ops, RenderMatrix, TransformOp, X_AXIS, Y_AXIS, Z_AXIS};
use crate::moves::{ArrowAmount, Face, MoveToken, Rotation};

/// Which end of the sweep carries the arrowhead.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Sweep 0 -> -90 degrees, no flip.
    Positive,
    /// Sweep 0 -> +90 degrees followed by the -90/+180 flip pair.
    Negative,
}

/// Placement constants for one face.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FacePlacement {
    pub face: Face,
    /// Unit axis pointing from the cube center to the face.
    pub normal: Vector3<f32>,
    /// Axis of the fixed 90 degree rotation that lays the arrow onto the face.
    pub base_rotation_axis: Option<Vector3<f32>>,
    /// Whether the cosmetic roll around the arrow's forward axis is applied.
    pub cosmetic_roll: bool,
    /// The requested rotation that renders on the negative branch.
    pub negative_on: Rotation,
}

impl FacePlacement {
    pub fn direction(&self, rotation: Rotation) -> Direction {
        if rotation == self.negative_on {
            Direction::Negative
        } else {
            Direction::Positive
        }
    }
}

const STANDARD_PLACEMENTS: [FacePlacement; 6] = [
    FacePlacement {
        face: Face::Up,
        normal: Y_AXIS,
        base_rotation_axis: Some(X_AXIS),
        cosmetic_roll: false,
        negative_on: Rotation::Clockwise,
    },
    FacePlacement {
        face: Face::Down,
        normal: Vector3 { x: 0.0, y: -1.0, z: 0.0 },
        base_rotation_axis: Some(X_AXIS),
        cosmetic_roll: false,
        negative_on: Rotation::CounterClockwise,
    },
    FacePlacement {
        face: Face::Left,
        normal: Vector3 { x: -1.0, y: 0.0, z: 0.0 },
        base_rotation_axis: Some(Y_AXIS),
        cosmetic_roll: true,
        negative_on: Rotation::Clockwise,
    },
    FacePlacement {
        face: Face::Right,
        normal: X_AXIS,
        base_rotation_axis: Some(Y_AXIS),
        cosmetic_roll: true,
        negative_on: Rotation::CounterClockwise,
    },
    FacePlacement {
        face: Face::Front,
        normal: Z_AXIS,
        base_rotation_axis: None,
        cosmetic_roll: true,
        negative_on: Rotation::CounterClockwise,
    },
    FacePlacement {
        face: Face::Back,
        normal: Vector3 { x: 0.0, y: 0.0, z: -1.0 },
        base_rotation_axis: None,
        cosmetic_roll: true,
        negative_on: Rotation::Clockwise,
    },
];

fn is_unit_axis(v: &Vector3<f32>) -> bool {
    let components = [v.x, v.y, v.z];
    components.iter().filter(|c| **c == 0.0).count() == 2
        && components.iter().filter(|c| c.abs() == 1.0).count() == 1
}

/// Per-face lookup, validated on construction.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceTable {
    entries: [FacePlacement; 6],
}

impl FaceTable {
    pub fn new(placements: &[FacePlacement]) -> OverlayResult<Self> {
        let mut slots: [Option<FacePlacement>; 6] = [None; 6];
        for placement in placements {
            let slot = &mut slots[placement.face.index()];
            if slot.is_some() {
                return Err(OverlayError::invalid_face_table(format!(
                    "{} face listed twice",
                    placement.face.label()
                )));
            }
            if !is_unit_axis(&placement.normal) {
                return Err(OverlayError::invalid_face_table(format!(
                    "{} face normal {:?} is not a unit axis",
                    placement.face.label(),
                    placement.normal
                )));
            }
            if let Some(axis) = placement.base_rotation_axis {
                if !is_unit_axis(&axis) {
                    return Err(OverlayError::invalid_face_table(format!(
                        "{} face base rotation axis {:?} is not a unit axis",
                        placement.face.label(),
                        axis
                    )));
                }
            }
            if placement.negative_on == Rotation::OneHundredEighty {
                return Err(OverlayError::invalid_face_table(format!(
                    "{} face maps the half turn to the negative branch",
                    placement.face.label()
                )));
            }
            *slot = Some(*placement);
        }

        let mut entries = STANDARD_PLACEMENTS;
        for face in Face::ALL {
            entries[face.index()] = slots[face.index()].ok_or_else(|| {
                OverlayError::invalid_face_table(format!("{} face is missing", face.label()))
            })?;
        }
        Ok(Self { entries })
    }

    pub fn standard() -> OverlayResult<Self> {
        Self::new(&STANDARD_PLACEMENTS)
    }

    pub fn placement(&self, face: Face) -> &FacePlacement {
        &self.entries[face.index()]
    }
}

/// What an arrow is instructing.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ArrowKind {
    /// Turn a single face.
    Edge { token: MoveToken, direction: Direction },
    /// Turn the whole cube to reveal another face.
    FullBody { even_face_count: bool },
    /// Camera-calibration check arrow spinning around the cube.
    Test,
}

/// Everything needed to draw one instruction arrow.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrowPlacement {
    pub kind: ArrowKind,
    pub mesh: ArrowAmount,
    /// Translation and fixed rotations applied before the animated sweep.
    pub base_ops: Vec<TransformOp>,
    pub scale: Vector3<f32>,
    pub tint: Rgba,
    sweep_start_degrees: f32,
}

impl ArrowPlacement {
    pub fn direction(&self) -> Direction {
        match self.kind {
            ArrowKind::Edge { direction, .. } => direction,
            ArrowKind::FullBody { .. } => Direction::Negative,
            ArrowKind::Test => Direction::Positive,
        }
    }

    /// Full op sequence for a given sweep angle.
    pub fn model_ops(&self, sweep_degrees: f32) -> Vec<TransformOp> {
        let mut ops = self.base_ops.clone();
        match self.kind {
            ArrowKind::Test => {
                ops.push(TransformOp::rotate(sweep_degrees, Y_AXIS));
                // Test arrow spins about the Y axis.
                ops.push(TransformOp::rotate(90.0, X_AXIS));
            }
            ArrowKind::FullBody { .. } => {
                ops.push(TransformOp::rotate(sweep_degrees + self.sweep_start_degrees, Z_AXIS));
                push_flip_pair(&mut ops);
            }
            ArrowKind::Edge { direction, .. } => match direction {
                Direction::Negative => {
                    ops.push(TransformOp::rotate(sweep_degrees, Z_AXIS));
                    push_flip_pair(&mut ops);
                }
                Direction::Positive => {
                    ops.push(TransformOp::rotate(-sweep_degrees, Z_AXIS));
                }
            },
        }
        ops.push(TransformOp::Scale(self.scale));
        ops
    }

    pub fn model_view_projection(&self, tracked_mvp: &RenderMatrix, sweep_degrees: f32) -> RenderMatrix {
        apply_ops(tracked_mvp, &self.model_ops(sweep_degrees))
    }
}

/// Puts the arrowhead on the trailing edge of the sweep.
fn push_flip_pair(ops: &mut Vec<TransformOp>) {
    ops.push(TransformOp::rotate(-90.0, Z_AXIS));
    ops.push(TransformOp::rotate(180.0, Y_AXIS));
}

/// Maps move tokens and cube-rotation requests onto arrow placements.
#[derive(Clone, Debug)]
pub struct MoveInstructionEncoder {
    table: FaceTable,
    face_offset: f32,
    cosmetic_roll_degrees: f32,
    edge_scale: Vector3<f32>,
    full_body_scale: Vector3<f32>,
    full_body_sweep_start_degrees: f32,
    test_scale: Vector3<f32>,
}

impl MoveInstructionEncoder {
    pub fn new(table: FaceTable, config: &OverlayConfig) -> Self {
        Self {
            table,
            face_offset: config.face_offset,
            cosmetic_roll_degrees: config.cosmetic_face_offset_degrees,
            edge_scale: config.edge_arrow_scale,
            full_body_scale: config.full_body_arrow_scale,
            full_body_sweep_start_degrees: config.full_body_sweep_start_degrees,
            test_scale: config.test_arrow_scale,
        }
    }

    pub fn standard(config: &OverlayConfig) -> OverlayResult<Self> {
        Ok(Self::new(FaceTable::standard()?, config))
    }

    pub fn table(&self) -> &FaceTable {
        &self.table
    }

    /// Parses `mnemonic` and encodes it. A malformed mnemonic is a hard error.
    pub fn encode_mnemonic(
        &self,
        mnemonic: &str,
        faces: &dyn FaceStateSource,
    ) -> OverlayResult<ArrowPlacement> {
        let token = MoveToken::parse(mnemonic).inspect_err(|err| {
            log::error!("refusing to render move instruction: {err}");
        })?;
        Ok(self.encode_move(token, faces))
    }

    pub fn encode_move(&self, token: MoveToken, faces: &dyn FaceStateSource) -> ArrowPlacement {
        let placement = self.table.placement(token.face);
        let direction = placement.direction(token.rotation());

        let tint = match faces.center_tile(token.face) {
            Some(color) => color.rgba(),
            None => {
                log::warn!("{} face center is unknown, tinting arrow grey", token.face.label());
                UNKNOWN_TINT
            }
        };

        let mut base_ops = vec![TransformOp::Translate(placement.normal * self.face_offset)];
        if let Some(axis) = placement.base_rotation_axis {
            base_ops.push(TransformOp::rotate(90.0, axis));
        }
        if placement.cosmetic_roll {
            base_ops.push(TransformOp::rotate(self.cosmetic_roll_degrees, Z_AXIS));
        }

        ArrowPlacement {
            kind: ArrowKind::Edge { token, direction },
            mesh: token.amount(),
            base_ops,
            scale: self.edge_scale,
            tint,
            sweep_start_degrees: 0.0,
        }
    }

    /// Arrow asking the user to turn the whole cube. The reference side
    /// alternates with the parity of the number of faces seen so far.
    pub fn encode_full_body(&self, observed_face_count: usize) -> ArrowPlacement {
        let even_face_count = observed_face_count % 2 == 0;
        let base_ops = if even_face_count {
            vec![TransformOp::rotate(-90.0, Y_AXIS)]
        } else {
            Vec::new()
        };
        ArrowPlacement {
            kind: ArrowKind::FullBody { even_face_count },
            mesh: ArrowAmount::QuarterTurn,
            base_ops,
            scale: self.full_body_scale,
            tint: NEUTRAL_TINT,
            sweep_start_degrees: self.full_body_sweep_start_degrees,
        }
    }

    pub fn encode_test_arrow(&self) -> ArrowPlacement {
        ArrowPlacement {
            kind: ArrowKind::Test,
            mesh: ArrowAmount::QuarterTurn,
            base_ops: Vec::new(),
            scale: self.test_scale,
            tint: NEUTRAL_TINT,
            sweep_start_degrees: 0.0,
        }
    }
}
