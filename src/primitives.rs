use std::sync::{Arc, Mutex, PoisonError};

use bytemuck::{Pod, Zeroable};

use crate::faces::Rgba;
use crate::matrix_operations::{flatten_matrix_for_gpu, RenderMatrix};
use crate::moves::ArrowAmount;

/// Linked shader program handle, as returned by the host's shader layer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ShaderProgram(pub u32);

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DrawStyle {
    Tinted(Rgba),
    Opaque,
    /// Writes depth only; establishes occlusion against the physical cube.
    Transparent,
    Wireframe,
}

impl DrawStyle {
    pub fn tint(&self) -> Rgba {
        match *self {
            Self::Tinted(color) => color,
            Self::Opaque | Self::Wireframe => Rgba::WHITE,
            Self::Transparent => Rgba::TRANSPARENT,
        }
    }
}

/// Per-draw uniform block.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MvpUniform {
    pub mvp: [f32; 16],
    pub tint: [f32; 4],
}

impl MvpUniform {
    pub fn new(mvp: &RenderMatrix, style: DrawStyle) -> Self {
        Self {
            mvp: flatten_matrix_for_gpu(mvp),
            tint: style.tint().0,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

/// A mesh supplied by the rendering-primitive layer.
pub trait Drawable {
    fn draw(&mut self, mvp: &RenderMatrix, style: DrawStyle, program: ShaderProgram);
}

/// Frame buffer operations of the host graphics system.
pub trait FrameSurface {
    fn clear_color_and_depth(&mut self);
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    QuarterTurnArrow,
    HalfTurnArrow,
    OcclusionCube,
    OverlayCube,
    PilotCube,
}

impl PrimitiveKind {
    pub fn arrow(amount: ArrowAmount) -> Self {
        match amount {
            ArrowAmount::QuarterTurn => Self::QuarterTurnArrow,
            ArrowAmount::HalfTurn => Self::HalfTurnArrow,
        }
    }
}

/// The drawables a frame may use.
pub struct Primitives {
    pub quarter_turn_arrow: Box<dyn Drawable + Send>,
    pub half_turn_arrow: Box<dyn Drawable + Send>,
    pub occlusion_cube: Box<dyn Drawable + Send>,
    pub overlay_cube: Box<dyn Drawable + Send>,
    pub pilot_cube: Box<dyn Drawable + Send>,
}

impl Primitives {
    pub fn get_mut(&mut self, kind: PrimitiveKind) -> &mut (dyn Drawable + Send) {
        match kind {
            PrimitiveKind::QuarterTurnArrow => self.quarter_turn_arrow.as_mut(),
            PrimitiveKind::HalfTurnArrow => self.half_turn_arrow.as_mut(),
            PrimitiveKind::OcclusionCube => self.occlusion_cube.as_mut(),
            PrimitiveKind::OverlayCube => self.overlay_cube.as_mut(),
            PrimitiveKind::PilotCube => self.pilot_cube.as_mut(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DrawEvent {
    Clear,
    Draw {
        kind: PrimitiveKind,
        uniform: MvpUniform,
        style: DrawStyle,
        program: ShaderProgram,
    },
}

impl DrawEvent {
    pub fn kind(&self) -> Option<PrimitiveKind> {
        match self {
            Self::Clear => None,
            Self::Draw { kind, .. } => Some(*kind),
        }
    }
}

/// Headless primitive layer that records every call in order.
#[derive(Clone, Default)]
pub struct DrawRecorder {
    events: Arc<Mutex<Vec<DrawEvent>>>,
}

struct RecordingDrawable {
    kind: PrimitiveKind,
    events: Arc<Mutex<Vec<DrawEvent>>>,
}

impl Drawable for RecordingDrawable {
    fn draw(&mut self, mvp: &RenderMatrix, style: DrawStyle, program: ShaderProgram) {
        let event = DrawEvent::Draw {
            kind: self.kind,
            uniform: MvpUniform::new(mvp, style),
            style,
            program,
        };
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl DrawRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn primitives(&self) -> Primitives {
        let recording = |kind| -> Box<dyn Drawable + Send> {
            Box::new(RecordingDrawable {
                kind,
                events: Arc::clone(&self.events),
            })
        };
        Primitives {
            quarter_turn_arrow: recording(PrimitiveKind::QuarterTurnArrow),
            half_turn_arrow: recording(PrimitiveKind::HalfTurnArrow),
            occlusion_cube: recording(PrimitiveKind::OcclusionCube),
            overlay_cube: recording(PrimitiveKind::OverlayCube),
            pilot_cube: recording(PrimitiveKind::PilotCube),
        }
    }

    /// Removes and returns everything recorded so far.
    pub fn take(&self) -> Vec<DrawEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FrameSurface for DrawRecorder {
    fn clear_color_and_depth(&mut self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(DrawEvent::Clear);
    }
}
