use crate::faces::{CubeFaces, SolutionProgress};

/// Application mode as driven by the guidance state machine.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum AppMode {
    #[default]
    Start,
    GotIt,
    /// Exploring: the user is asked to turn the whole cube.
    RotateCube,
    Searching,
    Complete,
    BadColors,
    Verified,
    WaitTables,
    WaitingMove,
    /// Guided solve: the user is asked to turn one face.
    RotateFace,
    Done,
}

impl AppMode {
    /// Modes that show an instruction arrow and drive the sweep animation.
    pub fn is_rotation_instruction(self) -> bool {
        matches!(self, Self::RotateCube | Self::RotateFace)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Start => "START",
            Self::GotIt => "GOT_IT",
            Self::RotateCube => "ROTATE_CUBE",
            Self::Searching => "SEARCHING",
            Self::Complete => "COMPLETE",
            Self::BadColors => "BAD_COLORS",
            Self::Verified => "VERIFIED",
            Self::WaitTables => "WAIT_TABLES",
            Self::WaitingMove => "WAITING_MOVE",
            Self::RotateFace => "ROTATE_FACE",
            Self::Done => "DONE",
        }
    }
}

/// Which 2D diagnostic panel is drawn over the video frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DisplayMode {
    Layout,
    RhombusMetrics,
    FaceMetrics,
    CubeMetrics,
    Timing,
    ColorMetrics,
    #[default]
    Normal,
}

impl DisplayMode {
    pub const ALL: [DisplayMode; 7] = [
        DisplayMode::Layout,
        DisplayMode::RhombusMetrics,
        DisplayMode::FaceMetrics,
        DisplayMode::CubeMetrics,
        DisplayMode::Timing,
        DisplayMode::ColorMetrics,
        DisplayMode::Normal,
    ];
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DisplayFlags {
    /// Wireframe cube drawn over the tracked cube.
    pub overlay_cube: bool,
    /// Menu toggle for the pilot cube.
    pub pilot_cube: bool,
    /// State-model request to render the pilot cube.
    pub render_pilot_cube: bool,
    /// Camera-calibration diagnostic: continuous test arrow, slower pace.
    pub camera_calibration_diagnostic: bool,
}

impl Default for DisplayFlags {
    fn default() -> Self {
        Self {
            overlay_cube: false,
            pilot_cube: true,
            render_pilot_cube: true,
            camera_calibration_diagnostic: false,
        }
    }
}

impl DisplayFlags {
    pub fn pilot_cube_visible(&self) -> bool {
        self.pilot_cube && self.render_pilot_cube
    }
}

/// Everything besides the pose that a frame reads from other threads.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameInputs {
    pub mode: AppMode,
    pub display: DisplayFlags,
    pub display_mode: DisplayMode,
    pub faces: CubeFaces,
    pub solution: SolutionProgress,
    /// Extra user-requested pilot cube rotation, axis-angle in radians.
    pub pilot_rotation: [f64; 3],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_cube_and_face_rotation_are_instruction_modes() {
        assert!(AppMode::RotateCube.is_rotation_instruction());
        assert!(AppMode::RotateFace.is_rotation_instruction());
        for mode in [AppMode::Start, AppMode::WaitingMove, AppMode::Done, AppMode::Searching] {
            assert!(!mode.is_rotation_instruction(), "{}", mode.label());
        }
    }

    #[test]
    fn pilot_cube_needs_both_flags() {
        let mut flags = DisplayFlags::default();
        assert!(flags.pilot_cube_visible());
        flags.render_pilot_cube = false;
        assert!(!flags.pilot_cube_visible());
        flags.render_pilot_cube = true;
        flags.pilot_cube = false;
        assert!(!flags.pilot_cube_visible());
    }
}
