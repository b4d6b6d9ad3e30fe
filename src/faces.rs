use crate::error::{OverlayError, OverlayResult};
use crate::moves::Face;

/// Normalized RGBA color.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rgba(pub [f32; 4]);

impl Rgba {
    pub const BLACK: Rgba = Rgba([0.0, 0.0, 0.0, 1.0]);
    pub const WHITE: Rgba = Rgba([1.0, 1.0, 1.0, 1.0]);
    pub const GREY: Rgba = Rgba([0.5, 0.5, 0.5, 1.0]);
    pub const RED: Rgba = Rgba([1.0, 0.0, 0.0, 1.0]);
    pub const ORANGE: Rgba = Rgba([1.0, 127.0 / 255.0, 0.0, 1.0]);
    pub const YELLOW: Rgba = Rgba([1.0, 1.0, 0.0, 1.0]);
    pub const GREEN: Rgba = Rgba([0.0, 1.0, 0.0, 1.0]);
    pub const TRANSPARENT: Rgba = Rgba([0.0, 0.0, 0.0, 0.0]);

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0])
    }

    /// Components rescaled to 0..=255.
    pub fn to_rgb255(self) -> [f64; 3] {
        [
            self.0[0] as f64 * 255.0,
            self.0[1] as f64 * 255.0,
            self.0[2] as f64 * 255.0,
        ]
    }
}

/// Tint for full-body and diagnostic arrows.
pub const NEUTRAL_TINT: Rgba = Rgba::WHITE;
/// Tint for an edge arrow whose face center has not been recognized.
pub const UNKNOWN_TINT: Rgba = Rgba::GREY;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TileColor {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    White,
}

impl TileColor {
    pub const ALL: [TileColor; 6] = [
        TileColor::Red,
        TileColor::Orange,
        TileColor::Yellow,
        TileColor::Green,
        TileColor::Blue,
        TileColor::White,
    ];

    /// Reference color used for display and calibration.
    pub fn rgba(self) -> Rgba {
        match self {
            Self::Red => Rgba::from_rgb8(220, 20, 30),
            Self::Orange => Rgba::from_rgb8(240, 80, 0),
            Self::Yellow => Rgba::from_rgb8(230, 230, 20),
            Self::Green => Rgba::from_rgb8(0, 140, 40),
            Self::Blue => Rgba::from_rgb8(0, 60, 220),
            Self::White => Rgba::from_rgb8(225, 225, 225),
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Self::Red => 'R',
            Self::Orange => 'O',
            Self::Yellow => 'Y',
            Self::Green => 'G',
            Self::Blue => 'B',
            Self::White => 'W',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Red => "RED",
            Self::Orange => "ORANGE",
            Self::Yellow => "YELLOW",
            Self::Green => "GREEN",
            Self::Blue => "BLUE",
            Self::White => "WHITE",
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum FaceRecognitionStatus {
    #[default]
    Unknown,
    Insufficient,
    InvalidMath,
    BadMetrics,
    Incomplete,
    Inadequate,
    Blocked,
    Unstable,
    Solved,
}

impl FaceRecognitionStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Insufficient => "INSUFFICIENT",
            Self::InvalidMath => "INVALID_MATH",
            Self::BadMetrics => "BAD_METRICS",
            Self::Incomplete => "INCOMPLETE",
            Self::Inadequate => "INADEQUATE",
            Self::Blocked => "BLOCKED",
            Self::Unstable => "UNSTABLE",
            Self::Solved => "SOLVED",
        }
    }
}

pub type TileGrid = [[Option<TileColor>; 3]; 3];

/// Recognized tiles of one face, indexed `[n][m]`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FaceObservation {
    pub status: FaceRecognitionStatus,
    /// Orientation as seen by the recognizer.
    pub observed: TileGrid,
    /// Orientation after the unfolded-layout transform.
    pub transformed: TileGrid,
}

impl FaceObservation {
    pub fn solved(observed: TileGrid, transformed: TileGrid) -> Self {
        Self {
            status: FaceRecognitionStatus::Solved,
            observed,
            transformed,
        }
    }

    /// Solved face of one uniform color.
    pub fn uniform(color: TileColor) -> Self {
        let grid = [[Some(color); 3]; 3];
        Self::solved(grid, grid)
    }

    pub fn center(&self) -> Option<TileColor> {
        self.observed[1][1]
    }

    pub fn is_solved(&self) -> bool {
        self.status == FaceRecognitionStatus::Solved
    }
}

/// Face state collaborator as seen by the renderer.
pub trait FaceStateSource {
    fn face(&self, face: Face) -> Option<&FaceObservation>;

    fn observed_face_count(&self) -> usize;

    /// Observed tile at row `n`, column `m`.
    fn tile(&self, face: Face, n: usize, m: usize) -> Option<TileColor> {
        self.face(face)
            .and_then(|observation| observation.observed.get(n)?.get(m).copied())
            .flatten()
    }

    fn center_tile(&self, face: Face) -> Option<TileColor> {
        self.tile(face, 1, 1)
    }
}

/// Snapshot of all six faces.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CubeFaces {
    faces: [Option<FaceObservation>; 6],
}

impl CubeFaces {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every face solved with a conventional color scheme.
    pub fn standard_solved() -> Self {
        let mut faces = Self::new();
        let scheme = [
            (Face::Up, TileColor::White),
            (Face::Down, TileColor::Yellow),
            (Face::Left, TileColor::Orange),
            (Face::Right, TileColor::Red),
            (Face::Front, TileColor::Green),
            (Face::Back, TileColor::Blue),
        ];
        for (face, color) in scheme {
            faces.set(face, FaceObservation::uniform(color));
        }
        faces
    }

    pub fn set(&mut self, face: Face, observation: FaceObservation) {
        self.faces[face.index()] = Some(observation);
    }

    pub fn clear(&mut self, face: Face) {
        self.faces[face.index()] = None;
    }
}

impl FaceStateSource for CubeFaces {
    fn face(&self, face: Face) -> Option<&FaceObservation> {
        self.faces[face.index()].as_ref()
    }

    fn observed_face_count(&self) -> usize {
        self.faces.iter().flatten().count()
    }
}

/// Guided-solve sequence produced by the solver.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SolutionProgress {
    pub moves: Vec<String>,
    pub index: usize,
}

impl SolutionProgress {
    pub fn new(moves: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            moves: moves.into_iter().map(Into::into).collect(),
            index: 0,
        }
    }

    /// Parses a whitespace separated move string such as `"U R2 F'"`.
    pub fn from_sequence(sequence: &str) -> Self {
        Self::new(sequence.split_whitespace())
    }

    pub fn current_mnemonic(&self) -> OverlayResult<&str> {
        self.moves
            .get(self.index)
            .map(String::as_str)
            .ok_or(OverlayError::NoPendingMove {
                index: self.index,
                len: self.moves.len(),
            })
    }

    pub fn total(&self) -> usize {
        self.moves.len()
    }

    pub fn remaining(&self) -> usize {
        self.moves.len().saturating_sub(self.index)
    }

    pub fn is_complete(&self) -> bool {
        self.index >= self.moves.len()
    }

    pub fn advance(&mut self) {
        if !self.is_complete() {
            self.index += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_tile_reads_middle_of_observed_grid() {
        let mut grid: TileGrid = [[Some(TileColor::White); 3]; 3];
        grid[1][1] = Some(TileColor::Blue);
        let mut faces = CubeFaces::new();
        faces.set(Face::Front, FaceObservation::solved(grid, grid));

        assert_eq!(faces.center_tile(Face::Front), Some(TileColor::Blue));
        assert_eq!(faces.center_tile(Face::Back), None);
        assert_eq!(faces.tile(Face::Front, 0, 2), Some(TileColor::White));
        assert_eq!(faces.tile(Face::Front, 3, 0), None);
        assert_eq!(faces.observed_face_count(), 1);
    }

    #[test]
    fn standard_solved_has_six_distinct_centers() {
        let faces = CubeFaces::standard_solved();
        assert_eq!(faces.observed_face_count(), 6);
        let mut centers: Vec<_> = Face::ALL
            .iter()
            .filter_map(|f| faces.center_tile(*f))
            .collect();
        centers.dedup();
        assert_eq!(centers.len(), 6);
    }

    #[test]
    fn solution_progress_reports_missing_move() {
        let mut progress = SolutionProgress::from_sequence("U R2 F'");
        assert_eq!(progress.total(), 3);
        assert_eq!(progress.current_mnemonic(), Ok("U"));
        progress.advance();
        progress.advance();
        assert_eq!(progress.current_mnemonic(), Ok("F'"));
        assert_eq!(progress.remaining(), 1);
        progress.advance();
        assert!(progress.is_complete());
        assert_eq!(
            progress.current_mnemonic(),
            Err(OverlayError::NoPendingMove { index: 3, len: 3 })
        );
        progress.advance();
        assert_eq!(progress.index, 3);
    }
}
