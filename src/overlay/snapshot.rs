use super::canvas::PixelPoint;
use crate::faces::{FaceRecognitionStatus, FaceStateSource, TileGrid};

/// Outcome of classifying one candidate quadrilateral.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RhombusStatus {
    NotProcessed,
    Not4Points,
    NotConvex,
    Area,
    Clockwise,
    Outlier,
    Valid,
}

impl RhombusStatus {
    pub const ALL: [RhombusStatus; 7] = [
        RhombusStatus::NotProcessed,
        RhombusStatus::Not4Points,
        RhombusStatus::NotConvex,
        RhombusStatus::Area,
        RhombusStatus::Clockwise,
        RhombusStatus::Outlier,
        RhombusStatus::Valid,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::NotProcessed => "Unknown",
            Self::Not4Points => "Not 4 Points",
            Self::NotConvex => "Not Convex",
            Self::Area => "Bad Area",
            Self::Clockwise => "Clockwise",
            Self::Outlier => "Outlier",
            Self::Valid => "Valid",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Rhombus {
    pub status: RhombusStatus,
    pub corners: [PixelPoint; 4],
}

impl Rhombus {
    pub fn new(status: RhombusStatus, corners: [PixelPoint; 4]) -> Self {
        Self { status, corners }
    }

    pub fn center(&self) -> PixelPoint {
        let (x, y) = self
            .corners
            .iter()
            .fold((0.0, 0.0), |(x, y), c| (x + c.x, y + c.y));
        PixelPoint::new(x / 4.0, y / 4.0)
    }
}

/// Least-squares fit of the 3x3 tile lattice in image space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LatticeFit {
    /// Center of tile `[0][0]`.
    pub origin: PixelPoint,
    /// Radians.
    pub alpha_angle: f64,
    /// Radians.
    pub beta_angle: f64,
    pub alpha_length: f64,
    pub beta_length: f64,
    pub gamma_ratio: f64,
    pub sigma: f64,
}

impl Default for LatticeFit {
    fn default() -> Self {
        Self {
            origin: PixelPoint::new(0.0, 0.0),
            alpha_angle: 0.0,
            beta_angle: std::f64::consts::FRAC_PI_2,
            alpha_length: 0.0,
            beta_length: 0.0,
            gamma_ratio: 0.0,
            sigma: 0.0,
        }
    }
}

impl LatticeFit {
    fn alpha_step(&self) -> (f64, f64) {
        (
            self.alpha_length * self.alpha_angle.cos(),
            self.alpha_length * self.alpha_angle.sin(),
        )
    }

    fn beta_step(&self) -> (f64, f64) {
        (
            self.beta_length * self.beta_angle.cos(),
            self.beta_length * self.beta_angle.sin(),
        )
    }

    pub fn tile_center(&self, n: usize, m: usize) -> PixelPoint {
        let (ax, ay) = self.alpha_step();
        let (bx, by) = self.beta_step();
        PixelPoint::new(
            self.origin.x + n as f64 * ax + m as f64 * bx,
            self.origin.y + n as f64 * ay + m as f64 * by,
        )
    }

    /// Outer corner of the lattice, half a tile back from `origin`.
    pub fn grid_corner(&self) -> PixelPoint {
        let (ax, ay) = self.alpha_step();
        let (bx, by) = self.beta_step();
        PixelPoint::new(self.origin.x - (ax + bx) / 2.0, self.origin.y - (ay + by) / 2.0)
    }

    /// The eight lattice lines: four along beta, then four along alpha.
    pub fn grid_lines(&self) -> Vec<(PixelPoint, PixelPoint)> {
        let corner = self.grid_corner();
        let (ax, ay) = self.alpha_step();
        let (bx, by) = self.beta_step();
        let mut lines = Vec::with_capacity(8);
        for n in 0..4 {
            let k = n as f64;
            lines.push((
                PixelPoint::new(corner.x + k * ax, corner.y + k * ay),
                PixelPoint::new(corner.x + 3.0 * bx + k * ax, corner.y + 3.0 * by + k * ay),
            ));
        }
        for m in 0..4 {
            let k = m as f64;
            lines.push((
                PixelPoint::new(corner.x + k * bx, corner.y + k * by),
                PixelPoint::new(corner.x + 3.0 * ax + k * bx, corner.y + 3.0 * ay + k * by),
            ));
        }
        lines
    }
}

/// Recognizer output for the face currently in front of the camera.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActiveFaceMetrics {
    pub status: FaceRecognitionStatus,
    pub lattice: LatticeFit,
    pub rhombus_moves: usize,
    pub rhombi: Vec<Rhombus>,
    pub observed: TileGrid,
    /// Mean RGB per tile, 0..=255.
    pub measured_colors: [[[f64; 3]; 3]; 3],
    pub luminous_offset: f64,
    pub color_error_before_correction: f64,
    pub color_error_after_correction: f64,
}

impl ActiveFaceMetrics {
    pub fn is_solved(&self) -> bool {
        self.status == FaceRecognitionStatus::Solved
    }

    pub fn rhombus_count(&self, status: RhombusStatus) -> usize {
        self.rhombi.iter().filter(|r| r.status == status).count()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StageTiming {
    pub name: &'static str,
    pub last_millis: f64,
    pub total_millis: f64,
    pub samples: usize,
}

impl StageTiming {
    pub fn mean_millis(&self) -> f64 {
        if self.samples == 0 {
            0.0
        } else {
            self.total_millis / self.samples as f64
        }
    }
}

/// Per-stage time consumption of the vision pipeline.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimingSnapshot {
    pub stages: Vec<StageTiming>,
    pub frames: usize,
}

impl TimingSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulates one stage interval into its named bucket.
    pub fn record(&mut self, name: &'static str, millis: f64) {
        if let Some(stage) = self.stages.iter_mut().find(|s| s.name == name) {
            stage.last_millis = millis;
            stage.total_millis += millis;
            stage.samples += 1;
        } else {
            self.stages.push(StageTiming {
                name,
                last_millis: millis,
                total_millis: millis,
                samples: 1,
            });
        }
    }

    pub fn end_frame(&mut self) {
        self.frames += 1;
    }

    pub fn last_frame_millis(&self) -> f64 {
        self.stages.iter().map(|s| s.last_millis).sum()
    }
}

/// Everything a diagnostic panel may read. All borrows are shared.
#[derive(Copy, Clone)]
pub struct OverlaySnapshot<'a> {
    pub active_face: Option<&'a ActiveFaceMetrics>,
    pub faces: &'a dyn FaceStateSource,
    pub timing: &'a TimingSnapshot,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_centers_step_along_both_lattice_axes() {
        let lattice = LatticeFit {
            origin: PixelPoint::new(100.0, 200.0),
            alpha_angle: 0.0,
            beta_angle: std::f64::consts::FRAC_PI_2,
            alpha_length: 40.0,
            beta_length: 30.0,
            ..LatticeFit::default()
        };
        let center = lattice.tile_center(2, 1);
        assert!((center.x - 180.0).abs() < 1e-9);
        assert!((center.y - 230.0).abs() < 1e-9);

        let corner = lattice.grid_corner();
        assert!((corner.x - 80.0).abs() < 1e-9);
        assert!((corner.y - 185.0).abs() < 1e-9);
        assert_eq!(lattice.grid_lines().len(), 8);
    }

    #[test]
    fn timing_accumulates_named_buckets() {
        let mut timing = TimingSnapshot::new();
        timing.record("gray", 2.0);
        timing.record("canny", 5.0);
        timing.end_frame();
        timing.record("gray", 4.0);
        timing.end_frame();

        assert_eq!(timing.frames, 2);
        assert_eq!(timing.stages.len(), 2);
        assert_eq!(timing.stages[0].mean_millis(), 3.0);
        assert_eq!(timing.last_frame_millis(), 9.0);
    }

    #[test]
    fn rhombus_center_is_corner_average() {
        let rhombus = Rhombus::new(
            RhombusStatus::Valid,
            [
                PixelPoint::new(0.0, 0.0),
                PixelPoint::new(2.0, 0.0),
                PixelPoint::new(2.0, 2.0),
                PixelPoint::new(0.0, 2.0),
            ],
        );
        assert_eq!(rhombus.center(), PixelPoint::new(1.0, 1.0));
    }
}
