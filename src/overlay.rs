//! 2D diagnostic panels drawn over the camera frame.
//!
//! Every panel is a pure function of the snapshot it is given.

pub mod canvas;
pub mod snapshot;

use canvas::{Canvas, PixelPoint};
use snapshot::{ActiveFaceMetrics, OverlaySnapshot, RhombusStatus};

use crate::faces::{FaceRecognitionStatus, FaceStateSource, Rgba, TileColor};
use crate::moves::Face;
use crate::state::DisplayMode;

const PANEL_HEIGHT: f64 = 720.0;
const PANEL_WIDTH: f64 = 450.0;
const COLOR_PANEL_WIDTH: f64 = 570.0;
const LAYOUT_TILE_SIZE: f64 = 35.0;
const LAYOUT_TOP: f64 = 70.0;
const LAYOUT_SECOND_OFFSET: f64 = 350.0;
const TEXT_LEFT: f64 = 50.0;
const TEXT_SCALE: f32 = 2.0;
const LARGE_TEXT_SCALE: f32 = 3.0;
const UV_CENTER: (f64, f64) = (256.0, 400.0);
const UV_HALF_EXTENT: f64 = 256.0;

/// Unfolded layout position of each face, in tiles.
const LAYOUT_CELLS: [(Face, f64, f64); 6] = [
    (Face::Up, 3.0, 0.0),
    (Face::Left, 0.0, 3.0),
    (Face::Front, 3.0, 3.0),
    (Face::Right, 6.0, 3.0),
    (Face::Back, 9.0, 3.0),
    (Face::Down, 3.0, 6.0),
];

const CUBE_METRICS_ORDER: [Face; 6] = [Face::Up, Face::Right, Face::Front, Face::Down, Face::Left, Face::Back];

/// BT.601 luma with analog U/V, all in the 0..=255 RGB range.
pub fn yuv_from_rgb(rgb: [f64; 3]) -> [f64; 3] {
    let [r, g, b] = rgb;
    [
        0.299 * r + 0.587 * g + 0.114 * b,
        -0.147 * r - 0.289 * g + 0.436 * b,
        0.615 * r - 0.515 * g - 0.100 * b,
    ]
}

pub fn lattice_color(status: FaceRecognitionStatus) -> Rgba {
    use FaceRecognitionStatus::*;
    match status {
        Unknown | Insufficient | InvalidMath => Rgba::RED,
        BadMetrics | Incomplete | Inadequate | Blocked | Unstable => Rgba::ORANGE,
        Solved => Rgba::YELLOW,
    }
}

fn point(x: f64, y: f64) -> PixelPoint {
    PixelPoint::new(x, y)
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DiagnosticOverlayCompositor {
    /// User-tunable shift of the corrected luminance column.
    pub luminous_offset_param: f64,
}

impl Default for DiagnosticOverlayCompositor {
    fn default() -> Self {
        Self {
            luminous_offset_param: 0.0,
        }
    }
}

impl DiagnosticOverlayCompositor {
    pub fn new(luminous_offset_param: f64) -> Self {
        Self {
            luminous_offset_param,
        }
    }

    /// Face lattice first, then the panel for `mode`.
    pub fn render(&self, canvas: &mut dyn Canvas, mode: DisplayMode, snapshot: &OverlaySnapshot<'_>) {
        if let Some(face) = snapshot.active_face {
            self.face_overlay(canvas, face);
        }

        match mode {
            DisplayMode::Layout => self.layout_panel(canvas, snapshot.faces),
            DisplayMode::RhombusMetrics => self.rhombus_panel(canvas, snapshot.active_face),
            DisplayMode::FaceMetrics => self.face_metrics_panel(canvas, snapshot.active_face),
            DisplayMode::CubeMetrics => self.cube_metrics_panel(canvas, snapshot.faces),
            DisplayMode::Timing => self.timing_panel(canvas, snapshot),
            DisplayMode::ColorMetrics => self.color_panel(canvas, snapshot.active_face),
            DisplayMode::Normal => {
                // Keeps the user instruction strip readable.
                canvas.fill_rect(point(0.0, 60.0), point(350.0, PANEL_HEIGHT), Rgba::BLACK);
            }
        }
    }

    fn face_overlay(&self, canvas: &mut dyn Canvas, face: &ActiveFaceMetrics) {
        let color = lattice_color(face.status);
        for (start, end) in face.lattice.grid_lines() {
            canvas.line(start, end, color, 3.0);
        }

        if face.is_solved() {
            for n in 0..3 {
                for m in 0..3 {
                    let Some(tile) = face.observed[n][m] else {
                        continue;
                    };
                    let center = face.lattice.tile_center(n, m);
                    canvas.text(
                        point(center.x - 10.0, center.y + 10.0),
                        &tile.symbol().to_string(),
                        LARGE_TEXT_SCALE,
                        Rgba::BLACK,
                    );
                }
            }
        } else {
            for rhombus in &face.rhombi {
                for i in 0..4 {
                    canvas.line(rhombus.corners[i], rhombus.corners[(i + 1) % 4], Rgba::GREEN, 3.0);
                }
            }
        }
    }

    fn black_panel(&self, canvas: &mut dyn Canvas, width: f64) {
        canvas.fill_rect(point(0.0, 0.0), point(width, PANEL_HEIGHT), Rgba::BLACK);
    }

    fn flat_face(
        &self,
        canvas: &mut dyn Canvas,
        faces: &dyn FaceStateSource,
        face: Face,
        origin: PixelPoint,
        tile_size: f64,
        observed: bool,
    ) {
        let solved = faces.face(face).filter(|f| f.is_solved());
        let Some(observation) = solved else {
            canvas.fill_rect(
                origin,
                point(origin.x + 3.0 * tile_size, origin.y + 3.0 * tile_size),
                Rgba::GREY,
            );
            return;
        };
        let grid = if observed {
            &observation.observed
        } else {
            &observation.transformed
        };
        for (n, column) in grid.iter().enumerate() {
            for (m, tile) in column.iter().enumerate() {
                let x = origin.x + tile_size * n as f64;
                let y = origin.y + tile_size * m as f64;
                let color = tile.map_or(Rgba::GREY, TileColor::rgba);
                canvas.fill_rect(point(x, y), point(x + tile_size, y + tile_size), color);
            }
        }
    }

    fn layout_panel(&self, canvas: &mut dyn Canvas, faces: &dyn FaceStateSource) {
        self.black_panel(canvas, PANEL_WIDTH);
        for (observed, top) in [(true, LAYOUT_TOP), (false, LAYOUT_TOP + LAYOUT_SECOND_OFFSET)] {
            for (face, column, row) in LAYOUT_CELLS {
                let origin = point(column * LAYOUT_TILE_SIZE, row * LAYOUT_TILE_SIZE + top);
                self.flat_face(canvas, faces, face, origin, LAYOUT_TILE_SIZE, observed);
            }
        }
    }

    fn rhombus_panel(&self, canvas: &mut dyn Canvas, face: Option<&ActiveFaceMetrics>) {
        self.black_panel(canvas, PANEL_WIDTH);
        let count = |status: RhombusStatus| face.map_or(0, |f| f.rhombus_count(status));
        let mut y = 300.0;
        for status in RhombusStatus::ALL {
            let text = format!("Num {}: {}", status.label(), count(status));
            canvas.text(point(TEXT_LEFT, y), &text, TEXT_SCALE, Rgba::WHITE);
            y += 50.0;
        }
        let total = face.map_or(0, |f| f.rhombi.len());
        canvas.text(point(TEXT_LEFT, y), &format!("Total Num: {total}"), TEXT_SCALE, Rgba::WHITE);
    }

    fn face_metrics_panel(&self, canvas: &mut dyn Canvas, face: Option<&ActiveFaceMetrics>) {
        self.black_panel(canvas, PANEL_WIDTH);
        let Some(face) = face else {
            return;
        };

        let size = 50.0;
        if face.is_solved() {
            for n in 0..3 {
                for m in 0..3 {
                    let x = 50.0 + size * n as f64;
                    let y = 50.0 + size * m as f64;
                    let color = face.observed[n][m].map_or(Rgba::GREY, TileColor::rgba);
                    canvas.fill_rect(point(x, y), point(x + size, y + size), color);
                }
            }
        } else {
            canvas.fill_rect(point(50.0, 50.0), point(50.0 + 3.0 * size, 50.0 + 3.0 * size), Rgba::GREY);
        }

        let lattice = &face.lattice;
        let lines = [
            format!("Status = {}", face.status.label()),
            format!("AlphaA = {:4.1}", lattice.alpha_angle.to_degrees()),
            format!("BetaA  = {:4.1}", lattice.beta_angle.to_degrees()),
            format!("AlphaL = {:4.0}", lattice.alpha_length),
            format!("Beta L = {:4.0}", lattice.beta_length),
            format!("Gamma  = {:4.2}", lattice.gamma_ratio),
            format!("Sigma  = {:5.0}", lattice.sigma),
            format!("Moves  = {}", face.rhombus_moves),
            format!("#Rhombi= {}", face.rhombi.len()),
        ];
        for (i, text) in lines.iter().enumerate() {
            canvas.text(point(TEXT_LEFT, 300.0 + 50.0 * i as f64), text, TEXT_SCALE, Rgba::WHITE);
        }
    }

    fn cube_metrics_panel(&self, canvas: &mut dyn Canvas, faces: &dyn FaceStateSource) {
        self.black_panel(canvas, PANEL_WIDTH);
        for (pos, face) in CUBE_METRICS_ORDER.into_iter().enumerate() {
            let center = faces.center_tile(face).map_or("na", TileColor::label);
            let text = format!("{:<7}{}", format!("{}:", face.label()), center);
            canvas.text(point(TEXT_LEFT, 100.0 + 50.0 * pos as f64), &text, TEXT_SCALE, Rgba::WHITE);
        }
    }

    fn timing_panel(&self, canvas: &mut dyn Canvas, snapshot: &OverlaySnapshot<'_>) {
        self.black_panel(canvas, PANEL_WIDTH);
        let timing = snapshot.timing;
        canvas.text(
            point(TEXT_LEFT, 100.0),
            &format!("Frames = {}", timing.frames),
            TEXT_SCALE,
            Rgba::WHITE,
        );
        for (i, stage) in timing.stages.iter().enumerate() {
            let text = format!(
                "{:<10}{:6.1} ms (avg {:6.1})",
                stage.name,
                stage.last_millis,
                stage.mean_millis()
            );
            canvas.text(point(TEXT_LEFT, 150.0 + 50.0 * i as f64), &text, TEXT_SCALE, Rgba::WHITE);
        }
        let total_y = 150.0 + 50.0 * timing.stages.len() as f64;
        canvas.text(
            point(TEXT_LEFT, total_y),
            &format!("Total = {:6.1} ms", timing.last_frame_millis()),
            TEXT_SCALE,
            Rgba::WHITE,
        );
    }

    fn color_panel(&self, canvas: &mut dyn Canvas, face: Option<&ActiveFaceMetrics>) {
        self.black_panel(canvas, COLOR_PANEL_WIDTH);
        let Some(face) = face.filter(|f| f.is_solved()) else {
            return;
        };

        let (cx, cy) = UV_CENTER;
        let top = cy - UV_HALF_EXTENT;
        canvas.stroke_rect(
            point(cx - UV_HALF_EXTENT, top),
            point(cx + UV_HALF_EXTENT, cy + UV_HALF_EXTENT),
            Rgba::WHITE,
            1.0,
        );
        canvas.line(point(cx, top), point(cx, cy + UV_HALF_EXTENT), Rgba::WHITE, 1.0);
        canvas.line(point(cx - UV_HALF_EXTENT, cy), point(cx + UV_HALF_EXTENT, cy), Rgba::WHITE, 1.0);

        let summary = [
            (60.0, format!("Luminosity Offset = {:4.0}", face.luminous_offset)),
            (30.0, format!("Color Error Before Corr = {:4.0}", face.color_error_before_correction)),
            (0.0, format!("Color Error After Corr = {:4.0}", face.color_error_after_correction)),
        ];
        for (above, text) in &summary {
            canvas.text(point(0.0, top - above), text, TEXT_SCALE, Rgba::WHITE);
        }

        let column = 2.0 * UV_CENTER.0;
        for n in 0..3 {
            for m in 0..3 {
                let Some(tile) = face.observed[n][m] else {
                    continue;
                };
                let [y, u, v] = yuv_from_rgb(face.measured_colors[n][m]);
                let luminance = 2.0 * y - 256.0;
                let symbol = tile.symbol().to_string();
                let color = tile.rgba();

                canvas.text(point(2.0 * u + cx, 2.0 * v + cy), &symbol, LARGE_TEXT_SCALE, color);
                let corrected = luminance + cy + face.luminous_offset + self.luminous_offset_param;
                canvas.text(point(column - 40.0, corrected), &symbol, LARGE_TEXT_SCALE, color);
                canvas.text(point(column + 20.0, luminance + cy), &symbol, LARGE_TEXT_SCALE, color);
            }
        }

        for reference in TileColor::ALL {
            let color = reference.rgba();
            let [_, u, v] = yuv_from_rgb(color.to_rgb255());
            canvas.circle(point(2.0 * u + cx, 2.0 * v + cy), 10.0, color, true);
        }
        for reference in TileColor::ALL {
            let color = reference.rgba();
            let [y, _, _] = yuv_from_rgb(color.to_rgb255());
            let row = -256.0 + 2.0 * y + cy;
            canvas.line(point(column - 10.0, row), point(column + 10.0, row), color, 3.0);
        }
    }
}
