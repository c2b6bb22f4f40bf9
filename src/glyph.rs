//! Glyph outlines to pixels.
//!
//! Outlines come from `ttf-parser` in font units (y up). Curves are
//! flattened into polygons, laid out left to right by advance width, and
//! filled with a non-zero winding scanline pass sampled at pixel centers.

use image::{GrayImage, Luma};
use ttf_parser::{Face, OutlineBuilder};

use crate::error::{PosterError, Result};

const CURVE_STEPS: usize = 16;

type Point = (f64, f64);

/// Closed polygons collected from one or more glyph outlines.
#[derive(Debug, Clone, Default)]
pub struct Outline {
    contours: Vec<Vec<Point>>,
}

/// Axis-aligned ink bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

impl Outline {
    pub fn from_contours(contours: Vec<Vec<Point>>) -> Self {
        Self { contours }
    }

    pub fn bounds(&self) -> Option<Bounds> {
        let mut points = self.contours.iter().flatten();
        let &(x0, y0) = points.next()?;
        let mut b = Bounds {
            min_x: x0,
            min_y: y0,
            max_x: x0,
            max_y: y0,
        };
        for &(x, y) in points {
            b.min_x = b.min_x.min(x);
            b.min_y = b.min_y.min(y);
            b.max_x = b.max_x.max(x);
            b.max_y = b.max_y.max(y);
        }
        Some(b)
    }

    /// Apply `p -> (p.x * sx + dx, p.y * sy + dy)` to every point.
    pub fn transformed(&self, sx: f64, sy: f64, dx: f64, dy: f64) -> Self {
        let contours = self
            .contours
            .iter()
            .map(|c| c.iter().map(|&(x, y)| (x * sx + dx, y * sy + dy)).collect())
            .collect();
        Self { contours }
    }

    /// Fill the outline (already in pixel space, y down) with `value`.
    pub fn fill(&self, canvas: &mut GrayImage, value: u8) {
        let edges: Vec<(Point, Point)> = self
            .contours
            .iter()
            .filter(|c| c.len() >= 2)
            .flat_map(|c| c.iter().zip(c.iter().cycle().skip(1)).map(|(&a, &b)| (a, b)))
            .filter(|(a, b)| a.1 != b.1)
            .collect();

        let (width, height) = canvas.dimensions();
        let mut crossings: Vec<(f64, i32)> = Vec::new();
        for py in 0..height {
            let yc = f64::from(py) + 0.5;
            crossings.clear();
            for &((x0, y0), (x1, y1)) in &edges {
                let (lo, hi, dir) = if y0 < y1 { (y0, y1, 1) } else { (y1, y0, -1) };
                if yc >= lo && yc < hi {
                    let x = x0 + (yc - y0) * (x1 - x0) / (y1 - y0);
                    crossings.push((x, dir));
                }
            }
            crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut winding = 0;
            for pair in crossings.windows(2) {
                winding += pair[0].1;
                if winding == 0 {
                    continue;
                }
                let start = (pair[0].0 - 0.5).ceil().max(0.0);
                let end = (pair[1].0 - 0.5).ceil().min(f64::from(width));
                let mut px = start as u32;
                while f64::from(px) < end {
                    canvas.put_pixel(px, py, Luma([value]));
                    px += 1;
                }
            }
        }
    }
}

struct Flattener {
    offset_x: f64,
    contours: Vec<Vec<Point>>,
    current: Vec<Point>,
}

impl Flattener {
    fn new() -> Self {
        Self {
            offset_x: 0.0,
            contours: Vec::new(),
            current: Vec::new(),
        }
    }

    /// Close out the current glyph and move the pen right by `advance`.
    fn advance(&mut self, advance: f64) {
        self.finish_contour();
        self.offset_x += advance;
    }

    fn last(&self) -> Point {
        self.current.last().copied().unwrap_or((self.offset_x, 0.0))
    }

    fn push(&mut self, x: f32, y: f32) {
        self.current.push((f64::from(x) + self.offset_x, f64::from(y)));
    }

    fn finish_contour(&mut self) {
        if self.current.len() >= 2 {
            self.contours.push(std::mem::take(&mut self.current));
        } else {
            self.current.clear();
        }
    }
}

impl OutlineBuilder for Flattener {
    fn move_to(&mut self, x: f32, y: f32) {
        self.finish_contour();
        self.push(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.push(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x0, y0) = self.last();
        let (cx, cy) = (f64::from(x1) + self.offset_x, f64::from(y1));
        let (ex, ey) = (f64::from(x) + self.offset_x, f64::from(y));
        for i in 1..=CURVE_STEPS {
            let t = i as f64 / CURVE_STEPS as f64;
            let mt = 1.0 - t;
            self.current.push((
                mt * mt * x0 + 2.0 * mt * t * cx + t * t * ex,
                mt * mt * y0 + 2.0 * mt * t * cy + t * t * ey,
            ));
        }
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x0, y0) = self.last();
        let (ax, ay) = (f64::from(x1) + self.offset_x, f64::from(y1));
        let (bx, by) = (f64::from(x2) + self.offset_x, f64::from(y2));
        let (ex, ey) = (f64::from(x) + self.offset_x, f64::from(y));
        for i in 1..=CURVE_STEPS {
            let t = i as f64 / CURVE_STEPS as f64;
            let mt = 1.0 - t;
            let (c0, c1, c2, c3) = (mt * mt * mt, 3.0 * mt * mt * t, 3.0 * mt * t * t, t * t * t);
            self.current.push((
                c0 * x0 + c1 * ax + c2 * bx + c3 * ex,
                c0 * y0 + c1 * ay + c2 * by + c3 * ey,
            ));
        }
    }

    fn close(&mut self) {
        self.finish_contour();
    }
}

/// Outline of `text` set on one line, in font units, starting at x = 0.
pub fn layout_text(face: &Face<'_>, text: &str) -> Result<Outline> {
    let mut flattener = Flattener::new();
    for ch in text.chars() {
        let id = face
            .glyph_index(ch)
            .ok_or_else(|| PosterError::Font(format!("font has no glyph for '{ch}'")))?;
        face.outline_glyph(id, &mut flattener);
        flattener.advance(f64::from(face.glyph_hor_advance(id).unwrap_or(0)));
    }
    Ok(Outline::from_contours(flattener.contours))
}
