//! Print Configuration - Paper Formats and Color Schemes
//!
//! All color logic lives in [`ColorScheme`]; all geometry in [`PaperConfig`].
//! Nothing downstream branches on a scheme or paper name.

use serde::{Deserialize, Serialize};

use crate::selection::Selectable;

/// Physical page plus the character grid laid over it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaperConfig {
    pub width_mm: u32,
    pub height_mm: u32,
    pub margin_mm: u32,
    pub grid_cols: u32,
    pub grid_rows: u32,
    pub font_size_pt: f64,
    pub line_height_pt: f64,
    pub char_width_pt: f64,
}

/// A3+ at 6pt Fira Mono; every other format is scaled from this one.
pub const BASE_PAPER: PaperConfig = PaperConfig {
    width_mm: 329,
    height_mm: 483,
    margin_mm: 0,
    grid_cols: 259,
    grid_rows: 195,
    font_size_pt: 6.0,
    line_height_pt: 7.0,
    char_width_pt: 3.6,
};

impl Default for PaperConfig {
    fn default() -> Self {
        BASE_PAPER
    }
}

impl PaperConfig {
    /// Scale the grid from `base` so glyph density stays the same on a
    /// different sheet.
    pub fn scaled(width_mm: u32, height_mm: u32, base: &PaperConfig) -> Self {
        let cols = (f64::from(base.grid_cols) * f64::from(width_mm) / f64::from(base.width_mm))
            .round_ties_even();
        let rows = (f64::from(base.grid_rows) * f64::from(height_mm) / f64::from(base.height_mm))
            .round_ties_even();
        Self {
            width_mm,
            height_mm,
            grid_cols: (cols as u32).max(1),
            grid_rows: (rows as u32).max(1),
            ..*base
        }
    }

    /// Width-to-height ratio of one character cell.
    pub fn cell_aspect(&self) -> f64 {
        self.char_width_pt / self.line_height_pt
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
    A3Plus,
    A3,
    A4,
}

impl PaperSize {
    pub fn config(self) -> PaperConfig {
        match self {
            Self::A3Plus => BASE_PAPER,
            Self::A3 => PaperConfig::scaled(297, 420, &BASE_PAPER),
            Self::A4 => PaperConfig::scaled(210, 297, &BASE_PAPER),
        }
    }

    /// Label used in progress output.
    pub fn label(self) -> &'static str {
        match self {
            Self::A3Plus => "A3+",
            Self::A3 => "A3",
            Self::A4 => "A4",
        }
    }
}

impl Selectable for PaperSize {
    const DIMENSION: &'static str = "paper";

    fn all() -> &'static [Self] {
        &[Self::A3Plus, Self::A3, Self::A4]
    }

    fn name(self) -> &'static str {
        match self {
            Self::A3Plus => "a3plus",
            Self::A3 => "a3",
            Self::A4 => "a4",
        }
    }
}

/// How mask intensity maps onto LaTeX colors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorScheme {
    pub preamble: String,
    pub min_pct: u32,
    pub max_pct: u32,
    /// xcolor expression with a `{pct}` placeholder.
    pub color_template: String,
}

impl ColorScheme {
    /// Color for a mask value, quantized to `levels` steps.
    ///
    /// Rounding is half-to-even at both steps so neighbouring values land in
    /// the same buckets regardless of platform.
    pub fn color_for(&self, value: u8, levels: u32) -> String {
        let levels = levels.max(1);
        let level = (f64::from(value) / 255.0 * f64::from(levels)).round_ties_even();
        let span = f64::from(self.max_pct) - f64::from(self.min_pct);
        let pct = f64::from(self.min_pct) + (level / f64::from(levels) * span).round_ties_even();
        self.color_template.replace("{pct}", &format!("{}", pct as i64))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemeKind {
    Print,
    Matrix,
    Blueprint,
    Ember,
}

impl SchemeKind {
    pub fn scheme(self) -> ColorScheme {
        match self {
            Self::Print => ColorScheme {
                preamble: String::new(),
                min_pct: 20,
                max_pct: 100,
                color_template: "black!{pct}".to_string(),
            },
            Self::Matrix => ColorScheme {
                preamble: [
                    r"\definecolor{fgin}{RGB}{0,230,60}",
                    r"\definecolor{fgout}{RGB}{0,70,0}",
                    r"\pagecolor{black}",
                ]
                .join("\n"),
                min_pct: 0,
                max_pct: 100,
                color_template: "fgin!{pct}!fgout".to_string(),
            },
            Self::Blueprint => ColorScheme {
                preamble: [
                    r"\definecolor{bpfg}{RGB}{200,230,255}",
                    r"\definecolor{bpbg}{RGB}{40,70,110}",
                    r"\pagecolor[RGB]{10,30,60}",
                ]
                .join("\n"),
                min_pct: 0,
                max_pct: 100,
                color_template: "bpfg!{pct}!bpbg".to_string(),
            },
            Self::Ember => ColorScheme {
                preamble: [
                    r"\definecolor{emberfg}{RGB}{255,180,30}",
                    r"\definecolor{emberbg}{RGB}{80,20,0}",
                    r"\pagecolor[RGB]{15,5,0}",
                ]
                .join("\n"),
                min_pct: 0,
                max_pct: 100,
                color_template: "emberfg!{pct}!emberbg".to_string(),
            },
        }
    }
}

impl Selectable for SchemeKind {
    const DIMENSION: &'static str = "scheme";

    fn all() -> &'static [Self] {
        &[Self::Print, Self::Matrix, Self::Blueprint, Self::Ember]
    }

    fn name(self) -> &'static str {
        match self {
            Self::Print => "print",
            Self::Matrix => "matrix",
            Self::Blueprint => "blueprint",
            Self::Ember => "ember",
        }
    }
}
