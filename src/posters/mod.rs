//! Poster Kinds - text-grid builders for each mathematical theme
//!
//! Every builder is a pure function of `(cols, rows, seed)`. The same inputs
//! always give the same grid, so a poster can be regenerated byte-for-byte.

pub mod alternating_sum;
pub mod collatz;
pub mod digit_sum;
pub mod pi;
pub mod primes;

use std::cell::OnceCell;

use rand::SeedableRng;
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

use crate::error::{PosterError, Result};
use crate::selection::Selectable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PosterKind {
    #[serde(rename = "9")]
    DigitSum,
    #[serde(rename = "11")]
    AlternatingSum,
    #[serde(rename = "primes")]
    Primes,
    #[serde(rename = "collatz")]
    Collatz,
    #[serde(rename = "pi")]
    Pi,
}

/// What shades a poster: a big glyph or an image file.
#[derive(Debug, Clone, PartialEq)]
pub enum MaskSource {
    Glyph(&'static str),
    Image {
        /// Relative to the assets directory.
        file: &'static str,
        /// Multiplier on the contain-fit size; above 1 crops at the edges.
        scale: f64,
    },
}

impl PosterKind {
    pub fn title(self) -> &'static str {
        match self {
            Self::DigitSum => "9 - Digit Sum",
            Self::AlternatingSum => "11 - Alternating Sum",
            Self::Primes => "Primes - Distribution",
            Self::Collatz => "Collatz - Process",
            Self::Pi => "Pi - Digits",
        }
    }

    /// File stem for generated documents.
    pub fn output_name(self) -> &'static str {
        match self {
            Self::DigitSum => "poster_9",
            Self::AlternatingSum => "poster_11",
            Self::Primes => "poster_primes",
            Self::Collatz => "poster_collatz",
            Self::Pi => "poster_pi",
        }
    }

    pub fn default_seed(self) -> u64 {
        match self {
            Self::DigitSum => 9,
            Self::AlternatingSum => 11,
            Self::Primes => 2,
            Self::Collatz => 3,
            Self::Pi => 0,
        }
    }

    pub fn mask_source(self) -> MaskSource {
        match self {
            Self::DigitSum => MaskSource::Glyph("9"),
            Self::AlternatingSum => MaskSource::Glyph("11"),
            Self::Primes => MaskSource::Glyph("÷"),
            Self::Collatz => MaskSource::Image {
                file: "tree.png",
                scale: 1.5,
            },
            Self::Pi => MaskSource::Glyph("π"),
        }
    }
}

impl Selectable for PosterKind {
    const DIMENSION: &'static str = "poster";

    fn all() -> &'static [Self] {
        &[
            Self::DigitSum,
            Self::AlternatingSum,
            Self::Primes,
            Self::Collatz,
            Self::Pi,
        ]
    }

    fn name(self) -> &'static str {
        match self {
            Self::DigitSum => "9",
            Self::AlternatingSum => "11",
            Self::Primes => "primes",
            Self::Collatz => "collatz",
            Self::Pi => "pi",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::DigitSum => &["digit-sum"],
            Self::AlternatingSum => &["alternating-sum"],
            _ => &[],
        }
    }
}

/// The character grid of one poster: `rows` lines of exactly `cols` chars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosterContent {
    pub cols: u32,
    pub rows: u32,
    pub lines: Vec<String>,
}

pub fn check_grid(cols: u32, rows: u32) -> Result<()> {
    if cols == 0 || rows == 0 {
        return Err(PosterError::domain(format!(
            "grid must be non-empty, got {cols}x{rows}"
        )));
    }
    Ok(())
}

/// Builds text grids; owns the π digits so they are computed once per run.
pub struct ContentGenerator {
    pi_precision: usize,
    pi_digits: OnceCell<String>,
}

impl ContentGenerator {
    pub fn new(pi_precision: usize) -> Result<Self> {
        pi::check_precision(pi_precision)?;
        Ok(Self {
            pi_precision,
            pi_digits: OnceCell::new(),
        })
    }

    pub fn build(&self, kind: PosterKind, cols: u32, rows: u32, seed: u64) -> Result<PosterContent> {
        check_grid(cols, rows)?;
        let lines = match kind {
            PosterKind::DigitSum => digit_sum::build_text_grid(cols, rows, seed),
            PosterKind::AlternatingSum => alternating_sum::build_text_grid(cols, rows, seed),
            PosterKind::Primes => primes::build_text_grid(cols, rows, seed)?,
            PosterKind::Collatz => collatz::build_text_grid(cols, rows, seed)?,
            PosterKind::Pi => {
                let digits = self
                    .pi_digits
                    .get_or_init(|| pi::compute_digits(self.pi_precision));
                pi::build_text_grid(digits, cols, rows, seed)
            }
        };
        log::debug!("built {} grid {}x{} (seed {})", kind.name(), cols, rows, seed);
        Ok(PosterContent { cols, rows, lines })
    }
}

impl Default for ContentGenerator {
    fn default() -> Self {
        Self {
            pi_precision: pi::DEFAULT_PRECISION,
            pi_digits: OnceCell::new(),
        }
    }
}

/// Generator for a single example string; reseeded per example.
pub(crate) fn example_rng(seed: u64) -> Pcg64 {
    Pcg64::seed_from_u64(seed)
}

/// Fill rows with concatenated examples.
///
/// Row `r` starts from seed `seed * 10000 + r`; each further example on the
/// row is seeded by the row seed plus the current line length.
pub(crate) fn fill_rows<F, E>(
    cols: u32,
    rows: u32,
    seed: u64,
    mut example: F,
) -> std::result::Result<Vec<String>, E>
where
    F: FnMut(u64) -> std::result::Result<String, E>,
{
    let cols = cols as usize;
    let mut lines = Vec::with_capacity(rows as usize);
    for row in 0..u64::from(rows) {
        let row_seed = seed.wrapping_mul(10_000).wrapping_add(row);
        let mut line = example(row_seed)?;
        while line.len() < cols {
            let next = example(row_seed.wrapping_add(line.len() as u64))?;
            line.push_str(&next);
        }
        line.truncate(cols);
        lines.push(line);
    }
    Ok(lines)
}
