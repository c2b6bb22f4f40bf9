//! numposter - Mathematical Poster Generator
//!
//! Writes LaTeX sources for posters made of numbers: a monospaced grid of
//! digit-sum chains, alternating sums, primes, Collatz trajectories or π
//! digits, shaded by a big glyph or picture. `xelatex` turns them into PDFs.
//!
//! # Guarantees
//! 1. Deterministic Output - same selection and seed, same bytes
//! 2. Fail Before Writing - bad selections never touch the build directory
//! 3. Manifest Describes One Run - exactly the files this run produced

pub mod error;
pub mod glyph;
pub mod hashing;
pub mod manifest;
pub mod mask;
pub mod pipeline;
pub mod posters;
pub mod print;
pub mod selection;
pub mod templates;

pub use error::{PosterError, Result};
pub use manifest::{Manifest, MANIFEST_FILE};
pub use mask::{FlatMask, Mask, MaskProvider, RasterMasks};
pub use pipeline::{GenerateOptions, GeneratedPoster, PosterPipeline, RunReport};
pub use posters::{ContentGenerator, MaskSource, PosterContent, PosterKind};
pub use print::{ColorScheme, PaperConfig, PaperSize, SchemeKind};
pub use selection::{PosterSpec, Selectable, Selection, WILDCARD};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
