//! Selection Resolver - positional selectors to concrete poster specs
//!
//! Each selector is either an exact name from a fixed set or the wildcard
//! `all`. The result is the full cross product, poster-major.

use serde::{Deserialize, Serialize};

use crate::error::{PosterError, Result};
use crate::posters::PosterKind;
use crate::print::{PaperSize, SchemeKind};

pub const WILDCARD: &str = "all";

/// A closed set of named values that can be picked on the command line.
pub trait Selectable: Copy + Sized + 'static {
    /// Human name of the dimension, used in error messages.
    const DIMENSION: &'static str;

    fn all() -> &'static [Self];

    fn name(self) -> &'static str;

    /// Extra accepted spellings.
    fn aliases(self) -> &'static [&'static str] {
        &[]
    }

    fn from_name(token: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|v| v.name() == token || v.aliases().contains(&token))
    }
}

/// Resolve one selector into the values it stands for.
pub fn resolve_dimension<T: Selectable>(token: &str) -> Result<Vec<T>> {
    if token == WILDCARD {
        return Ok(T::all().to_vec());
    }
    T::from_name(token)
        .map(|v| vec![v])
        .ok_or_else(|| PosterError::InvalidSelection {
            dimension: T::DIMENSION,
            token: token.to_string(),
            valid: valid_names::<T>(),
        })
}

fn valid_names<T: Selectable>() -> String {
    let mut names: Vec<&str> = T::all().iter().map(|v| v.name()).collect();
    names.push(WILDCARD);
    names.join(", ")
}

/// A fully resolved poster / scheme / paper combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PosterSpec {
    pub poster: PosterKind,
    pub scheme: SchemeKind,
    pub paper: PaperSize,
}

/// The three selectors as typed on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub poster: String,
    pub scheme: String,
    pub paper: String,
}

impl Default for Selection {
    fn default() -> Self {
        Self::new(WILDCARD, WILDCARD, WILDCARD)
    }
}

impl Selection {
    pub fn new(poster: &str, scheme: &str, paper: &str) -> Self {
        Self {
            poster: poster.to_string(),
            scheme: scheme.to_string(),
            paper: paper.to_string(),
        }
    }

    /// Expand into every combination, or fail on the first unknown token.
    pub fn resolve(&self) -> Result<Vec<PosterSpec>> {
        let posters = resolve_dimension::<PosterKind>(&self.poster)?;
        let schemes = resolve_dimension::<SchemeKind>(&self.scheme)?;
        let papers = resolve_dimension::<PaperSize>(&self.paper)?;

        let mut specs = Vec::with_capacity(posters.len() * schemes.len() * papers.len());
        for &poster in &posters {
            for &scheme in &schemes {
                for &paper in &papers {
                    specs.push(PosterSpec { poster, scheme, paper });
                }
            }
        }
        Ok(specs)
    }
}
