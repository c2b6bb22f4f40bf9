//! Generation Pipeline - Single Entry Point
//!
//! resolve -> validate -> (content, mask, LaTeX) per spec -> manifest.
//! Everything that can be rejected up front is rejected before the build
//! directory is touched.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{PosterError, Result};
use crate::hashing::document_digest;
use crate::manifest::Manifest;
use crate::mask::{Mask, MaskProvider};
use crate::posters::{self, pi, primes, ContentGenerator, PosterContent, PosterKind};
use crate::print::{PaperConfig, PaperSize};
use crate::selection::{PosterSpec, Selectable, Selection};
use crate::templates::build_latex;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateOptions {
    pub build_dir: PathBuf,
    /// Replaces every poster's default seed when set.
    #[serde(default)]
    pub seed: Option<u64>,
    pub pi_precision: usize,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            build_dir: PathBuf::from("build"),
            seed: None,
            pi_precision: pi::DEFAULT_PRECISION,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedPoster {
    pub spec: PosterSpec,
    pub title: String,
    pub path: PathBuf,
    pub paper: PaperConfig,
    pub seed: u64,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub generated: Vec<GeneratedPoster>,
    pub manifest: PathBuf,
}

/// The generation pipeline - single entry point for writing posters
pub struct PosterPipeline {
    options: GenerateOptions,
    content: ContentGenerator,
    masks: Box<dyn MaskProvider>,
}

impl PosterPipeline {
    pub fn new(options: GenerateOptions, masks: Box<dyn MaskProvider>) -> Result<Self> {
        let content = ContentGenerator::new(options.pi_precision)?;
        Ok(Self {
            options,
            content,
            masks,
        })
    }

    pub fn seed_for(&self, kind: PosterKind) -> u64 {
        self.options.seed.unwrap_or_else(|| kind.default_seed())
    }

    /// Deterministic location of the document for `spec`.
    pub fn output_path(&self, spec: &PosterSpec) -> PathBuf {
        self.options.build_dir.join(format!(
            "{}_{}_{}.tex",
            spec.poster.output_name(),
            spec.scheme.name(),
            spec.paper.name()
        ))
    }

    /// Reject parameter combinations that cannot produce a poster, and
    /// mask assets that are missing.
    pub fn validate(&self, specs: &[PosterSpec]) -> Result<()> {
        let mut checked = Vec::new();
        for spec in specs {
            let paper = spec.paper.config();
            posters::check_grid(paper.grid_cols, paper.grid_rows)?;
            if spec.poster == PosterKind::Primes {
                primes::check_start(self.seed_for(spec.poster))?;
            }
            if !checked.contains(&spec.poster) {
                self.masks.check(&spec.poster.mask_source())?;
                checked.push(spec.poster);
            }
        }
        Ok(())
    }

    /// Generate every combination `selection` names.
    pub fn run(&self, selection: &Selection) -> Result<RunReport> {
        self.run_with(selection, |_| {})
    }

    /// Like [`run`](Self::run), reporting each poster as soon as it is
    /// written.
    pub fn run_with<F>(&self, selection: &Selection, mut on_generated: F) -> Result<RunReport>
    where
        F: FnMut(&GeneratedPoster),
    {
        let specs = selection.resolve()?;
        self.validate(&specs)?;

        let mut manifest = Manifest::in_build_dir(&self.options.build_dir);
        manifest.truncate()?;

        // Content and mask only depend on poster and paper, not on scheme.
        let mut prepared: HashMap<(PosterKind, PaperSize), (PosterContent, Mask)> = HashMap::new();
        let mut generated = Vec::with_capacity(specs.len());

        for spec in &specs {
            let key = (spec.poster, spec.paper);
            if !prepared.contains_key(&key) {
                let entry = self.prepare(spec.poster, &spec.paper.config())?;
                prepared.insert(key, entry);
            }
            let (content, mask) = &prepared[&key];
            let poster = self.write_poster(spec, content, mask)?;
            on_generated(&poster);
            manifest.push(poster.path.clone());
            generated.push(poster);
        }

        manifest.write()?;
        log::info!(
            "wrote {} poster(s); manifest at {}",
            generated.len(),
            manifest.path().display()
        );
        Ok(RunReport {
            generated,
            manifest: manifest.path().to_path_buf(),
        })
    }

    fn prepare(&self, kind: PosterKind, paper: &PaperConfig) -> Result<(PosterContent, Mask)> {
        let content = self
            .content
            .build(kind, paper.grid_cols, paper.grid_rows, self.seed_for(kind))?;
        let mask = self.masks.render(&kind.mask_source(), paper)?;
        Ok((content, mask))
    }

    fn write_poster(
        &self,
        spec: &PosterSpec,
        content: &PosterContent,
        mask: &Mask,
    ) -> Result<GeneratedPoster> {
        let paper = spec.paper.config();
        let tex = build_latex(content, mask, &spec.scheme.scheme(), &paper)?;

        let build_dir = &self.options.build_dir;
        fs::create_dir_all(build_dir).map_err(|e| PosterError::io(build_dir, e))?;
        let path = self.output_path(spec);
        fs::write(&path, &tex).map_err(|e| PosterError::io(&path, e))?;
        log::info!("wrote {}", path.display());

        Ok(GeneratedPoster {
            spec: *spec,
            title: spec.poster.title().to_string(),
            path,
            paper,
            seed: self.seed_for(spec.poster),
            sha256: document_digest(&tex),
        })
    }
}
