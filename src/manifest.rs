//! Run Manifest - the list of documents the typesetting step should compile
//!
//! One path per line, in generation order. The file describes exactly one
//! run: it is emptied when a run starts and written when the run completes.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PosterError, Result};

pub const MANIFEST_FILE: &str = ".generated";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    path: PathBuf,
    entries: Vec<PathBuf>,
}

impl Manifest {
    pub fn in_build_dir(build_dir: &Path) -> Self {
        Self {
            path: build_dir.join(MANIFEST_FILE),
            entries: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn push(&mut self, generated: PathBuf) {
        self.entries.push(generated);
    }

    /// Empty any manifest left behind by an earlier run.
    pub fn truncate(&self) -> Result<()> {
        if self.path.exists() {
            log::debug!("truncating previous manifest {}", self.path.display());
        }
        self.write_lines("")
    }

    pub fn write(&self) -> Result<()> {
        let text = self
            .entries
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join("\n");
        self.write_lines(&text)
    }

    fn write_lines(&self, text: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| PosterError::io(parent, e))?;
        }
        fs::write(&self.path, text).map_err(|e| PosterError::io(&self.path, e))
    }

    /// Paths listed in a manifest file, skipping blank lines.
    pub fn read(path: &Path) -> Result<Vec<PathBuf>> {
        let text = fs::read_to_string(path).map_err(|e| PosterError::io(path, e))?;
        Ok(text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(PathBuf::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_one_path_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let mut manifest = Manifest::in_build_dir(dir.path());
        manifest.push(PathBuf::from("build/poster_9_print_a4.tex"));
        manifest.push(PathBuf::from("build/poster_pi_ember_a3.tex"));
        manifest.write().unwrap();

        let text = fs::read_to_string(dir.path().join(MANIFEST_FILE)).unwrap();
        assert_eq!(text, "build/poster_9_print_a4.tex\nbuild/poster_pi_ember_a3.tex");
        assert_eq!(Manifest::read(manifest.path()).unwrap(), manifest.entries());
    }

    #[test]
    fn test_truncate_clears_previous_run() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), "stale.tex\n").unwrap();

        let manifest = Manifest::in_build_dir(dir.path());
        manifest.truncate().unwrap();
        assert!(Manifest::read(manifest.path()).unwrap().is_empty());
    }

    #[test]
    fn test_creates_build_dir() {
        let dir = tempfile::tempdir().unwrap();
        let build = dir.path().join("nested").join("build");
        let manifest = Manifest::in_build_dir(&build);
        manifest.truncate().unwrap();
        assert!(build.join(MANIFEST_FILE).exists());
    }
}
