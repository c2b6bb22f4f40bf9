//! Contract Invariant Tests
//!
//! These tests verify the guarantees a caller relies on: exact file counts,
//! a manifest that describes one run, deterministic output, and failures
//! that leave nothing behind.

use std::fs;
use std::path::Path;

use numposter::{
    FlatMask, GenerateOptions, Manifest, MaskProvider, PaperSize, PosterError, PosterKind,
    PosterPipeline, Selectable, Selection, MANIFEST_FILE,
};

fn create_pipeline(root: &Path) -> PosterPipeline {
    create_pipeline_with(root, Box::new(FlatMask(160)))
}

fn create_pipeline_with(root: &Path, masks: Box<dyn MaskProvider>) -> PosterPipeline {
    let options = GenerateOptions {
        build_dir: root.join("build"),
        seed: None,
        pi_precision: 2_000,
    };
    PosterPipeline::new(options, masks).unwrap()
}

fn tex_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.ends_with(".tex"))
        .collect();
    names.sort();
    names
}

#[test]
fn invariant_single_selection_writes_one_file() {
    let root = tempfile::tempdir().unwrap();
    let pipeline = create_pipeline(root.path());

    let report = pipeline.run(&Selection::new("primes", "print", "a4")).unwrap();

    assert_eq!(report.generated.len(), 1);
    let build = root.path().join("build");
    assert_eq!(tex_files(&build), vec!["poster_primes_print_a4.tex"]);

    let tex = fs::read_to_string(build.join("poster_primes_print_a4.tex")).unwrap();
    assert!(tex.contains("paperwidth=210mm"));
    // 2, 3, 5, 7 lead the first line, shaded by the flat mask.
    assert!(tex.contains(r"\textcolor{black!72}{2 3 5 7 11 13"));
}

#[test]
fn invariant_wildcards_expand_to_product() {
    let root = tempfile::tempdir().unwrap();
    let pipeline = create_pipeline(root.path());

    let report = pipeline.run(&Selection::new("all", "all", "a4")).unwrap();

    assert_eq!(report.generated.len(), 5 * 4 * 1);
    assert_eq!(tex_files(&root.path().join("build")).len(), 20);
    for poster in &report.generated {
        assert_eq!(poster.spec.paper, PaperSize::A4);
    }
}

#[test]
fn invariant_manifest_lists_exactly_this_run() {
    let root = tempfile::tempdir().unwrap();
    let pipeline = create_pipeline(root.path());

    pipeline.run(&Selection::new("all", "matrix", "a4")).unwrap();
    let report = pipeline.run(&Selection::new("pi", "all", "a4")).unwrap();

    let manifest_path = root.path().join("build").join(MANIFEST_FILE);
    assert_eq!(report.manifest, manifest_path);

    let listed = Manifest::read(&manifest_path).unwrap();
    assert_eq!(listed.len(), 4);
    for (path, poster) in listed.iter().zip(&report.generated) {
        assert_eq!(path, &poster.path);
        assert!(path.exists(), "{} missing", path.display());
    }
}

#[test]
fn invariant_invalid_selection_writes_nothing() {
    let root = tempfile::tempdir().unwrap();
    let pipeline = create_pipeline(root.path());

    let err = pipeline
        .run(&Selection::new("nonagon", "print", "a4"))
        .unwrap_err();

    assert!(err.is_invalid_selection());
    assert!(err.to_string().contains("nonagon"));
    assert!(!root.path().join("build").exists());
}

#[test]
fn invariant_invalid_selection_keeps_previous_manifest() {
    let root = tempfile::tempdir().unwrap();
    let pipeline = create_pipeline(root.path());
    pipeline.run(&Selection::new("9", "print", "a4")).unwrap();

    let err = pipeline.run(&Selection::new("9", "neon", "a4")).unwrap_err();
    assert!(matches!(err, PosterError::InvalidSelection { dimension: "scheme", .. }));

    let listed = Manifest::read(&root.path().join("build").join(MANIFEST_FILE)).unwrap();
    assert_eq!(listed.len(), 1);
}

#[test]
fn invariant_output_is_deterministic() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();

    let a = create_pipeline(first.path())
        .run(&Selection::new("all", "ember", "a4"))
        .unwrap();
    let b = create_pipeline(second.path())
        .run(&Selection::new("all", "ember", "a4"))
        .unwrap();

    let digests_a: Vec<_> = a.generated.iter().map(|p| p.sha256.clone()).collect();
    let digests_b: Vec<_> = b.generated.iter().map(|p| p.sha256.clone()).collect();
    assert_eq!(digests_a, digests_b);
}

#[test]
fn invariant_seed_changes_content() {
    let root = tempfile::tempdir().unwrap();
    let options = GenerateOptions {
        build_dir: root.path().join("seeded"),
        seed: Some(12345),
        pi_precision: 2_000,
    };
    let seeded = PosterPipeline::new(options, Box::new(FlatMask(160))).unwrap();
    let default = create_pipeline(root.path());

    let a = default.run(&Selection::new("collatz", "print", "a4")).unwrap();
    let b = seeded.run(&Selection::new("collatz", "print", "a4")).unwrap();
    assert_ne!(a.generated[0].sha256, b.generated[0].sha256);
    assert_eq!(b.generated[0].seed, 12345);
}

#[test]
fn invariant_unwritable_build_dir_is_io_error() {
    let root = tempfile::tempdir().unwrap();
    // A regular file where the build directory should be.
    let blocker = root.path().join("build");
    fs::write(&blocker, "not a directory").unwrap();

    let err = create_pipeline(root.path())
        .run(&Selection::new("11", "print", "a4"))
        .unwrap_err();
    assert!(matches!(err, PosterError::Io { .. }), "{err}");
}

#[test]
fn invariant_missing_mask_asset_aborts_run() {
    let root = tempfile::tempdir().unwrap();
    let masks = numposter::RasterMasks::new(
        root.path().join("fonts").join("FiraMono-Regular.otf"),
        root.path().join("assets"),
    );
    let pipeline = create_pipeline_with(root.path(), Box::new(masks));

    let err = pipeline.run(&Selection::new("collatz", "print", "a4")).unwrap_err();
    assert!(matches!(err, PosterError::Image { .. }), "{err}");
    assert!(!root.path().join("build").exists());
}

#[test]
fn invariant_missing_font_writes_nothing() {
    let root = tempfile::tempdir().unwrap();
    let masks = numposter::RasterMasks::new(
        root.path().join("fonts").join("FiraMono-Regular.otf"),
        root.path().join("assets"),
    );
    let pipeline = create_pipeline_with(root.path(), Box::new(masks));

    let err = pipeline.run(&Selection::new("all", "print", "a4")).unwrap_err();
    assert!(matches!(err, PosterError::Font(_)), "{err}");
    assert!(!root.path().join("build").exists());
}

#[test]
fn invariant_every_poster_kind_has_a_file_name() {
    let mut stems: Vec<_> = PosterKind::all().iter().map(|k| k.output_name()).collect();
    stems.sort();
    stems.dedup();
    assert_eq!(stems.len(), PosterKind::all().len());
}
