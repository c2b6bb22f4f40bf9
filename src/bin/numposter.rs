//! numposter CLI - generate poster .tex files
//!
//! Usage: numposter [poster] [scheme] [paper], each defaulting to `all`.
//! Writes build/poster_<poster>_<scheme>_<paper>.tex plus build/.generated.
//! Returns 2 on an invalid selection, 1 on any other failure.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use numposter::{
    FlatMask, GenerateOptions, GeneratedPoster, MaskProvider, PosterError, PosterPipeline,
    RasterMasks, Selectable, Selection, WILDCARD,
};

#[derive(Parser)]
#[command(name = "numposter")]
#[command(about = "Generate numposter .tex files for mathematical patterns")]
#[command(version)]
struct Cli {
    /// Poster type: 9, 11, primes, collatz, pi (default: all)
    #[arg(default_value = WILDCARD)]
    poster: String,

    /// Color scheme: print, matrix, blueprint, ember (default: all)
    #[arg(default_value = WILDCARD)]
    scheme: String,

    /// Paper format: a3plus, a3, a4 (default: all)
    #[arg(default_value = WILDCARD)]
    paper: String,

    /// Output directory for .tex files and the manifest
    #[arg(long, default_value = "build")]
    build_dir: PathBuf,

    /// Directory holding FiraMono-Regular.otf
    #[arg(long, default_value = "fonts")]
    fonts_dir: PathBuf,

    /// Directory holding image masks
    #[arg(long, default_value = "assets")]
    assets_dir: PathBuf,

    /// Seed for every poster instead of each poster's default
    #[arg(long)]
    seed: Option<u64>,

    /// Number of π digits to compute
    #[arg(long, default_value_t = numposter::posters::pi::DEFAULT_PRECISION)]
    pi_precision: usize,

    /// Shade every cell with this intensity instead of a glyph or image mask
    #[arg(long, value_name = "0-255")]
    flat: Option<u8>,

    /// Print a JSON report instead of one line per file
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "numposter=debug" } else { "numposter=info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn describe(poster: &GeneratedPoster) -> String {
    let paper = &poster.paper;
    format!(
        "✔ wrote {} ({} {}x{}mm, grid {}x{}, poster={}, scheme={})",
        poster.path.display(),
        poster.spec.paper.label(),
        paper.width_mm,
        paper.height_mm,
        paper.grid_cols,
        paper.grid_rows,
        poster.spec.poster.name(),
        poster.spec.scheme.name(),
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let masks: Box<dyn MaskProvider> = match cli.flat {
        Some(value) => Box::new(FlatMask(value)),
        None => Box::new(RasterMasks::new(
            cli.fonts_dir.join("FiraMono-Regular.otf"),
            &cli.assets_dir,
        )),
    };

    let options = GenerateOptions {
        build_dir: cli.build_dir,
        seed: cli.seed,
        pi_precision: cli.pi_precision,
    };

    let pipeline = match PosterPipeline::new(options, masks) {
        Ok(p) => p,
        Err(e) => return fail(&e, cli.json),
    };

    let selection = Selection::new(&cli.poster, &cli.scheme, &cli.paper);
    let json = cli.json;
    let result = pipeline.run_with(&selection, |poster| {
        if !json {
            println!("{}", describe(poster));
        }
    });

    match result {
        Ok(report) => {
            if json {
                let output = serde_json::json!({
                    "success": true,
                    "engine_version": numposter::ENGINE_VERSION,
                    "report": report,
                });
                match serde_json::to_string_pretty(&output) {
                    Ok(text) => println!("{}", text),
                    Err(e) => return fail(&PosterError::from(e), false),
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e, json),
    }
}

fn fail(err: &PosterError, json: bool) -> ExitCode {
    if json {
        let output = serde_json::json!({
            "success": false,
            "error": err.to_string(),
        });
        println!("{}", output);
    } else {
        eprintln!("error: {}", err);
    }
    if err.is_invalid_selection() {
        ExitCode::from(2)
    } else {
        ExitCode::FAILURE
    }
}
