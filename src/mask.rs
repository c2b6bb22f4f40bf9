//! Shading Masks - per-cell intensity for a poster grid
//!
//! A mask is rendered on a high-resolution canvas whose pixels have the same
//! aspect as a character cell, softened with a Gaussian blur, then resampled
//! to exactly one value per grid cell.

use std::cell::OnceCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::GrayImage;
use ttf_parser::Face;

use crate::error::{PosterError, Result};
use crate::glyph;
use crate::posters::MaskSource;
use crate::print::PaperConfig;

/// Grayscale intensity per grid cell, `0` (faint) to `255` (full color).
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    image: GrayImage,
}

impl Mask {
    pub fn from_image(image: GrayImage) -> Self {
        Self { image }
    }

    pub fn uniform(width: u32, height: u32, value: u8) -> Self {
        Self {
            image: GrayImage::from_pixel(width, height, image::Luma([value])),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.image.get_pixel(x, y).0[0]
    }

    pub fn row(&self, y: u32) -> &[u8] {
        let w = self.image.width() as usize;
        let start = y as usize * w;
        &self.image.as_raw()[start..start + w]
    }
}

/// Anything that can shade a poster.
pub trait MaskProvider {
    /// Fail early if `source` cannot be rendered, before any output exists.
    fn check(&self, _source: &MaskSource) -> Result<()> {
        Ok(())
    }

    fn render(&self, source: &MaskSource, paper: &PaperConfig) -> Result<Mask>;
}

/// Same value everywhere: flat color, no picture.
#[derive(Debug, Clone, Copy)]
pub struct FlatMask(pub u8);

impl MaskProvider for FlatMask {
    fn render(&self, _source: &MaskSource, paper: &PaperConfig) -> Result<Mask> {
        Ok(Mask::uniform(paper.grid_cols, paper.grid_rows, self.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct MaskSettings {
    /// Canvas pixels per grid row.
    render_scale: u32,
    /// Blur radius in grid cells.
    edge_soften: f64,
    /// Largest glyph size as a fraction of canvas height.
    glyph_fill: f64,
}

impl Default for MaskSettings {
    fn default() -> Self {
        Self {
            render_scale: 10,
            edge_soften: 1.2,
            glyph_fill: 0.95,
        }
    }
}

/// Renders glyph masks from the monospace font and image masks from files.
pub struct RasterMasks {
    font_path: PathBuf,
    assets_dir: PathBuf,
    settings: MaskSettings,
    font_data: OnceCell<Vec<u8>>,
}

impl RasterMasks {
    pub fn new(font_path: impl Into<PathBuf>, assets_dir: impl Into<PathBuf>) -> Self {
        Self {
            font_path: font_path.into(),
            assets_dir: assets_dir.into(),
            settings: MaskSettings::default(),
            font_data: OnceCell::new(),
        }
    }

    fn font_data(&self) -> Result<&[u8]> {
        if let Some(data) = self.font_data.get() {
            return Ok(data.as_slice());
        }
        if !self.font_path.exists() {
            return Err(PosterError::Font(format!(
                "Font not found: {}\nFetch FiraMono-Regular.otf into the fonts directory first.",
                self.font_path.display()
            )));
        }
        let data = fs::read(&self.font_path).map_err(|e| PosterError::io(&self.font_path, e))?;
        Ok(self.font_data.get_or_init(|| data).as_slice())
    }

    fn canvas_size(&self, paper: &PaperConfig) -> (u32, u32) {
        let scale = f64::from(self.settings.render_scale);
        let height = paper.grid_rows * self.settings.render_scale;
        let width = (f64::from(paper.grid_cols) * scale * paper.cell_aspect()).round_ties_even();
        ((width as u32).max(1), height.max(1))
    }

    fn blur_radius(&self, paper: &PaperConfig) -> f32 {
        (f64::from(self.settings.render_scale) * self.settings.edge_soften * paper.cell_aspect())
            as f32
    }

    fn render_glyph_canvas(&self, text: &str, width: u32, height: u32) -> Result<GrayImage> {
        let data = self.font_data()?;
        let face = Face::parse(data, 0)
            .map_err(|e| PosterError::Font(format!("{}: {e}", self.font_path.display())))?;
        let outline = glyph::layout_text(&face, text)?;
        let ink = outline
            .bounds()
            .filter(|b| b.width() > 0.0 && b.height() > 0.0)
            .ok_or_else(|| PosterError::Font(format!("'{text}' has no visible ink")))?;

        let units_per_em = f64::from(face.units_per_em());
        let (w, h) = (f64::from(width), f64::from(height));
        let max_font_px = (h * self.settings.glyph_fill).floor();
        let px_per_unit = max_font_px / units_per_em;
        let fit = 1.0_f64
            .min(w * 0.95 / (ink.width() * px_per_unit))
            .min(h * 0.95 / (ink.height() * px_per_unit));
        let font_px = (max_font_px * fit).floor().max(10.0);
        let s = font_px / units_per_em;

        // Center the ink box; y flips from font units (up) to pixels (down).
        let dx = w / 2.0 - (ink.min_x + ink.max_x) / 2.0 * s;
        let dy = h / 2.0 + (ink.min_y + ink.max_y) / 2.0 * s;
        log::debug!("glyph mask '{}' at {}px on {}x{} canvas", text, font_px, width, height);

        let mut canvas = GrayImage::new(width, height);
        outline.transformed(s, -s, dx, dy).fill(&mut canvas, 255);
        Ok(canvas)
    }

    fn render_image_canvas(
        &self,
        file: &str,
        scale: f64,
        width: u32,
        height: u32,
    ) -> Result<GrayImage> {
        let path = self.assets_dir.join(file);
        let src = load_gray(&path)?;

        let ratio = (f64::from(width) / f64::from(src.width()))
            .min(f64::from(height) / f64::from(src.height()))
            * scale;
        let new_w = ((f64::from(src.width()) * ratio).round_ties_even() as u32).max(1);
        let new_h = ((f64::from(src.height()) * ratio).round_ties_even() as u32).max(1);
        let resized = imageops::resize(&src, new_w, new_h, FilterType::Lanczos3);

        let mut canvas = GrayImage::new(width, height);
        let paste_x = (i64::from(width) - i64::from(new_w)).div_euclid(2);
        let paste_y = (i64::from(height) - i64::from(new_h)).div_euclid(2);
        imageops::replace(&mut canvas, &resized, paste_x, paste_y);
        imageops::invert(&mut canvas);
        log::debug!("image mask {} scaled to {}x{}", path.display(), new_w, new_h);
        Ok(canvas)
    }
}

fn load_gray(path: &Path) -> Result<GrayImage> {
    let img = image::open(path).map_err(|source| PosterError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(img.to_luma8())
}

impl MaskProvider for RasterMasks {
    fn check(&self, source: &MaskSource) -> Result<()> {
        match source {
            MaskSource::Glyph(_) => self.font_data().map(|_| ()),
            MaskSource::Image { file, .. } => {
                let path = self.assets_dir.join(file);
                if path.is_file() {
                    Ok(())
                } else {
                    Err(PosterError::Image {
                        source: image::ImageError::IoError(io::Error::new(
                            io::ErrorKind::NotFound,
                            "mask image not found",
                        )),
                        path,
                    })
                }
            }
        }
    }

    fn render(&self, source: &MaskSource, paper: &PaperConfig) -> Result<Mask> {
        let (width, height) = self.canvas_size(paper);
        let canvas = match source {
            MaskSource::Glyph(text) => self.render_glyph_canvas(text, width, height)?,
            MaskSource::Image { file, scale } => {
                self.render_image_canvas(file, *scale, width, height)?
            }
        };
        let blurred = imageops::blur(&canvas, self.blur_radius(paper));
        let cells = imageops::resize(
            &blurred,
            paper.grid_cols,
            paper.grid_rows,
            FilterType::Lanczos3,
        );
        Ok(Mask::from_image(cells))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::print::{PaperSize, BASE_PAPER};

    fn small_paper() -> PaperConfig {
        PaperConfig {
            grid_cols: 40,
            grid_rows: 30,
            ..BASE_PAPER
        }
    }

    #[test]
    fn test_flat_mask_matches_grid() {
        let paper = PaperSize::A4.config();
        let mask = FlatMask(128).render(&MaskSource::Glyph("9"), &paper).unwrap();
        assert_eq!((mask.width(), mask.height()), (paper.grid_cols, paper.grid_rows));
        assert!(mask.row(0).iter().all(|&v| v == 128));
    }

    #[test]
    fn test_canvas_keeps_cell_aspect() {
        let masks = RasterMasks::new("fonts/missing.otf", "assets");
        let (w, h) = masks.canvas_size(&BASE_PAPER);
        assert_eq!(h, 1950);
        // 259 * 10 * 3.6 / 7 = 1332.0
        assert_eq!(w, 1332);
    }

    #[test]
    fn test_missing_font_is_reported() {
        let masks = RasterMasks::new("/nonexistent/FiraMono-Regular.otf", "assets");
        let err = masks.render(&MaskSource::Glyph("9"), &small_paper()).unwrap_err();
        assert!(matches!(err, PosterError::Font(_)));
        assert!(err.to_string().contains("Font not found"));
    }

    #[test]
    fn test_missing_image_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let masks = RasterMasks::new("fonts/FiraMono-Regular.otf", dir.path());
        let source = MaskSource::Image {
            file: "tree.png",
            scale: 1.0,
        };
        let err = masks.render(&source, &small_paper()).unwrap_err();
        assert!(matches!(err, PosterError::Image { .. }));
    }

    #[test]
    fn test_image_mask_inverts_and_centers() {
        let dir = tempfile::tempdir().unwrap();
        // White picture with a black square in the middle.
        let mut picture = GrayImage::from_pixel(64, 64, image::Luma([255]));
        for y in 16..48 {
            for x in 16..48 {
                picture.put_pixel(x, y, image::Luma([0]));
            }
        }
        picture.save(dir.path().join("square.png")).unwrap();

        let masks = RasterMasks::new("fonts/FiraMono-Regular.otf", dir.path());
        let source = MaskSource::Image {
            file: "square.png",
            scale: 1.0,
        };
        let paper = small_paper();
        let mask = masks.render(&source, &paper).unwrap();
        assert_eq!((mask.width(), mask.height()), (40, 30));

        // Dark ink in the source becomes bright, white paper becomes dark.
        let center = mask.get(20, 15);
        let paper_area = mask.get(3, 15);
        assert!(center > 200, "center {center}");
        assert!(paper_area < 50, "paper {paper_area}");
    }

    #[test]
    fn test_image_mask_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let picture =
            GrayImage::from_fn(32, 48, |x, y| image::Luma([((x * 7 + y * 3) % 256) as u8]));
        picture.save(dir.path().join("ramp.png")).unwrap();

        let masks = RasterMasks::new("fonts/FiraMono-Regular.otf", dir.path());
        let source = MaskSource::Image {
            file: "ramp.png",
            scale: 1.5,
        };
        let a = masks.render(&source, &small_paper()).unwrap();
        let b = masks.render(&source, &small_paper()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_check_reports_missing_assets() {
        let dir = tempfile::tempdir().unwrap();
        let masks = RasterMasks::new(dir.path().join("FiraMono-Regular.otf"), dir.path());

        let err = masks.check(&MaskSource::Glyph("π")).unwrap_err();
        assert!(err.to_string().contains("Font not found"));

        let tree = MaskSource::Image {
            file: "tree.png",
            scale: 1.5,
        };
        match masks.check(&tree).unwrap_err() {
            PosterError::Image { path, .. } => assert_eq!(path, dir.path().join("tree.png")),
            other => panic!("unexpected error: {other}"),
        }

        GrayImage::new(4, 4).save(dir.path().join("tree.png")).unwrap();
        assert!(masks.check(&tree).is_ok());
    }

    #[test]
    fn test_flat_mask_always_passes_check() {
        assert!(FlatMask(0).check(&MaskSource::Glyph("9")).is_ok());
    }
}
