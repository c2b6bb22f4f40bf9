//! LaTeX Template - the document every poster is poured into
//!
//! Each grid line becomes a run of `\textcolor` groups, one group per stretch
//! of characters that quantize to the same color.

use crate::error::{PosterError, Result};
use crate::mask::Mask;
use crate::posters::PosterContent;
use crate::print::{ColorScheme, PaperConfig};

/// Number of distinct shades between a scheme's min and max.
pub const QUANTIZE_LEVELS: u32 = 20;

/// Font file stem; the document loads it from `fonts/` next to the build.
pub const MONO_FONT: &str = "FiraMono-Regular";

/// Escape characters LaTeX treats specially in running text.
pub fn latex_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str(r"\textbackslash "),
            '&' => out.push_str(r"\&"),
            '%' => out.push_str(r"\%"),
            '#' => out.push_str(r"\#"),
            '_' => out.push_str(r"\_"),
            '{' => out.push_str(r"\{"),
            '}' => out.push_str(r"\}"),
            _ => out.push(ch),
        }
    }
    out
}

/// One grid line as colored runs.
pub fn shaded_line(text: &str, mask_row: &[u8], scheme: &ColorScheme, levels: u32) -> String {
    let mut out = String::new();
    let mut run = String::new();
    let mut run_color: Option<String> = None;

    for (ch, &value) in text.chars().zip(mask_row) {
        let color = scheme.color_for(value, levels);
        if run_color.as_deref() != Some(color.as_str()) {
            if let Some(prev) = run_color.take() {
                push_colored(&mut out, &prev, &run);
                run.clear();
            }
            run_color = Some(color);
        }
        run.push(ch);
    }
    if let Some(color) = run_color {
        push_colored(&mut out, &color, &run);
    }
    out
}

fn push_colored(out: &mut String, color: &str, chars: &str) {
    out.push_str(r"\textcolor{");
    out.push_str(color);
    out.push_str("}{");
    out.push_str(&latex_escape(chars));
    out.push('}');
}

/// Complete document for one poster.
pub fn build_latex(
    content: &PosterContent,
    mask: &Mask,
    scheme: &ColorScheme,
    paper: &PaperConfig,
) -> Result<String> {
    if mask.width() != content.cols || mask.height() != content.rows {
        return Err(PosterError::domain(format!(
            "mask is {}x{} but the grid is {}x{}",
            mask.width(),
            mask.height(),
            content.cols,
            content.rows
        )));
    }

    let body = content
        .lines
        .iter()
        .enumerate()
        .map(|(y, line)| {
            let mut shaded = shaded_line(line, mask.row(y as u32), scheme, QUANTIZE_LEVELS);
            shaded.push_str(r"\\");
            shaded
        })
        .collect::<Vec<_>>()
        .join("\n");

    let color_preamble = if scheme.preamble.is_empty() {
        String::new()
    } else {
        format!("\n{}", scheme.preamble)
    };

    Ok(format!(
        r"\documentclass[final]{{article}}
\usepackage[
  paperwidth={width}mm,
  paperheight={height}mm,
  margin={margin}mm
]{{geometry}}
\usepackage{{fontspec}}
\usepackage{{microtype}}
\usepackage{{xcolor}}{color_preamble}
\setmonofont{{{font}}}[Path=fonts/,Extension=.otf]
\renewcommand{{\familydefault}}{{\ttdefault}}
\setlength{{\parindent}}{{0pt}}
\setlength{{\topskip}}{{0pt}}
\setlength{{\parskip}}{{0pt}}
\pagestyle{{empty}}

\begin{{document}}
\centering
\vspace*{{\stretch{{1}}}}\noindent
\fontsize{{{font_size:.1}}}{{{line_height:.1}}}\selectfont
{body}
\vspace*{{\stretch{{2}}}}
\end{{document}}
",
        width = paper.width_mm,
        height = paper.height_mm,
        margin = paper.margin_mm,
        font = MONO_FONT,
        font_size = paper.font_size_pt,
        line_height = paper.line_height_pt,
    ))
}
