//! Font lookup for PDF rendering.
//!
//! Families are opaque names (`DejaVu`, `NotoSansKR`) resolved per emphasis
//! to either a TrueType file on disk or one of the PDF builtin faces. The
//! builtin faces only carry Latin glyphs, so they are a fallback for the
//! Latin family and never for Korean.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use printpdf::BuiltinFont;

use super::compose::Emphasis;
use super::RenderError;

const PT_TO_MM: f32 = 0.352_778;

/// Where the glyphs for one face come from.
#[derive(Debug, Clone)]
pub enum FontSource {
    Builtin(BuiltinFont),
    /// Raw TrueType/OpenType bytes, already validated as parseable.
    External(Arc<Vec<u8>>),
}

impl FontSource {
    /// Rendered width of `text` at `size_pt`, in millimetres.
    pub fn text_width_mm(&self, text: &str, size_pt: f32) -> f32 {
        let em = match self {
            FontSource::Builtin(_) => text.chars().map(builtin_advance_em).sum::<f32>(),
            FontSource::External(data) => external_width_em(data, text),
        };
        em * size_pt * PT_TO_MM
    }
}

/// Named font lookup.
pub trait FontProvider: Send + Sync {
    fn resolve(&self, family: &str, emphasis: Emphasis) -> Result<FontSource, RenderError>;
}

// ═══════════════════════════════════════════════════════════
// Builtin faces
// ═══════════════════════════════════════════════════════════

/// Always answers with Helvetica, whatever the family.
///
/// Useful when no font files are installed; glyphs outside Latin-1 will not
/// display correctly.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinFontProvider;

impl FontProvider for BuiltinFontProvider {
    fn resolve(&self, _family: &str, emphasis: Emphasis) -> Result<FontSource, RenderError> {
        Ok(FontSource::Builtin(helvetica(emphasis)))
    }
}

fn helvetica(emphasis: Emphasis) -> BuiltinFont {
    match emphasis {
        Emphasis::Regular => BuiltinFont::Helvetica,
        Emphasis::Bold => BuiltinFont::HelveticaBold,
        Emphasis::Italic => BuiltinFont::HelveticaOblique,
    }
}

/// Approximate Helvetica advance widths in em.
fn builtin_advance_em(c: char) -> f32 {
    match c {
        ' ' => 0.278,
        'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '!' | '|' | '\'' => 0.25,
        'f' | 't' | 'r' | '(' | ')' | '-' | '/' => 0.333,
        'm' | 'w' | 'M' | 'W' | '%' => 0.833,
        '0'..='9' => 0.556,
        'A'..='Z' => 0.667,
        c if c.is_ascii() => 0.5,
        _ => 1.0,
    }
}

fn external_width_em(data: &[u8], text: &str) -> f32 {
    let Ok(face) = ttf_parser::Face::parse(data, 0) else {
        return text.chars().map(builtin_advance_em).sum();
    };
    let units_per_em = f32::from(face.units_per_em());
    text.chars()
        .map(|c| {
            face.glyph_index(c)
                .and_then(|gid| face.glyph_hor_advance(gid))
                .map(|adv| f32::from(adv) / units_per_em)
                .unwrap_or_else(|| builtin_advance_em(c))
        })
        .sum()
}

// ═══════════════════════════════════════════════════════════
// Font directory
// ═══════════════════════════════════════════════════════════

/// Reads TrueType files from a directory by conventional file name.
pub struct DirectoryFontProvider {
    dir: PathBuf,
}

impl DirectoryFontProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Families and faces whose files are missing, as `family/emphasis` pairs.
    pub fn missing_faces(&self) -> Vec<String> {
        KNOWN_FAMILIES
            .iter()
            .flat_map(|family| {
                [Emphasis::Regular, Emphasis::Bold, Emphasis::Italic]
                    .into_iter()
                    .filter_map(move |e| {
                        let file = face_file_name(family, e)?;
                        (!self.dir.join(file).is_file()).then(|| format!("{family}/{e:?}"))
                    })
            })
            .collect()
    }
}

const KNOWN_FAMILIES: &[&str] = &["DejaVu", "NotoSansKR"];

/// File name for a face. The Korean family has no oblique cut, so its
/// light weight stands in for italic.
fn face_file_name(family: &str, emphasis: Emphasis) -> Option<&'static str> {
    let name = match (family, emphasis) {
        ("DejaVu", Emphasis::Regular) => "DejaVuSans.ttf",
        ("DejaVu", Emphasis::Bold) => "DejaVuSans-Bold.ttf",
        ("DejaVu", Emphasis::Italic) => "DejaVuSans-Oblique.ttf",
        ("NotoSansKR", Emphasis::Regular) => "NotoSansKR-Regular.ttf",
        ("NotoSansKR", Emphasis::Bold) => "NotoSansKR-Bold.ttf",
        ("NotoSansKR", Emphasis::Italic) => "NotoSansKR-ExtraLight.ttf",
        _ => return None,
    };
    Some(name)
}

/// Whether the builtin Latin faces may replace a missing file.
fn has_latin_fallback(family: &str) -> bool {
    family == "DejaVu"
}

impl FontProvider for DirectoryFontProvider {
    fn resolve(&self, family: &str, emphasis: Emphasis) -> Result<FontSource, RenderError> {
        let unavailable = || RenderError::FontUnavailable {
            family: family.to_string(),
            emphasis,
        };

        let file = face_file_name(family, emphasis).ok_or_else(unavailable)?;
        let path = self.dir.join(file);

        let data = match std::fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if has_latin_fallback(family) {
                    tracing::debug!(
                        path = %path.display(),
                        "Font file missing, falling back to builtin Helvetica"
                    );
                    return Ok(FontSource::Builtin(helvetica(emphasis)));
                }
                return Err(unavailable());
            }
            Err(e) => return Err(RenderError::Io(e)),
        };

        ttf_parser::Face::parse(&data, 0).map_err(|e| RenderError::FontParse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Ok(FontSource::External(Arc::new(data)))
    }
}

/// Directory of system DejaVu faces, copied under every known family's file
/// names. `None` when the host has no DejaVu install.
#[cfg(test)]
pub(crate) fn installed_font_dir() -> Option<tempfile::TempDir> {
    let system = Path::new("/usr/share/fonts/truetype/dejavu");
    if !system.join("DejaVuSans.ttf").is_file() {
        return None;
    }
    let sources = [
        (Emphasis::Regular, "DejaVuSans.ttf"),
        (Emphasis::Bold, "DejaVuSans-Bold.ttf"),
        (Emphasis::Italic, "DejaVuSans-Oblique.ttf"),
    ];
    let tmp = tempfile::tempdir().ok()?;
    for family in KNOWN_FAMILIES {
        for (emphasis, source) in sources {
            let target = face_file_name(family, emphasis)?;
            std::fs::copy(system.join(source), tmp.path().join(target)).ok()?;
        }
    }
    Some(tmp)
}
