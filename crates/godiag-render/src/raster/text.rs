//! Font loading, one-time metrics and label drawing.
//!
//! Labels are laid out by `usvg` (the same text stack the raster export path uses) as a tiny
//! SVG document the size of the canvas, then composited with `resvg`.

use super::canvas::Canvas;
use crate::{Error, Result};
use godiag_core::{Color, StyleConfig};
use std::fmt::Write as _;

/// Horizontal alignment of a label relative to its x coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Anchor {
    Start,
    Middle,
}

impl Anchor {
    fn as_svg(self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
        }
    }
}

// Proportions of a typical sans-serif face, relative to the font size.
const CAP_HEIGHT: f32 = 0.73;
const X_HEIGHT: f32 = 0.55;
const DIGIT_ADVANCE: f32 = 0.64;

/// Vertical offsets derived from the font, in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontMetrics {
    /// Baseline offset that centres a capital letter or digit on an intersection.
    pub majuscule_offset: i32,
    /// Baseline offset that centres a lower-case letter on an intersection.
    pub minuscule_offset: i32,
    /// Shift applied to single-digit row labels so they line up with two-digit ones.
    pub digit_nudge: i32,
}

impl FontMetrics {
    /// Rough proportions of a sans-serif face, used for glyphs the font cannot measure.
    pub fn approximate(font_size: u32) -> Self {
        let fs = font_size as f32;
        Self::from_measurements(CAP_HEIGHT * fs, X_HEIGHT * fs, DIGIT_ADVANCE * fs)
    }

    fn from_measurements(cap_height: f32, x_height: f32, digit_advance: f32) -> Self {
        Self {
            majuscule_offset: (cap_height / 2.0) as i32,
            minuscule_offset: (x_height / 2.0) as i32 + 1,
            digit_nudge: (digit_advance - 1.0).round().max(0.0) as i32,
        }
    }
}

/// Fonts and metrics, resolved once per renderer and shared by every diagram.
pub struct FontContext {
    options: usvg::Options<'static>,
    family: String,
    size: u32,
    metrics: FontMetrics,
}

impl std::fmt::Debug for FontContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontContext")
            .field("family", &self.family)
            .field("size", &self.size)
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}

impl FontContext {
    /// Loads the configured font (or the system fonts) and measures it. Fails when no face can
    /// draw a label.
    pub fn new(style: &StyleConfig) -> Result<Self> {
        let mut options = usvg::Options::default();
        let family = match &style.font_path {
            Some(path) => {
                options
                    .fontdb_mut()
                    .load_font_file(path)
                    .map_err(|source| Error::Font {
                        path: path.clone(),
                        source,
                    })?;
                first_family(&options.fontdb).ok_or_else(|| Error::Font {
                    path: path.clone(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        "file contains no usable font face",
                    ),
                })?
            }
            None => {
                options.fontdb_mut().load_system_fonts();
                resolve_family(&options.fontdb, &style.font_family).ok_or_else(|| {
                    Error::NoGlyphs {
                        family: style.font_family.clone(),
                    }
                })?
            }
        };
        if family != style.font_family {
            tracing::debug!(
                requested = %style.font_family,
                using = %family,
                "font family substituted"
            );
        }
        options.font_family = family.clone();

        let mut fonts = Self {
            options,
            family,
            size: style.font_size,
            metrics: FontMetrics::approximate(style.font_size),
        };
        fonts.metrics = fonts.measure_metrics()?;
        tracing::debug!(family = %fonts.family, metrics = ?fonts.metrics, "font metrics ready");
        Ok(fonts)
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn metrics(&self) -> FontMetrics {
        self.metrics
    }

    fn measure_metrics(&self) -> Result<FontMetrics> {
        let ascent = |text: &str| self.measure(text).map(|(top, _)| top);
        let width = |text: &str| self.measure(text).map(|(_, w)| w);

        let Some(cap) = ascent("A") else {
            return Err(Error::NoGlyphs {
                family: self.family.clone(),
            });
        };
        let fs = self.size as f32;
        let x_height = ascent("a").unwrap_or_else(|| {
            tracing::warn!(family = %self.family, "no lower-case glyphs; x-height is approximate");
            X_HEIGHT * fs
        });
        let digit_advance = match (width("1"), width("11")) {
            (Some(one), Some(two)) => two - one,
            _ => {
                tracing::warn!(family = %self.family, "no digit glyphs; row label nudge is approximate");
                DIGIT_ADVANCE * fs
            }
        };
        Ok(FontMetrics::from_measurements(cap, x_height, digit_advance))
    }

    /// Height above the baseline and width of the inked area of `text`.
    fn measure(&self, text: &str) -> Option<(f32, f32)> {
        const BASELINE: f32 = 100.0;
        let svg = self.svg_document(
            200,
            200,
            &label_element(
                &self.family,
                self.size,
                text,
                50,
                BASELINE as i32,
                Anchor::Start,
                Color::rgb(0, 0, 0),
            ),
        );
        let tree = usvg::Tree::from_str(&svg, &self.options).ok()?;
        if !tree.root().has_children() {
            return None;
        }
        let bbox = tree.root().abs_bounding_box();
        (bbox.width() > 0.0 && bbox.height() > 0.0).then(|| (BASELINE - bbox.y(), bbox.width()))
    }

    fn svg_document(&self, width: i32, height: i32, body: &str) -> String {
        let mut svg = String::new();
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">{body}</svg>"#
        );
        svg
    }

    /// Draws `text` with its baseline at `baseline`.
    pub(crate) fn draw(
        &self,
        canvas: &mut Canvas,
        text: &str,
        x: i32,
        baseline: i32,
        anchor: Anchor,
        color: Color,
    ) -> Result<()> {
        let element = label_element(&self.family, self.size, text, x, baseline, anchor, color);
        let svg = self.svg_document(canvas.width(), canvas.height(), &element);
        let tree = usvg::Tree::from_str(&svg, &self.options).map_err(|_| Error::Label {
            text: text.to_string(),
        })?;
        resvg::render(
            &tree,
            tiny_skia::Transform::identity(),
            &mut canvas.pixmap_mut().as_mut(),
        );
        Ok(())
    }
}

fn first_family(db: &usvg::fontdb::Database) -> Option<String> {
    db.faces()
        .find_map(|face| face.families.first())
        .map(|(name, _)| name.clone())
}

/// The requested family if installed, else a common sans-serif face, else any face at all.
fn resolve_family(db: &usvg::fontdb::Database, preferred: &str) -> Option<String> {
    use usvg::fontdb::{Family, Query};

    let query = Query {
        families: &[
            Family::Name(preferred),
            Family::Name("DejaVu Sans"),
            Family::Name("Liberation Sans"),
            Family::SansSerif,
        ],
        ..Query::default()
    };
    db.query(&query)
        .and_then(|id| db.face(id))
        .and_then(|face| face.families.first())
        .map(|(name, _)| name.clone())
        .or_else(|| first_family(db))
}

fn label_element(
    family: &str,
    size: u32,
    text: &str,
    x: i32,
    baseline: i32,
    anchor: Anchor,
    color: Color,
) -> String {
    format!(
        r##"<text x="{x}" y="{baseline}" font-family="{}" font-size="{size}" text-anchor="{}" fill="#{:02x}{:02x}{:02x}" fill-opacity="{:.3}">{}</text>"##,
        htmlize::escape_attribute(family),
        anchor.as_svg(),
        color.r,
        color.g,
        color.b,
        f32::from(color.a) / 255.0,
        htmlize::escape_text(text),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approximate_metrics_scale_with_font_size() {
        let m = FontMetrics::approximate(10);
        assert_eq!(m.majuscule_offset, 3);
        assert_eq!(m.minuscule_offset, 3);
        assert_eq!(m.digit_nudge, 5);
        assert!(FontMetrics::approximate(20).majuscule_offset > m.majuscule_offset);
    }

    #[test]
    fn label_markup_escapes_text_and_family() {
        let el = label_element(
            "A&B",
            10,
            "<1>",
            5,
            7,
            Anchor::Middle,
            Color::rgb(255, 0, 0),
        );
        assert!(el.contains(r#"font-family="A&amp;B""#), "{el}");
        assert!(el.contains("&lt;1&gt;"), "{el}");
        assert!(el.contains(r##"fill="#ff0000""##), "{el}");
        assert!(el.contains(r#"text-anchor="middle""#), "{el}");
    }

    #[test]
    fn missing_font_file_is_a_font_error() {
        let style = StyleConfig {
            font_path: Some("/definitely/not/here.ttf".into()),
            ..StyleConfig::default()
        };
        let err = FontContext::new(&style).unwrap_err();
        assert!(matches!(err, Error::Font { .. }));
        assert_eq!(err.kind(), godiag_core::ErrorKind::Render);
    }

    #[test]
    fn file_without_font_faces_is_a_font_error() {
        let style = StyleConfig {
            font_path: Some(concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml").into()),
            ..StyleConfig::default()
        };
        let err = FontContext::new(&style).unwrap_err();
        assert!(
            matches!(&err, Error::Font { source, .. } if source.kind() == std::io::ErrorKind::InvalidData),
            "{err}"
        );
        assert_eq!(err.kind(), godiag_core::ErrorKind::Render);
    }

    #[test]
    fn empty_font_database_resolves_no_family() {
        let db = usvg::fontdb::Database::new();
        assert_eq!(resolve_family(&db, "DejaVu Sans"), None);
    }

    #[test]
    fn system_fonts_measure_real_glyphs() {
        let fonts = FontContext::new(&StyleConfig::default()).unwrap();
        assert!(!fonts.family().is_empty());
        let (cap, _) = fonts.measure("A").unwrap();
        let (x, _) = fonts.measure("a").unwrap();
        assert!(cap > x, "cap {cap} x-height {x}");
        assert!(fonts.metrics().majuscule_offset > 0);
    }
}
