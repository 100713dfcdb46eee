use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Largest board whose coordinates the SGF alphabet (`a`-`z`, `A`-`Z`) can address.
pub const SGF_ADDRESSABLE_MAX: u32 = 52;

/// An RGBA colour with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ColorRepr", into = "[u8; 4]")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(self) -> Self {
        Self { a: 255, ..self }
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub fn is_opaque(self) -> bool {
        self.a == 255
    }

    /// `#rrggbb` (or `#rrggbbaa` when translucent), as used in SVG paint attributes.
    pub fn to_hex(self) -> String {
        if self.is_opaque() {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Parses `transparent`, `white`, `black`, `#rgb`, `#rgba`, `#rrggbb` and `#rrggbbaa`.
    pub fn parse_css(text: &str) -> Option<Self> {
        let s = text.trim().to_ascii_lowercase();
        match s.as_str() {
            "transparent" => return Some(Self::rgba(0, 0, 0, 0)),
            "white" => return Some(Self::rgb(255, 255, 255)),
            "black" => return Some(Self::rgb(0, 0, 0)),
            _ => {}
        }

        let hex = s.strip_prefix('#')?;
        fn hex2(b: &[u8]) -> Option<u8> {
            let hi = (*b.first()? as char).to_digit(16)? as u8;
            let lo = (*b.get(1)? as char).to_digit(16)? as u8;
            Some((hi << 4) | lo)
        }
        fn hex1(c: u8) -> Option<u8> {
            let v = (c as char).to_digit(16)? as u8;
            Some((v << 4) | v)
        }

        let bytes = hex.as_bytes();
        match bytes.len() {
            3 => Some(Self::rgb(
                hex1(bytes[0])?,
                hex1(bytes[1])?,
                hex1(bytes[2])?,
            )),
            4 => Some(Self::rgba(
                hex1(bytes[0])?,
                hex1(bytes[1])?,
                hex1(bytes[2])?,
                hex1(bytes[3])?,
            )),
            6 => Some(Self::rgb(
                hex2(&bytes[0..2])?,
                hex2(&bytes[2..4])?,
                hex2(&bytes[4..6])?,
            )),
            8 => Some(Self::rgba(
                hex2(&bytes[0..2])?,
                hex2(&bytes[2..4])?,
                hex2(&bytes[4..6])?,
                hex2(&bytes[6..8])?,
            )),
            _ => None,
        }
    }
}

impl From<Color> for [u8; 4] {
    fn from(c: Color) -> Self {
        [c.r, c.g, c.b, c.a]
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Channels(Vec<u8>),
    Css(String),
}

impl TryFrom<ColorRepr> for Color {
    type Error = String;

    fn try_from(value: ColorRepr) -> std::result::Result<Self, Self::Error> {
        match value {
            ColorRepr::Channels(ch) => match ch.as_slice() {
                [r, g, b] => Ok(Color::rgb(*r, *g, *b)),
                [r, g, b, a] => Ok(Color::rgba(*r, *g, *b, *a)),
                other => Err(format!(
                    "expected 3 or 4 colour channels, got {}",
                    other.len()
                )),
            },
            ColorRepr::Css(s) => Color::parse_css(&s).ok_or_else(|| format!("invalid colour {s:?}")),
        }
    }
}

/// Colour table used by the raster renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub goban: Color,
    pub black: Color,
    pub white: Color,
    pub white_rim: Color,
    pub mark: Color,
    /// Link highlight, drawn translucently over the cell.
    pub link: Color,
    pub line: Color,
    pub string: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            goban: Color::rgb(242, 180, 101),
            black: Color::rgb(0, 0, 0),
            white: Color::rgb(255, 255, 255),
            white_rim: Color::rgb(70, 70, 70),
            mark: Color::rgb(244, 0, 0),
            link: Color::rgba(10, 50, 255, 62),
            line: Color::rgb(0, 0, 0),
            string: Color::rgb(0, 0, 0),
        }
    }
}

/// Process-wide style configuration: geometry constants, fonts and colours.
///
/// Loaded once at startup and shared read-only by every diagram. All pixel values are integers
/// so the renderer and the image map agree on every coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Largest board size a diagram may resolve to.
    pub board_max: u32,
    /// Root comment written into every SGF record.
    pub sgf_comment: String,
    /// Optional TrueType/OpenType font file. System fonts are used when unset.
    pub font_path: Option<PathBuf>,
    pub font_family: String,
    /// Font size in px (roughly half of `line_spacing`).
    pub font_size: u32,
    /// Distance between two adjacent board lines.
    pub line_spacing: i32,
    /// Margin between the canvas border and a marked board edge.
    pub edge_spacing: i32,
    /// Margin before a grid line that runs off an unmarked edge.
    pub line_begin: i32,
    /// Extra margin reserved for coordinate labels.
    pub coord_spacing: i32,
    pub stone_radius: i32,
    pub mark_radius: i32,
    pub mark_square_height: i32,
    pub link_square_height: i32,
    pub hoshi_radius: i32,
    pub colors: Palette,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            board_max: 40,
            sgf_comment: "Diagram generated by godiag".to_string(),
            font_path: None,
            font_family: "DejaVu Sans".to_string(),
            font_size: 10,
            line_spacing: 22,
            edge_spacing: 14,
            line_begin: 4,
            coord_spacing: 20,
            stone_radius: 11,
            mark_radius: 5,
            mark_square_height: 8,
            link_square_height: 21,
            hoshi_radius: 3,
            colors: Palette::default(),
        }
    }
}

impl StyleConfig {
    /// Loads a style file. `.yaml`/`.yml` files are read as YAML, everything else as JSON.
    /// Missing keys fall back to the defaults.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::StyleIo {
            path: path.to_path_buf(),
            source,
        })?;
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
        let style = if is_yaml {
            Self::from_yaml_str(&text)?
        } else {
            Self::from_json_str(&text)?
        };
        tracing::debug!(path = %path.display(), "loaded style configuration");
        Ok(style)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let style: Self = serde_json::from_str(text).map_err(|e| Error::InvalidStyle {
            message: e.to_string(),
        })?;
        style.validate()?;
        Ok(style)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let style: Self = serde_yaml::from_str(text).map_err(|e| Error::InvalidStyle {
            message: e.to_string(),
        })?;
        style.validate()?;
        Ok(style)
    }

    /// Rejects values the geometry or the SGF alphabet cannot represent.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(Error::InvalidStyle { message });

        if self.board_max == 0 || self.board_max > SGF_ADDRESSABLE_MAX {
            return invalid(format!(
                "board_max must be between 1 and {SGF_ADDRESSABLE_MAX}, got {}",
                self.board_max
            ));
        }
        if self.line_spacing < 2 {
            return invalid(format!(
                "line_spacing must be at least 2, got {}",
                self.line_spacing
            ));
        }
        if self.font_size == 0 {
            return invalid("font_size must be positive".to_string());
        }
        for (name, value) in [
            ("edge_spacing", self.edge_spacing),
            ("line_begin", self.line_begin),
            ("coord_spacing", self.coord_spacing),
            ("mark_square_height", self.mark_square_height),
            ("link_square_height", self.link_square_height),
        ] {
            if value < 0 {
                return invalid(format!("{name} must not be negative, got {value}"));
            }
        }
        for (name, value) in [
            ("stone_radius", self.stone_radius),
            ("mark_radius", self.mark_radius),
        ] {
            // Stones and circle marks draw an inner disc two pixels smaller than the rim.
            if value < 3 {
                return invalid(format!("{name} must be at least 3, got {value}"));
            }
        }
        if self.hoshi_radius < 1 {
            return invalid(format!(
                "hoshi_radius must be at least 1, got {}",
                self.hoshi_radius
            ));
        }
        Ok(())
    }
}
