#![forbid(unsafe_code)]

//! Consumers of a parsed [`godiag_core::Board`]: the raster renderer, the SGF writer and the
//! image-map builder. All three are independent and never mutate the board.

pub mod imagemap;
pub mod raster;
pub mod sgf;

pub use imagemap::{
    ImageMap, ImageMapArea, LinkResolver, ResolvedLink, build_image_map, image_map_id,
};
pub use raster::{FontContext, FontMetrics, ImageFormat, RasterRenderer, column_label};
pub use sgf::{SgfOptions, to_sgf};

use godiag_core::ErrorKind;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] godiag_core::Error),
    #[error("failed to allocate a {width}x{height} pixmap")]
    PixmapAlloc { width: i32, height: i32 },
    #[error("failed to lay out label {text:?}")]
    Label { text: String },
    #[error("failed to encode PNG")]
    PngEncode,
    #[error("failed to encode JPG")]
    JpegEncode,
    #[error("no installed font can draw labels (wanted {family:?})")]
    NoGlyphs { family: String },
    #[error("cannot load font {}: {source}", path.display())]
    Font {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Parse(e) => e.kind(),
            Error::PixmapAlloc { .. }
            | Error::Label { .. }
            | Error::PngEncode
            | Error::JpegEncode
            | Error::NoGlyphs { .. }
            | Error::Font { .. } => ErrorKind::Render,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
