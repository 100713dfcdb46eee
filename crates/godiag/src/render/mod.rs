pub use godiag_render::Error as RenderError;
pub use godiag_render::{
    FontContext, FontMetrics, ImageFormat, ImageMap, ImageMapArea, LinkResolver, RasterRenderer,
    ResolvedLink, SgfOptions, build_image_map, column_label, image_map_id, to_sgf,
};

pub mod links;
pub mod pipeline;

pub use links::{BaseUrlResolver, PassthroughResolver};
pub use pipeline::{DiagramOutput, Renderer};

use crate::store::ArtifactKey;
use godiag_core::ErrorKind;

#[derive(Debug, thiserror::Error)]
pub enum HeadlessError {
    #[error(transparent)]
    Parse(#[from] godiag_core::Error),
    #[error(transparent)]
    Render(#[from] godiag_render::Error),
    #[error("cannot store {key}: {source}")]
    Serialization {
        key: ArtifactKey,
        #[source]
        source: std::io::Error,
    },
}

impl HeadlessError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            HeadlessError::Parse(e) => e.kind(),
            HeadlessError::Render(e) => e.kind(),
            HeadlessError::Serialization { .. } => ErrorKind::Serialization,
        }
    }
}

pub type Result<T> = std::result::Result<T, HeadlessError>;
