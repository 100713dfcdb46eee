//! Text in, cached artifacts and page metadata out.

use super::{HeadlessError, Result};
use crate::store::{ArtifactKey, ArtifactKind, ArtifactStore};
use godiag_core::{
    Board, Geometry, LayoutClass, ParseOptions, StyleConfig, fingerprint, parse_board,
    strip_go_tags,
};
use godiag_render::{
    ImageFormat, ImageMap, LinkResolver, RasterRenderer, SgfOptions, build_image_map,
    image_map_id, to_sgf,
};
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Everything a host page needs to embed one diagram.
#[derive(Debug, Clone, Serialize)]
pub struct DiagramOutput {
    pub image: ArtifactKey,
    pub sgf: ArtifactKey,
    pub heading: String,
    pub layout_class: LayoutClass,
    pub line_break_after: bool,
    pub width: i32,
    pub height: i32,
    pub map_id: String,
    pub image_map: ImageMap,
    pub image_map_html: String,
    /// Both artifacts were already in the store.
    pub cached: bool,
}

/// Parses, fingerprints and renders diagrams with one style, writing artifacts to a store.
#[derive(Debug)]
pub struct Renderer {
    raster: RasterRenderer,
    format: ImageFormat,
    sgf_options: SgfOptions,
    sequence: AtomicUsize,
}

impl Renderer {
    pub fn new(style: StyleConfig) -> Result<Self> {
        style.validate()?;
        Ok(Self {
            raster: RasterRenderer::new(style)?,
            format: ImageFormat::Png,
            sgf_options: SgfOptions::default(),
            sequence: AtomicUsize::new(0),
        })
    }

    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_sgf_options(mut self, options: SgfOptions) -> Self {
        self.sgf_options = options;
        self
    }

    pub fn style(&self) -> &StyleConfig {
        self.raster.style()
    }

    pub fn raster(&self) -> &RasterRenderer {
        &self.raster
    }

    pub fn sgf_options(&self) -> &SgfOptions {
        &self.sgf_options
    }

    /// Parses diagram text, with or without its `<go>` wrapper.
    pub fn parse(&self, text: &str) -> Result<Board> {
        let options = ParseOptions::from_style(self.style());
        Ok(parse_board(strip_go_tags(text), &options)?)
    }

    fn image_kind(&self) -> ArtifactKind {
        match self.format {
            ImageFormat::Png => ArtifactKind::Png,
            ImageFormat::Jpeg => ArtifactKind::Jpeg,
        }
    }

    /// Runs the whole pipeline for one diagram.
    ///
    /// Artifacts missing from `store` are produced first and only written once all of them
    /// succeeded, so a diagram that fails to parse or render leaves the store untouched. Writes
    /// are not transactional: if the store fails on the SGF record, the already written image
    /// stays cached. Every stored artifact is complete.
    pub fn process(
        &self,
        text: &str,
        store: &dyn ArtifactStore,
        resolver: &dyn LinkResolver,
    ) -> Result<DiagramOutput> {
        let board = self.parse(text)?;
        let style = self.style();
        let keys = fingerprint(&board, style);
        let image_key = ArtifactKey::new(self.image_kind(), keys.image);
        let sgf_key = ArtifactKey::new(ArtifactKind::Sgf, keys.sgf);

        let contains = |key: &ArtifactKey| {
            store
                .contains(key)
                .map_err(|source| HeadlessError::Serialization {
                    key: key.clone(),
                    source,
                })
        };
        let image_cached = contains(&image_key)?;
        let sgf_cached = contains(&sgf_key)?;
        tracing::debug!(
            image = %image_key,
            sgf = %sgf_key,
            image_cached,
            sgf_cached,
            "artifact store lookup"
        );

        let image = if image_cached {
            None
        } else {
            Some(self.raster.render_format(&board, self.format)?)
        };
        let sgf = if sgf_cached {
            None
        } else {
            Some(to_sgf(&board, style, &self.sgf_options))
        };

        let put = |key: &ArtifactKey, bytes: &[u8]| {
            store
                .put(key, bytes)
                .map_err(|source| HeadlessError::Serialization {
                    key: key.clone(),
                    source,
                })
        };
        if let Some(bytes) = &image {
            put(&image_key, bytes)?;
        }
        if let Some(text) = &sgf {
            put(&sgf_key, text.as_bytes())?;
        }

        let size = Geometry::for_board(&board, style).canvas_size(board.width(), board.height());
        let image_map = build_image_map(&board, style, resolver);
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        let map_id = image_map_id(&image_key.hash, sequence);
        let image_map_html = image_map.to_html(&map_id);

        Ok(DiagramOutput {
            image: image_key,
            sgf: sgf_key,
            heading: board.title().to_string(),
            layout_class: board.layout_class(),
            line_break_after: board.line_break_after(),
            width: size.width,
            height: size.height,
            map_id,
            image_map,
            image_map_html,
            cached: image_cached && sgf_cached,
        })
    }
}
