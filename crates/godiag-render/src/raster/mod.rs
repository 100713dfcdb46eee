//! Board to bitmap.

mod canvas;
mod text;

pub use text::{FontContext, FontMetrics};

use crate::{Error, Result};
use canvas::Canvas;
use godiag_core::{Board, Color, Geometry, Mark, Stone, StyleConfig, Symbol};
use text::Anchor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }
}

/// Letter labelling board column `index` (0 = left edge). `I` is skipped.
pub fn column_label(index: u32) -> char {
    let skip = u32::from(index > 7);
    char::from_u32(u32::from(b'A') + index + skip).unwrap_or('?')
}

/// Draws boards with a fixed style. Font metrics and the circle-mark stamp are prepared once
/// in [`RasterRenderer::new`].
#[derive(Debug)]
pub struct RasterRenderer {
    style: StyleConfig,
    fonts: FontContext,
    circle_stamp: CircleStamp,
    jpeg_quality: u8,
}

struct CircleStamp {
    canvas: Canvas,
    radius: i32,
}

impl std::fmt::Debug for CircleStamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CircleStamp")
            .field("radius", &self.radius)
            .finish_non_exhaustive()
    }
}

impl CircleStamp {
    /// A mark-coloured ring on a board-coloured square; the board colour is treated as
    /// transparent when stamping.
    fn new(style: &StyleConfig) -> Result<Self> {
        let r = style.mark_radius;
        let dim = 2 * r + 3;
        let mut canvas = Canvas::new(dim, dim)?;
        canvas.fill(style.colors.goban.opaque());
        canvas.circle(r + 1, r + 1, r, style.colors.mark);
        canvas.circle(r + 1, r + 1, r - 2, style.colors.goban.opaque());
        Ok(Self { canvas, radius: r })
    }
}

impl RasterRenderer {
    pub fn new(style: StyleConfig) -> Result<Self> {
        let fonts = FontContext::new(&style)?;
        let circle_stamp = CircleStamp::new(&style)?;
        Ok(Self {
            style,
            fonts,
            circle_stamp,
            jpeg_quality: 90,
        })
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn fonts(&self) -> &FontContext {
        &self.fonts
    }

    /// Renders `board` into a pixmap.
    ///
    /// Every cell is classified before anything is drawn, so an unknown symbol fails without
    /// producing a partial image.
    pub fn render(&self, board: &Board) -> Result<tiny_skia::Pixmap> {
        let symbols = board
            .cells()
            .map(|(row, col, ch)| {
                Symbol::classify(ch)
                    .map(|symbol| (row, col, ch, symbol))
                    .ok_or(godiag_core::Error::UnknownSymbol { symbol: ch })
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let geometry = Geometry::for_board(board, &self.style);
        let size = geometry.canvas_size(board.width(), board.height());
        let mut canvas = Canvas::new(size.width, size.height)?;
        tracing::debug!(
            width = size.width,
            height = size.height,
            cells = symbols.len(),
            "rendering go diagram"
        );

        canvas.fill(self.style.colors.goban.opaque());
        self.draw_grid(&mut canvas, board, &geometry);
        if board.coord_markers() {
            self.draw_coordinates(&mut canvas, board, &geometry)?;
        }

        for (row, col, ch, symbol) in symbols {
            let p = geometry.pixel_coordinate(col as i32, row as i32);
            tracing::trace!(row, col, ?symbol, "drawing symbol");
            self.draw_symbol(&mut canvas, board, symbol, p.x, p.y)?;
            if board.link_target(ch).is_some() {
                self.draw_link(&mut canvas, p.x, p.y);
            }
        }
        Ok(canvas.into_pixmap())
    }

    pub fn render_png(&self, board: &Board) -> Result<Vec<u8>> {
        let pixmap = self.render(board)?;
        pixmap.encode_png().map_err(|_| Error::PngEncode)
    }

    pub fn render_jpeg(&self, board: &Board) -> Result<Vec<u8>> {
        let pixmap = self.render(board)?;
        let (w, h) = (pixmap.width(), pixmap.height());

        // The background is always filled with an opaque colour, so alpha can be dropped.
        let rgba = pixmap.data();
        let mut rgb = vec![0u8; (w as usize) * (h as usize) * 3];
        for (src, dst) in rgba.chunks_exact(4).zip(rgb.chunks_exact_mut(3)) {
            dst[0] = src[0];
            dst[1] = src[1];
            dst[2] = src[2];
        }

        let mut out = Vec::new();
        let mut enc =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, self.jpeg_quality);
        enc.encode(&rgb, w, h, image::ExtendedColorType::Rgb8)
            .map_err(|_| Error::JpegEncode)?;
        Ok(out)
    }

    pub fn render_format(&self, board: &Board, format: ImageFormat) -> Result<Vec<u8>> {
        match format {
            ImageFormat::Png => self.render_png(board),
            ImageFormat::Jpeg => self.render_jpeg(board),
        }
    }

    fn draw_grid(&self, canvas: &mut Canvas, board: &Board, geometry: &Geometry) {
        let edges = board.edges();
        let line = self.style.colors.line;
        let (x0, x1) = geometry.line_span(canvas.width(), edges.left, edges.right);
        let (y0, y1) = geometry.line_span(canvas.height(), edges.top, edges.bottom);
        for row in 0..board.height() {
            let y = geometry.pixel_coordinate(0, row as i32).y;
            canvas.hline(x0, x1, y, line);
        }
        for col in 0..board.width() {
            let x = geometry.pixel_coordinate(col as i32, 0).x;
            canvas.vline(x, y0, y1, line);
        }
    }

    fn draw_coordinates(
        &self,
        canvas: &mut Canvas,
        board: &Board,
        geometry: &Geometry,
    ) -> Result<()> {
        let metrics = self.fonts.metrics();
        let color = self.style.colors.string;

        for row in 0..board.height() {
            let p = geometry.pixel_coordinate(-1, row as i32);
            let number = board.board_size() as i64 - board.offset_y() as i64 - row as i64;
            let nudge = if number < 10 { metrics.digit_nudge } else { 0 };
            let x = p.x - self.style.stone_radius + nudge;
            self.fonts.draw(
                canvas,
                &number.to_string(),
                x,
                p.y + metrics.majuscule_offset,
                Anchor::Start,
                color,
            )?;
        }
        for col in 0..board.width() {
            let p = geometry.pixel_coordinate(col as i32, -1);
            let letter = column_label(board.offset_x() + col as u32);
            self.fonts.draw(
                canvas,
                letter.encode_utf8(&mut [0; 4]),
                p.x,
                p.y + metrics.majuscule_offset,
                Anchor::Middle,
                color,
            )?;
        }
        Ok(())
    }

    fn stone_color(&self, stone: Stone) -> Color {
        match stone {
            Stone::Black => self.style.colors.black,
            Stone::White => self.style.colors.white,
        }
    }

    fn draw_stone(&self, canvas: &mut Canvas, stone: Stone, x: i32, y: i32) {
        let r = self.style.stone_radius;
        match stone {
            Stone::Black => canvas.circle(x, y, r, self.style.colors.black),
            Stone::White => {
                canvas.circle(x, y, r, self.style.colors.white_rim);
                canvas.circle(x, y, r - 1, self.style.colors.white);
            }
        }
    }

    fn draw_square_mark(&self, canvas: &mut Canvas, x: i32, y: i32) {
        let h = self.style.mark_square_height / 2;
        canvas.fill_rect(x - h, y - h, x + h, y + h, self.style.colors.mark);
    }

    fn draw_symbol(
        &self,
        canvas: &mut Canvas,
        board: &Board,
        symbol: Symbol,
        x: i32,
        y: i32,
    ) -> Result<()> {
        let colors = &self.style.colors;
        match symbol {
            Symbol::Empty => {}
            Symbol::Hoshi => canvas.circle(x, y, self.style.hoshi_radius, colors.line),
            Symbol::Stone(stone) => self.draw_stone(canvas, stone, x, y),
            Symbol::Mark(Mark::Circle) => {
                let r = self.circle_stamp.radius;
                canvas.stamp(
                    &self.circle_stamp.canvas,
                    x - r - 1,
                    y - r - 1,
                    colors.goban.opaque(),
                );
            }
            Symbol::Mark(Mark::Square) => self.draw_square_mark(canvas, x, y),
            Symbol::MarkedStone(stone, Mark::Circle) => {
                self.draw_stone(canvas, stone, x, y);
                let r = self.style.mark_radius;
                canvas.circle(x, y, r, colors.mark);
                canvas.circle(x, y, r - 2, self.stone_color(stone));
            }
            Symbol::MarkedStone(stone, Mark::Square) => {
                self.draw_stone(canvas, stone, x, y);
                self.draw_square_mark(canvas, x, y);
            }
            Symbol::Wipe => {
                let half = self.style.line_spacing / 2;
                canvas.fill_rect(
                    x - half + 1,
                    y - half + 1,
                    x + half,
                    y + half,
                    colors.goban.opaque(),
                );
            }
            Symbol::Move(n) => {
                let stone = Stone::for_move(n, board.black_first());
                self.draw_stone(canvas, stone, x, y);
                self.fonts.draw(
                    canvas,
                    &n.to_string(),
                    x,
                    y + self.fonts.metrics().majuscule_offset,
                    Anchor::Middle,
                    self.stone_color(stone.opposite()),
                )?;
            }
            Symbol::Label(ch) => {
                let r = self.style.stone_radius - 3;
                canvas.fill_rect(x - r, y - r, x + r, y + r, colors.goban.opaque());
                self.fonts.draw(
                    canvas,
                    ch.encode_utf8(&mut [0; 4]),
                    x,
                    y + self.fonts.metrics().minuscule_offset,
                    Anchor::Middle,
                    colors.string,
                )?;
            }
        }
        Ok(())
    }

    fn draw_link(&self, canvas: &mut Canvas, x: i32, y: i32) {
        let h = self.style.link_square_height / 2;
        canvas.fill_rect(x - h, y - h, x + h, y + h, self.style.colors.link);
    }
}
