//! Integer-coordinate drawing on top of a `tiny_skia::Pixmap`.
//!
//! Everything here works on whole pixels with inclusive end points, so the geometry computed in
//! `godiag_core::Geometry` maps one to one onto the bitmap.

use crate::{Error, Result};
use godiag_core::Color;
use tiny_skia::{Pixmap, PremultipliedColorU8};

pub(crate) struct Canvas {
    pixmap: Pixmap,
}

impl Canvas {
    pub(crate) fn new(width: i32, height: i32) -> Result<Self> {
        let alloc = || Error::PixmapAlloc { width, height };
        let w = u32::try_from(width).map_err(|_| alloc())?;
        let h = u32::try_from(height).map_err(|_| alloc())?;
        let pixmap = Pixmap::new(w, h).ok_or_else(alloc)?;
        Ok(Self { pixmap })
    }

    pub(crate) fn width(&self) -> i32 {
        self.pixmap.width() as i32
    }

    pub(crate) fn height(&self) -> i32 {
        self.pixmap.height() as i32
    }

    pub(crate) fn fill(&mut self, color: Color) {
        self.pixmap.fill(tiny_skia::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
    }

    pub(crate) fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    pub(crate) fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width() || y >= self.height() {
            return None;
        }
        Some(y as usize * self.pixmap.width() as usize + x as usize)
    }

    /// Straight-alpha colour of one pixel.
    pub(crate) fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        let px = self.pixmap.pixel(u32::try_from(x).ok()?, u32::try_from(y).ok()?)?;
        let c = px.demultiply();
        Some(Color::rgba(c.red(), c.green(), c.blue(), c.alpha()))
    }

    /// Source-over blend of `color` scaled by `opacity` (0..=1).
    pub(crate) fn blend(&mut self, x: i32, y: i32, color: Color, opacity: f32) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        let sa = (f32::from(color.a) * opacity.clamp(0.0, 1.0)).round() as u32;
        if sa == 0 {
            return;
        }
        let inv = 255 - sa;
        let dst = self.pixmap.pixels()[i];
        let mix = |s: u8, d: u8| ((u32::from(s) * sa + u32::from(d) * inv + 127) / 255) as u8;
        let out = PremultipliedColorU8::from_rgba(
            mix(color.r, dst.red()),
            mix(color.g, dst.green()),
            mix(color.b, dst.blue()),
            mix(255, dst.alpha()),
        );
        if let Some(out) = out {
            self.pixmap.pixels_mut()[i] = out;
        }
    }

    /// Overwrites a pixel, ignoring what was there.
    pub(crate) fn put(&mut self, x: i32, y: i32, color: Color) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        let a = u32::from(color.a);
        let pm = |c: u8| ((u32::from(c) * a + 127) / 255) as u8;
        if let Some(px) = PremultipliedColorU8::from_rgba(pm(color.r), pm(color.g), pm(color.b), color.a)
        {
            self.pixmap.pixels_mut()[i] = px;
        }
    }

    pub(crate) fn hline(&mut self, x1: i32, x2: i32, y: i32, color: Color) {
        for x in x1.min(x2)..=x1.max(x2) {
            self.blend(x, y, color, 1.0);
        }
    }

    pub(crate) fn vline(&mut self, x: i32, y1: i32, y2: i32, color: Color) {
        for y in y1.min(y2)..=y1.max(y2) {
            self.blend(x, y, color, 1.0);
        }
    }

    /// Fills the rectangle with both corners included.
    pub(crate) fn fill_rect(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: Color) {
        for y in y1.min(y2)..=y1.max(y2) {
            self.hline(x1, x2, y, color);
        }
    }

    /// Filled, anti-aliased disc of radius `r` centred on `(cx, cy)`.
    ///
    /// Midpoint circle: the interior is filled with opaque spans, the outermost pixel of every
    /// octant step gets a partial alpha proportional to its sampled coverage.
    pub(crate) fn circle(&mut self, cx: i32, cy: i32, r: i32, color: Color) {
        let radius = r as f32;
        let mut x = 0;
        let mut y = r;
        let mut g = 2 * r - 3;
        let mut dgr = -6;
        let mut dgd = 4 * r - 10;

        self.hline(cx, cx + r - 1, cy, color);
        self.hline(cx - r + 1, cx - 1, cy, color);
        self.vline(cx, cy + 1, cy + r - 1, color);
        self.vline(cx, cy - r + 1, cy - 1, color);

        let compass = 85.0 / 127.0;
        self.blend(cx + r, cy, color, compass);
        self.blend(cx - r, cy, color, compass);
        self.blend(cx, cy + r, color, compass);
        self.blend(cx, cy - r, color, compass);

        while x <= y - 2 {
            if g < 0 {
                g += dgd;
                dgd -= 8;
                y -= 1;
            } else {
                g += dgr;
                dgd -= 4;
            }
            dgr -= 4;
            x += 1;

            self.vline(cx + x, cy + y - 1, cy + x, color);
            self.vline(cx + x, cy - y + 1, cy - x, color);
            self.vline(cx - x, cy + y - 1, cy + x, color);
            self.vline(cx - x, cy - y + 1, cy - x, color);
            self.hline(cx + y - 1, cx + x, cy + x, color);
            self.hline(cx + y - 1, cx + x, cy - x, color);
            self.hline(cx - y + 1, cx - x, cy + x, color);
            self.hline(cx - y + 1, cx - x, cy - x, color);

            // 5x5 supersampling of the rim pixel, 4% per sample inside the circle.
            let mut filled = 0;
            for i in 0..5 {
                let xx = x as f32 - 0.45 + 0.2 * i as f32;
                for j in 0..5 {
                    let yy = y as f32 - 0.45 + 0.2 * j as f32;
                    if (xx * xx + yy * yy).sqrt() < radius {
                        filled += 4;
                    }
                }
            }
            let opacity = (27 + filled) as f32 / 127.0;
            for (dx, dy) in [
                (x, y),
                (x, -y),
                (-x, y),
                (-x, -y),
                (y, x),
                (y, -x),
                (-y, x),
                (-y, -x),
            ] {
                self.blend(cx + dx, cy + dy, color, opacity);
            }
        }
    }

    /// Copies `other` with its top-left corner at `(x, y)`, skipping pixels equal to
    /// `transparent`.
    pub(crate) fn stamp(&mut self, other: &Canvas, x: i32, y: i32, transparent: Color) {
        for sy in 0..other.height() {
            for sx in 0..other.width() {
                match other.pixel(sx, sy) {
                    Some(c) if c != transparent => self.put(x + sx, y + sy, c),
                    _ => {}
                }
            }
        }
    }
}
