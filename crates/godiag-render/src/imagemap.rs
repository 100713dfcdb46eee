//! Clickable regions for linked cells.

use godiag_core::{Board, Geometry, StyleConfig};
use serde::Serialize;
use std::fmt::Write as _;

/// A link target turned into something a page can point at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedLink {
    pub url: String,
    pub title: String,
}

impl ResolvedLink {
    /// Absolute targets are used verbatim, titled with the URL itself.
    pub fn absolute(target: &str) -> Self {
        Self {
            url: target.to_string(),
            title: target.to_string(),
        }
    }
}

/// Host-side resolution of relative link targets (page names, anchors, ...).
pub trait LinkResolver {
    fn resolve(&self, target: &str) -> ResolvedLink;
}

impl<F> LinkResolver for F
where
    F: Fn(&str) -> ResolvedLink,
{
    fn resolve(&self, target: &str) -> ResolvedLink {
        self(target)
    }
}

/// Targets containing `://` bypass the resolver.
pub fn is_absolute(target: &str) -> bool {
    target.contains("://")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageMapArea {
    pub row: usize,
    pub col: usize,
    pub symbol: char,
    pub href: String,
    pub title: String,
    /// `x1,y1,x2,y2` in canvas pixels.
    pub coords: [i32; 4],
}

impl ImageMapArea {
    pub fn center(&self) -> (i32, i32) {
        let [x1, y1, x2, y2] = self.coords;
        ((x1 + x2) / 2, (y1 + y2) / 2)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImageMap {
    pub areas: Vec<ImageMapArea>,
}

/// Element id for the `<map>` of one rendered diagram. `sequence` disambiguates identical
/// diagrams on the same page.
pub fn image_map_id(image_key: &str, sequence: usize) -> String {
    format!("godiag__{sequence}{image_key}")
}

/// One rectangle per linked cell, row-major, each one line spacing wide and centred on the
/// intersection.
pub fn build_image_map(
    board: &Board,
    style: &StyleConfig,
    resolver: &dyn LinkResolver,
) -> ImageMap {
    let geometry = Geometry::for_board(board, style);
    let half = geometry.line_spacing() / 2;
    let areas = board
        .link_cells()
        .iter()
        .map(|cell| {
            let link = if is_absolute(&cell.target) {
                ResolvedLink::absolute(&cell.target)
            } else {
                resolver.resolve(&cell.target)
            };
            let p = geometry.pixel_coordinate(cell.col as i32, cell.row as i32);
            ImageMapArea {
                row: cell.row,
                col: cell.col,
                symbol: cell.symbol,
                href: link.url,
                title: link.title,
                coords: [p.x - half, p.y - half, p.x + half, p.y + half],
            }
        })
        .collect::<Vec<_>>();
    tracing::debug!(areas = areas.len(), "built image map");
    ImageMap { areas }
}

impl ImageMap {
    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    /// `<map>` markup, or an empty string when there is nothing to link.
    pub fn to_html(&self, map_id: &str) -> String {
        if self.is_empty() {
            return String::new();
        }
        let id = htmlize::escape_attribute(map_id);
        let mut out = format!(r#"<map id="{id}" name="{id}">"#);
        for area in &self.areas {
            let [x1, y1, x2, y2] = area.coords;
            let title = htmlize::escape_attribute(&area.title);
            let _ = write!(
                out,
                r#"<area href="{}" title="{title}" alt="{title}" coords="{x1},{y1},{x2},{y2}"/>"#,
                htmlize::escape_attribute(&area.href),
            );
        }
        out.push_str("</map>");
        out
    }

    /// `usemap` attribute value for the `<img>` that shows the diagram.
    pub fn usemap(&self, map_id: &str) -> Option<String> {
        (!self.is_empty()).then(|| format!("#{map_id}"))
    }
}
