//! Board-size inference and the board-to-pixel transform.

use crate::config::StyleConfig;
use crate::geom::{PixelPoint, PixelSize, point, size};
use crate::model::{Board, Edges, Placement};
use crate::{Error, Result};

/// Infers the full board size and where the drawn grid sits on it.
///
/// When two opposing edges are marked the extent on that axis *is* the board size and the
/// declared size is ignored. Otherwise the board is at least as large as the grid and the
/// declared size. The free axis is anchored to a marked edge, or centred when neither is.
pub fn resolve_placement(
    grid_width: usize,
    grid_height: usize,
    edges: Edges,
    declared_size: u32,
) -> Result<Placement> {
    let conflict = || Error::BoardSizeConflict {
        width: grid_width,
        height: grid_height,
    };
    let w = u32::try_from(grid_width).map_err(|_| conflict())?;
    let h = u32::try_from(grid_height).map_err(|_| conflict())?;

    let placement = if edges.height_defined() {
        if (edges.width_defined() && w != h) || w > h {
            return Err(conflict());
        }
        Placement {
            board_size: h,
            offset_x: axis_offset(h, w, edges.left, edges.right),
            offset_y: 0,
        }
    } else if edges.width_defined() {
        if h > w {
            return Err(conflict());
        }
        Placement {
            board_size: w,
            offset_x: 0,
            offset_y: axis_offset(w, h, edges.top, edges.bottom),
        }
    } else {
        let board_size = w.max(h).max(declared_size);
        Placement {
            board_size,
            offset_x: axis_offset(board_size, w, edges.left, edges.right),
            offset_y: axis_offset(board_size, h, edges.top, edges.bottom),
        }
    };
    Ok(placement)
}

fn axis_offset(board_size: u32, extent: u32, near_marked: bool, far_marked: bool) -> u32 {
    let free = board_size.saturating_sub(extent);
    if far_marked {
        free
    } else if near_marked {
        0
    } else {
        free / 2
    }
}

/// Marks edges implied by the resolved board size.
///
/// A grid spanning at least `board_size - 1` lines on an axis touches the near edge, and one
/// spanning the whole board touches both.
pub fn implicit_edges(
    grid_width: usize,
    grid_height: usize,
    board_size: u32,
    mut edges: Edges,
) -> Edges {
    let board = board_size as usize;
    if grid_height + 1 >= board {
        edges.top = true;
        if grid_height == board {
            edges.bottom = true;
        }
    }
    if grid_width + 1 >= board {
        edges.left = true;
        if grid_width == board {
            edges.right = true;
        }
    }
    edges
}

/// Pixel geometry shared by the raster renderer and the image-map builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    line_spacing: i32,
    edge_spacing: i32,
    line_begin: i32,
    /// Extra space on the top and left reserved for coordinate labels (0 when disabled).
    margin: i32,
}

impl Geometry {
    pub fn new(style: &StyleConfig, coord_markers: bool) -> Self {
        Self {
            line_spacing: style.line_spacing,
            edge_spacing: style.edge_spacing,
            line_begin: style.line_begin,
            margin: if coord_markers { style.coord_spacing } else { 0 },
        }
    }

    pub fn for_board(board: &Board, style: &StyleConfig) -> Self {
        Self::new(style, board.coord_markers())
    }

    pub fn line_spacing(&self) -> i32 {
        self.line_spacing
    }

    /// Pixel centre of the intersection at `(col, row)`. Negative indices address the
    /// coordinate-label gutter.
    pub fn pixel_coordinate(&self, col: i32, row: i32) -> PixelPoint {
        point(self.axis(col), self.axis(row))
    }

    fn axis(&self, index: i32) -> i32 {
        index * self.line_spacing + self.edge_spacing + self.margin
    }

    /// Canvas dimensions for a grid of `width` x `height` intersections.
    pub fn canvas_size(&self, width: usize, height: usize) -> PixelSize {
        size(self.extent(width), self.extent(height))
    }

    fn extent(&self, lines: usize) -> i32 {
        let lines = i32::try_from(lines).unwrap_or(i32::MAX / self.line_spacing.max(1));
        (lines - 1) * self.line_spacing + self.edge_spacing * 2 + 1 + self.margin
    }

    /// First and last pixel of the grid lines along one axis of a canvas `extent` long.
    ///
    /// Lines stop at the edge spacing where the board really ends, and run almost to the canvas
    /// border where the diagram is a cut-out.
    pub fn line_span(&self, extent: i32, near_edge: bool, far_edge: bool) -> (i32, i32) {
        let inset = |edge: bool| if edge { self.edge_spacing } else { self.line_begin };
        let begin = inset(near_edge) + self.margin;
        let end = extent - inset(far_edge) - 1;
        (begin, end)
    }
}
