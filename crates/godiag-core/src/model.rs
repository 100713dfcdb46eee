use indexmap::IndexMap;
use serde::Serialize;

/// Which sides of the drawn region are real board edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Edges {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl Edges {
    pub fn all() -> Self {
        Self {
            top: true,
            bottom: true,
            left: true,
            right: true,
        }
    }

    /// Both top and bottom are marked, fixing the vertical extent.
    pub fn height_defined(&self) -> bool {
        self.top && self.bottom
    }

    /// Both left and right are marked, fixing the horizontal extent.
    pub fn width_defined(&self) -> bool {
        self.left && self.right
    }
}

/// Float hint for the embedding page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutClass {
    Left,
    #[default]
    Right,
}

impl LayoutClass {
    pub fn as_str(self) -> &'static str {
        match self {
            LayoutClass::Left => "left",
            LayoutClass::Right => "right",
        }
    }
}

/// A grid cell whose symbol has a link attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkCell {
    pub row: usize,
    pub col: usize,
    pub symbol: char,
    pub target: String,
}

/// Where the drawn grid sits on the full board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Placement {
    pub board_size: u32,
    pub offset_x: u32,
    pub offset_y: u32,
}

/// The parsed, immutable representation of one diagram.
///
/// Built only by [`crate::parse_board`]; renderers and serializers borrow it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Board {
    pub(crate) grid: Vec<Vec<char>>,
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) edges: Edges,
    pub(crate) placement: Placement,
    pub(crate) black_first: bool,
    pub(crate) coord_markers: bool,
    pub(crate) title: String,
    pub(crate) layout_class: LayoutClass,
    pub(crate) line_break_after: bool,
    pub(crate) links: IndexMap<char, String>,
    pub(crate) link_cells: Vec<LinkCell>,
}

impl Board {
    /// Rows of symbol characters, top to bottom. Rows may be shorter than [`Board::width`].
    pub fn rows(&self) -> &[Vec<char>] {
        &self.grid
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<char> {
        self.grid.get(row)?.get(col).copied()
    }

    /// Every present cell in row-major order as `(row, col, symbol)`.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, char)> + '_ {
        self.grid
            .iter()
            .enumerate()
            .flat_map(|(row, cells)| cells.iter().enumerate().map(move |(col, &ch)| (row, col, ch)))
    }

    /// Grid width in intersections (longest row).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in intersections (row count).
    pub fn height(&self) -> usize {
        self.height
    }

    /// Edge flags after implicit-edge inference.
    pub fn edges(&self) -> Edges {
        self.edges
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn board_size(&self) -> u32 {
        self.placement.board_size
    }

    pub fn offset_x(&self) -> u32 {
        self.placement.offset_x
    }

    pub fn offset_y(&self) -> u32 {
        self.placement.offset_y
    }

    pub fn black_first(&self) -> bool {
        self.black_first
    }

    pub fn coord_markers(&self) -> bool {
        self.coord_markers
    }

    /// Free text following the header options.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn layout_class(&self) -> LayoutClass {
        self.layout_class
    }

    pub fn line_break_after(&self) -> bool {
        self.line_break_after
    }

    /// Link targets keyed by symbol, sorted by symbol.
    pub fn links(&self) -> &IndexMap<char, String> {
        &self.links
    }

    pub fn link_target(&self, symbol: char) -> Option<&str> {
        self.links.get(&symbol).map(String::as_str)
    }

    /// Linked cells in row-major order.
    pub fn link_cells(&self) -> &[LinkCell] {
        &self.link_cells
    }
}
