//! Content-addressed keys for rendered artifacts.
//!
//! Both keys hash a canonical description of the diagram. The image key also covers the style
//! (it changes every pixel), the SGF key covers the board size and title (which end up in the
//! record). Keys are lowercase hex BLAKE3 digests.

use crate::config::StyleConfig;
use crate::model::Board;
use serde::Serialize;
use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Fingerprint {
    pub image: String,
    pub sgf: String,
}

fn flag(value: bool) -> &'static str {
    if value { "1" } else { "" }
}

fn canonical_board(board: &Board) -> String {
    let mut out = String::new();
    for (symbol, target) in board.links() {
        let _ = write!(out, "{symbol}!{target}!");
    }
    for row in board.rows() {
        out.push('$');
        out.extend(row.iter());
    }
    let edges = board.edges();
    for value in [
        board.black_first(),
        edges.top,
        edges.bottom,
        edges.left,
        edges.right,
    ] {
        out.push('!');
        out.push_str(flag(value));
    }
    out
}

fn canonical_style(style: &StyleConfig) -> String {
    serde_json::to_string(style).unwrap_or_else(|_| format!("{style:?}"))
}

fn digest(text: &str) -> String {
    blake3::hash(text.as_bytes()).to_hex().to_string()
}

pub fn fingerprint(board: &Board, style: &StyleConfig) -> Fingerprint {
    let base = canonical_board(board);

    // Coordinate labels depend on where the grid sits on the board.
    let coords = if board.coord_markers() {
        board.board_size().to_string()
    } else {
        String::new()
    };
    let image = digest(&format!("{base}!{coords}!{}", canonical_style(style)));
    let sgf = digest(&format!("{base}!{}!{}", board.board_size(), board.title()));

    tracing::debug!(image = %image, sgf = %sgf, "computed diagram fingerprints");
    Fingerprint { image, sgf }
}
