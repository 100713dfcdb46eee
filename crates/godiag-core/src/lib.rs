#![forbid(unsafe_code)]

//! Go diagram notation parser + board model (headless).
//!
//! The notation is the plain-text diagram format popularised by Sensei's Library:
//!
//! ```text
//! $$Bc Black to play, 2 at 1
//! $$ ---------------
//! $$ | . . . . . . .
//! $$ | . . O X . . .
//! $$ | . . 1 X a . .
//! $$ | . . . , . . .
//! [a|https://example.org/joseki]
//! ```
//!
//! [`parse_board`] turns such text into an immutable [`Board`]; [`geometry`] maps it onto
//! pixels and [`fingerprint`] derives the cache keys of the rendered artifacts.

pub mod config;
pub mod error;
pub mod fingerprint;
pub mod geom;
pub mod geometry;
pub mod model;
pub mod parse;
pub mod symbol;

#[cfg(test)]
mod tests;

pub use config::{Color, Palette, StyleConfig};
pub use error::{Error, ErrorKind, Result};
pub use fingerprint::{Fingerprint, fingerprint};
pub use geometry::{Geometry, implicit_edges, resolve_placement};
pub use model::{Board, Edges, LayoutClass, LinkCell, Placement};
pub use parse::{DEFAULT_BOARD_SIZE, parse_board, strip_go_tags};
pub use symbol::{Mark, Stone, Symbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Largest board size a diagram may resolve to.
    pub board_max: u32,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::from_style(&StyleConfig::default())
    }
}

impl ParseOptions {
    pub fn from_style(style: &StyleConfig) -> Self {
        Self {
            board_max: style.board_max,
        }
    }
}
