#![forbid(unsafe_code)]

//! `godiag` compiles plain-text go diagrams into PNG images and SGF records.
//!
//! ```text
//! $$B Black to play
//! $$ +-----------
//! $$ | . . . . .
//! $$ | . . X O .
//! $$ | . . 1 . .
//! ```
//!
//! The parser and board model live in `godiag-core` and are re-exported at the crate root.
//!
//! # Features
//!
//! - `render` (default): raster rendering, SGF serialization, image maps and the caching
//!   pipeline (`godiag::render`)

pub use godiag_core::*;

pub mod store;

#[cfg(feature = "render")]
pub mod render;
