//! Board to SGF (FF[4]) game record.
//!
//! Stones become setup properties (`AB`/`AW`), marks and labels become markup (`CR`/`SQ`/`LB`)
//! and numbered stones become a move sequence. The markup is repeated on every move node so
//! viewers that only show the current node still display it.

use chrono::NaiveDate;
use godiag_core::{Board, Mark, Stone, StyleConfig, Symbol};
use regex::Regex;
use std::fmt::Write as _;

fn hint_regex() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(10|\d) (?:at|on) (10|\d)").expect("valid regex"))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SgfOptions {
    /// `DT` value; today's local date when unset.
    pub date: Option<NaiveDate>,
}

/// Escapes an SGF text value (`\` and `]`).
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '\\' | ']') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// SGF coordinate letter for a 0-based board index: `a`-`z`, then `A`-`Z`.
fn coordinate_letter(index: u32) -> Option<char> {
    match index {
        0..=25 => char::from_u32(u32::from(b'a') + index),
        26..=51 => char::from_u32(u32::from(b'A') + index - 26),
        _ => None,
    }
}

fn position(board: &Board, row: usize, col: usize) -> Option<String> {
    let x = coordinate_letter(board.offset_x() + u32::try_from(col).ok()?)?;
    let y = coordinate_letter(board.offset_y() + u32::try_from(row).ok()?)?;
    Some([x, y].iter().collect())
}

fn parse_move_number(text: &str) -> Option<usize> {
    match text.parse::<usize>() {
        Ok(n @ 1..=10) => Some(n),
        _ => None,
    }
}

#[derive(Default)]
struct Record {
    black: Vec<String>,
    white: Vec<String>,
    circles: Vec<String>,
    squares: Vec<String>,
    labels: Vec<String>,
    /// Indexed by move number; slot 0 is unused.
    moves: [Option<(String, Stone)>; 11],
}

impl Record {
    fn collect(board: &Board) -> Self {
        let mut record = Self::default();
        for (row, col, ch) in board.cells() {
            let Some(symbol) = Symbol::classify(ch) else {
                continue;
            };
            let Some(pos) = position(board, row, col) else {
                tracing::warn!(row, col, "cell is outside the SGF coordinate range");
                continue;
            };
            match symbol {
                Symbol::Stone(Stone::Black) | Symbol::MarkedStone(Stone::Black, _) => {
                    record.black.push(pos.clone());
                }
                Symbol::Stone(Stone::White) | Symbol::MarkedStone(Stone::White, _) => {
                    record.white.push(pos.clone());
                }
                _ => {}
            }
            match symbol.mark() {
                Some(Mark::Circle) => record.circles.push(pos.clone()),
                Some(Mark::Square) => record.squares.push(pos.clone()),
                None => {}
            }
            match symbol {
                Symbol::Move(n) => {
                    let stone = Stone::for_move(n, board.black_first());
                    record.moves[usize::from(n)] = Some((pos, stone));
                }
                Symbol::Label(letter) => record.labels.push(format!("{pos}:{letter}")),
                _ => {}
            }
        }
        record.apply_hints(board);
        record
    }

    /// "`N` at `M`" in the title: move N was played where move M already is.
    fn apply_hints(&mut self, board: &Board) {
        for caps in hint_regex().captures_iter(board.title()) {
            let (Some(n), Some(m)) = (
                parse_move_number(&caps[1]),
                parse_move_number(&caps[2]),
            ) else {
                continue;
            };
            if self.moves[n].is_some() {
                continue;
            }
            let Some((pos, _)) = self.moves[m].clone() else {
                continue;
            };
            let stone = Stone::for_move(n as u8, board.black_first());
            tracing::debug!(number = n, at = m, "aliasing move from title hint");
            self.moves[n] = Some((pos, stone));
        }
    }

    fn markup(&self) -> String {
        let mut out = String::new();
        for (prop, values) in [
            ("CR", &self.circles),
            ("SQ", &self.squares),
            ("LB", &self.labels),
        ] {
            push_property(&mut out, prop, values);
        }
        out
    }
}

fn push_property(out: &mut String, prop: &str, values: &[String]) {
    if values.is_empty() {
        return;
    }
    out.push_str(prop);
    for v in values {
        let _ = write!(out, "[{v}]");
    }
    out.push('\n');
}

/// Serializes `board` as an SGF record.
pub fn to_sgf(board: &Board, style: &StyleConfig, options: &SgfOptions) -> String {
    let record = Record::collect(board);
    let date = options
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let first = if board.black_first() { 'B' } else { 'W' };

    let mut out = String::new();
    let _ = write!(
        out,
        "(;GM[1]FF[4]SZ[{}]\n\nGN[{}]\nAP[godiag:{}]\nDT[{}]\nPL[{first}]\nC[{}]\n",
        board.board_size(),
        escape_text(board.title()),
        env!("CARGO_PKG_VERSION"),
        date.format("%Y-%m-%d"),
        escape_text(&style.sgf_comment),
    );
    push_property(&mut out, "AB", &record.black);
    push_property(&mut out, "AW", &record.white);
    let markup = record.markup();
    out.push_str(&markup);
    out.push('\n');

    for (number, slot) in record.moves.iter().enumerate() {
        let Some((pos, stone)) = slot else {
            continue;
        };
        let color = stone.sgf_letter();
        let _ = writeln!(out, ";{color}[{pos}]C[{color}{number}]");
        out.push_str(&markup);
    }
    out.push_str(")\n");

    tracing::debug!(bytes = out.len(), "serialized SGF record");
    out
}
