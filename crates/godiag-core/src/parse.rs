use crate::geometry::{implicit_edges, resolve_placement};
use crate::model::{Board, Edges, LayoutClass, LinkCell};
use crate::{Error, ParseOptions, Result};
use indexmap::IndexMap;
use regex::Regex;

/// Board size assumed when the header does not declare one.
pub const DEFAULT_BOARD_SIZE: u32 = 19;

fn header_regex() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\$\$\S*)?\s*(.*)$").expect("valid regex"))
}

fn link_line_regex() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[\s*(\S)\s*\|\s*([^\]]+?)\s*\]").expect("valid regex"))
}

fn edge_line_regex() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[$\s]*[-+]+\s*$").expect("valid regex"))
}

fn left_edge_regex() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[$\s]*\|").expect("valid regex"))
}

fn right_edge_regex() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\|\s*$").expect("valid regex"))
}

fn board_size_regex() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("valid regex"))
}

/// Strips one `<go>` ... `</go>` wrapper if present, so hosts may pass either the tagged
/// block or only its contents.
pub fn strip_go_tags(text: &str) -> &str {
    let t = text.trim();
    t.strip_prefix("<go>")
        .and_then(|rest| rest.strip_suffix("</go>"))
        .unwrap_or(text)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct HeaderOptions {
    white_first: bool,
    line_break_after: bool,
    coord_markers: bool,
    layout_class: LayoutClass,
    declared_size: Option<u32>,
}

fn parse_header(line: &str) -> (HeaderOptions, String) {
    let mut opts = HeaderOptions::default();
    let Some(caps) = header_regex().captures(line) else {
        return (opts, line.to_string());
    };
    let heading = caps.get(2).map_or("", |m| m.as_str()).trim_end().to_string();
    let token = caps.get(1).map_or("", |m| m.as_str());

    // `$$B19#comment`: anything after `#` is not an option.
    let flags = token.split('#').next().unwrap_or("");
    opts.white_first = flags.contains('W');
    opts.line_break_after = flags.contains('b');
    opts.coord_markers = flags.contains('c');
    if flags.contains('l') {
        opts.layout_class = LayoutClass::Left;
    }
    if flags.contains('r') {
        opts.layout_class = LayoutClass::Right;
    }
    opts.declared_size = board_size_regex()
        .find(flags)
        // Sizes that overflow are certainly too large; let the board_max check report them.
        .map(|m| m.as_str().parse::<u32>().unwrap_or(u32::MAX));
    (opts, heading)
}

fn is_structural_prefix(ch: char) -> bool {
    ch == '$' || ch.is_whitespace()
}

/// Splits normalized lines into the diagram source and the trailing link definitions.
///
/// The link section starts at the first line after the header that begins with `[` once
/// leading `$`/whitespace is ignored. `$`-only lines directly before it belong to the
/// separator, not to the grid.
fn split_links<'a>(lines: &'a [&'a str]) -> (&'a [&'a str], &'a [&'a str]) {
    let Some(links_at) = lines
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, l)| l.trim_start_matches(is_structural_prefix).starts_with('['))
        .map(|(i, _)| i)
    else {
        return (lines, &[]);
    };

    let mut source_end = links_at;
    while source_end > 1 && lines[source_end - 1].chars().all(is_structural_prefix) {
        source_end -= 1;
    }
    (&lines[..source_end], &lines[links_at..])
}

fn parse_links(lines: &[&str]) -> IndexMap<char, String> {
    let mut links = IndexMap::new();
    for line in lines {
        let Some(caps) = link_line_regex().captures(line) else {
            tracing::debug!(line = %line, "ignoring malformed link line");
            continue;
        };
        let (Some(symbol), Some(target)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let Some(symbol) = symbol.as_str().chars().next() else {
            continue;
        };
        links.insert(symbol, target.as_str().to_string());
    }
    links.sort_keys();
    links
}

/// Parses the text between the diagram delimiters into a [`Board`].
///
/// Symbols are not validated here: an unknown character only fails when the board is drawn,
/// so the SGF record can still be produced for diagrams the renderer would reject.
pub fn parse_board(text: &str, options: &ParseOptions) -> Result<Board> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim_start)
        .filter(|l| !l.is_empty())
        .collect();
    let lines: Vec<&str> = match lines.split_last() {
        Some((last, rest)) => rest.iter().copied().chain([last.trim_end()]).collect(),
        None => lines,
    };

    let (source, link_lines) = split_links(&lines);
    let mut links = parse_links(link_lines);

    let (header, mut body) = match source.split_first() {
        Some((header, body)) => (parse_header(header), body.to_vec()),
        None => (parse_header(""), Vec::new()),
    };
    let (opts, title) = header;

    let mut edges = Edges::default();
    if body.last().is_some_and(|l| edge_line_regex().is_match(l)) {
        edges.bottom = true;
        body.pop();
    }
    if body.first().is_some_and(|l| edge_line_regex().is_match(l)) {
        edges.top = true;
        body.remove(0);
    }

    let mut grid: Vec<Vec<char>> = Vec::with_capacity(body.len());
    for line in &body {
        if left_edge_regex().is_match(line) {
            edges.left = true;
        }
        if right_edge_regex().is_match(line) {
            edges.right = true;
        }
        grid.push(
            line.chars()
                .filter(|c| !matches!(c, '$' | ' ' | '|'))
                .collect(),
        );
    }
    let width = grid.iter().map(Vec::len).max().unwrap_or(0);
    let height = grid.len();

    links.retain(|symbol, target| {
        let used = grid.iter().any(|row| row.contains(symbol));
        if !used {
            tracing::warn!(%symbol, %target, "link symbol does not appear in the diagram");
        }
        used
    });

    let mut link_cells = Vec::new();
    for (row, cells) in grid.iter().enumerate() {
        for (col, symbol) in cells.iter().enumerate() {
            if let Some(target) = links.get(symbol) {
                link_cells.push(LinkCell {
                    row,
                    col,
                    symbol: *symbol,
                    target: target.clone(),
                });
            }
        }
    }

    let declared = opts.declared_size.unwrap_or(DEFAULT_BOARD_SIZE);
    let placement = resolve_placement(width, height, edges, declared)?;
    if placement.board_size > options.board_max {
        return Err(Error::BoardTooLarge {
            size: placement.board_size,
            max: options.board_max,
        });
    }
    let edges = implicit_edges(width, height, placement.board_size, edges);

    tracing::debug!(
        width,
        height,
        board_size = placement.board_size,
        offset_x = placement.offset_x,
        offset_y = placement.offset_y,
        links = links.len(),
        "parsed go diagram"
    );

    Ok(Board {
        grid,
        width,
        height,
        edges,
        placement,
        black_first: !opts.white_first,
        coord_markers: opts.coord_markers,
        title,
        layout_class: opts.layout_class,
        line_break_after: opts.line_break_after,
        links,
        link_cells,
    })
}
