use crate::*;

fn parse(text: &str) -> Result<Board> {
    parse_board(text, &ParseOptions::default())
}

fn full_board_text(size: usize) -> String {
    let mut text = String::from("$$ Full board\n$$ ");
    text.push_str(&"-".repeat(size * 2 + 3));
    text.push('\n');
    for _ in 0..size {
        text.push_str("$$ | ");
        text.push_str(&". ".repeat(size));
        text.push_str("|\n");
    }
    text.push_str("$$ ");
    text.push_str(&"-".repeat(size * 2 + 3));
    text
}

#[test]
fn header_options_are_order_independent() {
    let board = parse("$$Wbcl13 Title here\n$$ . . .\n$$ . X .").unwrap();
    assert!(!board.black_first());
    assert!(board.line_break_after());
    assert!(board.coord_markers());
    assert_eq!(board.layout_class(), LayoutClass::Left);
    assert_eq!(board.title(), "Title here");
    assert_eq!(board.board_size(), 13);
    assert_eq!(board.width(), 3);
    assert_eq!(board.height(), 2);
    // Neither axis is anchored, so the grid is centred.
    assert_eq!(board.offset_x(), 5);
    assert_eq!(board.offset_y(), 5);
}

#[test]
fn header_defaults() {
    let board = parse("$$ Plain\n$$ X O").unwrap();
    assert!(board.black_first());
    assert!(!board.line_break_after());
    assert!(!board.coord_markers());
    assert_eq!(board.layout_class(), LayoutClass::Right);
    assert_eq!(board.board_size(), DEFAULT_BOARD_SIZE);
}

#[test]
fn right_wins_over_left_when_both_are_given() {
    let board = parse("$$lr\n$$ X").unwrap();
    assert_eq!(board.layout_class(), LayoutClass::Right);
}

#[test]
fn options_after_hash_are_ignored() {
    let board = parse("$$c#W13\n$$ X").unwrap();
    assert!(board.coord_markers());
    assert!(board.black_first());
    assert_eq!(board.board_size(), DEFAULT_BOARD_SIZE);
}

#[test]
fn top_left_corner_is_anchored() {
    let text = "$$ Corner
$$ +-------
$$ | . . . .
$$ | . X . .
$$ | . . O .";
    let board = parse(text).unwrap();
    let edges = board.edges();
    assert!(edges.top && edges.left);
    assert!(!edges.bottom && !edges.right);
    assert_eq!(board.board_size(), 19);
    assert_eq!((board.offset_x(), board.offset_y()), (0, 0));
    assert_eq!(board.rows()[1], vec!['.', 'X', '.', '.']);
}

#[test]
fn bottom_right_corner_is_anchored() {
    let text = "$$ Corner
$$ . . . |
$$ . X . |
$$ -------+";
    let board = parse(text).unwrap();
    let edges = board.edges();
    assert!(edges.bottom && edges.right);
    assert!(!edges.top && !edges.left);
    assert_eq!(board.offset_x(), 16);
    assert_eq!(board.offset_y(), 17);
}

#[test]
fn full_board_with_all_edges_has_no_offset() {
    let board = parse(&full_board_text(19)).unwrap();
    assert_eq!(board.width(), 19);
    assert_eq!(board.height(), 19);
    assert_eq!(board.board_size(), 19);
    assert_eq!((board.offset_x(), board.offset_y()), (0, 0));
    assert_eq!(board.edges(), Edges::all());
}

#[test]
fn marked_height_overrides_declared_size() {
    let text = "$$9
$$ -----
$$ . . |
$$ . . |
$$ . . |
$$ . . |
$$ . . |
$$ -----";
    let board = parse(text).unwrap();
    assert_eq!(board.board_size(), 5);
    assert_eq!(board.offset_x(), 3);
    assert_eq!(board.offset_y(), 0);
}

#[test]
fn mismatched_opposing_edges_conflict() {
    let mut text = String::from("$$\n$$ ----\n");
    for _ in 0..10 {
        text.push_str("$$ | ");
        text.push_str(&". ".repeat(12));
        text.push_str("|\n");
    }
    text.push_str("$$ ----");
    let err = parse(&text).unwrap_err();
    assert!(matches!(
        err,
        Error::BoardSizeConflict {
            width: 12,
            height: 10
        }
    ));
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[test]
fn grid_wider_than_marked_height_conflicts() {
    let text = "$$\n$$ ---\n$$ . . .\n$$ ---";
    assert!(matches!(
        parse(text).unwrap_err(),
        Error::BoardSizeConflict { .. }
    ));
}

#[test]
fn declared_size_above_max_is_rejected() {
    let err = parse("$$41\n$$ . X").unwrap_err();
    assert!(matches!(err, Error::BoardTooLarge { size: 41, max: 40 }));
    assert_eq!(err.to_string(), "board too large (max is 40)");
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[test]
fn absurd_declared_size_is_too_large_not_a_panic() {
    let err = parse("$$99999999999999999999\n$$ X").unwrap_err();
    assert!(matches!(err, Error::BoardTooLarge { .. }));
}

#[test]
fn board_max_comes_from_options() {
    let options = ParseOptions { board_max: 9 };
    assert!(parse_board("$$9\n$$ X", &options).is_ok());
    assert!(matches!(
        parse_board("$$13\n$$ X", &options).unwrap_err(),
        Error::BoardTooLarge { size: 13, max: 9 }
    ));
}

#[test]
fn links_are_parsed_sorted_and_mapped_to_cells() {
    let text = "$$ Links
$$ . B .
$$ A . .
[ B | http://example.org/b ]
[A|PageX]
this line is not a link
[Z|never drawn]";
    let board = parse(text).unwrap();
    let keys: Vec<char> = board.links().keys().copied().collect();
    assert_eq!(keys, vec!['A', 'B']);
    assert_eq!(board.link_target('A'), Some("PageX"));
    assert_eq!(board.link_target('B'), Some("http://example.org/b"));
    assert_eq!(board.link_target('Z'), None);

    let cells = board.link_cells();
    assert_eq!(cells.len(), 2);
    assert_eq!((cells[0].row, cells[0].col, cells[0].symbol), (0, 1, 'B'));
    assert_eq!((cells[1].row, cells[1].col, cells[1].symbol), (1, 0, 'A'));
    assert_eq!(board.height(), 2);
}

#[test]
fn dollar_only_lines_before_links_are_separators() {
    let text = "$$ Sep\n$$ . A\n$$\n$$ [A|target]";
    let board = parse(text).unwrap();
    assert_eq!(board.height(), 1);
    assert_eq!(board.link_target('A'), Some("target"));
}

#[test]
fn header_line_starting_with_bracket_is_not_a_link_section() {
    let board = parse("[A|x] heading\n$$ A").unwrap();
    assert!(board.links().is_empty());
    assert_eq!(board.height(), 1);
}

#[test]
fn whitespace_is_normalized() {
    let text = "   $$ T  \n    $$ X O  \n\n  $$ . .\n   ";
    let board = parse(text).unwrap();
    assert_eq!(board.title(), "T");
    assert_eq!(board.rows(), &[vec!['X', 'O'], vec!['.', '.']]);
}

#[test]
fn ragged_rows_keep_their_own_length() {
    let board = parse("$$\n$$ X O X\n$$ .").unwrap();
    assert_eq!(board.width(), 3);
    assert_eq!(board.cell(1, 0), Some('.'));
    assert_eq!(board.cell(1, 2), None);
    assert_eq!(board.cells().count(), 4);
}

#[test]
fn near_full_grid_implies_edges() {
    let mut text = String::from("$$9\n");
    for _ in 0..8 {
        text.push_str("$$ . . . . . . . . .\n");
    }
    let board = parse(&text).unwrap();
    assert_eq!(board.board_size(), 9);
    let edges = board.edges();
    assert!(edges.top);
    assert!(!edges.bottom);
    assert!(edges.left && edges.right);
}

#[test]
fn unknown_symbols_survive_parsing() {
    let board = parse("$$\n$$ . ? X").unwrap();
    assert_eq!(board.cell(0, 1), Some('?'));
}

#[test]
fn header_only_diagram_is_empty() {
    let board = parse("$$ Just a title").unwrap();
    assert_eq!((board.width(), board.height()), (0, 0));
    assert_eq!(board.title(), "Just a title");
}

#[test]
fn go_tags_are_stripped() {
    assert_eq!(strip_go_tags("<go>$$\n$$ X</go>"), "$$\n$$ X");
    assert_eq!(strip_go_tags("$$\n$$ X"), "$$\n$$ X");
}

#[test]
fn board_model_serializes_for_inspection() {
    let board = parse("$$c Hi\n$$ X\n[X|p]").unwrap();
    let value = serde_json::to_value(&board).unwrap();
    assert_eq!(value["title"], "Hi");
    assert_eq!(value["layout_class"], "right");
    assert_eq!(value["links"]["X"], "p");
    assert_eq!(value["placement"]["board_size"], 19);
}
