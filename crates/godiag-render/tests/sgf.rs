use chrono::NaiveDate;
use godiag_core::{Board, ParseOptions, StyleConfig, parse_board};
use godiag_render::{SgfOptions, to_sgf};

fn board(text: &str) -> Board {
    parse_board(text, &ParseOptions::default()).unwrap()
}

fn options() -> SgfOptions {
    SgfOptions {
        date: NaiveDate::from_ymd_opt(2024, 5, 1),
    }
}

fn sgf(text: &str) -> String {
    to_sgf(&board(text), &StyleConfig::default(), &options())
}

#[test]
fn setup_stones_in_row_major_order() {
    let out = sgf("$$\n$$ X O . X O");
    let expected = format!(
        "(;GM[1]FF[4]SZ[19]\n\nGN[]\nAP[godiag:{}]\nDT[2024-05-01]\nPL[B]\nC[Diagram generated by godiag]\nAB[hj][kj]\nAW[ij][lj]\n\n)\n",
        env!("CARGO_PKG_VERSION")
    );
    assert_eq!(out, expected);
}

#[test]
fn numbered_stones_become_moves() {
    let out = sgf("$$ Moves\n$$ +----\n$$ | 1 2\n$$ | . 0");
    assert!(out.contains("GN[Moves]\n"), "{out}");
    assert!(
        out.ends_with("\n\n;B[aa]C[B1]\n;W[ba]C[W2]\n;W[bb]C[W10]\n)\n"),
        "{out}"
    );
    assert!(!out.contains("AB["));
}

#[test]
fn white_first_flips_move_colours() {
    let out = sgf("$$W\n$$ 1 2");
    assert!(out.contains("PL[W]\n"), "{out}");
    assert!(out.contains(";W[ij]C[W1]\n"), "{out}");
    assert!(out.contains(";B[jj]C[B2]\n"), "{out}");
}

#[test]
fn markup_is_repeated_on_every_move() {
    let out = sgf("$$\n$$ +-----\n$$ | B W C\n$$ | # @ S\n$$ | a 1 .");
    let markup = "CR[aa][ba][ca]\nSQ[ab][bb][cb]\nLB[ac:a]\n";
    let tail = format!("AB[aa][ab]\nAW[ba][bb]\n{markup}\n;B[bc]C[B1]\n{markup})\n");
    assert!(out.ends_with(&tail), "{out}");
}

#[test]
fn title_hints_alias_earlier_moves() {
    let out = sgf("$$ 3 AT 1, 4 on 2, 5 at 9, 1 at 2\n$$ +---\n$$ | 1 2");
    assert!(
        out.ends_with(";B[aa]C[B1]\n;W[ba]C[W2]\n;B[aa]C[B3]\n;W[ba]C[W4]\n)\n"),
        "{out}"
    );
    assert!(!out.contains("C[B5]"));
}

#[test]
fn hint_for_move_ten() {
    let out = sgf("$$ 10 at 2\n$$ +---\n$$ | 1 2");
    assert!(out.contains(";W[ba]C[W10]\n"), "{out}");
}

#[test]
fn text_values_are_escaped() {
    let style = StyleConfig {
        sgf_comment: "made [by] me".to_string(),
        ..StyleConfig::default()
    };
    let out = to_sgf(&board("$$ a ] b \\ c\n$$ X"), &style, &options());
    assert!(out.contains(r"GN[a \] b \\ c]"), "{out}");
    assert!(out.contains(r"C[made [by\] me]"), "{out}");
}

#[test]
fn unknown_symbols_are_left_out() {
    let out = sgf("$$\n$$ ? X");
    assert!(out.contains("AB[jj]\n"), "{out}");
    assert!(!out.contains('?'));
}

#[test]
fn large_boards_use_upper_case_coordinates() {
    let out = sgf("$$30\n$$ X |");
    assert!(out.contains("SZ[30]"), "{out}");
    assert!(out.contains("AB[Do]\n"), "{out}");
}

#[test]
fn default_date_is_filled_in() {
    let out = to_sgf(
        &board("$$\n$$ X"),
        &StyleConfig::default(),
        &SgfOptions::default(),
    );
    let dt = out.split("DT[").nth(1).unwrap();
    let date = &dt[..10];
    assert!(NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok(), "{date}");
}
