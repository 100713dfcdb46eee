use crate::*;

const DIAGRAM: &str = "$$B Shape
$$ +-------
$$ | . . O X
$$ | . X 1 a
[a|Joseki]";

fn board(text: &str) -> Board {
    parse_board(text, &ParseOptions::default()).unwrap()
}

#[test]
fn fingerprints_are_deterministic() {
    let style = StyleConfig::default();
    let a = fingerprint(&board(DIAGRAM), &style);
    let b = fingerprint(&board(DIAGRAM), &style);
    assert_eq!(a, b);
    assert_ne!(a.image, a.sgf);
}

#[test]
fn keys_are_lowercase_hex() {
    let fp = fingerprint(&board(DIAGRAM), &StyleConfig::default());
    for key in [&fp.image, &fp.sgf] {
        assert_eq!(key.len(), 64);
        assert!(
            key.chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        );
    }
}

#[test]
fn changing_one_cell_changes_both_keys() {
    let style = StyleConfig::default();
    let a = fingerprint(&board(DIAGRAM), &style);
    let b = fingerprint(&board(&DIAGRAM.replace("O X", "O O")), &style);
    assert_ne!(a.image, b.image);
    assert_ne!(a.sgf, b.sgf);
}

#[test]
fn style_only_affects_the_image_key() {
    let a = fingerprint(&board(DIAGRAM), &StyleConfig::default());
    let style = StyleConfig {
        line_spacing: 30,
        ..StyleConfig::default()
    };
    let b = fingerprint(&board(DIAGRAM), &style);
    assert_ne!(a.image, b.image);
    assert_eq!(a.sgf, b.sgf);
}

#[test]
fn title_only_affects_the_sgf_key() {
    let style = StyleConfig::default();
    let a = fingerprint(&board(DIAGRAM), &style);
    let b = fingerprint(&board(&DIAGRAM.replace("Shape", "Another shape")), &style);
    assert_eq!(a.image, b.image);
    assert_ne!(a.sgf, b.sgf);
}

#[test]
fn link_targets_are_part_of_both_keys() {
    let style = StyleConfig::default();
    let a = fingerprint(&board(DIAGRAM), &style);
    let b = fingerprint(&board(&DIAGRAM.replace("Joseki", "Fuseki")), &style);
    assert_ne!(a.image, b.image);
    assert_ne!(a.sgf, b.sgf);
}

#[test]
fn move_parity_is_part_of_both_keys() {
    let style = StyleConfig::default();
    let a = fingerprint(&board(DIAGRAM), &style);
    let b = fingerprint(&board(&DIAGRAM.replace("$$B", "$$W")), &style);
    assert_ne!(a.image, b.image);
    assert_ne!(a.sgf, b.sgf);
}

#[test]
fn coordinate_flag_changes_the_image_key_only() {
    let style = StyleConfig::default();
    let a = fingerprint(&board(DIAGRAM), &style);
    let b = fingerprint(&board(&DIAGRAM.replace("$$B", "$$Bc")), &style);
    assert_ne!(a.image, b.image);
    assert_eq!(a.sgf, b.sgf);
}
