//! Classification of the single-character diagram alphabet.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stone {
    Black,
    White,
}

impl Stone {
    /// Colour playing move `number`: odd moves belong to whoever moves first.
    pub fn for_move(number: u8, black_first: bool) -> Self {
        let odd = number % 2 == 1;
        if odd == black_first {
            Stone::Black
        } else {
            Stone::White
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Stone::Black => Stone::White,
            Stone::White => Stone::Black,
        }
    }

    /// SGF property letter (`B` / `W`).
    pub fn sgf_letter(self) -> char {
        match self {
            Stone::Black => 'B',
            Stone::White => 'W',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    Circle,
    Square,
}

/// One cell of the diagram grid, decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// `.`
    Empty,
    /// `,` star point.
    Hoshi,
    /// `X` / `O`.
    Stone(Stone),
    /// `C` / `S`: a mark on an empty intersection.
    Mark(Mark),
    /// `B` / `W` (circle) and `#` / `@` (square).
    MarkedStone(Stone, Mark),
    /// `_` erases the intersection back to the board colour.
    Wipe,
    /// `1`-`9`, with `0` standing for move 10.
    Move(u8),
    /// `a`-`z`.
    Label(char),
}

impl Symbol {
    /// Decodes a grid character, or `None` for characters outside the notation alphabet.
    pub fn classify(ch: char) -> Option<Self> {
        let symbol = match ch {
            '.' => Symbol::Empty,
            ',' => Symbol::Hoshi,
            'X' => Symbol::Stone(Stone::Black),
            'O' => Symbol::Stone(Stone::White),
            'C' => Symbol::Mark(Mark::Circle),
            'S' => Symbol::Mark(Mark::Square),
            'B' => Symbol::MarkedStone(Stone::Black, Mark::Circle),
            'W' => Symbol::MarkedStone(Stone::White, Mark::Circle),
            '#' => Symbol::MarkedStone(Stone::Black, Mark::Square),
            '@' => Symbol::MarkedStone(Stone::White, Mark::Square),
            '_' => Symbol::Wipe,
            '0' => Symbol::Move(10),
            '1'..='9' => Symbol::Move(ch as u8 - b'0'),
            'a'..='z' => Symbol::Label(ch),
            _ => return None,
        };
        Some(symbol)
    }

    /// The stone that ends up on the intersection, if any.
    pub fn stone(self, black_first: bool) -> Option<Stone> {
        match self {
            Symbol::Stone(s) | Symbol::MarkedStone(s, _) => Some(s),
            Symbol::Move(n) => Some(Stone::for_move(n, black_first)),
            _ => None,
        }
    }

    pub fn mark(self) -> Option<Mark> {
        match self {
            Symbol::Mark(m) | Symbol::MarkedStone(_, m) => Some(m),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_move_ten() {
        assert_eq!(Symbol::classify('0'), Some(Symbol::Move(10)));
        assert_eq!(Symbol::classify('7'), Some(Symbol::Move(7)));
    }

    #[test]
    fn move_parity_follows_first_player() {
        assert_eq!(Stone::for_move(1, true), Stone::Black);
        assert_eq!(Stone::for_move(10, true), Stone::White);
        assert_eq!(Stone::for_move(1, false), Stone::White);
        assert_eq!(Stone::for_move(10, false), Stone::Black);
    }

    #[test]
    fn marked_stones_carry_both_parts() {
        let s = Symbol::classify('@').unwrap();
        assert_eq!(s.stone(true), Some(Stone::White));
        assert_eq!(s.mark(), Some(Mark::Square));
        assert_eq!(Symbol::classify('C').unwrap().stone(true), None);
    }

    #[test]
    fn unknown_characters_are_rejected() {
        for ch in ['?', 'A', 'Z', '|', '$', '\t'] {
            assert_eq!(Symbol::classify(ch), None, "{ch:?}");
        }
    }
}
