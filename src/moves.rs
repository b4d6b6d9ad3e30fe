use std::fmt;
use std::str::FromStr;

use crate::error::OverlayError;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    Up,
    Down,
    Left,
    Right,
    Front,
    Back,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Up,
        Face::Down,
        Face::Left,
        Face::Right,
        Face::Front,
        Face::Back,
    ];

    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'U' => Some(Self::Up),
            'D' => Some(Self::Down),
            'L' => Some(Self::Left),
            'R' => Some(Self::Right),
            'F' => Some(Self::Front),
            'B' => Some(Self::Back),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Self::Up => 'U',
            Self::Down => 'D',
            Self::Left => 'L',
            Self::Right => 'R',
            Self::Front => 'F',
            Self::Back => 'B',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Up => "Up",
            Self::Down => "Down",
            Self::Left => "Left",
            Self::Right => "Right",
            Self::Front => "Front",
            Self::Back => "Back",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Up => 0,
            Self::Down => 1,
            Self::Left => 2,
            Self::Right => 3,
            Self::Front => 4,
            Self::Back => 5,
        }
    }
}

/// Turn requested for a face.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Modifier {
    /// Quarter turn clockwise.
    None,
    /// Half turn.
    Double,
    /// Quarter turn counter-clockwise.
    Prime,
}

impl Modifier {
    pub fn rotation(self) -> Rotation {
        match self {
            Self::None => Rotation::Clockwise,
            Self::Double => Rotation::OneHundredEighty,
            Self::Prime => Rotation::CounterClockwise,
        }
    }

    pub fn amount(self) -> ArrowAmount {
        match self {
            Self::Double => ArrowAmount::HalfTurn,
            Self::None | Self::Prime => ArrowAmount::QuarterTurn,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Rotation {
    Clockwise,
    CounterClockwise,
    OneHundredEighty,
}

/// Arrow mesh variant.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ArrowAmount {
    QuarterTurn,
    HalfTurn,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MoveToken {
    pub face: Face,
    pub modifier: Modifier,
}

impl MoveToken {
    pub fn new(face: Face, modifier: Modifier) -> Self {
        Self { face, modifier }
    }

    /// Parses a one or two character mnemonic: a face letter optionally
    /// followed by `2` or a prime mark. Anything else is rejected.
    pub fn parse(mnemonic: &str) -> Result<Self, OverlayError> {
        let mut chars = mnemonic.chars();
        let Some(letter) = chars.next() else {
            return Err(OverlayError::malformed_move(mnemonic, "empty mnemonic"));
        };
        let face = Face::from_letter(letter).ok_or_else(|| {
            OverlayError::malformed_move(mnemonic, format!("unknown face letter {letter:?}"))
        })?;

        let modifier = match chars.next() {
            None => Modifier::None,
            Some('2') => Modifier::Double,
            Some('\'') => Modifier::Prime,
            Some(other) => {
                return Err(OverlayError::malformed_move(
                    mnemonic,
                    format!("unknown rotation amount {other:?}"),
                ))
            }
        };

        if chars.next().is_some() {
            return Err(OverlayError::malformed_move(
                mnemonic,
                "mnemonic longer than two characters",
            ));
        }

        Ok(Self { face, modifier })
    }

    pub fn rotation(&self) -> Rotation {
        self.modifier.rotation()
    }

    pub fn amount(&self) -> ArrowAmount {
        self.modifier.amount()
    }
}

impl FromStr for MoveToken {
    type Err = OverlayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for MoveToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.face.letter())?;
        match self.modifier {
            Modifier::None => Ok(()),
            Modifier::Double => write!(f, "2"),
            Modifier::Prime => write!(f, "'"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_letter_is_clockwise_quarter_turn() {
        let token: MoveToken = "U".parse().unwrap();
        assert_eq!(token, MoveToken::new(Face::Up, Modifier::None));
        assert_eq!(token.rotation(), Rotation::Clockwise);
        assert_eq!(token.amount(), ArrowAmount::QuarterTurn);
    }

    #[test]
    fn two_is_half_turn_and_prime_is_counter_clockwise() {
        let half = MoveToken::parse("D2").unwrap();
        assert_eq!(half.face, Face::Down);
        assert_eq!(half.rotation(), Rotation::OneHundredEighty);
        assert_eq!(half.amount(), ArrowAmount::HalfTurn);

        let prime = MoveToken::parse("R'").unwrap();
        assert_eq!(prime.face, Face::Right);
        assert_eq!(prime.rotation(), Rotation::CounterClockwise);
        assert_eq!(prime.amount(), ArrowAmount::QuarterTurn);
    }

    #[test]
    fn rejects_malformed_mnemonics() {
        for bad in ["", "U3", "X", "u", "F2'", "R''", "B "] {
            let err = MoveToken::parse(bad).unwrap_err();
            assert!(
                matches!(err, OverlayError::MalformedMove { ref mnemonic, .. } if mnemonic == bad),
                "{bad:?} -> {err:?}"
            );
        }
    }

    #[test]
    fn display_matches_mnemonic() {
        for face in Face::ALL {
            for suffix in ["", "2", "'"] {
                let text = format!("{}{}", face.letter(), suffix);
                assert_eq!(MoveToken::parse(&text).unwrap().to_string(), text);
            }
        }
    }
}
