use serde::{Deserialize, Serialize};

/// Which picker row a tile came from. Drives its colour and how it is spoken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileCategory {
    Letter,
    Digit,
}

impl TileCategory {
    /// Decode the wire code used by the JS bridge (0 = letter, 1 = digit).
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::Letter),
            1 => Some(Self::Digit),
            _ => None,
        }
    }

    pub fn code(self) -> u32 {
        match self {
            Self::Letter => 0,
            Self::Digit => 1,
        }
    }
}

/// The character printed on a tile.
///
/// Letters are stored upper-case; a character that does not belong to its
/// category is rejected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Glyph {
    ch: char,
    category: TileCategory,
}

impl Glyph {
    pub fn new(ch: char, category: TileCategory) -> Option<Self> {
        match category {
            TileCategory::Letter if ch.is_ascii_alphabetic() => Some(Self {
                ch: ch.to_ascii_uppercase(),
                category,
            }),
            TileCategory::Digit if ch.is_ascii_digit() => Some(Self { ch, category }),
            _ => None,
        }
    }

    pub fn letter(ch: char) -> Option<Self> {
        Self::new(ch, TileCategory::Letter)
    }

    pub fn digit(value: u8) -> Option<Self> {
        if value > 9 {
            return None;
        }
        Self::new(char::from(b'0' + value), TileCategory::Digit)
    }

    /// Decode a glyph from a Unicode scalar value plus a category code.
    pub fn from_codes(code_point: u32, category: u32) -> Option<Self> {
        let ch = char::from_u32(code_point)?;
        Self::new(ch, TileCategory::from_code(category)?)
    }

    pub fn char(self) -> char {
        self.ch
    }

    pub fn category(self) -> TileCategory {
        self.category
    }

    /// Text handed to the speech engine. Letters go lower-case so the voice
    /// says "a" rather than "capital A".
    pub fn spoken(self) -> String {
        match self.category {
            TileCategory::Letter => self.ch.to_ascii_lowercase().to_string(),
            TileCategory::Digit => self.ch.to_string(),
        }
    }
}
