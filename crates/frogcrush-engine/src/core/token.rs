use serde::{Deserialize, Serialize};

/// The matching category of a token.
///
/// Kinds carry no ordering semantics for gameplay; only equality matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum TokenKind {
    Croissant = 0,
    Cupcake = 1,
    Danish = 2,
    Donut = 3,
    Macaroon = 4,
    SugarCookie = 5,
}

impl TokenKind {
    /// Number of token kinds (6).
    pub const LEN: usize = 6;

    /// Every kind, in palette order.
    pub const ALL: [Self; Self::LEN] = [
        TokenKind::Croissant,
        TokenKind::Cupcake,
        TokenKind::Danish,
        TokenKind::Donut,
        TokenKind::Macaroon,
        TokenKind::SugarCookie,
    ];

    /// Returns the single character used for this kind in textual grids.
    ///
    /// # Examples
    ///
    /// ```
    /// use frogcrush_engine::TokenKind;
    ///
    /// assert_eq!(TokenKind::Croissant.as_char(), 'C');
    /// assert_eq!(TokenKind::Donut.as_char(), 'O');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            TokenKind::Croissant => 'C',
            TokenKind::Cupcake => 'U',
            TokenKind::Danish => 'D',
            TokenKind::Donut => 'O',
            TokenKind::Macaroon => 'M',
            TokenKind::SugarCookie => 'S',
        }
    }

    /// Parses a kind from its single-character form.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'C' => Some(TokenKind::Croissant),
            'U' => Some(TokenKind::Cupcake),
            'D' => Some(TokenKind::Danish),
            'O' => Some(TokenKind::Donut),
            'M' => Some(TokenKind::Macaroon),
            'S' => Some(TokenKind::SugarCookie),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("palette size must be between 1 and {max}, got {size}")]
pub struct PaletteError {
    size: usize,
    max: usize,
}

/// The set of token kinds a level draws from.
///
/// A palette of size `n` uses the first `n` entries of [`TokenKind::ALL`].
/// Palettes smaller than 3 are representable but cannot produce a shuffled
/// layout with a possible move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct Palette {
    size: usize,
}

impl Default for Palette {
    fn default() -> Self {
        Self::FULL
    }
}

impl TryFrom<usize> for Palette {
    type Error = PaletteError;

    fn try_from(size: usize) -> Result<Self, Self::Error> {
        Self::new(size)
    }
}

impl From<Palette> for usize {
    fn from(palette: Palette) -> Self {
        palette.size
    }
}

impl Palette {
    /// Palette containing every token kind.
    pub const FULL: Self = Self {
        size: TokenKind::LEN,
    };

    pub fn new(size: usize) -> Result<Self, PaletteError> {
        if (1..=TokenKind::LEN).contains(&size) {
            Ok(Self { size })
        } else {
            Err(PaletteError {
                size,
                max: TokenKind::LEN,
            })
        }
    }

    #[must_use]
    pub const fn size(self) -> usize {
        self.size
    }

    #[must_use]
    pub fn kinds(self) -> &'static [TokenKind] {
        &TokenKind::ALL[..self.size]
    }

    #[must_use]
    pub fn contains(self, kind: TokenKind) -> bool {
        (kind as usize) < self.size
    }
}
