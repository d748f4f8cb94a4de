use std::{fmt, str::FromStr};

use arrayvec::ArrayVec;
use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::IndexedRandom as _,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::{Palette, TokenKind};

/// Seed for deterministic token generation.
///
/// A 128-bit seed initializing the random number generator behind shuffles
/// and replenishment. Two sessions built from the same level and seed see the
/// same layouts and the same spawned tokens, so the same swaps produce the
/// same cascades. Serialized as a 32-character hex string.
///
/// # Example
///
/// ```
/// use frogcrush_engine::TokenSeed;
/// use rand::Rng as _;
///
/// let seed: TokenSeed = rand::rng().random();
/// let parsed: TokenSeed = seed.to_string().parse().unwrap();
/// assert_eq!(seed, parsed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSeed([u8; 16]);

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed {input:?}: expected 32 hex characters")]
pub struct SeedParseError {
    input: String,
}

impl TokenSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for TokenSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for TokenSeed {
    type Err = SeedParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = || SeedParseError {
            input: s.to_owned(),
        };
        if s.len() != 32 {
            return Err(error());
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| error())?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for TokenSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TokenSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `TokenSeed` values with `rng.random()`.
impl Distribution<TokenSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> TokenSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        TokenSeed(seed)
    }
}

/// Seeded source of random tokens drawn from a [`Palette`].
///
/// # Example
///
/// ```
/// use frogcrush_engine::{Palette, TokenSeed, TokenSource};
///
/// let seed = TokenSeed::from_bytes([1; 16]);
/// let mut a = TokenSource::with_seed(Palette::FULL, seed);
/// let mut b = TokenSource::with_seed(Palette::FULL, seed);
/// assert_eq!(a.draw(), b.draw());
/// ```
#[derive(Debug, Clone)]
pub struct TokenSource {
    rng: Pcg32,
    palette: Palette,
}

impl TokenSource {
    /// Creates a token source with a random seed.
    #[must_use]
    pub fn new(palette: Palette) -> Self {
        Self::with_seed(palette, rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for deterministic generation.
    #[must_use]
    pub fn with_seed(palette: Palette, seed: TokenSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
            palette,
        }
    }

    #[must_use]
    pub fn palette(&self) -> Palette {
        self.palette
    }

    /// Draws a kind uniformly from the palette.
    pub fn draw(&mut self) -> TokenKind {
        let kinds = self.palette.kinds();
        kinds[self.rng.random_range(0..kinds.len())]
    }

    /// Draws uniformly among palette kinds not listed in `excluded`.
    ///
    /// Returns `None` when every palette kind is excluded.
    pub fn draw_excluding(&mut self, excluded: &[TokenKind]) -> Option<TokenKind> {
        let allowed: ArrayVec<TokenKind, { TokenKind::LEN }> = self
            .palette
            .kinds()
            .iter()
            .copied()
            .filter(|kind| !excluded.contains(kind))
            .collect();
        allowed.choose(&mut self.rng).copied()
    }

    /// Returns a uniformly chosen index below `len`.
    pub(crate) fn index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(byte: u8) -> TokenSeed {
        TokenSeed::from_bytes([byte; 16])
    }

    #[test]
    fn test_seed_known_values() {
        assert_eq!(seed(0).to_string(), "00000000000000000000000000000000");
        assert_eq!(seed(0xff).to_string(), "ffffffffffffffffffffffffffffffff");

        let bytes = [
            0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54,
            0x32, 0x10,
        ];
        let serialized = serde_json::to_string(&TokenSeed::from_bytes(bytes)).unwrap();
        assert_eq!(serialized, "\"0123456789abcdeffedcba9876543210\"");

        let deserialized: TokenSeed =
            serde_json::from_str("\"0123456789ABCDEFFEDCBA9876543210\"").unwrap();
        assert_eq!(deserialized, TokenSeed::from_bytes(bytes));
    }

    #[test]
    fn test_seed_parse_errors() {
        assert!("".parse::<TokenSeed>().is_err());
        assert!("0123456789abcdef".parse::<TokenSeed>().is_err());
        assert!(
            "ghijklmnopqrstuvwxyzghijklmnopqr"
                .parse::<TokenSeed>()
                .is_err()
        );
        let err = serde_json::from_str::<TokenSeed>("\"abc\"").unwrap_err();
        assert!(err.to_string().contains("invalid hex seed"));
    }

    #[test]
    fn test_same_seed_same_tokens() {
        let mut a = TokenSource::with_seed(Palette::FULL, seed(42));
        let mut b = TokenSource::with_seed(Palette::FULL, seed(42));
        for _ in 0..50 {
            assert_eq!(a.draw(), b.draw());
        }
    }

    #[test]
    fn test_draw_stays_in_palette() {
        let palette = Palette::new(3).unwrap();
        let mut source = TokenSource::with_seed(palette, seed(3));
        for _ in 0..200 {
            assert!(palette.contains(source.draw()));
        }
    }

    #[test]
    fn test_draw_excluding() {
        let palette = Palette::new(3).unwrap();
        let mut source = TokenSource::with_seed(palette, seed(9));
        for _ in 0..100 {
            let kind = source
                .draw_excluding(&[TokenKind::Croissant, TokenKind::Cupcake])
                .unwrap();
            assert_eq!(kind, TokenKind::Danish);
        }
        assert_eq!(source.draw_excluding(palette.kinds()), None);
    }
}
