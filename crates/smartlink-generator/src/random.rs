use crate::Generator;
use rand::rngs::OsRng;
use rand::RngCore;
use smartlink_core::shortcode::{MAX_LENGTH, MIN_LENGTH};
use smartlink_core::ShortCode;
use thiserror::Error;

/// URL-safe alphabet with exactly 64 symbols, so a random byte masked to its
/// low six bits selects a symbol without bias.
const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

pub const DEFAULT_LENGTH: usize = 6;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("invalid code length {length}; expected {min}..={max}")]
    InvalidLength {
        length: usize,
        min: usize,
        max: usize,
    },
}

/// Generates fixed-length short codes from the operating system's CSPRNG.
///
/// With the default length of 6 there are 64^6 (about 6.9e10) possible codes.
#[derive(Debug, Clone)]
pub struct RandomGenerator {
    length: usize,
}

impl RandomGenerator {
    /// Creates a generator producing codes of [`DEFAULT_LENGTH`] characters.
    pub fn new() -> Self {
        Self {
            length: DEFAULT_LENGTH,
        }
    }

    /// Creates a generator producing codes of `length` characters.
    pub fn with_length(length: usize) -> Result<Self, GeneratorError> {
        if !(MIN_LENGTH..=MAX_LENGTH).contains(&length) {
            return Err(GeneratorError::InvalidLength {
                length,
                min: MIN_LENGTH,
                max: MAX_LENGTH,
            });
        }
        Ok(Self { length })
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for RandomGenerator {
    type Output = ShortCode;

    fn generate(&self) -> ShortCode {
        let mut bytes = [0u8; MAX_LENGTH];
        let bytes = &mut bytes[..self.length];
        OsRng.fill_bytes(bytes);

        let code: String = bytes
            .iter()
            .map(|b| ALPHABET[(b & 0x3f) as usize] as char)
            .collect();
        ShortCode::new_unchecked(code)
    }
}
