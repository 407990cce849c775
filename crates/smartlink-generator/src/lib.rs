pub mod random;

pub use random::{GeneratorError, RandomGenerator};

use smartlink_core::ShortCode;

/// Trait for generating short codes.
///
/// Implementations are pure generators that don't interact with storage.
/// Uniqueness is enforced by the repository at insertion time, so a generator
/// only has to make collisions unlikely.
pub trait Generator: Send + Sync + 'static {
    type Output: Into<ShortCode>;
    /// Generates a type that can be converted into a short code.
    fn generate(&self) -> Self::Output;
}
