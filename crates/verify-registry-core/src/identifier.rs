//! Identifier generation for new documents.
//!
//! The default source draws fixed-length tokens from a single seeded RNG that
//! lives for as long as the registry does. Tokens are not globally unique;
//! callers must check the store before using one as a key.

use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::Identifier;

/// Length of a random identifier.
pub const IDENTIFIER_LENGTH: usize = 30;

/// Alphabet random identifiers are drawn from.
pub const IDENTIFIER_ALPHABET: &[u8; 52] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Produces the storage key for a new document.
pub trait IdentifierSource: Send + Sync {
    /// Produce an identifier for a document with the given content.
    fn generate(&self, content: &str) -> Identifier;
}

/// Random tokens drawn uniformly from [`IDENTIFIER_ALPHABET`].
///
/// Holds one RNG, seeded once at construction.
pub struct RandomIdentifiers {
    rng: Mutex<StdRng>,
    length: usize,
}

impl RandomIdentifiers {
    /// Seed from operating system entropy.
    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic sequence for a given seed.
    pub fn from_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
            length: IDENTIFIER_LENGTH,
        }
    }

    /// Override the token length. Tokens are never empty, so zero becomes one.
    pub fn with_length(mut self, length: usize) -> Self {
        self.length = length.max(1);
        self
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Draw the next token.
    pub fn next_token(&self) -> String {
        // The RNG state stays valid even if a holder panicked.
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        (0..self.length)
            .map(|_| IDENTIFIER_ALPHABET[rng.gen_range(0..IDENTIFIER_ALPHABET.len())] as char)
            .collect()
    }
}

impl Default for RandomIdentifiers {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl IdentifierSource for RandomIdentifiers {
    fn generate(&self, _content: &str) -> Identifier {
        Identifier::new(self.next_token())
    }
}

/// Content addressing: the lowercase hex Blake3 digest of the content.
///
/// Deterministic, so storing the same content twice collides. Opt-in only.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentDigest;

impl IdentifierSource for ContentDigest {
    fn generate(&self, content: &str) -> Identifier {
        Identifier::new(hex::encode(blake3::hash(content.as_bytes()).as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_random_identifier_shape() {
        let source = RandomIdentifiers::from_entropy();
        for _ in 0..100 {
            let id = source.generate("ignored");
            assert_eq!(id.as_str().len(), IDENTIFIER_LENGTH);
            assert!(id.as_str().bytes().all(|b| IDENTIFIER_ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn test_rapid_calls_do_not_repeat() {
        // A per-call reseed from the clock would produce runs of equal tokens.
        let source = RandomIdentifiers::from_entropy();
        let ids: HashSet<String> = (0..1000).map(|_| source.next_token()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_seeded_sequence_is_reproducible() {
        let a = RandomIdentifiers::from_seed(7);
        let b = RandomIdentifiers::from_seed(7);
        for _ in 0..10 {
            assert_eq!(a.next_token(), b.next_token());
        }
    }

    #[test]
    fn test_custom_length() {
        let source = RandomIdentifiers::from_seed(1).with_length(8);
        assert_eq!(source.next_token().len(), 8);
    }

    #[test]
    fn test_zero_length_is_raised_to_one() {
        let source = RandomIdentifiers::from_seed(1).with_length(0);
        assert_eq!(source.length(), 1);
        assert_eq!(source.next_token().len(), 1);
    }

    #[test]
    fn test_alphabet_is_all_letters() {
        let letters: HashSet<u8> = IDENTIFIER_ALPHABET.iter().copied().collect();
        assert_eq!(letters.len(), 52);
        assert!(letters.iter().all(|b| b.is_ascii_alphabetic()));
    }

    #[test]
    fn test_content_digest_is_deterministic() {
        let a = ContentDigest.generate("hello");
        let b = ContentDigest.generate("hello");
        let c = ContentDigest.generate("hello!");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.as_str().len(), 64);
    }
}
