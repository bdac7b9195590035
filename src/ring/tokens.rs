use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::Deref;

/// Ordered list of 32-bit ring tokens owned by an instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tokens(Vec<u32>);

impl Tokens {
    /// Wrap tokens as given, without sorting
    pub fn new(tokens: Vec<u32>) -> Self {
        Self(tokens)
    }

    /// Sort tokens in ascending order, as the ring expects them stored
    pub fn sort(&mut self) {
        self.0.sort_unstable();
    }

    /// Whether tokens are in ascending order
    pub fn is_sorted(&self) -> bool {
        self.0.windows(2).all(|pair| pair[0] <= pair[1])
    }

    /// Unwrap into the underlying vector
    pub fn into_vec(self) -> Vec<u32> {
        self.0
    }
}

impl Deref for Tokens {
    type Target = [u32];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<u32>> for Tokens {
    fn from(tokens: Vec<u32>) -> Self {
        Self(tokens)
    }
}

impl FromIterator<u32> for Tokens {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<u32> for Tokens {
    fn extend<I: IntoIterator<Item = u32>>(&mut self, iter: I) {
        self.0.extend(iter)
    }
}

/// Source of fresh ring tokens
pub trait TokenGenerator {
    /// Generate `count` distinct tokens, none of which appear in `taken`.
    /// The result is sorted.
    fn generate(&self, count: usize, taken: &[u32]) -> Tokens;
}

/// Draws tokens uniformly at random from the whole 32-bit space
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomTokenGenerator;

impl TokenGenerator for RandomTokenGenerator {
    fn generate(&self, count: usize, taken: &[u32]) -> Tokens {
        if count == 0 {
            return Tokens::default();
        }

        let mut rng = rand::thread_rng();
        let mut used: HashSet<u32> = taken.iter().copied().collect();
        let mut tokens = Vec::with_capacity(count);

        while tokens.len() < count {
            let candidate: u32 = rng.gen();
            if used.insert(candidate) {
                tokens.push(candidate);
            }
        }

        tokens.sort_unstable();
        Tokens(tokens)
    }
}
