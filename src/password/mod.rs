use rand::rngs::ThreadRng;
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::core::types::Password;

pub const DEFAULT_LENGTH: usize = 12;
pub const MIN_LENGTH: usize = 8;

const DIGITS: &[u8] = b"0123456789";
const LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
const DEFAULT_POOL: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
                              abcdefghijklmnopqrstuvwxyz\
                              0123456789\
                              !#$%&()*+,-.:;<=>?@[]^_{}~";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordError {
    #[error("password length {requested} is shorter than the minimum of {minimum}")]
    InvalidLength { requested: usize, minimum: usize },
}

/// Generates passwords that start with a digit and a letter, followed by
/// characters drawn from a pool.
#[derive(Debug)]
pub struct PasswordGenerator<R> {
    rng: R,
}

impl PasswordGenerator<ThreadRng> {
    pub fn new() -> Self {
        Self::with_rng(rand::thread_rng())
    }
}

impl Default for PasswordGenerator<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> PasswordGenerator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// `chars` are fragments whose characters together form the pool for
    /// everything after the leading digit and letter. `None` or an empty
    /// pool selects the default letters, digits and symbols.
    pub fn generate(&mut self, length: usize, chars: Option<&[&str]>) -> Result<Password, PasswordError> {
        if length < MIN_LENGTH {
            return Err(PasswordError::InvalidLength {
                requested: length,
                minimum: MIN_LENGTH,
            });
        }

        let pool: Vec<char> = match chars {
            Some(fragments) => fragments.iter().flat_map(|f| f.chars()).collect(),
            None => Vec::new(),
        };

        Ok(self.fill(length, pool))
    }

    /// A password of [`DEFAULT_LENGTH`] from the default pool.
    pub fn generate_default(&mut self) -> Password {
        self.fill(DEFAULT_LENGTH, Vec::new())
    }

    fn fill(&mut self, length: usize, pool: Vec<char>) -> Password {
        let pool = if pool.is_empty() {
            DEFAULT_POOL.iter().map(|&b| b as char).collect()
        } else {
            pool
        };

        let mut password = String::with_capacity(length);
        password.push(self.pick_ascii(DIGITS));
        password.push(self.pick_ascii(LETTERS));
        for _ in 2..length {
            if let Some(&c) = pool.choose(&mut self.rng) {
                password.push(c);
            }
        }

        Password(password)
    }

    fn pick_ascii(&mut self, set: &[u8]) -> char {
        set[self.rng.gen_range(0..set.len())] as char
    }
}

/// Generates a password with the thread-local CSPRNG.
pub fn generate_password(length: usize, chars: Option<&[&str]>) -> Result<Password, PasswordError> {
    PasswordGenerator::new().generate(length, chars)
}

pub fn generate_default_password() -> Password {
    PasswordGenerator::new().generate_default()
}
