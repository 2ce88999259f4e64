use bcrypt::{BcryptError, DEFAULT_COST};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Hashes and verifies passwords.
///
/// Plaintext is first keyed through HMAC-SHA256 with a deployment-wide
/// pepper, then run through bcrypt, which embeds a random per-hash salt
/// and the work factor in its output string. An attacker holding only
/// the database cannot brute-force the hashes without the pepper.
#[derive(Clone)]
pub struct PasswordHasher {
    pepper: String,
}

impl PasswordHasher {
    pub fn new(pepper: impl Into<String>) -> Self {
        Self {
            pepper: pepper.into(),
        }
    }

    /// Derive a storable hash from a plaintext password.
    pub fn hash(&self, plaintext: &str) -> Result<String, BcryptError> {
        bcrypt::hash(self.peppered(plaintext), DEFAULT_COST)
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// A malformed stored hash is a verification failure, not an error.
    pub fn verify(&self, plaintext: &str, stored_hash: &str) -> bool {
        bcrypt::verify(self.peppered(plaintext), stored_hash).unwrap_or(false)
    }

    fn peppered(&self, plaintext: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.pepper.as_bytes())
            .expect("HMAC can take a key of any size");
        mac.update(plaintext.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}
