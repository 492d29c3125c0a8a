//! Small helpers that do not belong to any one module.
use blake2::{Blake2b512, Digest};
use rand::RngCore;

/// Produces the hex-encoded salted digest for a password. Deterministic for a given (password, salt)
/// pair; the salt must be unique per account.
pub fn credential_digest(password: &str, salt: &str) -> String {
    let mut hasher = Blake2b512::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Generates a fresh 16-byte hex-encoded salt.
pub fn random_salt() -> String {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);
    hex::encode(salt)
}

#[cfg(test)]
mod test {
    use super::{credential_digest, random_salt};

    #[test]
    fn digest_is_deterministic_per_salt() {
        let salt = random_salt();
        assert_eq!(credential_digest("hunter2", &salt), credential_digest("hunter2", &salt));
        assert_ne!(credential_digest("hunter2", &salt), credential_digest("hunter3", &salt));
        let other_salt = random_salt();
        assert_ne!(salt, other_salt);
        assert_ne!(credential_digest("hunter2", &salt), credential_digest("hunter2", &other_salt));
    }
}
