//! Salted password hashing on top of blake3 key derivation.
//!
//! Stored form: `blake3$<salt hex>$<digest hex>`.

use rand::RngCore;

const CONTEXT: &str = "helpdesk 2025-10-01 account password";
const SCHEME: &str = "blake3";
const SALT_LEN: usize = 16;

fn digest(salt: &[u8], password: &str) -> blake3::Hash {
    let mut hasher = blake3::Hasher::new_derive_key(CONTEXT);
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize()
}

pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    format!("{SCHEME}${}${}", hex::encode(salt), digest(&salt, password).to_hex())
}

/// Malformed stored values never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.splitn(3, '$');
    let (Some(SCHEME), Some(salt), Some(expected)) = (parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    let Ok(salt) = hex::decode(salt) else {
        return false;
    };
    let Ok(expected) = blake3::Hash::from_hex(expected) else {
        return false;
    };
    // `Hash` equality is constant-time.
    digest(&salt, password) == expected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_own_hash() {
        let stored = hash_password("correct horse");
        assert!(stored.starts_with("blake3$"));
        assert!(verify_password("correct horse", &stored));
        assert!(!verify_password("wrong horse", &stored));
    }

    #[test]
    fn salts_differ() {
        assert_ne!(hash_password("same"), hash_password("same"));
    }

    #[test]
    fn malformed_hashes_fail() {
        for stored in ["", "blake3$", "md5$00$00", "blake3$zz$00", "blake3$00$short"] {
            assert!(!verify_password("anything", stored), "{stored}");
        }
    }
}
