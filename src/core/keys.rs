//! Course key derivation
//!
//! A course key is `keccak256(course_id ++ identity)` over the raw bytes:
//! 16 bytes of course id followed by 20 bytes of identity. At creation the
//! sequential index is widened to a 16-byte big-endian course id first, so the
//! creation and purchase derivations agree for the same (id, identity) pair.

use crate::types::{CourseHash, CourseId, CourseIndex, Identity};
use sha3::{Digest, Keccak256};

/// Derive a course key from a course id and an identity
pub fn derive_course_hash(course_id: &CourseId, identity: &Identity) -> CourseHash {
    let mut hasher = Keccak256::new();
    hasher.update(course_id.as_bytes());
    hasher.update(identity.as_bytes());
    let digest = hasher.finalize();

    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&digest);
    CourseHash::new(bytes)
}

/// Derive the key of a course at creation time
pub fn creation_hash(index: CourseIndex, creator: &Identity) -> CourseHash {
    derive_course_hash(&CourseId::from_index(index), creator)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(last: u8) -> Identity {
        let mut bytes = [0u8; 20];
        bytes[19] = last;
        Identity::new(bytes)
    }

    #[test]
    fn test_creation_hash_known_value() {
        // keccak256(0x00..00 (16 bytes) ++ 0x00..0a (20 bytes))
        let hash = creation_hash(0, &identity(0x0a));
        assert_eq!(
            hash.to_string(),
            "0x2b0ad15436b59a94cd38b82b5c99aaf0a16bf3c2f068b2e88e533b3b823eb1e6"
        );
    }

    #[test]
    fn test_creation_and_purchase_derivations_agree() {
        let creator = identity(0x0a);
        assert_eq!(
            creation_hash(5, &creator),
            derive_course_hash(&CourseId::from_index(5), &creator)
        );
    }

    #[test]
    fn test_hash_depends_on_identity() {
        assert_ne!(creation_hash(0, &identity(0x0a)), creation_hash(0, &identity(0x0b)));
    }

    #[test]
    fn test_hash_depends_on_index() {
        assert_ne!(creation_hash(0, &identity(0x0a)), creation_hash(1, &identity(0x0a)));
    }
}
