//! Fixed-width byte values used by the marketplace
//!
//! Identities, course ids, course hashes and proofs are all fixed-length byte
//! strings rendered as `0x`-prefixed lowercase hex. They share one definition
//! through the `fixed_bytes!` macro below.

use super::error::MarketplaceError;
use std::fmt;
use std::str::FromStr;

/// Amount of funds (unsigned, smallest unit)
pub type Amount = u128;

/// Sequential course identifier assigned at creation time
pub type CourseIndex = u64;

macro_rules! fixed_bytes {
    ($(#[$meta:meta])* $name:ident, $len:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, serde::Deserialize)]
        #[serde(try_from = "String")]
        pub struct $name([u8; $len]);

        impl $name {
            /// Length of the value in bytes
            pub const LEN: usize = $len;

            pub const fn new(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            /// True when every byte is zero
            pub fn is_zero(&self) -> bool {
                self.0.iter().all(|byte| *byte == 0)
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }

        impl FromStr for $name {
            type Err = MarketplaceError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                decode_fixed::<$len>(value).map(Self)
            }
        }

        impl TryFrom<String> for $name {
            type Error = MarketplaceError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

fixed_bytes!(
    /// Identity of a caller (seller, buyer or platform admin)
    Identity,
    20
);

fixed_bytes!(
    /// Buyer-supplied short course identifier
    ///
    /// At creation time the sequential index is widened into this form
    /// (16-byte big-endian) before the course hash is derived.
    CourseId,
    16
);

fixed_bytes!(
    /// Collision-resistant course key (Keccak-256 digest)
    CourseHash,
    32
);

fixed_bytes!(
    /// Opaque commitment supplied by the seller and checked at purchase
    Proof,
    32
);

impl CourseId {
    /// Encode a sequential index as a 16-byte big-endian course id
    pub fn from_index(index: CourseIndex) -> Self {
        Self(u128::from(index).to_be_bytes())
    }

    /// Read the course id back as a sequential index
    ///
    /// Returns `None` when the value does not fit a `CourseIndex`.
    pub fn to_index(&self) -> Option<CourseIndex> {
        CourseIndex::try_from(u128::from_be_bytes(self.0)).ok()
    }
}

/// Decode an optionally `0x`-prefixed hex string into exactly `N` bytes
fn decode_fixed<const N: usize>(value: &str) -> Result<[u8; N], MarketplaceError> {
    let trimmed = value.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    let mut bytes = [0u8; N];
    hex::decode_to_slice(digits, &mut bytes)
        .map_err(|_| MarketplaceError::invalid_hex(value, N))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_identity_display_round_trips_through_parse() {
        let text = "0x00000000000000000000000000000000000000a1";
        let identity: Identity = text.parse().unwrap();
        assert_eq!(identity.to_string(), text);
        assert_eq!(identity.as_bytes()[19], 0xa1);
    }

    #[test]
    fn test_parse_accepts_missing_prefix_and_uppercase() {
        let identity: Identity = "00000000000000000000000000000000000000AB".parse().unwrap();
        assert_eq!(identity.as_bytes()[19], 0xab);
    }

    #[rstest]
    #[case::too_short("0x1234")]
    #[case::too_long("0x0000000000000000000000000000000000000000ff")]
    #[case::not_hex("0xzz000000000000000000000000000000000000aa")]
    #[case::empty("")]
    fn test_parse_rejects_bad_identity(#[case] value: &str) {
        let result = value.parse::<Identity>();
        assert!(matches!(
            result,
            Err(MarketplaceError::InvalidHex { expected_len: 20, .. })
        ));
    }

    #[test]
    fn test_zero_detection() {
        assert!(Identity::default().is_zero());
        assert!(!Identity::new([1; 20]).is_zero());
    }

    #[rstest]
    #[case(0)]
    #[case(7)]
    #[case(u64::MAX)]
    fn test_course_id_index_conversion(#[case] index: CourseIndex) {
        let id = CourseId::from_index(index);
        assert_eq!(id.to_index(), Some(index));
    }

    #[test]
    fn test_course_id_is_big_endian() {
        let id = CourseId::from_index(1);
        assert_eq!(id.to_string(), "0x00000000000000000000000000000001");
    }

    #[test]
    fn test_course_id_beyond_index_range() {
        let id = CourseId::new([0xff; 16]);
        assert_eq!(id.to_index(), None);
    }

    #[test]
    fn test_debug_names_the_type() {
        let proof = Proof::new([0; 32]);
        assert!(format!("{:?}", proof).starts_with("Proof(0x"));
    }
}
