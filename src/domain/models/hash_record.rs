use std::{fmt, str::FromStr};

use base64::{
    Engine as _, alphabet,
    engine::{GeneralPurpose, general_purpose::NO_PAD},
};

use crate::domain::error::MalformedHashError;

/// bcrypt's own base64 dialect (`./A-Za-z0-9`, unpadded)
const BCRYPT_BASE64: GeneralPurpose = GeneralPurpose::new(&alphabet::BCRYPT, NO_PAD);

pub const SALT_LEN: usize = 16;
pub const DIGEST_LEN: usize = 23;

const ENCODED_SALT_LEN: usize = 22;
const ENCODED_DIGEST_LEN: usize = 31;

/// Version marker of a modular-crypt bcrypt hash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashVersion {
    TwoA,
    TwoB,
    TwoY,
}

impl HashVersion {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TwoA => "2a",
            Self::TwoB => "2b",
            Self::TwoY => "2y",
        }
    }
}

impl fmt::Display for HashVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashVersion {
    type Err = MalformedHashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "2a" => Ok(Self::TwoA),
            "2b" => Ok(Self::TwoB),
            "2y" => Ok(Self::TwoY),
            other => Err(MalformedHashError::UnknownVersion(other.to_string())),
        }
    }
}

/// Work factor: bcrypt runs `2^cost` key-expansion rounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cost(u32);

impl Cost {
    pub const MIN: u32 = 4;
    pub const MAX: u32 = 31;
    pub const DEFAULT: Cost = Cost(10);

    pub fn new(value: u32) -> Result<Self, MalformedHashError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(MalformedHashError::CostOutOfRange(value))
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for Cost {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Parsed form of a stored hash such as
/// `$2b$12$7hoRZfJrRKD2nIm2vHLs7OBETy.LWenXXMLKf99W8M4PUwO6KB7fu`.
///
/// Only canonical encodings are accepted, so `to_string()` reproduces the
/// parsed input exactly.
#[derive(Clone, PartialEq, Eq)]
pub struct HashRecord {
    version: HashVersion,
    cost: Cost,
    salt: [u8; SALT_LEN],
    digest: [u8; DIGEST_LEN],
}

impl HashRecord {
    pub fn new(
        version: HashVersion,
        cost: Cost,
        salt: [u8; SALT_LEN],
        digest: [u8; DIGEST_LEN],
    ) -> Self {
        Self {
            version,
            cost,
            salt,
            digest,
        }
    }

    pub fn version(&self) -> HashVersion {
        self.version
    }

    pub fn cost(&self) -> Cost {
        self.cost
    }

    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    pub fn digest(&self) -> &[u8; DIGEST_LEN] {
        &self.digest
    }
}

// salt and digest stay out of debug output
impl fmt::Debug for HashRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashRecord")
            .field("version", &self.version)
            .field("cost", &self.cost)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for HashRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "${}${:02}${}{}",
            self.version,
            self.cost.get(),
            BCRYPT_BASE64.encode(self.salt),
            BCRYPT_BASE64.encode(self.digest)
        )
    }
}

impl FromStr for HashRecord {
    type Err = MalformedHashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(MalformedHashError::Empty);
        }
        let rest = s
            .strip_prefix('$')
            .ok_or(MalformedHashError::MissingPrefix)?;

        let fields: Vec<&str> = rest.split('$').collect();
        let [version, cost, body] = fields.as_slice() else {
            return Err(MalformedHashError::FieldCount(fields.len()));
        };

        let version = version.parse::<HashVersion>()?;
        let cost = parse_cost(cost)?;

        let expected = ENCODED_SALT_LEN + ENCODED_DIGEST_LEN;
        if body.len() != expected {
            return Err(MalformedHashError::InvalidLength {
                expected,
                actual: body.len(),
            });
        }
        // a multi-byte char straddling the split belongs to the salt
        if !body.is_char_boundary(ENCODED_SALT_LEN) {
            return Err(MalformedHashError::InvalidEncoding("salt"));
        }
        let (salt, digest) = body.split_at(ENCODED_SALT_LEN);

        Ok(Self {
            version,
            cost,
            salt: decode_fixed(salt, "salt")?,
            digest: decode_fixed(digest, "digest")?,
        })
    }
}

fn parse_cost(field: &str) -> Result<Cost, MalformedHashError> {
    if field.len() != 2 || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MalformedHashError::NonNumericCost);
    }
    let value = field
        .parse::<u32>()
        .map_err(|_| MalformedHashError::NonNumericCost)?;
    Cost::new(value)
}

fn decode_fixed<const N: usize>(
    encoded: &str,
    part: &'static str,
) -> Result<[u8; N], MalformedHashError> {
    let bytes = BCRYPT_BASE64
        .decode(encoded)
        .map_err(|_| MalformedHashError::InvalidEncoding(part))?;
    bytes
        .try_into()
        .map_err(|_| MalformedHashError::InvalidEncoding(part))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    const KNOWN_HASH: &str = "$2b$12$7hoRZfJrRKD2nIm2vHLs7OBETy.LWenXXMLKf99W8M4PUwO6KB7fu";

    #[test]
    fn parses_fields_of_known_hash() {
        let record: HashRecord = KNOWN_HASH.parse().unwrap();

        assert_eq!(record.version(), HashVersion::TwoB);
        assert_eq!(record.cost().get(), 12);
        assert_eq!(record.salt().len(), SALT_LEN);
        assert_eq!(record.digest().len(), DIGEST_LEN);
    }

    #[rstest]
    #[case(KNOWN_HASH)]
    #[case("$2a$05$CCCCCCCCCCCCCCCCCCCCC.E5YPO9kmyuRGyh0XouQYb4YMJKvyOeW")]
    #[case("$2y$04$.....................................................")]
    fn canonical_encoding_round_trips(#[case] encoded: &str) {
        let record: HashRecord = encoded.parse().unwrap();

        assert_eq!(record.to_string(), encoded);
    }

    #[test]
    fn constructed_record_encodes_and_parses_back() {
        let record = HashRecord::new(
            HashVersion::TwoY,
            Cost::new(7).unwrap(),
            [0xA5; SALT_LEN],
            [0x3C; DIGEST_LEN],
        );

        let encoded = record.to_string();

        assert!(encoded.starts_with("$2y$07$"));
        assert_eq!(encoded.len(), 60);
        assert_eq!(encoded.parse::<HashRecord>().unwrap(), record);
    }

    #[rstest]
    #[case("", MalformedHashError::Empty)]
    #[case("2b$12$7hoRZfJrRKD2nIm2vHLs7OBETy.LWenXXMLKf99W8M4PUwO6KB7fu", MalformedHashError::MissingPrefix)]
    #[case("$2b$12", MalformedHashError::FieldCount(2))]
    #[case("$2b$12$7hoRZfJrRKD2nIm2vHLs7O$BETy.LWenXXMLKf99W8M4PUwO6KB7fu", MalformedHashError::FieldCount(4))]
    #[case("$2x$12$7hoRZfJrRKD2nIm2vHLs7OBETy.LWenXXMLKf99W8M4PUwO6KB7fu", MalformedHashError::UnknownVersion("2x".to_string()))]
    #[case("$argon2id$12$7hoRZfJrRKD2nIm2vHLs7OBETy.LWenXXMLKf99W8M4PUwO6KB7fu", MalformedHashError::UnknownVersion("argon2id".to_string()))]
    #[case("$2b$ab$7hoRZfJrRKD2nIm2vHLs7OBETy.LWenXXMLKf99W8M4PUwO6KB7fu", MalformedHashError::NonNumericCost)]
    #[case("$2b$9$7hoRZfJrRKD2nIm2vHLs7OBETy.LWenXXMLKf99W8M4PUwO6KB7fu", MalformedHashError::NonNumericCost)]
    #[case("$2b$+9$7hoRZfJrRKD2nIm2vHLs7OBETy.LWenXXMLKf99W8M4PUwO6KB7fu", MalformedHashError::NonNumericCost)]
    #[case("$2b$03$7hoRZfJrRKD2nIm2vHLs7OBETy.LWenXXMLKf99W8M4PUwO6KB7fu", MalformedHashError::CostOutOfRange(3))]
    #[case("$2b$32$7hoRZfJrRKD2nIm2vHLs7OBETy.LWenXXMLKf99W8M4PUwO6KB7fu", MalformedHashError::CostOutOfRange(32))]
    #[case("$2b$12$", MalformedHashError::InvalidLength { expected: 53, actual: 0 })]
    #[case("$2b$12$7hoRZfJrRKD2nIm2vHLs7OBETy.LWenXXMLKf99W8M4PUwO6KB7f", MalformedHashError::InvalidLength { expected: 53, actual: 52 })]
    #[case("$2b$12$7hoRZfJrRKD2nIm2vHLs7OBETy.LWenXXMLKf99W8M4PUwO6KB7fuu", MalformedHashError::InvalidLength { expected: 53, actual: 54 })]
    #[case("$2b$12$7hoRZfJrRKD2nIm2vHLs7+BETy.LWenXXMLKf99W8M4PUwO6KB7fu", MalformedHashError::InvalidEncoding("salt"))]
    #[case("$2b$12$7hoRZfJrRKD2nIm2vHLs7OBETy.LWenXXMLKf99W8M4PUwO6KB7f=", MalformedHashError::InvalidEncoding("digest"))]
    fn rejects_malformed_encodings(#[case] encoded: &str, #[case] expected: MalformedHashError) {
        assert_eq!(encoded.parse::<HashRecord>().unwrap_err(), expected);
    }

    #[test]
    fn rejects_non_canonical_trailing_bits() {
        // last salt character carries 4 unused bits; 'P' sets one of them
        let encoded = "$2b$12$7hoRZfJrRKD2nIm2vHLs7PBETy.LWenXXMLKf99W8M4PUwO6KB7fu";

        assert_eq!(
            encoded.parse::<HashRecord>().unwrap_err(),
            MalformedHashError::InvalidEncoding("salt")
        );
    }

    #[rstest]
    #[case("$2b$12$7hoRZfJrRKD2nIm2vHLs7OéBETy.LWenXXMLKf99W8M4PUwO6KB7", "digest")]
    #[case("$2b$12$7hoRZfJrRKD2nIm2vHLs7éBETy.LWenXXMLKf99W8M4PUwO6KB7f", "salt")]
    #[case("$2b$12$éoRZfJrRKD2nIm2vHLs7OBETy.LWenXXMLKf99W8M4PUwO6KB7fu", "salt")]
    fn reports_the_part_holding_non_ascii(#[case] encoded: &str, #[case] part: &'static str) {
        assert_eq!(
            encoded.parse::<HashRecord>().unwrap_err(),
            MalformedHashError::InvalidEncoding(part)
        );
    }

    #[test]
    fn rejects_non_ascii_body_without_panicking() {
        let encoded = format!("$2b$12${}", "é".repeat(26) + "a");

        assert!(encoded.parse::<HashRecord>().is_err());
    }

    #[test]
    fn debug_output_hides_salt_and_digest() {
        let record: HashRecord = KNOWN_HASH.parse().unwrap();

        let debug = format!("{record:?}");

        assert!(debug.contains("TwoB"));
        assert!(!debug.contains("salt"));
        assert!(!debug.contains("digest"));
    }

    #[rstest]
    #[case(4, true)]
    #[case(31, true)]
    #[case(0, false)]
    #[case(32, false)]
    fn cost_bounds(#[case] value: u32, #[case] valid: bool) {
        assert_eq!(Cost::new(value).is_ok(), valid);
    }
}
