use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum rendered length of a name.
pub const MAX_NAME_LEN: usize = 13;

const CHARMAP: &[u8; 32] = b".12345abcdefghijklmnopqrstuvwxyz";

/// A 64-bit account identity.
///
/// Up to 13 characters from `.12345abcdefghijklmnopqrstuvwxyz` are packed into
/// the `u64`: the first 12 characters take 5 bits each, most significant first,
/// and the 13th character takes the low 4 bits (so it is limited to `.1-5a-j`).
/// Trailing dots carry no information and are dropped on display.
///
/// Display: `"alice"`, `"eosio.token"`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Name(u64);

impl Name {
    /// Wrap an already-encoded value.
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// The encoded value, used as the contributor table's primary key.
    pub const fn raw(&self) -> u64 {
        self.0
    }

    /// Whether this is the empty name (encoded value 0).
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

fn symbol(c: u8) -> Option<u64> {
    match c {
        b'a'..=b'z' => Some((c - b'a') as u64 + 6),
        b'1'..=b'5' => Some((c - b'1') as u64 + 1),
        b'.' => Some(0),
        _ => None,
    }
}

impl FromStr for Name {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason| DomainError::InvalidName {
            name: s.to_string(),
            reason,
        };
        if s.len() > MAX_NAME_LEN {
            return Err(invalid("longer than 13 characters"));
        }

        let mut value = 0u64;
        for (i, c) in s.bytes().enumerate() {
            let sym = symbol(c).ok_or_else(|| invalid("illegal character"))?;
            if i < 12 {
                value |= sym << (64 - 5 * (i + 1));
            } else {
                if sym > 0x0f {
                    return Err(invalid("13th character must be one of .12345abcdefghij"));
                }
                value |= sym;
            }
        }
        Ok(Self(value))
    }
}

impl TryFrom<String> for Name {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Name> for String {
    fn from(name: Name) -> Self {
        name.to_string()
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = [b'.'; MAX_NAME_LEN];
        let mut tmp = self.0;
        for i in 0..MAX_NAME_LEN {
            let (mask, shift) = if i == 0 { (0x0f, 4) } else { (0x1f, 5) };
            buf[MAX_NAME_LEN - 1 - i] = CHARMAP[(tmp & mask) as usize];
            tmp >>= shift;
        }
        let end = buf.iter().rposition(|&c| c != b'.').map_or(0, |p| p + 1);
        // CHARMAP is ASCII.
        f.write_str(std::str::from_utf8(&buf[..end]).map_err(|_| fmt::Error)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> Name {
        s.parse().unwrap()
    }

    #[test]
    fn known_encodings() {
        assert_eq!(name("eosio").raw(), 6138663577826885632);
        assert_eq!(name("alice").raw(), 3773036822876127232);
        assert_eq!(name("zzzzzzzzzzzzj").raw(), u64::MAX);
        assert_eq!(name("").raw(), 0);
    }

    #[test]
    fn renders_without_trailing_dots() {
        for s in ["alice", "bob", "eosio.token", "a.b", "zzzzzzzzzzzzj", "12345"] {
            assert_eq!(name(s).to_string(), s);
        }
        assert_eq!(name("bob...").to_string(), "bob");
        assert_eq!(Name::default().to_string(), "");
    }

    #[test]
    fn ordering_follows_encoded_value() {
        assert!(name("alice") < name("bob"));
        assert!(name("bob") < name("carol"));
    }

    #[test]
    fn rejects_illegal_characters() {
        for s in ["Alice", "bob6", "no space", "dash-ed"] {
            let err = s.parse::<Name>().unwrap_err();
            assert!(matches!(err, DomainError::InvalidName { reason: "illegal character", .. }));
        }
    }

    #[test]
    fn rejects_overlong_and_bad_thirteenth_char() {
        assert!(matches!(
            "abcdefghijklmn".parse::<Name>(),
            Err(DomainError::InvalidName { .. })
        ));
        assert!(matches!(
            "abcdefghijklz".parse::<Name>(),
            Err(DomainError::InvalidName { .. })
        ));
        assert!("abcdefghijklj".parse::<Name>().is_ok());
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&name("alice")).unwrap();
        assert_eq!(json, "\"alice\"");
        let back: Name = serde_json::from_str(&json).unwrap();
        assert_eq!(back, name("alice"));
        assert!(serde_json::from_str::<Name>("\"ALICE\"").is_err());
    }
}
