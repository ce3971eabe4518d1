use crate::formatting::prep_hex_str;
use hex::{decode, encode};
use serde::de::{Error as SerdeError, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::io::{Error, ErrorKind};
use std::str::FromStr;

pub const ADDRESS_LENGTH: usize = 32;

/// Account identifier on the ledger, displayed as `0x`-prefixed lowercase hex.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address {
    pub bytes: [u8; ADDRESS_LENGTH],
}

impl Address {
    pub fn from_sized_bytes(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Address { bytes }
    }
    pub fn is_null(&self) -> bool {
        self.bytes.iter().all(|v| *v == 0)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<[u8; ADDRESS_LENGTH]> for Address {
    fn from(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Address::from_sized_bytes(bytes)
    }
}

impl FromStr for Address {
    type Err = Error;

    /// Short hex strings are left-padded, so `0x2` names the same account as its
    /// 64 digit form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut hex = prep_hex_str(s);
        if hex.is_empty() || hex.len() > ADDRESS_LENGTH * 2 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!("Invalid address length: {s}"),
            ));
        }
        if hex.len() % 2 == 1 {
            hex.insert(0, '0');
        }
        let decoded = decode(&hex).map_err(|e| {
            Error::new(ErrorKind::InvalidInput, format!("Invalid address {s}: {e}"))
        })?;
        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes[ADDRESS_LENGTH - decoded.len()..].copy_from_slice(&decoded);
        Ok(Address { bytes })
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", encode(self.bytes))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", encode(self.bytes))
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.to_string().as_str())
    }
}

struct AddressVisitor;

impl<'de> Visitor<'de> for AddressVisitor {
    type Value = Address;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a hex encoded address of at most 32 bytes")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: SerdeError,
    {
        Address::from_str(value).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(AddressVisitor)
    }
}
