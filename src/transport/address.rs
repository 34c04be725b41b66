//! Six-byte radio endpoint addresses.

use std::fmt;
use std::str::FromStr;

use crate::protocol::Error;

/// Length of a peer address in bytes.
pub const ADDRESS_LEN: usize = 6;

/// Radio endpoint address (a MAC address on ESP-NOW style links).
///
/// Equality is byte-exact; the textual form is only used for display and
/// parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PeerAddress([u8; ADDRESS_LEN]);

impl PeerAddress {
    /// Link-layer broadcast address.
    pub const BROADCAST: Self = Self([0xFF; ADDRESS_LEN]);

    /// Create an address from raw bytes.
    #[must_use]
    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw bytes of the address.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Check for the all-`0xFF` broadcast address.
    #[must_use]
    pub fn is_broadcast(&self) -> bool {
        self.0 == [0xFF; ADDRESS_LEN]
    }

    /// Check for the all-zero (unset) address.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0; ADDRESS_LEN]
    }
}

impl From<[u8; ADDRESS_LEN]> for PeerAddress {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }
}

impl From<PeerAddress> for [u8; ADDRESS_LEN] {
    fn from(address: PeerAddress) -> Self {
        address.0
    }
}

impl TryFrom<&[u8]> for PeerAddress {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; ADDRESS_LEN] = bytes
            .try_into()
            .map_err(|_| Error::InvalidAddressLength { len: bytes.len() })?;
        Ok(Self(bytes))
    }
}

impl TryFrom<Vec<u8>> for PeerAddress {
    type Error = Error;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        Self::try_from(bytes.as_slice())
    }
}

impl AsRef<[u8]> for PeerAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for PeerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

impl FromStr for PeerAddress {
    type Err = Error;

    /// Parse `XX:XX:XX:XX:XX:XX`, hex digits in either case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidAddressFormat(s.to_owned());
        let trimmed = s.trim();

        let mut bytes = [0u8; ADDRESS_LEN];
        let mut parts = trimmed.split(':');
        for slot in &mut bytes {
            let part = parts.next().ok_or_else(invalid)?;
            if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            *slot = u8::from_str_radix(part, 16).map_err(|_| invalid())?;
        }
        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Self(bytes))
    }
}
