use std::fmt;
use std::str::FromStr;

const MAC_LEN: usize = 6;
const RAW_HEX_LEN: usize = MAC_LEN * 2;

/// A 48-bit hardware address, byte order as written.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HardwareAddress([u8; MAC_LEN]);

impl HardwareAddress {
    pub const fn new(bytes: [u8; MAC_LEN]) -> Self {
        Self(bytes)
    }

    pub fn octets(&self) -> [u8; MAC_LEN] {
        self.0
    }
}

impl AsRef<[u8]> for HardwareAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for HardwareAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl FromStr for HardwareAddress {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    #[error("unexpected MAC length after cleanup: {0}")]
    Length(usize),
    #[error("invalid hex digit")]
    InvalidHex,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid MAC {input:?}: {reason}")]
pub struct ParseError {
    pub input: String,
    pub reason: Reason,
}

/// Parses a MAC address written as `aa:bb:cc:dd:ee:ff`, `aa-bb-cc-dd-ee-ff`,
/// `aabb.ccdd.eeff`, or as twelve bare hex digits. Any mix of `:` and `-`
/// is accepted as long as twelve hex digits remain once they are removed.
pub fn parse(s: &str) -> Result<HardwareAddress, ParseError> {
    if let Some(addr) = parse_delimited(s) {
        return Ok(addr);
    }

    let cleaned: Vec<u8> = s.bytes().filter(|b| *b != b':' && *b != b'-').collect();
    if cleaned.len() != RAW_HEX_LEN {
        return Err(ParseError {
            input: s.to_string(),
            reason: Reason::Length(cleaned.len()),
        });
    }
    let mut bytes = [0u8; MAC_LEN];
    for (dst, pair) in bytes.iter_mut().zip(cleaned.chunks(2)) {
        *dst = hex_byte(pair).ok_or_else(|| ParseError {
            input: s.to_string(),
            reason: Reason::InvalidHex,
        })?;
    }
    Ok(HardwareAddress(bytes))
}

// Strict forms: one separator kind, fixed group width.
fn parse_delimited(s: &str) -> Option<HardwareAddress> {
    let b = s.as_bytes();
    let (sep, group) = match b.get(2) {
        Some(b':') => (b':', 2),
        Some(b'-') => (b'-', 2),
        _ if b.get(4) == Some(&b'.') => (b'.', 4),
        _ => return None,
    };
    let groups: Vec<&[u8]> = b.split(|c| *c == sep).collect();
    if groups.len() * group != RAW_HEX_LEN || groups.iter().any(|g| g.len() != group) {
        return None;
    }
    let digits: Vec<u8> = groups.concat();
    let mut bytes = [0u8; MAC_LEN];
    for (dst, pair) in bytes.iter_mut().zip(digits.chunks(2)) {
        *dst = hex_byte(pair)?;
    }
    Some(HardwareAddress(bytes))
}

fn hex_byte(pair: &[u8]) -> Option<u8> {
    match pair {
        [hi, lo] => Some(hex_digit(*hi)? << 4 | hex_digit(*lo)?),
        _ => None,
    }
}

fn hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}
