//! # Account Names
//!
//! Human-readable account names packed into a fixed 17-byte value.
//!
//! ## Layout
//!
//! ```text
//! byte 0      byte 1      byte 2      bytes 3..17
//! [type = 1]  [ver = 1]   [length]    6-bit chars, 4 chars per 3 bytes
//! ```
//!
//! Character codes: `@`=0, `a`..`z`=1..26, `0`..`9`=32..41, `.`=49, `_`=50.
//! The packing is consensus-critical: store keys embed these bytes verbatim.

use crate::errors::IdentifierError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Maximum number of characters in a name.
pub const NAME_STR_LEN_MAX: usize = 17;

/// Length of the packed name value.
pub const NAME_BYTES_LEN: usize = 17;

const NAME_TYPE: u8 = 1;
const NAME_VERSION: u8 = 1;
const NAME_LEN_IDX: usize = 2;
const NAME_HEADER_LEN: usize = 3;

const CHAR_SEQ: u8 = 0;
const CHAR_NIL: u8 = 63;
const CHAR_DOT: u8 = 49;
const CHAR_UNDERLINE: u8 = 50;
const SIX_BIT_MASK: u8 = 0x3F;

/// A packed account name.
///
/// The all-zero value is the empty name.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Name([u8; NAME_BYTES_LEN]);

impl Name {
    /// The empty name.
    pub const fn empty() -> Self {
        Self([0u8; NAME_BYTES_LEN])
    }

    /// Parse and validate a name string.
    pub fn new(s: &str) -> Result<Self, IdentifierError> {
        if !verify_name_string(s) {
            return Err(IdentifierError::InvalidName(s.to_string()));
        }
        pack(s)
    }

    /// Rebuild a name from its packed bytes (shorter input is zero padded).
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut value = [0u8; NAME_BYTES_LEN];
        let n = bytes.len().min(NAME_BYTES_LEN);
        value[..n].copy_from_slice(&bytes[..n]);
        Self(value)
    }

    /// Packed bytes of this name.
    pub fn as_bytes(&self) -> &[u8; NAME_BYTES_LEN] {
        &self.0
    }

    /// Number of characters in the name.
    pub fn len(&self) -> usize {
        self.0[NAME_LEN_IDX] as usize
    }

    /// True for the empty name.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn unpack(&self) -> String {
        let len = self.len().min(NAME_STR_LEN_MAX);
        let mut out = String::with_capacity(len);
        let v = &self.0;
        let mut loc = NAME_HEADER_LEN;

        for i in 0..len {
            let code = match i % 4 {
                0 => v[loc] >> 2,
                1 => {
                    let c = (v[loc] << 4) | (v[loc + 1] >> 4);
                    loc += 1;
                    c
                }
                2 => (v[loc] << 2) | (v[loc + 1] >> 6),
                _ => {
                    let c = v[loc + 1];
                    loc += 2;
                    c
                }
            };
            out.push(code_to_char(code & SIX_BIT_MASK));
        }

        out
    }
}

/// Returns whether `s` is a valid name string.
///
/// The empty string is valid (it is the empty name).
pub fn verify_name_string(s: &str) -> bool {
    if s.is_empty() {
        return true;
    }
    if s.len() > NAME_STR_LEN_MAX || !s.is_ascii() {
        return false;
    }
    if s.starts_with('@') || s.ends_with('@') {
        return false;
    }
    if s.bytes().any(|c| char_to_code(c) == CHAR_NIL) {
        return false;
    }
    s.bytes().filter(|&c| c == b'@').count() <= 1
}

fn pack(s: &str) -> Result<Name, IdentifierError> {
    if s.len() > NAME_STR_LEN_MAX {
        return Err(IdentifierError::NameTooLong(s.len()));
    }
    if s.is_empty() {
        return Ok(Name::empty());
    }

    let mut v = [0u8; NAME_BYTES_LEN];
    v[0] = NAME_TYPE;
    v[1] = NAME_VERSION;
    v[NAME_LEN_IDX] = s.len() as u8;

    let mut loc = NAME_HEADER_LEN;
    for (i, c) in s.bytes().enumerate() {
        let cc = char_to_code(c);
        if cc == CHAR_NIL {
            return Err(IdentifierError::InvalidName(s.to_string()));
        }
        match i % 4 {
            0 => v[loc] |= cc << 2,
            1 => {
                v[loc] |= cc >> 4;
                v[loc + 1] |= cc << 4;
                loc += 1;
            }
            2 => {
                v[loc] |= cc >> 2;
                v[loc + 1] |= cc << 6;
            }
            _ => {
                v[loc + 1] |= cc;
                loc += 2;
            }
        }
    }

    Ok(Name(v))
}

fn char_to_code(c: u8) -> u8 {
    match c {
        b'a'..=b'z' => 1 + (c - b'a'),
        b'0'..=b'9' => 32 + (c - b'0'),
        b'@' => CHAR_SEQ,
        b'.' => CHAR_DOT,
        b'_' => CHAR_UNDERLINE,
        _ => CHAR_NIL,
    }
}

fn code_to_char(code: u8) -> char {
    match code {
        CHAR_SEQ => '@',
        CHAR_DOT => '.',
        CHAR_UNDERLINE => '_',
        1..=26 => (code - 1 + b'a') as char,
        32..=41 => (code - 32 + b'0') as char,
        _ => '*',
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        match self.0[1] {
            NAME_VERSION => f.write_str(&self.unpack()),
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self)
    }
}

impl FromStr for Name {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Name::new(s)
    }
}

impl Serialize for Name {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Name {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Name::new(&s).map_err(serde::de::Error::custom)
    }
}
