//! Credential token codec
//!
//! The appraisal API credentials ship inside the client as obfuscated tokens
//! rather than cleartext string literals. This module reverses that scheme
//! (and provides the forward direction for fixture generation). It is
//! obfuscation, not encryption: anyone holding the client binary can decode
//! the tokens, and the scheme makes no secrecy claim beyond keeping the
//! values out of casual string dumps.

use crate::error::CredentialError;

/// The fixed key alphabet. A character's position in this string is its
/// digit value; the alphabet length is the radix of the positional scheme.
pub const KEY_ALPHABET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Radix of the positional scheme (the key alphabet length).
const RADIX: u32 = 36;

/// Number of token characters that encode one UTF-16 code unit.
const GROUP_SIZE: usize = 3;

/// Largest value one group can hold plus one (36^3). Values at or above this
/// cannot be encoded. The bound sits below the surrogate range at 0xD800, so
/// every decodable group value is a valid scalar.
const GROUP_CAPACITY: u32 = RADIX * RADIX * RADIX;

/// Decode an obfuscated credential token into its cleartext value
///
/// The token is read in 3-character groups; each group is a base-36 numeral
/// whose digits are positions in [`KEY_ALPHABET`], and its value is one
/// UTF-16 code unit of the cleartext. Trailing characters that do not fill a
/// complete group are discarded, matching the scheme this codec mirrors.
///
/// Decoding is deterministic and has no side effects.
///
/// # Errors
///
/// Returns [`CredentialError::InvalidTokenChar`] if any character in a
/// complete group is absent from the key alphabet. A malformed token is a
/// build-time defect, so no substitute value is ever produced.
///
/// # Examples
///
/// ```
/// use appraisal_report::obfuscation::decode;
///
/// assert_eq!(decode("01C01F01F01C01H01J01D01K").unwrap(), "03305718");
/// ```
pub fn decode(token: &str) -> Result<String, CredentialError> {
    let chars: Vec<char> = token.chars().collect();
    let groups = chars.len() / GROUP_SIZE;
    let mut plain = String::with_capacity(groups);

    for group in 0..groups {
        let start = group * GROUP_SIZE;
        let mut value: u32 = 0;
        for (slot, &ch) in chars[start..start + GROUP_SIZE].iter().enumerate() {
            let digit = alphabet_index(ch).ok_or(CredentialError::InvalidTokenChar {
                ch,
                offset: start + slot,
            })?;
            value = value * RADIX + digit;
        }
        // Group values are bounded by GROUP_CAPACITY, below the surrogate range.
        let decoded = char::from_u32(value).ok_or(CredentialError::CodeUnitOutOfRange {
            value: value as u16,
        })?;
        plain.push(decoded);
    }

    Ok(plain)
}

/// Encode a cleartext value into an obfuscated token
///
/// The exact inverse of [`decode`]: each UTF-16 code unit of the input
/// becomes one 3-character base-36 group. Kept public so fixtures and
/// deployment tooling can produce tokens for alternate credentials.
///
/// # Errors
///
/// Returns [`CredentialError::CodeUnitOutOfRange`] if any code unit is at or
/// above 36^3 (46656). Surrogate halves sit above that bound, so any
/// character outside the Basic Multilingual Plane is rejected rather than
/// silently mangled.
///
/// # Examples
///
/// ```
/// use appraisal_report::obfuscation::{decode, encode};
///
/// let token = encode("03305718").unwrap();
/// assert_eq!(token, "01C01F01F01C01H01J01D01K");
/// assert_eq!(decode(&token).unwrap(), "03305718");
/// ```
pub fn encode(plain: &str) -> Result<String, CredentialError> {
    let alphabet = KEY_ALPHABET.as_bytes();
    let mut token = String::with_capacity(plain.len() * GROUP_SIZE);

    for unit in plain.encode_utf16() {
        let value = u32::from(unit);
        if value >= GROUP_CAPACITY {
            return Err(CredentialError::CodeUnitOutOfRange { value: unit });
        }
        token.push(alphabet[(value / (RADIX * RADIX)) as usize] as char);
        token.push(alphabet[((value / RADIX) % RADIX) as usize] as char);
        token.push(alphabet[(value % RADIX) as usize] as char);
    }

    Ok(token)
}

/// Position of a character in the key alphabet, or None if it is not a key
/// character. The alphabet is ASCII, so char position and byte position agree.
fn alphabet_index(ch: char) -> Option<u32> {
    KEY_ALPHABET.chars().position(|c| c == ch).map(|i| i as u32)
}
