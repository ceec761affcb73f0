//! # StrKey: Versioned, Checksummed Key Text
//!
//! Every key, seed and hash that a human ever copies around is rendered as a
//! StrKey:
//!
//! ```text
//! [version byte][32-byte payload][CRC16-XMODEM, little-endian]
//!     -> unpadded RFC 4648 base-32 -> GCEZWKCA5VLDNRLN3RPRJMRZ...
//! ```
//!
//! The version byte is chosen so the first character announces the kind:
//! `G` for account ids, `S` for secret seeds, `T` for pre-authorized
//! transaction hashes and `X` for sha256-hash signers. A seed pasted where an
//! account id is expected fails with [`StrKeyError::InvalidVersion`] even
//! though its checksum is fine.

use std::fmt;

use crc::{Crc, CRC_16_XMODEM};
use data_encoding::BASE32_NOPAD;
use thiserror::Error;

const CHECKSUM: Crc<u16> = Crc::<u16>::new(&CRC_16_XMODEM);

/// Size of the raw payload carried by every supported StrKey kind.
pub const PAYLOAD_LENGTH: usize = 32;

/// version + payload + checksum
const DECODED_LENGTH: usize = 1 + PAYLOAD_LENGTH + 2;

/// Errors that can occur while decoding a StrKey.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StrKeyError {
    /// The text is not canonical unpadded base-32.
    #[error("invalid base32 encoding")]
    InvalidEncoding,

    /// The checksum does not match the version byte and payload.
    #[error("invalid checksum")]
    InvalidChecksum,

    /// The leading byte decodes fine but belongs to a different kind.
    #[error("invalid version byte: expected {expected}, got {got}")]
    InvalidVersion { expected: VersionByte, got: u8 },

    /// The payload has the wrong size for its kind.
    #[error("invalid payload length: expected {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },
}

/// The kind of value a StrKey carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionByte {
    /// Ed25519 public key (`G...`).
    AccountId,
    /// Ed25519 secret seed (`S...`).
    Seed,
    /// Hash of a pre-authorized transaction (`T...`).
    PreAuthTx,
    /// SHA-256 hash signer (`X...`).
    Sha256Hash,
}

impl VersionByte {
    /// The raw version byte prepended to the payload.
    pub const fn byte(self) -> u8 {
        match self {
            Self::AccountId => 6 << 3,
            Self::Seed => 18 << 3,
            Self::PreAuthTx => 19 << 3,
            Self::Sha256Hash => 23 << 3,
        }
    }
}

impl fmt::Display for VersionByte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AccountId => write!(f, "accountId"),
            Self::Seed => write!(f, "seed"),
            Self::PreAuthTx => write!(f, "preAuthTx"),
            Self::Sha256Hash => write!(f, "sha256Hash"),
        }
    }
}

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

/// Encodes a 32-byte payload as a StrKey of the given kind.
pub fn encode(kind: VersionByte, payload: &[u8; PAYLOAD_LENGTH]) -> String {
    let mut buf = Vec::with_capacity(DECODED_LENGTH);
    buf.push(kind.byte());
    buf.extend_from_slice(payload);
    let checksum = crc16_xmodem(&buf);
    buf.extend_from_slice(&checksum.to_le_bytes());
    base32_encode(&buf)
}

/// Decodes a StrKey, checking the checksum, the kind and the payload size.
pub fn decode(kind: VersionByte, text: &str) -> Result<[u8; PAYLOAD_LENGTH], StrKeyError> {
    let raw = base32_decode(text).ok_or(StrKeyError::InvalidEncoding)?;
    if raw.len() < 3 {
        return Err(StrKeyError::InvalidLength {
            expected: PAYLOAD_LENGTH,
            got: raw.len().saturating_sub(3),
        });
    }

    let (body, checksum) = raw.split_at(raw.len() - 2);
    let expected = crc16_xmodem(body).to_le_bytes();
    if checksum != expected {
        return Err(StrKeyError::InvalidChecksum);
    }

    if body[0] != kind.byte() {
        return Err(StrKeyError::InvalidVersion {
            expected: kind,
            got: body[0],
        });
    }

    let payload = &body[1..];
    payload
        .try_into()
        .map_err(|_| StrKeyError::InvalidLength {
            expected: PAYLOAD_LENGTH,
            got: payload.len(),
        })
}

/// Returns `true` if `text` decodes as a StrKey of the given kind.
pub fn is_valid(kind: VersionByte, text: &str) -> bool {
    decode(kind, text).is_ok()
}

pub fn encode_ed25519_public_key(key: &[u8; PAYLOAD_LENGTH]) -> String {
    encode(VersionByte::AccountId, key)
}

pub fn decode_ed25519_public_key(text: &str) -> Result<[u8; PAYLOAD_LENGTH], StrKeyError> {
    decode(VersionByte::AccountId, text)
}

pub fn is_valid_ed25519_public_key(text: &str) -> bool {
    is_valid(VersionByte::AccountId, text)
}

pub fn encode_ed25519_secret_seed(seed: &[u8; PAYLOAD_LENGTH]) -> String {
    encode(VersionByte::Seed, seed)
}

pub fn decode_ed25519_secret_seed(text: &str) -> Result<[u8; PAYLOAD_LENGTH], StrKeyError> {
    decode(VersionByte::Seed, text)
}

pub fn encode_pre_auth_tx(hash: &[u8; PAYLOAD_LENGTH]) -> String {
    encode(VersionByte::PreAuthTx, hash)
}

pub fn decode_pre_auth_tx(text: &str) -> Result<[u8; PAYLOAD_LENGTH], StrKeyError> {
    decode(VersionByte::PreAuthTx, text)
}

pub fn encode_sha256_hash(hash: &[u8; PAYLOAD_LENGTH]) -> String {
    encode(VersionByte::Sha256Hash, hash)
}

pub fn decode_sha256_hash(text: &str) -> Result<[u8; PAYLOAD_LENGTH], StrKeyError> {
    decode(VersionByte::Sha256Hash, text)
}

// ---------------------------------------------------------------------------
// Primitives
// ---------------------------------------------------------------------------

fn crc16_xmodem(data: &[u8]) -> u16 {
    CHECKSUM.checksum(data)
}

fn base32_encode(data: &[u8]) -> String {
    BASE32_NOPAD.encode(data)
}

/// Strict unpadded base-32: no lowercase, no padding, and trailing bits must
/// be zero so every accepted string re-encodes to itself.
fn base32_decode(text: &str) -> Option<Vec<u8>> {
    BASE32_NOPAD.decode(text.as_bytes()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCOUNT: &str = "GCEZWKCA5VLDNRLN3RPRJMRZOX3Z6G5CHCGSNFHEYVXM3XOJMDS674JZ";

    #[test]
    fn crc16_matches_xmodem_check_value() {
        // Standard CRC catalogue check input.
        assert_eq!(crc16_xmodem(b"123456789"), 0x31C3);
    }

    #[test]
    fn base32_is_unpadded_rfc4648() {
        assert_eq!(base32_encode(b"foobar"), "MZXW6YTBOI");
        assert_eq!(base32_decode("MZXW6YTBOI").unwrap(), b"foobar");
    }

    #[test]
    fn base32_rejects_lowercase_and_padding() {
        assert!(base32_decode("mzxw6").is_none());
        assert!(base32_decode("MY======").is_none());
        assert!(base32_decode("M1").is_none());
    }

    #[test]
    fn base32_rejects_non_canonical_tail() {
        // "MZ" carries a non-zero dangling bit; the canonical form is "MY".
        assert!(base32_decode("MZ").is_none());
    }

    #[test]
    fn known_account_id_decodes() {
        let raw = decode(VersionByte::AccountId, ACCOUNT).unwrap();
        assert_eq!(encode(VersionByte::AccountId, &raw), ACCOUNT);
    }

    #[test]
    fn prefixes_follow_version_bytes() {
        let payload = [7u8; 32];
        assert!(encode(VersionByte::AccountId, &payload).starts_with('G'));
        assert!(encode(VersionByte::Seed, &payload).starts_with('S'));
        assert!(encode(VersionByte::PreAuthTx, &payload).starts_with('T'));
        assert!(encode(VersionByte::Sha256Hash, &payload).starts_with('X'));
        assert_eq!(encode(VersionByte::Seed, &payload).len(), 56);
    }

    #[test]
    fn wrong_kind_is_invalid_version() {
        let seed = encode_ed25519_secret_seed(&[1u8; 32]);
        assert_eq!(
            decode_ed25519_public_key(&seed),
            Err(StrKeyError::InvalidVersion {
                expected: VersionByte::AccountId,
                got: VersionByte::Seed.byte(),
            })
        );
        assert!(decode_ed25519_secret_seed(&seed).is_ok());
    }

    #[test]
    fn every_single_character_flip_is_rejected() {
        let original = ACCOUNT.as_bytes();
        let alphabet = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";
        for position in 0..original.len() {
            for &replacement in alphabet.iter() {
                if replacement == original[position] {
                    continue;
                }
                let mut mutated = original.to_vec();
                mutated[position] = replacement;
                let text = String::from_utf8(mutated).unwrap();
                match decode(VersionByte::AccountId, &text) {
                    Err(StrKeyError::InvalidChecksum) | Err(StrKeyError::InvalidVersion { .. }) => {}
                    other => panic!("flip at {position} to {replacement} gave {other:?}"),
                }
            }
        }
    }

    #[test]
    fn wrong_lengths_are_rejected() {
        assert!(!is_valid(VersionByte::AccountId, ""));
        assert!(!is_valid(VersionByte::AccountId, "GA"));
        assert!(!is_valid(VersionByte::AccountId, &ACCOUNT[..48]));

        // Valid framing and checksum around a 16-byte payload.
        let mut buf = vec![VersionByte::AccountId.byte()];
        buf.extend_from_slice(&[9u8; 16]);
        let checksum = crc16_xmodem(&buf);
        buf.extend_from_slice(&checksum.to_le_bytes());
        let short = base32_encode(&buf);
        assert_eq!(
            decode(VersionByte::AccountId, &short),
            Err(StrKeyError::InvalidLength {
                expected: 32,
                got: 16
            })
        );
    }

    #[test]
    fn hash_kinds_roundtrip() {
        let hash = [0xABu8; 32];
        assert_eq!(decode_pre_auth_tx(&encode_pre_auth_tx(&hash)).unwrap(), hash);
        assert_eq!(decode_sha256_hash(&encode_sha256_hash(&hash)).unwrap(), hash);
    }
}
