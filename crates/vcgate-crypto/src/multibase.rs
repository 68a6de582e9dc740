//! # Base58BTC Multibase Codec
//!
//! Decodes the multibase strings carried in credential proofs
//! (`proofValue`) and key material (`did:key`, registry entries).
//!
//! Only the Base58BTC variant is supported: multibase prefix `z`, Bitcoin
//! alphabet (no `0`, `O`, `I`, `l`). Leading `1` symbols encode leading zero
//! bytes, so `decode(encode(x)) == x` holds byte-for-byte for every input.
//!
//! The only multicodec recognized is the Ed25519 public key code `0xed`,
//! varint-encoded as `[0xed, 0x01]`.

use multibase::Base;
use vcgate_core::{CryptoError, DecodeError};

/// The Bitcoin Base58 alphabet.
pub const BASE58_ALPHABET: &[u8; 58] =
    b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Multibase prefix for Base58BTC.
pub const BASE58BTC_PREFIX: char = 'z';

/// Varint-encoded multicodec prefix for an Ed25519 public key.
pub const ED25519_PUB_MULTICODEC: [u8; 2] = [0xed, 0x01];

/// Decode raw Base58 text (no multibase prefix).
///
/// # Errors
///
/// Returns `DecodeError::InvalidCharacter` for any symbol outside the
/// alphabet; `position` counts characters from the start of `s`.
pub fn decode_base58(s: &str) -> Result<Vec<u8>, DecodeError> {
    if let Some((position, character)) = s
        .chars()
        .enumerate()
        .find(|(_, c)| !c.is_ascii() || !BASE58_ALPHABET.contains(&(*c as u8)))
    {
        return Err(DecodeError::InvalidCharacter {
            character,
            position,
        });
    }
    if s.is_empty() {
        return Ok(Vec::new());
    }
    Base::Base58Btc
        .decode(s)
        .map_err(|e| DecodeError::Malformed(e.to_string()))
}

/// Encode bytes as raw Base58 text (no multibase prefix).
pub fn encode_base58(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return String::new();
    }
    Base::Base58Btc.encode(bytes)
}

/// Decode a multibase string. Only the `z` (Base58BTC) prefix is accepted.
///
/// # Errors
///
/// - `DecodeError::Empty` for an empty string.
/// - `DecodeError::UnsupportedPrefix` for any other prefix character.
/// - `DecodeError::InvalidCharacter` for symbols outside the alphabet.
pub fn decode_multibase(s: &str) -> Result<Vec<u8>, DecodeError> {
    let mut chars = s.chars();
    match chars.next() {
        None => Err(DecodeError::Empty),
        Some(BASE58BTC_PREFIX) => decode_base58(chars.as_str()),
        Some(other) => Err(DecodeError::UnsupportedPrefix(other)),
    }
}

/// Encode bytes as a `z`-prefixed Base58BTC multibase string.
pub fn encode_multibase(bytes: &[u8]) -> String {
    multibase::encode(Base::Base58Btc, bytes)
}

/// Encode a raw Ed25519 public key as a multikey (`z6Mk…`).
pub fn encode_ed25519_multikey(key: &[u8; 32]) -> String {
    let mut prefixed = Vec::with_capacity(ED25519_PUB_MULTICODEC.len() + key.len());
    prefixed.extend_from_slice(&ED25519_PUB_MULTICODEC);
    prefixed.extend_from_slice(key);
    encode_multibase(&prefixed)
}

/// Decode an Ed25519 multikey back to the raw 32-byte public key.
///
/// # Errors
///
/// Returns `CryptoError::Decode` for bad multibase text or a foreign
/// multicodec, and `CryptoError::InvalidLength` when the key is not 32 bytes.
pub fn decode_ed25519_multikey(s: &str) -> Result<[u8; 32], CryptoError> {
    let bytes = decode_multibase(s)?;
    let key = bytes
        .strip_prefix(&ED25519_PUB_MULTICODEC[..])
        .ok_or(DecodeError::UnsupportedMulticodec)?;
    <[u8; 32]>::try_from(key).map_err(|_| CryptoError::InvalidLength {
        what: "public key",
        expected: 32,
        actual: key.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vectors() {
        assert_eq!(encode_base58(b"Hello World!"), "2NEpo7TZRRrLZSi2U");
        assert_eq!(
            encode_base58(b"The quick brown fox jumps over the lazy dog."),
            "USm3fpXnKG5EUBx2ndxBDMPVciP5hGey2Jh4NDv6gmeo1LkMeiKrLJUUBk6Z"
        );
        assert_eq!(
            encode_base58(&[0x00, 0x00, 0x28, 0x7f, 0xb4, 0xcd]),
            "111233QC4"
        );
        assert_eq!(decode_base58("2NEpo7TZRRrLZSi2U").unwrap(), b"Hello World!");
        assert_eq!(
            decode_base58("111233QC4").unwrap(),
            vec![0x00, 0x00, 0x28, 0x7f, 0xb4, 0xcd]
        );
    }

    #[test]
    fn agrees_with_generic_multibase_decoder() {
        let text = encode_multibase(&[0, 0xed, 0x01, 0x42, 0xff]);
        let (base, bytes) = multibase::decode(&text).unwrap();
        assert_eq!(base, Base::Base58Btc);
        assert_eq!(decode_multibase(&text).unwrap(), bytes);
    }

    #[test]
    fn empty_and_all_zero_inputs() {
        assert_eq!(encode_base58(&[]), "");
        assert_eq!(decode_base58("").unwrap(), Vec::<u8>::new());
        assert_eq!(encode_base58(&[0, 0, 0]), "111");
        assert_eq!(decode_base58("111").unwrap(), vec![0, 0, 0]);
    }

    #[test]
    fn multibase_prefix_required() {
        assert_eq!(decode_multibase("z2NEpo7TZRRrLZSi2U").unwrap(), b"Hello World!");
        assert_eq!(decode_multibase(""), Err(DecodeError::Empty));
        assert_eq!(
            decode_multibase("f48656c6c6f"),
            Err(DecodeError::UnsupportedPrefix('f'))
        );
        assert_eq!(
            decode_multibase("Z2NEpo7TZRRrLZSi2U"),
            Err(DecodeError::UnsupportedPrefix('Z'))
        );
        assert_eq!(encode_multibase(b"Hello World!"), "z2NEpo7TZRRrLZSi2U");
    }

    #[test]
    fn excluded_symbols_rejected() {
        for (input, bad) in [("z0abc", '0'), ("zabOc", 'O'), ("zIab", 'I'), ("zabl", 'l')] {
            match decode_multibase(input) {
                Err(DecodeError::InvalidCharacter { character, .. }) => assert_eq!(character, bad),
                other => panic!("{input}: expected InvalidCharacter, got {other:?}"),
            }
        }
    }

    #[test]
    fn invalid_character_position_and_non_ascii() {
        assert_eq!(
            decode_base58("abc+d"),
            Err(DecodeError::InvalidCharacter {
                character: '+',
                position: 3
            })
        );
        assert_eq!(
            decode_base58("ab\u{00e9}"),
            Err(DecodeError::InvalidCharacter {
                character: '\u{00e9}',
                position: 2
            })
        );
    }

    #[test]
    fn did_key_example_decodes_to_ed25519_key() {
        let key = decode_ed25519_multikey("z6MkhaXgBZDvotDkL5257faiztiGiC2QtKLGpbnnEGta2doK").unwrap();
        assert_eq!(
            encode_ed25519_multikey(&key),
            "z6MkhaXgBZDvotDkL5257faiztiGiC2QtKLGpbnnEGta2doK"
        );
    }

    #[test]
    fn multikey_rejects_foreign_codec_and_length() {
        let foreign = encode_multibase(&[0xe7, 0x01, 1, 2, 3]);
        assert!(matches!(
            decode_ed25519_multikey(&foreign),
            Err(CryptoError::Decode(DecodeError::UnsupportedMulticodec))
        ));

        let short = encode_multibase(&[0xed, 0x01, 1, 2, 3]);
        assert!(matches!(
            decode_ed25519_multikey(&short),
            Err(CryptoError::InvalidLength { actual: 3, .. })
        ));
    }
}
