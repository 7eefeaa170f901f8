//! Byte ↔ codon-text codecs.
//!
//! The assembler and builder only see the [`CodonCodec`] trait, so a
//! different alphabet mapping can be swapped in as long as it never emits the
//! terminator codon and keeps `decode(encode(b)) == b`.

use super::{Codon, CODON_WIDTH};
use crate::utilities::errors::CodecError;

/// Converts raw bytes to genome text and back.
pub trait CodonCodec: Send + Sync {
    /// Encode bytes as codon text. Must never produce the terminator codon.
    fn encode(&self, bytes: &[u8]) -> String;

    /// Decode codon text produced by [`CodonCodec::encode`].
    fn decode(&self, text: &str) -> Result<Vec<u8>, CodecError>;
}

/// Two codons per byte, one per nibble, drawn from the sixteen lowest codons
/// (`AAA` through `ATT`).
#[derive(Debug, Clone, Copy, Default)]
pub struct NibbleCodec;

impl NibbleCodec {
    const CODONS_PER_BYTE: usize = 2;

    pub fn new() -> Self {
        Self
    }

    fn nibble(position: usize, symbols: &[u8]) -> Result<u8, CodecError> {
        let unknown = || CodecError::UnknownCodon {
            position,
            codon: String::from_utf8_lossy(symbols).into_owned(),
        };
        let codon = Codon::from_symbols(symbols).ok_or_else(unknown)?;
        match codon.index() {
            n @ 0..=15 => Ok(n),
            _ => Err(unknown()),
        }
    }
}

impl CodonCodec for NibbleCodec {
    fn encode(&self, bytes: &[u8]) -> String {
        let mut text = String::with_capacity(bytes.len() * Self::CODONS_PER_BYTE * CODON_WIDTH);
        for byte in bytes {
            text.push_str(Codon::from_index(byte >> 4).as_str());
            text.push_str(Codon::from_index(byte & 0x0F).as_str());
        }
        text
    }

    fn decode(&self, text: &str) -> Result<Vec<u8>, CodecError> {
        let symbols = text.as_bytes();
        let stride = Self::CODONS_PER_BYTE * CODON_WIDTH;
        if symbols.len() % stride != 0 {
            return Err(CodecError::InvalidLength(symbols.len()));
        }
        symbols
            .chunks(stride)
            .enumerate()
            .map(|(i, chunk)| {
                let at = i * Self::CODONS_PER_BYTE;
                let high = Self::nibble(at, &chunk[..CODON_WIDTH])?;
                let low = Self::nibble(at + 1, &chunk[CODON_WIDTH..])?;
                Ok((high << 4) | low)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genetics::TERMINATOR_CODON;

    #[test]
    fn test_every_byte_roundtrips() {
        let codec = NibbleCodec::new();
        let bytes: Vec<u8> = (0..=255u8).collect();
        let text = codec.encode(&bytes);
        assert_eq!(text.len(), 256 * 6);
        assert_eq!(codec.decode(&text).unwrap(), bytes);
    }

    #[test]
    fn test_encoding_never_contains_terminator_codon() {
        let codec = NibbleCodec::new();
        let bytes: Vec<u8> = (0..=255u8).collect();
        let text = codec.encode(&bytes);
        assert!(text
            .as_bytes()
            .chunks(CODON_WIDTH)
            .all(|c| c != TERMINATOR_CODON.as_str().as_bytes()));
    }

    #[test]
    fn test_known_encoding() {
        // 0x4A -> nibbles 4 and 10 -> ACA, AGG
        assert_eq!(NibbleCodec.encode(&[0x4A]), "ACAAGG");
        assert_eq!(NibbleCodec.decode("ACAAGG").unwrap(), vec![0x4A]);
        assert!(NibbleCodec.decode("").unwrap().is_empty());
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        assert_eq!(NibbleCodec.decode("AAAA"), Err(CodecError::InvalidLength(4)));
        assert_eq!(
            NibbleCodec.decode("AAAGAA"),
            Err(CodecError::UnknownCodon { position: 1, codon: "GAA".into() })
        );
    }
}
