//! 256-bit unsigned integer.
//!
//! Carries token ids and the widened product of two WAD values, which can
//! exceed `u128` before the final division by `WAD`.
use uint::construct_uint;

construct_uint! {
    pub struct U256(4);
}

impl U256 {
    /// Renders the value as a `0x`-prefixed, 64-digit hex string.
    pub fn to_hex_string(&self) -> String {
        let mut bytes = [0u8; 32];
        self.to_big_endian(&mut bytes);
        format!("0x{}", hex::encode(bytes))
    }

    /// Big-endian 32-byte word, the layout ABI call data uses.
    pub fn to_be_word(&self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        self.to_big_endian(&mut bytes);
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_string() {
        let v = U256::from(0xabcdu64);
        let s = v.to_hex_string();
        assert_eq!(s.len(), 66);
        assert!(s.ends_with("abcd"));
        assert!(s.starts_with("0x0000"));
    }

    #[test]
    fn test_be_word() {
        let word = (U256::from(1u64) << 255).to_be_word();
        assert_eq!(word[0], 0x80);
        assert!(word[1..].iter().all(|b| *b == 0));
    }
}
