pub mod deadline;
pub mod slippage;
pub mod sqrt_price;
pub mod tick_range;

use ethers::types::U256;
use num_bigint::BigUint;

// --------------------------------- Helpers ---------------------------------

pub fn u256_to_biguint(u: U256) -> BigUint {
    let mut buf = [0u8; 32];
    u.to_big_endian(&mut buf);
    BigUint::from_bytes_be(&buf)
}

/// None when the value needs more than 256 bits.
pub fn biguint_to_u256(b: &BigUint) -> Option<U256> {
    if b.bits() > 256 {
        return None;
    }
    Some(U256::from_big_endian(&b.to_bytes_be()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u256_biguint_conversions() {
        let values = vec![
            U256::zero(),
            U256::one(),
            U256::from(u64::MAX),
            U256::from_dec_str("79228162514264337593543950336").unwrap(),
            U256::MAX,
        ];
        for v in values {
            let b = u256_to_biguint(v);
            assert_eq!(b.to_string(), v.to_string());
            assert_eq!(biguint_to_u256(&b), Some(v));
        }
    }

    #[test]
    fn test_biguint_wider_than_256_bits() {
        let wide = BigUint::from(1u8) << 256u32;
        assert_eq!(biguint_to_u256(&wide), None);
    }
}
