//! TRX/sun conversion and address shape checks

/// Sun per TRX (1 TRX = 1,000,000 sun)
pub const SUN_PER_TRX: u64 = 1_000_000;

/// Base58 length of a Tron mainnet address
const ADDRESS_LEN: usize = 34;

/// Convert a TRX amount to sun
///
/// Returns `None` for negative, non-finite, or overflowing amounts.
/// Fractional sun is rounded to the nearest whole unit.
pub fn to_sun(trx: f64) -> Option<u64> {
    if !trx.is_finite() || trx < 0.0 {
        return None;
    }
    let sun = (trx * SUN_PER_TRX as f64).round();
    if sun > u64::MAX as f64 {
        return None;
    }
    Some(sun as u64)
}

/// Convert a sun amount to TRX
pub fn from_sun(sun: u64) -> f64 {
    sun as f64 / SUN_PER_TRX as f64
}

/// Syntactic check for a Tron base58 mainnet address
///
/// Verifies the `T` prefix, length, and base58 alphabet only. Checksum
/// validation is the wallet capability's job.
pub fn is_address_like(address: &str) -> bool {
    if address.len() != ADDRESS_LEN || !address.starts_with('T') {
        return false;
    }
    address
        .chars()
        .all(|c| c.is_ascii_alphanumeric() && !matches!(c, '0' | 'O' | 'I' | 'l'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trx_to_sun_conversion() {
        assert_eq!(to_sun(1.0), Some(1_000_000));
        assert_eq!(to_sun(0.5), Some(500_000));
        assert_eq!(to_sun(0.0), Some(0));
        assert_eq!(to_sun(12.345678), Some(12_345_678));
    }

    #[test]
    fn invalid_trx_amounts_are_rejected() {
        assert_eq!(to_sun(-1.0), None);
        assert_eq!(to_sun(f64::NAN), None);
        assert_eq!(to_sun(f64::INFINITY), None);
    }

    #[test]
    fn sun_to_trx_conversion() {
        assert_eq!(from_sun(1_000_000), 1.0);
        assert_eq!(from_sun(500_000), 0.5);
        assert_eq!(from_sun(0), 0.0);
    }

    #[test]
    fn conversions_invert_each_other() {
        let sun = 123_456_789u64;
        assert_eq!(to_sun(from_sun(sun)), Some(sun));
    }

    #[test]
    fn address_shape_check() {
        assert!(is_address_like("TJRabPrwbZy45sbavfcjinPJC18kjpRTv8"));
        // wrong prefix
        assert!(!is_address_like("AJRabPrwbZy45sbavfcjinPJC18kjpRTv8"));
        // too short
        assert!(!is_address_like("TJRabPrwbZy45sbavfcjin"));
        // non-base58 character
        assert!(!is_address_like("TJRabPrwbZy45sbavfcjinPJC18kjpRT0O"));
        assert!(!is_address_like(""));
    }
}
