/// Rolling digest used for the demo password check and for deriving user
/// ids: `h = h * 31 + unit` over the UTF-16 units of the input, wrapping at
/// 32 bits, rendered in signed base-36.
///
/// This is NOT a password hash. A deployment handling real credentials must
/// substitute a salted key-derivation function; the stored format here is
/// fixed only so the demo data stays readable.
#[must_use]
pub fn rolling_digest(input: &str) -> String {
    let mut hash: i32 = 0;
    for unit in input.encode_utf16() {
        hash = (hash << 5).wrapping_sub(hash).wrapping_add(i32::from(unit));
    }
    to_base36(hash)
}

fn to_base36(value: i32) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if value == 0 {
        return "0".to_string();
    }

    let negative = value < 0;
    let mut magnitude = u64::from(value.unsigned_abs());
    let mut encoded = Vec::new();
    while magnitude > 0 {
        encoded.push(DIGITS[(magnitude % 36) as usize]);
        magnitude /= 36;
    }
    if negative {
        encoded.push(b'-');
    }
    encoded.reverse();
    String::from_utf8(encoded).expect("base36 digits are ASCII")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_values() {
        assert_eq!(rolling_digest(""), "0");
        // 'a' = 97 = 2*36 + 25
        assert_eq!(rolling_digest("a"), "2p");
        // 97*31 + 98 = 3105 = 2*1296 + 14*36 + 9
        assert_eq!(rolling_digest("ab"), "2e9");
    }

    #[test]
    fn deterministic_and_discriminating() {
        assert_eq!(rolling_digest("hunter2"), rolling_digest("hunter2"));
        assert_ne!(rolling_digest("hunter2"), rolling_digest("hunter3"));
    }

    #[test]
    fn long_inputs_wrap_instead_of_overflowing() {
        let digest = rolling_digest(&"correct horse battery staple".repeat(100));
        assert!(!digest.is_empty());
    }
}
