//! CAS registry number validation

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // CAS RN: 2-7 digits, 2 digits, 1 check digit
    static ref CAS_PATTERN: Regex = Regex::new(r"^\d{2,7}-\d{2}-\d$").unwrap();
}

/// Trim and replace typographic dashes that creep in from copy/paste.
pub fn normalize_cas(cas: &str) -> String {
    cas.trim()
        .chars()
        .map(|c| match c {
            '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2212}' => '-',
            other => other,
        })
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// True when `cas` has the `NNNNNNN-NN-N` shape. Does not verify the check digit.
pub fn is_cas_format(cas: &str) -> bool {
    CAS_PATTERN.is_match(cas)
}

/// Verify the CAS check digit.
///
/// The check digit is the sum of each preceding digit multiplied by its
/// position counted from the right (starting at 1), modulo 10.
pub fn is_valid_cas_checksum(cas: &str) -> bool {
    if !is_cas_format(cas) {
        return false;
    }

    let digits: Vec<u32> = cas.chars().filter_map(|c| c.to_digit(10)).collect();
    let Some((check, body)) = digits.split_last() else {
        return false;
    };

    let sum: u32 = body
        .iter()
        .rev()
        .enumerate()
        .map(|(i, d)| (i as u32 + 1) * d)
        .sum();

    sum % 10 == *check
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cas_format() {
        assert!(is_cas_format("71-43-2"));
        assert!(is_cas_format("7732-18-5"));
        assert!(is_cas_format("1234567-89-0"));
        assert!(!is_cas_format("7-43-2"));
        assert!(!is_cas_format("71432"));
        assert!(!is_cas_format("12345678-12-3"));
        assert!(!is_cas_format("benzene"));
    }

    #[test]
    fn test_cas_checksum() {
        assert!(is_valid_cas_checksum("71-43-2")); // benzene
        assert!(is_valid_cas_checksum("7732-18-5")); // water
        assert!(is_valid_cas_checksum("64-17-5")); // ethanol
        assert!(!is_valid_cas_checksum("71-43-3"));
        assert!(!is_valid_cas_checksum("not-a-cas"));
    }

    #[test]
    fn test_normalize_cas() {
        assert_eq!(normalize_cas("  71\u{2013}43\u{2013}2 "), "71-43-2");
        assert_eq!(normalize_cas("64-17-5"), "64-17-5");
    }
}
