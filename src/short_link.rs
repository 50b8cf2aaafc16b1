//! Short codes for recipe links, derived from the numeric recipe id.

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

pub fn encode(id: i64) -> String {
    let mut n = id.unsigned_abs();
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(ALPHABET[(n % 36) as usize]);
        n /= 36;
    }
    digits.iter().rev().map(|&b| b as char).collect()
}

pub fn decode(code: &str) -> Option<i64> {
    if code.is_empty() || !code.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()) {
        return None;
    }
    i64::from_str_radix(code, 36).ok()
}

pub fn absolute_url(base_url: &str, code: &str) -> String {
    format!("{}/s/{}", base_url.trim_end_matches('/'), code)
}
