use sha3::{Digest, Keccak256};

pub fn keccak256(data: &[u8]) -> String {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Short id assigned to an analysis when the analyzer response does not
/// carry one: hash of the clause text plus a timestamp, truncated to 12
/// hex chars to stay URL-friendly.
pub fn analysis_id(clause_text: &str, stamp: &str) -> String {
    let digest = keccak256(format!("{}{}", clause_text, stamp).as_bytes());
    digest[..12].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_id_is_twelve_hex_chars() {
        let id = analysis_id("No claim shall be payable...", "2026-08-25T10:00:00Z");
        assert_eq!(id.len(), 12);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn analysis_id_depends_on_both_inputs() {
        let a = analysis_id("clause", "t1");
        let b = analysis_id("clause", "t2");
        let c = analysis_id("other clause", "t1");
        assert_ne!(a, b);
        assert_ne!(a, c);
    }
}
