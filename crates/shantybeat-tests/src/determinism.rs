//! Run-to-run determinism checks.

/// Outcome of running a generator several times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether every run produced the same bytes.
    pub is_deterministic: bool,
    /// Number of runs performed.
    pub runs: usize,
    /// BLAKE3 hash of the first run.
    pub hash: String,
    /// First run whose output differed, if any.
    pub first_mismatch: Option<usize>,
}

/// BLAKE3 hex digest of `data`.
pub fn compute_hash(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// Calls `generate` `runs` times and compares the hashes of the outputs.
pub fn verify_determinism<F, T>(mut generate: F, runs: usize) -> DeterminismResult
where
    F: FnMut() -> T,
    T: AsRef<[u8]>,
{
    assert!(runs >= 2, "determinism needs at least two runs");
    let hash = compute_hash(generate().as_ref());
    let first_mismatch = (1..runs).find(|_| compute_hash(generate().as_ref()) != hash);
    DeterminismResult {
        is_deterministic: first_mismatch.is_none(),
        runs,
        hash,
        first_mismatch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_output_is_deterministic() {
        let result = verify_determinism(|| vec![1u8, 2, 3], 3);
        assert!(result.is_deterministic);
        assert_eq!(result.hash, compute_hash(&[1, 2, 3]));
    }

    #[test]
    fn test_changing_output_is_caught() {
        let mut n = 0u8;
        let result = verify_determinism(
            || {
                n += 1;
                vec![n]
            },
            3,
        );
        assert!(!result.is_deterministic);
        assert_eq!(result.first_mismatch, Some(1));
    }
}
