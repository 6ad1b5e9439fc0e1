const BYTES_PER_TOKEN: usize = 4;

/// Trait for estimating token counts in text.
///
/// The collector charges every record against the global budget through
/// this trait, so alternative cost models can be plugged in without
/// touching the budgeting logic.
pub trait TokenEstimator: Send + Sync {
    /// Estimates the number of tokens in the given text.
    fn estimate(&self, text: &str) -> usize;
}

/// Byte-length tokenizer.
///
/// Charges one token per started group of four bytes: `ceil(len / 4)`.
/// Empty text costs nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleTokenizer;

impl TokenEstimator for SimpleTokenizer {
    fn estimate(&self, text: &str) -> usize {
        text.len().div_ceil(BYTES_PER_TOKEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_tokenizer_empty() {
        assert_eq!(SimpleTokenizer.estimate(""), 0);
    }

    #[test]
    fn test_simple_tokenizer_rounds_up() {
        let tokenizer = SimpleTokenizer;
        assert_eq!(tokenizer.estimate("a"), 1);
        assert_eq!(tokenizer.estimate("abcd"), 1);
        assert_eq!(tokenizer.estimate("abcde"), 2);
        assert_eq!(tokenizer.estimate("hello world"), 3);
    }

    #[test]
    fn test_simple_tokenizer_counts_bytes_not_chars() {
        // "é" is two bytes in UTF-8
        assert_eq!(SimpleTokenizer.estimate("éé"), 1);
        assert_eq!(SimpleTokenizer.estimate("ééé"), 2);
    }

    #[test]
    fn test_tokenizer_large_input() {
        let huge_text = "a".repeat(1_000_000);
        assert_eq!(SimpleTokenizer.estimate(&huge_text), 250_000);
    }
}
