//! Normalized provider output

/// What every adapter returns: the generated text plus unified token
/// accounting, regardless of how the backend names its usage fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderResult {
    pub text: String,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl ProviderResult {
    /// Build a result from a backend that reports only split counts; the
    /// total is their sum, saturating on hostile counts.
    pub fn from_split_counts(
        text: String,
        prompt_tokens: u32,
        completion_tokens: u32,
    ) -> Self {
        Self {
            text,
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens.saturating_add(completion_tokens),
        }
    }

    /// Build a result from a backend that reports its own total; that value
    /// is trusted as-is.
    pub fn with_reported_total(
        text: String,
        prompt_tokens: u32,
        completion_tokens: u32,
        total_tokens: u32,
    ) -> Self {
        Self {
            text,
            prompt_tokens,
            completion_tokens,
            total_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_counts_sum_to_total() {
        let result = ProviderResult::from_split_counts("hi".to_string(), 12, 30);
        assert_eq!(result.total_tokens, 42);
    }

    #[test]
    fn test_split_counts_saturate_instead_of_overflowing() {
        let result = ProviderResult::from_split_counts("hi".to_string(), u32::MAX, 7);
        assert_eq!(result.total_tokens, u32::MAX);
    }

    #[test]
    fn test_reported_total_trusted() {
        // Some backends count extra units (cached or reasoning tokens) into
        // the total; whatever they report stands.
        let result = ProviderResult::with_reported_total("hi".to_string(), 10, 20, 35);
        assert_eq!(result.total_tokens, 35);
    }
}
