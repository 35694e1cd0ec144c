use crate::constants::reconnect::MAX_RETRY_DELAY_MS;

/// Calculates the retry delay in milliseconds for a given attempt number.
///
/// Uses exponential backoff:
/// - Base delay: 100ms
/// - Multiplier: 2^(attempt - 1)
/// - Capped at `MAX_RETRY_DELAY_MS`
///
/// # Arguments
/// * `attempt` - The current retry attempt number (1-based)
///
/// # Returns
/// Delay in milliseconds
pub fn calculate_retry_delay(attempt: u32) -> u64 {
    if attempt == 0 {
        return 0;
    }

    // 100 * 2^0 = 100
    // 100 * 2^8 = 25600, attempt 10 onward holds at the cap
    let attempt_idx = attempt.saturating_sub(1);
    let shift = attempt_idx.min(30); // Prevent overflow of u64 shift

    let base_delay = 100u64.saturating_mul(1 << shift);

    base_delay.min(MAX_RETRY_DELAY_MS)
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_calculation() {
        // Attempt 1: 100ms * 2^0 = 100
        assert_eq!(calculate_retry_delay(1), 100);

        // Attempt 2: 100ms * 2^1 = 200
        assert_eq!(calculate_retry_delay(2), 200);

        // Attempt 3: 100ms * 2^2 = 400
        assert_eq!(calculate_retry_delay(3), 400);

        // Attempt 9: 100ms * 2^8 = 25600
        assert_eq!(calculate_retry_delay(9), 25600);
    }

    #[test]
    fn test_backoff_capped() {
        assert_eq!(calculate_retry_delay(10), MAX_RETRY_DELAY_MS);
        assert_eq!(calculate_retry_delay(50), MAX_RETRY_DELAY_MS);
    }

    #[test]
    fn test_safety_overflow() {
        // Should not panic on high numbers
        let delay = calculate_retry_delay(u32::MAX);
        assert_eq!(delay, MAX_RETRY_DELAY_MS);
    }
}
