//! Expiry for the operator grant a holder gives the staking account before staking.

/// One day.
pub const DEFAULT_OPERATOR_DURATION: u64 = 86_400;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum AuthorizeError {
    /// A grant must end strictly after `now`, so the duration can't be zero.
    #[error("operator grant duration must be positive")]
    ZeroDuration,
    #[error("operator expiry overflows")]
    Overflow,
}

/// `until` argument for `set_operator`: `now + duration` in unix seconds.
pub fn operator_expiry(now: u64, duration: u64) -> Result<u64, AuthorizeError> {
    if duration == 0 {
        return Err(AuthorizeError::ZeroDuration);
    }
    now.checked_add(duration).ok_or(AuthorizeError::Overflow)
}
