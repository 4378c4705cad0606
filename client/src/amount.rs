//! Decimal string <-> base unit conversion for token amounts.

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("empty amount")]
    Empty,
    #[error("invalid character in amount")]
    InvalidDigit,
    #[error("more than {0} fractional digits")]
    TooPrecise(u8),
    #[error("amount out of range")]
    Overflow,
}

/// Parse `"12.5"` with `decimals = 6` into `12_500_000`.
///
/// Accepts an optional single `.`; either side may be empty (`".5"`, `"3."`) but not both.
/// Surrounding whitespace is ignored. Signs, exponents and separators are rejected.
pub fn parse_amount(input: &str, decimals: u8) -> Result<u128, AmountError> {
    let input = input.trim();
    let (whole, fraction) = match input.split_once('.') {
        Some((w, f)) => (w, f),
        None => (input, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(AmountError::Empty);
    }
    if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(AmountError::InvalidDigit);
    }
    if fraction.len() > decimals as usize {
        return Err(AmountError::TooPrecise(decimals));
    }

    let scale = 10u128.checked_pow(decimals as u32).ok_or(AmountError::Overflow)?;
    let whole = digits(whole)?;
    let pad = 10u128
        .checked_pow((decimals as usize - fraction.len()) as u32)
        .ok_or(AmountError::Overflow)?;
    let fraction = digits(fraction)?.checked_mul(pad).ok_or(AmountError::Overflow)?;

    whole
        .checked_mul(scale)
        .and_then(|w| w.checked_add(fraction))
        .ok_or(AmountError::Overflow)
}

/// Inverse of [`parse_amount`] with trailing fractional zeros dropped.
pub fn format_amount(value: u128, decimals: u8) -> String {
    let Some(scale) = 10u128.checked_pow(decimals as u32) else {
        // every u128 is below the scale
        return format!("0.{value:0>width$}", width = decimals as usize)
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string();
    };
    let whole = value / scale;
    let fraction = value % scale;
    if fraction == 0 {
        return whole.to_string();
    }
    let fraction = format!("{fraction:0>width$}", width = decimals as usize);
    format!("{whole}.{}", fraction.trim_end_matches('0'))
}

fn digits(s: &str) -> Result<u128, AmountError> {
    s.bytes().try_fold(0u128, |acc, b| {
        acc.checked_mul(10)
            .and_then(|acc| acc.checked_add((b - b'0') as u128))
            .ok_or(AmountError::Overflow)
    })
}
