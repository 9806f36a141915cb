//! Amount normalization
//!
//! Turns the decimal string an agent supplies into the integer quantities a
//! deposit contract expects. Everything here is exact: amounts are parsed
//! with `rust_decimal` and scaled in `U256`, never through floating point.

use crate::error::DepositError;
use alloy::primitives::U256;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::time::Duration;

/// Decimals of the native chain asset (ETH).
pub const ETH_DECIMALS: u32 = 18;

const BPS_DENOMINATOR: u32 = 10_000;

/// How a protocol derives the minimum output it will accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinOutPolicy {
    /// The contract takes no minimum-out argument.
    Omitted,
    /// Minimum out equals the atomic deposit amount (no slippage protection).
    Exact,
    /// Atomic amount discounted by a fixed tolerance, in basis points.
    Slippage { tolerance_bps: u32 },
}

impl MinOutPolicy {
    pub fn apply(&self, atomic: U256) -> Option<U256> {
        match self {
            MinOutPolicy::Omitted => None,
            MinOutPolicy::Exact => Some(atomic),
            MinOutPolicy::Slippage { tolerance_bps } => Some(apply_slippage(atomic, *tolerance_bps)),
        }
    }
}

/// Quantities derived from one deposit request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDeposit {
    /// The amount as parsed, in whole ETH.
    pub amount: Decimal,
    /// `floor(amount * 10^18)`
    pub atomic: U256,
    pub min_out: Option<U256>,
    /// Unix seconds after which the contract rejects the call.
    pub deadline: Option<u64>,
}

/// Most integer digits a `Decimal` can carry.
const MAX_WHOLE_DIGITS: i64 = 29;

/// An amount as written, with the decimal point already placed.
///
/// Fraction digits past `ETH_DECIMALS` are dropped here, before any
/// `Decimal` exists, so nothing downstream can round them up.
#[derive(Debug, PartialEq, Eq)]
struct AmountLiteral {
    negative: bool,
    /// Any non-zero digit in the input, including truncated ones
    nonzero: bool,
    whole: String,
    fraction: String,
}

impl AmountLiteral {
    fn parse(text: &str) -> Result<Self, DepositError> {
        let invalid =
            || DepositError::InvalidAmount(format!("'{}' is not a decimal number", text));

        let (mantissa, exponent) = match text.split_once(['e', 'E']) {
            Some((m, e)) => (m, e.parse::<i64>().map_err(|_| invalid())?),
            None => (text, 0),
        };
        let (negative, unsigned) = match mantissa.as_bytes().first() {
            Some(b'-') => (true, &mantissa[1..]),
            Some(b'+') => (false, &mantissa[1..]),
            _ => (false, mantissa),
        };
        let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if (int_part.is_empty() && frac_part.is_empty())
            || !is_digits(int_part)
            || !is_digits(frac_part)
        {
            return Err(invalid());
        }

        let all_digits = format!("{}{}", int_part, frac_part);
        let digits = all_digits.trim_start_matches('0');
        let leading = (all_digits.len() - digits.len()) as i64;
        if digits.is_empty() {
            return Ok(Self {
                negative,
                nonzero: false,
                whole: "0".to_string(),
                fraction: String::new(),
            });
        }

        // Position of the decimal point within `digits`
        let point = (int_part.len() as i64)
            .saturating_add(exponent)
            .saturating_sub(leading);
        if point > MAX_WHOLE_DIGITS && negative {
            return Err(DepositError::InvalidAmount(format!(
                "'{}' is not greater than 0",
                text
            )));
        }
        if point > MAX_WHOLE_DIGITS {
            return Err(DepositError::AmountOutOfRange(format!(
                "'{}' exceeds the largest supported amount",
                text
            )));
        }

        let len = digits.len() as i64;
        let (whole, mut fraction) = if point >= len {
            (format!("{}{}", digits, "0".repeat((point - len) as usize)), String::new())
        } else if point > 0 {
            let (w, f) = digits.split_at(point as usize);
            (w.to_string(), f.to_string())
        } else if point <= -(ETH_DECIMALS as i64) {
            ("0".to_string(), String::new())
        } else {
            ("0".to_string(), format!("{}{}", "0".repeat((-point) as usize), digits))
        };
        fraction.truncate(ETH_DECIMALS as usize);
        let fraction = fraction.trim_end_matches('0').to_string();

        Ok(Self {
            negative,
            nonzero: true,
            whole,
            fraction,
        })
    }

    fn is_positive(&self) -> bool {
        self.nonzero && !self.negative
    }

    /// Exact conversion; an amount `Decimal` cannot hold is an error, never rounded.
    fn to_decimal(&self, text: &str) -> Result<Decimal, DepositError> {
        let sign = if self.negative && self.nonzero { "-" } else { "" };
        let plain = if self.fraction.is_empty() {
            format!("{}{}", sign, self.whole)
        } else {
            format!("{}{}.{}", sign, self.whole, self.fraction)
        };
        Decimal::from_str_exact(&plain).map_err(|e| {
            DepositError::AmountOutOfRange(format!("'{}' cannot be represented exactly: {}", text, e))
        })
    }
}

/// Parse a decimal amount in plain or scientific notation.
///
/// Digits past `ETH_DECIMALS` fractional places are truncated.
pub fn parse_amount(raw: &str) -> Result<Decimal, DepositError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DepositError::InvalidAmount("empty amount".to_string()));
    }
    AmountLiteral::parse(trimmed)?.to_decimal(trimmed)
}

/// Parse an amount and require it to be strictly positive.
///
/// Positivity is judged on the digits as written, so an amount smaller than
/// one wei is accepted even though it truncates to zero.
pub fn parse_positive_amount(raw: &str) -> Result<Decimal, DepositError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DepositError::InvalidAmount("empty amount".to_string()));
    }
    let literal = AmountLiteral::parse(trimmed)?;
    if !literal.is_positive() {
        return Err(DepositError::InvalidAmount(format!(
            "'{}' is not greater than 0",
            trimmed
        )));
    }
    literal.to_decimal(trimmed)
}

/// Scale a decimal amount to atomic units, truncating any digits past
/// `decimals`.
pub fn to_atomic(amount: Decimal, decimals: u32) -> Result<U256, DepositError> {
    if amount < Decimal::ZERO {
        return Err(DepositError::InvalidAmount(format!(
            "{} is negative",
            amount
        )));
    }

    let mantissa = u128::try_from(amount.mantissa())
        .map_err(|_| DepositError::AmountOutOfRange(format!("{} is out of range", amount)))?;

    let ten = U256::from(10u8);
    let scaled = U256::from(mantissa) * ten.pow(U256::from(decimals));
    Ok(scaled / ten.pow(U256::from(amount.scale())))
}

/// `floor(atomic * (1 - tolerance))` with the tolerance in basis points.
pub fn apply_slippage(atomic: U256, tolerance_bps: u32) -> U256 {
    let keep = BPS_DENOMINATOR.saturating_sub(tolerance_bps);
    atomic * U256::from(keep) / U256::from(BPS_DENOMINATOR)
}

/// `now + window` in Unix seconds.
pub fn deadline_after(now: DateTime<Utc>, window: Duration) -> u64 {
    let now_secs = u64::try_from(now.timestamp()).unwrap_or(0);
    now_secs.saturating_add(window.as_secs())
}

/// Run the full normalization for one request.
pub fn normalize(
    raw: &str,
    min_out: MinOutPolicy,
    deadline_window: Option<Duration>,
    now: DateTime<Utc>,
) -> Result<NormalizedDeposit, DepositError> {
    let amount = parse_positive_amount(raw)?;
    let atomic = to_atomic(amount, ETH_DECIMALS)?;

    Ok(NormalizedDeposit {
        amount,
        atomic,
        min_out: min_out.apply(atomic),
        deadline: deadline_window.map(|window| deadline_after(now, window)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn atomic(raw: &str) -> String {
        to_atomic(parse_amount(raw).unwrap(), ETH_DECIMALS)
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_to_atomic() {
        assert_eq!(atomic("0.01"), "10000000000000000");
        assert_eq!(atomic("1"), "1000000000000000000");
        assert_eq!(atomic("1.5"), "1500000000000000000");
        assert_eq!(atomic("0.000000000000000001"), "1");
        assert_eq!(atomic("1e-3"), "1000000000000000");
        assert_eq!(atomic(" 2 "), "2000000000000000000");
    }

    #[test]
    fn test_to_atomic_truncates_past_18_decimals() {
        assert_eq!(atomic("0.0000000000000000019"), "1");
        assert_eq!(atomic("1.9999999999999999999"), "1999999999999999999");
        assert_eq!(atomic("0.0000000000000000009"), "0");
    }

    #[test]
    fn test_to_atomic_other_decimals() {
        let amount = parse_amount("1.5").unwrap();
        assert_eq!(to_atomic(amount, 9).unwrap(), U256::from(1_500_000_000u64));
        assert_eq!(to_atomic(amount, 0).unwrap(), U256::from(1u8));
    }

    #[test]
    fn test_to_atomic_has_no_decimal_point() {
        for raw in ["0.01", "3.14159", "1e2", "123456.789"] {
            let s = atomic(raw);
            assert!(s.chars().all(|c| c.is_ascii_digit()), "{raw} -> {s}");
        }
    }

    #[test]
    fn test_rejects_non_positive() {
        for raw in ["0", "0.0", "-5", "-0.01", "", "   ", "abc", "1.2.3", "0x10"] {
            let err = parse_positive_amount(raw).unwrap_err();
            assert!(matches!(err, DepositError::InvalidAmount(_)), "{raw}: {err:?}");
        }
    }

    #[test]
    fn test_long_inputs_truncate_instead_of_rounding() {
        let amount = parse_positive_amount("0.99999999999999999999999999999").unwrap();
        assert_eq!(amount.to_string(), "0.999999999999999999");
        assert_eq!(
            to_atomic(amount, ETH_DECIMALS).unwrap().to_string(),
            "999999999999999999"
        );

        assert_eq!(atomic("1.99999999999999999999999999999999e0"), "1999999999999999999");
        assert_eq!(atomic("9999999999.999999999999999999999"), "9999999999999999999999999999");
    }

    #[test]
    fn test_sub_wei_amounts_are_positive() {
        let amount = parse_positive_amount("0.000000000000000000000000000001").unwrap();
        assert_eq!(to_atomic(amount, ETH_DECIMALS).unwrap(), U256::ZERO);

        assert!(parse_positive_amount("1e-40").is_ok());
        assert!(parse_positive_amount("1e-9223372036854775808").is_ok());
        assert!(parse_positive_amount("-0.000000000000000000000000000001").is_err());
        assert!(parse_positive_amount("0.000000000000000000000000000000").is_err());
    }

    #[test]
    fn test_scientific_notation() {
        assert_eq!(atomic("1.5e1"), "15000000000000000000");
        assert_eq!(atomic("25E-2"), "250000000000000000");
        assert_eq!(atomic("+1"), "1000000000000000000");
        assert_eq!(atomic(".5"), "500000000000000000");
        for raw in ["e5", "1e", "1e+", "--1", ".", "1_000"] {
            assert!(parse_amount(raw).is_err(), "{raw}");
        }
    }

    #[test]
    fn test_out_of_range_is_distinct() {
        for raw in ["1e30", "100000000000000000000000000000", "1e9223372036854775807"] {
            let err = parse_positive_amount(raw).unwrap_err();
            assert!(matches!(err, DepositError::AmountOutOfRange(_)), "{raw}: {err:?}");
        }
        assert!(matches!(
            parse_positive_amount("-1e30"),
            Err(DepositError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_slippage() {
        let atomic = U256::from(10_000_000_000_000_000u64);
        assert_eq!(
            apply_slippage(atomic, 1_000),
            U256::from(9_000_000_000_000_000u64)
        );
        assert_eq!(apply_slippage(atomic, 0), atomic);
        assert_eq!(apply_slippage(atomic, 20_000), U256::ZERO);

        // 7 * 0.9 = 6.3 -> 6
        assert_eq!(apply_slippage(U256::from(7u8), 1_000), U256::from(6u8));
    }

    #[test]
    fn test_min_out_never_exceeds_atomic() {
        for raw in ["0.01", "1", "0.000000000000000003", "12345.6789"] {
            let atomic = to_atomic(parse_amount(raw).unwrap(), ETH_DECIMALS).unwrap();
            for bps in [0, 1, 50, 1_000, 9_999, 10_000] {
                assert!(apply_slippage(atomic, bps) <= atomic);
            }
        }
    }

    #[test]
    fn test_min_out_policy() {
        let atomic = U256::from(100u8);
        assert_eq!(MinOutPolicy::Omitted.apply(atomic), None);
        assert_eq!(MinOutPolicy::Exact.apply(atomic), Some(atomic));
        assert_eq!(
            MinOutPolicy::Slippage { tolerance_bps: 1_000 }.apply(atomic),
            Some(U256::from(90u8))
        );
    }

    #[test]
    fn test_normalize() {
        let now = Utc.with_ymd_and_hms(2024, 11, 20, 12, 0, 0).unwrap();
        let normalized = normalize(
            "0.01",
            MinOutPolicy::Slippage { tolerance_bps: 1_000 },
            Some(Duration::from_secs(1200)),
            now,
        )
        .unwrap();

        assert_eq!(normalized.atomic.to_string(), "10000000000000000");
        assert_eq!(
            normalized.min_out.map(|v| v.to_string()),
            Some("9000000000000000".to_string())
        );
        assert_eq!(normalized.deadline, Some(now.timestamp() as u64 + 1200));
    }

    #[test]
    fn test_normalize_without_deadline() {
        let normalized = normalize("2", MinOutPolicy::Omitted, None, Utc::now()).unwrap();
        assert!(normalized.min_out.is_none());
        assert!(normalized.deadline.is_none());
    }
}
