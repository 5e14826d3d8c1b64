//! Exact rental price math
//!
//! All arithmetic stays in integer wei (U256). The yearly display price is
//! `price_per_second * SECONDS_PER_YEAR` computed without intermediate
//! rounding; only the final string carries a decimal point, produced by
//! exact 18-decimal long division.

use alloy::primitives::U256;

/// 365 days, the display year used for per-year rates.
pub const SECONDS_PER_YEAR: u64 = 31_536_000;

const ETH_DECIMALS: usize = 18;

#[derive(Debug)]
pub enum PricingError {
    InvalidAmount(String),
}

impl std::fmt::Display for PricingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PricingError::InvalidAmount(msg) => write!(f, "Invalid amount: {}", msg),
        }
    }
}

impl std::error::Error for PricingError {}

fn wei_per_eth() -> U256 {
    U256::from(10u64).pow(U256::from(ETH_DECIMALS as u64))
}

/// Parse an indexer-encoded decimal wei string. Missing or malformed values
/// read as zero, matching how the original client coerced them.
pub fn parse_wei(value: &str) -> U256 {
    U256::from_str_radix(value.trim(), 10).unwrap_or(U256::ZERO)
}

/// Yearly price in wei for a per-second rate.
pub fn yearly_price_wei(price_per_second: &str) -> U256 {
    parse_wei(price_per_second).saturating_mul(U256::from(SECONDS_PER_YEAR))
}

/// Total rental cost in wei: rate times duration, exact.
pub fn rental_cost_wei(price_per_second: &str, duration_secs: u64) -> U256 {
    parse_wei(price_per_second).saturating_mul(U256::from(duration_secs))
}

/// Yearly price for a per-second rate, formatted as decimal ETH.
pub fn yearly_price_eth(price_per_second: &str) -> String {
    format_ether(yearly_price_wei(price_per_second))
}

/// Format wei as a decimal ETH string with no precision loss. Trailing
/// fractional zeros are trimmed; whole amounts carry no decimal point.
pub fn format_ether(wei: U256) -> String {
    let unit = wei_per_eth();
    let whole = wei / unit;
    let frac = wei % unit;

    if frac.is_zero() {
        return whole.to_string();
    }

    let frac_digits = format!("{:0>width$}", frac.to_string(), width = ETH_DECIMALS);
    let trimmed = frac_digits.trim_end_matches('0');
    format!("{}.{}", whole, trimmed)
}

/// Parse a decimal ETH string to exact wei. At most 18 fractional digits
/// are accepted; anything finer has no wei representation.
pub fn parse_ether(eth: &str) -> Result<U256, PricingError> {
    let trimmed = eth.trim();
    if trimmed.is_empty() {
        return Err(PricingError::InvalidAmount("empty amount".to_string()));
    }

    let (whole_part, frac_part) = match trimmed.split_once('.') {
        Some((w, f)) => (w, f),
        None => (trimmed, ""),
    };

    if frac_part.len() > ETH_DECIMALS {
        return Err(PricingError::InvalidAmount(format!(
            "more than {} fractional digits: {}",
            ETH_DECIMALS, trimmed
        )));
    }
    if !whole_part.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
        || (whole_part.is_empty() && frac_part.is_empty())
    {
        return Err(PricingError::InvalidAmount(trimmed.to_string()));
    }

    let whole = if whole_part.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(whole_part, 10)
            .map_err(|_| PricingError::InvalidAmount(trimmed.to_string()))?
    };

    let frac_scaled = format!("{:0<width$}", frac_part, width = ETH_DECIMALS);
    let frac = if frac_part.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(&frac_scaled, 10)
            .map_err(|_| PricingError::InvalidAmount(trimmed.to_string()))?
    };

    whole
        .checked_mul(wei_per_eth())
        .and_then(|w| w.checked_add(frac))
        .ok_or_else(|| PricingError::InvalidAmount(format!("amount too large: {}", trimmed)))
}

/// Per-second rate in wei from a yearly asking price in decimal ETH.
/// Integer division, matching the listing flow of the original contract
/// callers.
pub fn price_per_second_from_yearly(eth_per_year: &str) -> Result<U256, PricingError> {
    Ok(parse_ether(eth_per_year)? / U256::from(SECONDS_PER_YEAR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_gwei_per_second_over_a_year_is_exact() {
        // 1 gwei/sec * 31_536_000 sec = 31_536_000 gwei = 0.031536 ETH
        assert_eq!(yearly_price_eth("1000000000"), "0.031536");
    }

    #[test]
    fn yearly_wei_multiplication_has_no_rounding() {
        let wei = yearly_price_wei("1000000000");
        assert_eq!(wei, U256::from(31_536_000u64) * U256::from(1_000_000_000u64));
    }

    #[test]
    fn format_whole_and_fractional_amounts() {
        let eth = U256::from(10u64).pow(U256::from(18u64));
        assert_eq!(format_ether(eth), "1");
        assert_eq!(format_ether(eth * U256::from(3u64) / U256::from(2u64)), "1.5");
        assert_eq!(format_ether(U256::ZERO), "0");
        assert_eq!(format_ether(U256::from(1u64)), "0.000000000000000001");
    }

    #[test]
    fn parse_round_trips_through_format() {
        for s in ["0.031536", "1", "1.5", "0.000000000000000001", "42.000000000000000042"] {
            let wei = parse_ether(s).unwrap();
            assert_eq!(format_ether(wei), s);
        }
    }

    #[test]
    fn parse_rejects_garbage_and_excess_precision() {
        assert!(parse_ether("").is_err());
        assert!(parse_ether("abc").is_err());
        assert!(parse_ether("1.2.3").is_err());
        assert!(parse_ether("-1").is_err());
        assert!(parse_ether("0.1234567890123456789").is_err());
    }

    #[test]
    fn malformed_wei_string_reads_as_zero() {
        assert_eq!(parse_wei("not-a-number"), U256::ZERO);
        assert_eq!(yearly_price_eth(""), "0");
    }

    #[test]
    fn yearly_rate_recovers_per_second_rate() {
        let rate = price_per_second_from_yearly("0.031536").unwrap();
        assert_eq!(rate, U256::from(1_000_000_000u64));
    }

    #[test]
    fn rental_cost_is_rate_times_duration() {
        let cost = rental_cost_wei("1000000000", 3600);
        assert_eq!(cost, U256::from(3_600_000_000_000u64));
    }
}
