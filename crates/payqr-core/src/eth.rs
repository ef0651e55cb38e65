use bigdecimal::BigDecimal;

use crate::params::{append_field, serialize_as_query};
use crate::types::{Chain, EthRequest};

pub const DEFAULT_CHAIN_ID: u64 = 1;
pub const VALUE_EXPONENT: u32 = 10;
pub const WEI_DECIMALS: u32 = 18;
/// Largest base-unit shift accepted from user input. 10^77 already exceeds `uint256`.
pub const MAX_BASE_UNIT_DECIMALS: u32 = 77;

// Adjusted exponents outside (-7, 21) switch `value^10` to exponential notation.
const EXPONENTIAL_AT_LOW: i64 = -7;
const EXPONENTIAL_AT_HIGH: i64 = 21;

/// How a positive `value` is transformed before it is written to the URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueEncoding {
    /// `value^10`. Compatible with the established URI output, not a unit conversion.
    #[default]
    Exponentiated,
    /// `value * 10^decimals`, i.e. a conversion into integer base units.
    BaseUnits { decimals: u32 },
}

impl ValueEncoding {
    pub const fn wei() -> Self {
        Self::BaseUnits {
            decimals: WEI_DECIMALS,
        }
    }

    /// `Exponentiated` output follows bignumber.js `toString`: plain digits for adjusted
    /// exponents in `-6..=20`, `d.ddde+N` / `de-N` outside. `BaseUnits` output is always plain.
    pub fn apply(self, value: &BigDecimal) -> String {
        match self {
            Self::Exponentiated => format_exponential_at(&exponentiate_value(value)),
            Self::BaseUnits { decimals } => to_base_units(value, decimals)
                .normalized()
                .to_plain_string(),
        }
    }
}

fn format_exponential_at(value: &BigDecimal) -> String {
    let normalized = value.normalized();
    let (digits, scale) = normalized.as_bigint_and_exponent();
    let text = digits.to_string();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };

    let exponent = digits.len() as i64 - 1 - scale;
    if exponent > EXPONENTIAL_AT_LOW && exponent < EXPONENTIAL_AT_HIGH {
        return normalized.to_plain_string();
    }

    let (lead, rest) = digits.split_at(1);
    let fraction = if rest.is_empty() {
        String::new()
    } else {
        format!(".{rest}")
    };
    let exponent_sign = if exponent < 0 { '-' } else { '+' };
    format!("{sign}{lead}{fraction}e{exponent_sign}{}", exponent.abs())
}

/// Raises `value` to the tenth power with exact decimal arithmetic.
pub fn exponentiate_value(value: &BigDecimal) -> BigDecimal {
    (1..VALUE_EXPONENT).fold(value.clone(), |acc, _| &acc * value)
}

/// Shifts `value` left by `decimals` places by moving the decimal scale.
pub fn to_base_units(value: &BigDecimal, decimals: u32) -> BigDecimal {
    let (digits, scale) = value.as_bigint_and_exponent();
    BigDecimal::new(digits, scale - i64::from(decimals))
}

pub fn build_eth_uri(request: &EthRequest) -> String {
    build_eth_uri_with(request, ValueEncoding::default())
}

pub fn build_eth_uri_with(request: &EthRequest, encoding: ValueEncoding) -> String {
    let scheme = Chain::Eth.scheme();
    let chain_id = request.chain_id.unwrap_or(DEFAULT_CHAIN_ID);

    let call = request
        .call
        .as_ref()
        .filter(|call| !call.function_name.is_empty());
    let mut uri = match call {
        Some(call) => format!(
            "{scheme}:{}@{chain_id}/{}?{}",
            request.to,
            call.function_name,
            serialize_as_query(&call.args)
        ),
        None => format!("{scheme}:{}@{chain_id}?", request.to),
    };

    if let Some(from) = request.from.as_deref().filter(|from| !from.is_empty()) {
        append_field(&mut uri, "from", from);
    }

    let zero = BigDecimal::from(0);
    if let Some(value) = request.value.as_ref().filter(|value| **value > zero) {
        append_field(&mut uri, "value", encoding.apply(value));
    }

    uri
}
