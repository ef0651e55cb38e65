//! Opt-in request checks.
//!
//! The URI builders accept any input; callers that want to reject obviously broken requests
//! before rendering run [`validate_request`] first.

use bigdecimal::BigDecimal;

use crate::error::{PayQrError, Result, ValidationCode};
use crate::sol::{has_program, is_truthy};
use crate::types::{BtcRequest, EthRequest, PaymentRequest, SolRequest};

pub fn validate_request(request: &PaymentRequest) -> Result<()> {
    match request {
        PaymentRequest::Eth(request) => validate_eth(request),
        PaymentRequest::Btc(request) => validate_btc(request),
        PaymentRequest::Sol(request) => validate_sol(request),
    }
}

pub fn validate_recipient(to: &str) -> Result<()> {
    if to.trim().is_empty() {
        return Err(PayQrError::validation(
            ValidationCode::MissingRecipient,
            "recipient address `to` cannot be empty",
        ));
    }

    Ok(())
}

fn validate_non_negative(field: &str, amount: Option<&BigDecimal>) -> Result<()> {
    if let Some(amount) = amount {
        if *amount < BigDecimal::from(0) {
            return Err(PayQrError::validation(
                ValidationCode::NegativeAmount,
                format!("`{field}` must not be negative, got {amount}"),
            ));
        }
    }

    Ok(())
}

fn validate_eth(request: &EthRequest) -> Result<()> {
    validate_recipient(&request.to)?;
    validate_non_negative("value", request.value.as_ref())?;

    if let Some(call) = &request.call {
        if call.function_name.trim().is_empty() {
            return Err(PayQrError::validation(
                ValidationCode::EmptyFunctionName,
                "contract call requires a function name",
            ));
        }
    }

    Ok(())
}

fn validate_btc(request: &BtcRequest) -> Result<()> {
    validate_recipient(&request.to)?;
    validate_non_negative("amount", request.amount.as_ref())
}

fn validate_sol(request: &SolRequest) -> Result<()> {
    validate_recipient(&request.to)?;
    validate_non_negative("amount", request.amount.as_ref())?;

    let has_args = request.args.as_ref().is_some_and(is_truthy);
    if has_args && !has_program(request) {
        return Err(PayQrError::validation(
            ValidationCode::ArgsWithoutProgram,
            "program `args` are only encoded together with `programId`",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;
    use serde_json::json;

    use super::validate_request;
    use crate::error::{PayQrError, ValidationCode};
    use crate::sol::build_sol_uri;
    use crate::types::{BtcRequest, ContractCall, EthRequest, PaymentRequest, SolRequest};

    fn code_of(request: impl Into<PaymentRequest>) -> Option<ValidationCode> {
        match validate_request(&request.into()) {
            Ok(()) => None,
            Err(PayQrError::Validation { code, .. }) => Some(code),
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn accepts_well_formed_requests() {
        assert_eq!(code_of(EthRequest::new("0xabc")), None);
        assert_eq!(code_of(BtcRequest::new("1D9h")), None);
        let sol = SolRequest {
            program_id: Some("P1".to_string()),
            args: Some(json!({ "amount": 1 })),
            ..SolRequest::new("7oGz")
        };
        assert_eq!(code_of(sol), None);
    }

    #[test]
    fn rejects_blank_recipient_for_every_chain() {
        assert_eq!(code_of(EthRequest::new("")), Some(ValidationCode::MissingRecipient));
        assert_eq!(code_of(BtcRequest::new("  ")), Some(ValidationCode::MissingRecipient));
        assert_eq!(code_of(SolRequest::new("")), Some(ValidationCode::MissingRecipient));
    }

    #[test]
    fn rejects_negative_amounts() {
        let eth = EthRequest {
            value: Some(BigDecimal::from(-1)),
            ..EthRequest::new("0xabc")
        };
        assert_eq!(code_of(eth), Some(ValidationCode::NegativeAmount));

        let btc = BtcRequest {
            amount: Some(BigDecimal::from_str("-0.1").unwrap()),
            ..BtcRequest::new("1D9h")
        };
        assert_eq!(code_of(btc), Some(ValidationCode::NegativeAmount));
    }

    #[test]
    fn zero_amounts_are_allowed() {
        let btc = BtcRequest {
            amount: Some(BigDecimal::from(0)),
            ..BtcRequest::new("1D9h")
        };
        assert_eq!(code_of(btc), None);
    }

    #[test]
    fn rejects_call_without_function_name() {
        let eth = EthRequest {
            call: Some(ContractCall::new(" ", vec![])),
            ..EthRequest::new("0xabc")
        };
        assert_eq!(code_of(eth), Some(ValidationCode::EmptyFunctionName));
    }

    #[test]
    fn rejects_args_that_would_be_dropped() {
        let sol = SolRequest {
            args: Some(json!([1, 2])),
            ..SolRequest::new("7oGz")
        };
        assert_eq!(code_of(sol), Some(ValidationCode::ArgsWithoutProgram));
    }

    #[test]
    fn args_check_matches_what_the_builder_encodes() {
        let blank_program = SolRequest {
            program_id: Some("  ".to_string()),
            args: Some(json!({ "amount": 1 })),
            ..SolRequest::new("7oGz")
        };
        assert!(build_sol_uri(&blank_program).contains("&args="));
        assert_eq!(code_of(blank_program), None);

        for ignored in [json!(false), json!(0), json!(""), json!(null)] {
            let sol = SolRequest {
                args: Some(ignored),
                ..SolRequest::new("7oGz")
            };
            assert!(!build_sol_uri(&sol).contains("&args="));
            assert_eq!(code_of(sol), None);
        }
    }
}
