use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::Value;

use crate::params::append_field;
use crate::types::{Chain, SolRequest};

/// Builds a `solana:` URI.
///
/// When both a program id and program arguments are supplied the arguments are written
/// first as `args=<base64 of compact JSON>`. The remaining attributes follow in the order
/// `programId`, `methodName`, `amount`, `label`, `memo`, `delegate`, `authorized`,
/// `feePayer`, `referral`.
pub fn build_sol_uri(request: &SolRequest) -> String {
    let mut uri = format!("{}:{}?", Chain::Sol.scheme(), request.to);

    if has_program(request) {
        if let Some(args) = request.args.as_ref().filter(|args| is_truthy(args)) {
            append_field(&mut uri, "args", encode_program_args(args));
        }
    }

    let fields = [
        ("programId", request.program_id.clone()),
        ("methodName", request.method_name.clone()),
        ("amount", request.amount.as_ref().map(|amount| amount.to_plain_string())),
        ("label", request.label.clone()),
        ("memo", request.memo.clone()),
        ("delegate", request.delegate.clone()),
        ("authorized", request.authorized.clone()),
        ("feePayer", request.fee_payer.clone()),
        ("referral", request.referral.clone()),
    ];
    for (key, value) in fields {
        if let Some(value) = value {
            append_field(&mut uri, key, value);
        }
    }

    uri
}

/// Compact JSON (object keys in insertion order, no whitespace), base64 with padding.
pub fn encode_program_args(args: &Value) -> String {
    STANDARD.encode(args.to_string())
}

/// Any non-empty program id, whitespace included, enables the args segment.
pub(crate) fn has_program(request: &SolRequest) -> bool {
    request
        .program_id
        .as_deref()
        .is_some_and(|program_id| !program_id.is_empty())
}

// null, false, 0 and "" never produce an args segment.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde_json::json;

    use super::{build_sol_uri, encode_program_args};
    use crate::types::SolRequest;

    const TO: &str = "7oGz5zZS5Bwzrh5zGQ1d9EzRzGXTESR6Cm9EGNsnKLvD";
    const PROGRAM_ID: &str = "AbCdEfGhIjKlMnOpQrStUvWxYz123456";

    fn program_request() -> SolRequest {
        SolRequest {
            program_id: Some(PROGRAM_ID.to_string()),
            memo: Some("Payment for services".to_string()),
            ..SolRequest::new(TO)
        }
    }

    #[test]
    fn program_args_are_base64_json_and_program_id_appears_once() {
        let request = SolRequest {
            method_name: Some("transfer".to_string()),
            args: Some(json!({
                "to": "3QJmV3qfvLkKg24FRg8VvCwK9Wiu3Zsi6WiCwSLP9v8j",
                "amount": 100
            })),
            ..program_request()
        };

        let uri = build_sol_uri(&request);
        assert_eq!(
            uri,
            format!(
                "solana:{TO}?&args=eyJ0byI6IjNRSm1WM3FmdkxrS2cyNEZSZzhWdkN3SzlXaXUzWnNpNldpQ3dTTFA5djhqIiwiYW1vdW50IjoxMDB9\
                 &programId={PROGRAM_ID}&methodName=transfer&memo=Payment for services"
            )
        );
        assert_eq!(uri.matches("programId=").count(), 1);
    }

    #[test]
    fn encoded_args_decode_to_compact_json() {
        let args = json!({ "b": [1, 2], "a": { "nested": true } });
        let decoded = STANDARD.decode(encode_program_args(&args)).unwrap();
        assert_eq!(
            String::from_utf8(decoded).unwrap(),
            r#"{"b":[1,2],"a":{"nested":true}}"#
        );
    }

    #[test]
    fn program_without_args() {
        assert_eq!(
            build_sol_uri(&program_request()),
            format!("solana:{TO}?&programId={PROGRAM_ID}&memo=Payment for services")
        );
    }

    #[test]
    fn args_without_program_id_are_dropped() {
        let request = SolRequest {
            args: Some(json!({ "amount": 1 })),
            memo: Some("x".to_string()),
            ..SolRequest::new(TO)
        };
        assert_eq!(build_sol_uri(&request), format!("solana:{TO}?&memo=x"));
    }

    #[test]
    fn empty_program_id_suppresses_args_but_is_still_emitted() {
        let request = SolRequest {
            program_id: Some(String::new()),
            args: Some(json!([1, 2, 3])),
            ..SolRequest::new(TO)
        };
        assert_eq!(build_sol_uri(&request), format!("solana:{TO}?&programId="));
    }

    #[test]
    fn falsy_args_are_not_encoded() {
        for args in [json!(null), json!(false), json!(0), json!("")] {
            let request = SolRequest {
                args: Some(args),
                ..program_request()
            };
            assert!(!build_sol_uri(&request).contains("&args="));
        }
    }

    #[test]
    fn all_attributes_follow_declared_order() {
        let request = SolRequest {
            amount: Some(bigdecimal::BigDecimal::from(0)),
            label: Some("shop".to_string()),
            memo: Some("order-1".to_string()),
            delegate: Some("D1".to_string()),
            authorized: Some("A1".to_string()),
            program_id: Some("P1".to_string()),
            method_name: Some("pay".to_string()),
            fee_payer: Some("F1".to_string()),
            referral: Some("R1".to_string()),
            ..SolRequest::new(TO)
        };
        assert_eq!(
            build_sol_uri(&request),
            format!(
                "solana:{TO}?&programId=P1&methodName=pay&amount=0&label=shop&memo=order-1\
                 &delegate=D1&authorized=A1&feePayer=F1&referral=R1"
            )
        );
    }

    #[test]
    fn building_twice_is_byte_identical() {
        let request = SolRequest {
            args: Some(json!({ "z": 1, "a": 2 })),
            ..program_request()
        };
        assert_eq!(build_sol_uri(&request), build_sol_uri(&request));
    }
}
