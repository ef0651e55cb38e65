use crate::params::{append_field, serialize_as_colon};
use crate::types::{BtcRequest, Chain};

/// Builds a `bitcoin:` URI.
///
/// Field order is `to`, then the `args` segment built from `extra`, then the optional
/// attributes in declaration order: `amount`, `label`, `message`, `memo`. Present attributes
/// are written verbatim, including zero amounts and empty strings.
pub fn build_btc_uri(request: &BtcRequest) -> String {
    let mut uri = format!("{}:{}?", Chain::Btc.scheme(), request.to);

    if let Some(extra) = request.extra.as_deref().filter(|extra| !extra.is_empty()) {
        append_field(&mut uri, "args", serialize_as_colon(extra));
    }

    let fields = [
        ("amount", request.amount.as_ref().map(|amount| amount.to_plain_string())),
        ("label", request.label.clone()),
        ("message", request.message.clone()),
        ("memo", request.memo.clone()),
    ];
    for (key, value) in fields {
        if let Some(value) = value {
            append_field(&mut uri, key, value);
        }
    }

    uri
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;

    use super::build_btc_uri;
    use crate::types::{BtcRequest, ExtraField};

    const TO: &str = "1D9hTwC4jCnAAg5WtEe6CgwcR17qUdN9ap";

    #[test]
    fn extra_fields_become_args_segment() {
        let request = BtcRequest {
            extra: Some(vec![
                ExtraField::new("label", "Test Label"),
                ExtraField::new("amount", "0.001"),
            ]),
            memo: Some("Payment for services".to_string()),
            ..BtcRequest::new(TO)
        };
        assert_eq!(
            build_btc_uri(&request),
            format!("bitcoin:{TO}?&args=label:Test Label&amount:0.001&memo=Payment for services")
        );
    }

    #[test]
    fn missing_extra_omits_args_segment() {
        let request = BtcRequest {
            memo: Some("Payment for services".to_string()),
            ..BtcRequest::new(TO)
        };
        assert_eq!(
            build_btc_uri(&request),
            format!("bitcoin:{TO}?&memo=Payment for services")
        );
    }

    #[test]
    fn empty_extra_omits_args_segment() {
        let request = BtcRequest {
            extra: Some(Vec::new()),
            ..BtcRequest::new(TO)
        };
        assert_eq!(build_btc_uri(&request), format!("bitcoin:{TO}?"));
    }

    #[test]
    fn declared_fields_follow_fixed_order() {
        let request = BtcRequest {
            memo: Some("m".to_string()),
            message: Some("Donation".to_string()),
            label: Some("Luke-Jr".to_string()),
            amount: Some(BigDecimal::from_str("20.3").unwrap()),
            ..BtcRequest::new(TO)
        };
        assert_eq!(
            build_btc_uri(&request),
            format!("bitcoin:{TO}?&amount=20.3&label=Luke-Jr&message=Donation&memo=m")
        );
    }

    #[test]
    fn falsy_values_are_emitted_verbatim() {
        let request = BtcRequest {
            amount: Some(BigDecimal::from(0)),
            label: Some(String::new()),
            ..BtcRequest::new(TO)
        };
        assert_eq!(build_btc_uri(&request), format!("bitcoin:{TO}?&amount=0&label="));
    }

    #[test]
    fn amount_keeps_supplied_scale() {
        let request = BtcRequest {
            amount: Some(BigDecimal::from_str("0.0010").unwrap()),
            ..BtcRequest::new(TO)
        };
        assert_eq!(build_btc_uri(&request), format!("bitcoin:{TO}?&amount=0.0010"));
    }
}
