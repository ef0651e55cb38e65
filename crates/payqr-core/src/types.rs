use std::fmt::{self, Display};

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Eth,
    Btc,
    Sol,
}

impl Chain {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eth => "eth",
            Self::Btc => "btc",
            Self::Sol => "sol",
        }
    }

    /// URI scheme prefix, without the trailing colon.
    pub const fn scheme(self) -> &'static str {
        match self {
            Self::Eth => "ethereum",
            Self::Btc => "bitcoin",
            Self::Sol => "solana",
        }
    }
}

impl Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A string or numeric parameter value, rendered exactly as supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Text(String),
    Number(serde_json::Number),
}

impl Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(number) => write!(f, "{number}"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

/// One typed smart-contract call argument. `name` is informational and never emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionArg {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: ParamValue,
}

impl FunctionArg {
    pub fn new(
        name: impl Into<String>,
        kind: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractCall {
    pub function_name: String,
    #[serde(default)]
    pub args: Vec<FunctionArg>,
}

impl ContractCall {
    pub fn new(function_name: impl Into<String>, args: Vec<FunctionArg>) -> Self {
        Self {
            function_name: function_name.into(),
            args,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EthRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    pub to: String,
    #[serde(
        default,
        with = "decimal_serde",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<BigDecimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call: Option<ContractCall>,
}

impl EthRequest {
    pub fn new(to: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            ..Self::default()
        }
    }
}

/// An arbitrary extra BTC attribute, emitted as `key:value` inside the `args` segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraField {
    pub key: String,
    pub value: ParamValue,
}

impl ExtraField {
    pub fn new(key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BtcRequest {
    pub to: String,
    #[serde(
        default,
        with = "decimal_serde",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount: Option<BigDecimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<Vec<ExtraField>>,
}

impl BtcRequest {
    pub fn new(to: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolRequest {
    pub to: String,
    #[serde(
        default,
        with = "decimal_serde",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount: Option<BigDecimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delegate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorized: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method_name: Option<String>,
    /// Opaque program arguments, carried as JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_payer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referral: Option<String>,
}

impl SolRequest {
    pub fn new(to: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            ..Self::default()
        }
    }
}

/// A payment request for one of the supported chain families.
///
/// Serialized with an internal `"chain"` tag, e.g. `{"chain": "btc", "to": "1D9h..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "chain", rename_all = "lowercase")]
pub enum PaymentRequest {
    Eth(EthRequest),
    Btc(BtcRequest),
    Sol(SolRequest),
}

impl PaymentRequest {
    pub const fn chain(&self) -> Chain {
        match self {
            Self::Eth(_) => Chain::Eth,
            Self::Btc(_) => Chain::Btc,
            Self::Sol(_) => Chain::Sol,
        }
    }

    pub fn recipient(&self) -> &str {
        match self {
            Self::Eth(req) => &req.to,
            Self::Btc(req) => &req.to,
            Self::Sol(req) => &req.to,
        }
    }
}

impl From<EthRequest> for PaymentRequest {
    fn from(value: EthRequest) -> Self {
        Self::Eth(value)
    }
}

impl From<BtcRequest> for PaymentRequest {
    fn from(value: BtcRequest) -> Self {
        Self::Btc(value)
    }
}

impl From<SolRequest> for PaymentRequest {
    fn from(value: SolRequest) -> Self {
        Self::Sol(value)
    }
}

/// Decimals travel as JSON strings or numbers and are parsed from their textual form,
/// so `0.001` stays exactly `0.001`.
mod decimal_serde {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;
    use serde::{de, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDecimal {
        Text(String),
        Number(serde_json::Number),
    }

    pub fn serialize<S>(value: &Option<BigDecimal>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(decimal) => serializer.serialize_str(&decimal.to_plain_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<BigDecimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<RawDecimal>::deserialize(deserializer)?;
        raw.map(|raw| {
            // Strings keep their scale ("0.0010"); JSON numbers carry no scale of their own,
            // so `100.0` reads as `100`.
            let (text, is_number) = match raw {
                RawDecimal::Text(text) => (text, false),
                RawDecimal::Number(number) => (number.to_string(), true),
            };
            let decimal = BigDecimal::from_str(text.trim())
                .map_err(|err| de::Error::custom(format!("invalid decimal '{text}': {err}")))?;
            Ok(if is_number { decimal.normalized() } else { decimal })
        })
        .transpose()
    }
}
