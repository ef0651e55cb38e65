//! Payment-request URI construction for Ethereum, Bitcoin and Solana, plus QR rendering.
//!
//! The `eth`, `btc` and `sol` builders are pure functions from a typed request to a URI
//! string. [`PaymentQr`] pairs them with an [`ImageRenderer`].

pub mod btc;
pub mod error;
pub mod eth;
pub mod facade;
pub mod params;
pub mod render;
pub mod sol;
pub mod types;
pub mod validation;

pub use btc::build_btc_uri;
pub use error::{PayQrError, Result};
pub use eth::{build_eth_uri, build_eth_uri_with, ValueEncoding};
pub use facade::PaymentQr;
pub use render::{ImageRenderer, QrImage, QrPngRenderer, RenderOptions};
pub use sol::build_sol_uri;
pub use types::{
    BtcRequest, Chain, ContractCall, EthRequest, ExtraField, FunctionArg, ParamValue,
    PaymentRequest, SolRequest,
};
