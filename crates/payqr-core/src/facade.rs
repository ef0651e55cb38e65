use tracing::debug;

use crate::btc::build_btc_uri;
use crate::eth::{build_eth_uri_with, ValueEncoding};
use crate::render::ImageRenderer;
use crate::sol::build_sol_uri;
use crate::types::{BtcRequest, Chain, EthRequest, PaymentRequest, SolRequest};

impl PaymentRequest {
    pub fn to_uri(&self) -> String {
        self.to_uri_with(ValueEncoding::default())
    }

    /// `encoding` only affects Ethereum requests.
    pub fn to_uri_with(&self, encoding: ValueEncoding) -> String {
        match self {
            Self::Eth(request) => build_eth_uri_with(request, encoding),
            Self::Btc(request) => build_btc_uri(request),
            Self::Sol(request) => build_sol_uri(request),
        }
    }
}

/// Builds payment URIs and hands them to an injected renderer.
///
/// Renderer failures are returned exactly as the renderer produced them.
#[derive(Debug, Clone, Default)]
pub struct PaymentQr<R> {
    renderer: R,
    eth_value: ValueEncoding,
}

impl<R: ImageRenderer> PaymentQr<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            eth_value: ValueEncoding::default(),
        }
    }

    pub fn with_value_encoding(mut self, encoding: ValueEncoding) -> Self {
        self.eth_value = encoding;
        self
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub async fn generate_eth_qr(&self, request: &EthRequest) -> Result<R::Asset, R::Error> {
        let uri = build_eth_uri_with(request, self.eth_value);
        self.render(Chain::Eth, &uri).await
    }

    pub async fn generate_btc_qr(&self, request: &BtcRequest) -> Result<R::Asset, R::Error> {
        let uri = build_btc_uri(request);
        self.render(Chain::Btc, &uri).await
    }

    pub async fn generate_sol_qr(&self, request: &SolRequest) -> Result<R::Asset, R::Error> {
        let uri = build_sol_uri(request);
        self.render(Chain::Sol, &uri).await
    }

    pub async fn generate(&self, request: &PaymentRequest) -> Result<R::Asset, R::Error> {
        match request {
            PaymentRequest::Eth(request) => self.generate_eth_qr(request).await,
            PaymentRequest::Btc(request) => self.generate_btc_qr(request).await,
            PaymentRequest::Sol(request) => self.generate_sol_qr(request).await,
        }
    }

    async fn render(&self, chain: Chain, uri: &str) -> Result<R::Asset, R::Error> {
        debug!(%chain, payload_bytes = uri.len(), "rendering payment uri");
        self.renderer.encode(uri).await
    }
}
