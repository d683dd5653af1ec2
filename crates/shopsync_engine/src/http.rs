//! HTTP transport implementation.
//!
//! The marketplace speaks JSON over HTTPS with bearer authentication. The
//! actual HTTP client sits behind a trait so tests can script responses;
//! [`ReqwestClient`] is the production implementation.

use crate::error::{SyncError, SyncResult};
use crate::store::Credential;
use crate::transport::MarketTransport;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shopsync_protocol::{
    cancel_order_path, generate_invoice_path, start_order_handling_path, sticker_report_path,
    CatalogItem, OrderListRequest, OrderListResponse, PriceUpdate, StockUpdate,
    CREATE_UPDATE_PRICE, CREATE_UPDATE_PRODUCT, CREATE_UPDATE_STOCK, GET_ORDERS,
};
use std::time::Duration;

/// HTTP client abstraction.
///
/// Implement this trait to provide the actual HTTP transport. Errors are
/// plain strings; the transport wraps them as retryable transport errors,
/// matching the engine's treat-everything-transient retry policy.
pub trait HttpClient: Send + Sync {
    /// Sends a POST with a JSON body and returns the response body.
    fn post(&self, url: &str, token: &str, body: Vec<u8>) -> Result<Vec<u8>, String>;

    /// Sends a GET and returns the response body.
    fn get(&self, url: &str, token: &str) -> Result<Vec<u8>, String>;
}

/// [`MarketTransport`] over an [`HttpClient`].
pub struct HttpTransport<C: HttpClient> {
    base_url: String,
    client: C,
}

impl<C: HttpClient> HttpTransport<C> {
    /// Creates a transport rooted at the service base URL.
    pub fn new(base_url: impl Into<String>, client: C) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn post_json<B: Serialize>(
        &self,
        path: &str,
        credential: &Credential,
        body: &B,
    ) -> SyncResult<Vec<u8>> {
        let payload = serde_json::to_vec(body)
            .map_err(|e| SyncError::Protocol(format!("failed to encode request: {e}")))?;
        let url = format!("{}{}", self.base_url, path);
        self.client
            .post(&url, &credential.token, payload)
            .map_err(SyncError::transport_retryable)
    }

    fn post_json_decode<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        credential: &Credential,
        body: &B,
    ) -> SyncResult<R> {
        let raw = self.post_json(path, credential, body)?;
        serde_json::from_slice(&raw)
            .map_err(|e| SyncError::Protocol(format!("failed to decode response: {e}")))
    }

    fn get(&self, path: &str, credential: &Credential) -> SyncResult<Vec<u8>> {
        let url = format!("{}{}", self.base_url, path);
        self.client
            .get(&url, &credential.token)
            .map_err(SyncError::transport_retryable)
    }
}

impl<C: HttpClient> MarketTransport for HttpTransport<C> {
    fn create_update_products(
        &self,
        credential: &Credential,
        items: &[CatalogItem],
    ) -> SyncResult<()> {
        self.post_json(CREATE_UPDATE_PRODUCT, credential, &items)?;
        Ok(())
    }

    fn create_update_stock(
        &self,
        credential: &Credential,
        lines: &[StockUpdate],
    ) -> SyncResult<()> {
        self.post_json(CREATE_UPDATE_STOCK, credential, &lines)?;
        Ok(())
    }

    fn create_update_price(
        &self,
        credential: &Credential,
        prices: &[PriceUpdate],
    ) -> SyncResult<()> {
        self.post_json(CREATE_UPDATE_PRICE, credential, &prices)?;
        Ok(())
    }

    fn get_orders(
        &self,
        credential: &Credential,
        request: &OrderListRequest,
    ) -> SyncResult<OrderListResponse> {
        self.post_json_decode(GET_ORDERS, credential, request)
    }

    fn start_order_handling(&self, credential: &Credential, order_id: &str) -> SyncResult<()> {
        self.get(&start_order_handling_path(order_id), credential)?;
        Ok(())
    }

    fn generate_invoice(&self, credential: &Credential, order_id: &str) -> SyncResult<()> {
        self.get(&generate_invoice_path(order_id), credential)?;
        Ok(())
    }

    fn cancel_order(
        &self,
        credential: &Credential,
        order_id: &str,
        reason: &str,
    ) -> SyncResult<()> {
        self.get(&cancel_order_path(order_id, reason), credential)?;
        Ok(())
    }

    fn sticker_report(&self, credential: &Credential, order_id: &str) -> SyncResult<Vec<u8>> {
        self.get(&sticker_report_path(order_id), credential)
    }
}

/// Production HTTP client over `reqwest::blocking`.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Builds a client with the given per-request timeout.
    pub fn new(timeout: Duration) -> SyncResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SyncError::transport_fatal(e.to_string()))?;
        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn post(&self, url: &str, token: &str, body: Vec<u8>) -> Result<Vec<u8>, String> {
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .map_err(|e| e.to_string())?
            .error_for_status()
            .map_err(|e| e.to_string())?;
        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| e.to_string())
    }

    fn get(&self, url: &str, token: &str) -> Result<Vec<u8>, String> {
        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .map_err(|e| e.to_string())?
            .error_for_status()
            .map_err(|e| e.to_string())?;
        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| e.to_string())
    }
}
