use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use sha2::Sha256;
use std::collections::HashMap;
use std::time::Duration;
use subtle::ConstantTimeEq;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RazorpayError {
    #[error("API request failed: {0}")]
    RequestFailed(String),
    #[error("Order creation failed: {0}")]
    CreationFailed(String),
    #[error("Order not found: {0}")]
    NotFound(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct RazorpayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    #[serde(default)]
    pub notes: HashMap<String, String>,
}

/// Thin client for the Razorpay orders API.
///
/// Payment calls are never retried: a timeout or 5xx surfaces to the caller,
/// who must not guess at whether money moved.
pub struct RazorpayClient {
    client: Client,
    base_url: String,
    key_id: String,
    key_secret: String,
}

impl RazorpayClient {
    pub fn new(key_id: String, key_secret: String) -> Result<Self, RazorpayError> {
        if key_id.is_empty() || key_secret.is_empty() {
            return Err(RazorpayError::InvalidConfig(
                "Razorpay credentials not configured".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| {
                RazorpayError::InvalidConfig(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: "https://api.razorpay.com/v1".to_string(),
            key_id,
            key_secret,
        })
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub async fn create_order(
        &self,
        amount: i64,
        currency: &str,
        receipt: &str,
        notes: &HashMap<String, String>,
    ) -> Result<RazorpayOrder, RazorpayError> {
        let body = json!({
            "amount": amount,
            "currency": currency,
            "receipt": receipt,
            "notes": notes,
        });

        let resp = self
            .client
            .post(format!("{}/orders", self.base_url))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&body)
            .send()
            .await
            .map_err(|e| RazorpayError::RequestFailed(e.to_string()))?;

        if !resp.status().is_success() {
            let error_text = resp
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RazorpayError::CreationFailed(error_text));
        }

        resp.json::<RazorpayOrder>()
            .await
            .map_err(|e| RazorpayError::InvalidResponse(e.to_string()))
    }

    pub async fn fetch_order(&self, order_id: &str) -> Result<RazorpayOrder, RazorpayError> {
        let resp = self
            .client
            .get(format!("{}/orders/{}", self.base_url, order_id))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .send()
            .await
            .map_err(|e| RazorpayError::RequestFailed(e.to_string()))?;

        if resp.status().as_u16() == 404 {
            return Err(RazorpayError::NotFound(order_id.to_string()));
        }

        if !resp.status().is_success() {
            let error_text = resp
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RazorpayError::RequestFailed(error_text));
        }

        resp.json::<RazorpayOrder>()
            .await
            .map_err(|e| RazorpayError::InvalidResponse(e.to_string()))
    }

    /// Checks the checkout callback signature:
    /// HMAC-SHA256 over "order_id|payment_id" keyed with the API secret,
    /// compared in constant time against the hex signature Razorpay sent.
    pub fn verify_payment_signature(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> bool {
        verify_signature(&self.key_secret, order_id, payment_id, signature)
    }
}

fn verify_signature(secret: &str, order_id: &str, payment_id: &str, signature: &str) -> bool {
    let payload = format!("{}|{}", order_id, payment_id);
    let mut mac = match Hmac::<Sha256>::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return false,
    };
    mac.update(payload.as_bytes());
    let expected = hex::encode(mac.finalize().into_bytes());

    expected.as_bytes().ct_eq(signature.as_bytes()).into()
}
