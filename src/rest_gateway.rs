// PostgREST-backed persistence gateway
// Inserts one row into the bookings table and asks for the stored row back.

use crate::persistence::{GatewayError, PersistenceGateway};
use crate::request::{BookingRecord, StoredBooking};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{error, instrument};

#[derive(Debug, Clone)]
pub struct RestGatewayConfig {
    pub base_url: String,
    pub api_key: String,
    pub table: String,
    pub timeout_ms: u64,
}

impl Default for RestGatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:54321".to_string(),
            api_key: String::new(),
            table: "bookings".to_string(),
            timeout_ms: 10_000,
        }
    }
}

// Error body returned by the REST layer when the database refuses a row
#[derive(Debug, Deserialize)]
struct StoreErrorBody {
    message: String,
}

pub struct RestGateway {
    client: reqwest::Client,
    config: RestGatewayConfig,
}

impl RestGateway {
    pub fn new(config: RestGatewayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.table
        )
    }
}

#[async_trait]
impl PersistenceGateway for RestGateway {
    #[instrument(skip_all, fields(room_type = %record.room_type, check_in = %record.check_in_date))]
    async fn insert(&self, record: BookingRecord) -> Result<StoredBooking, GatewayError> {
        let response = self
            .client
            .post(self.endpoint())
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
            .header("Prefer", "return=representation")
            .json(&record)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        let result = decode_insert_response(status, &body);
        if let Err(err) = &result {
            error!(status, error = %err, "booking insert failed");
        }
        result
    }
}

pub fn decode_insert_response(status: u16, body: &str) -> Result<StoredBooking, GatewayError> {
    if !(200..300).contains(&status) {
        return match serde_json::from_str::<StoreErrorBody>(body) {
            Ok(store_error) => Err(GatewayError::Rejected(store_error.message)),
            Err(_) => Err(GatewayError::InvalidResponse(format!(
                "unexpected status {}",
                status
            ))),
        };
    }

    let rows: Vec<StoredBooking> = serde_json::from_str(body)?;
    rows.into_iter()
        .next()
        .ok_or_else(|| GatewayError::InvalidResponse("store returned no rows".to_string()))
}
