// Booking persistence contract
// The workflow only needs insert-one; where the rows end up is the
// gateway's business.

use crate::request::{BookingRecord, StoredBooking};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum GatewayError {
    // The store refused the row; the message is safe to show to the guest
    #[error("{0}")]
    Rejected(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response from store: {0}")]
    InvalidResponse(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store request timed out after {0}ms")]
    Timeout(u64),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl GatewayError {
    // Detail that may be surfaced to the guest alongside a failed booking.
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::Rejected(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

#[async_trait]
pub trait PersistenceGateway: Send + Sync + 'static {
    // Stores one booking and returns it with the identifiers the store assigned
    async fn insert(&self, record: BookingRecord) -> Result<StoredBooking, GatewayError>;
}

// Process-local store, used by demos and tests.
#[derive(Debug, Default)]
pub struct InMemoryGateway {
    bookings: DashMap<String, StoredBooking>,
    next_id: AtomicU64,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<StoredBooking> {
        self.bookings.get(id).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }

    pub fn bookings_for_room(&self, room_type: &str) -> Vec<StoredBooking> {
        let mut bookings: Vec<StoredBooking> = self
            .bookings
            .iter()
            .filter(|entry| entry.value().record.room_type == room_type)
            .map(|entry| entry.value().clone())
            .collect();
        bookings.sort_by(|a, b| a.id.cmp(&b.id));
        bookings
    }
}

#[async_trait]
impl PersistenceGateway for InMemoryGateway {
    async fn insert(&self, record: BookingRecord) -> Result<StoredBooking, GatewayError> {
        let id = format!("booking-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let stored = StoredBooking {
            id: id.clone(),
            created_at: Some(Utc::now()),
            record,
        };
        self.bookings.insert(id, stored.clone());
        info!(booking_id = %stored.id, room_type = %stored.record.room_type, "booking stored");
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(room_type: &str, guests: u32) -> BookingRecord {
        BookingRecord {
            room_type: room_type.to_string(),
            full_name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: "0412345678".to_string(),
            check_in_date: NaiveDate::from_ymd_opt(2026, 11, 3).unwrap(),
            guests,
        }
    }

    #[test]
    fn test_in_memory_assigns_sequential_ids() {
        let gateway = InMemoryGateway::new();

        let first = tokio_test::block_on(gateway.insert(record("standard-twin", 2))).unwrap();
        let second = tokio_test::block_on(gateway.insert(record("deluxe-suite", 3))).unwrap();

        assert_eq!(first.id, "booking-1");
        assert_eq!(second.id, "booking-2");
        assert!(first.created_at.is_some());
        assert_eq!(gateway.len(), 2);
        assert_eq!(gateway.get("booking-2").unwrap().record.guests, 3);
    }

    #[test]
    fn test_in_memory_filters_by_room() {
        let gateway = InMemoryGateway::new();
        for guests in 1..=3 {
            tokio_test::block_on(gateway.insert(record("superior-suite", guests))).unwrap();
        }
        tokio_test::block_on(gateway.insert(record("standard-twin", 1))).unwrap();

        let suites = gateway.bookings_for_room("superior-suite");
        assert_eq!(suites.len(), 3);
        assert!(gateway.bookings_for_room("presidential-suite").is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_inserts_get_unique_ids() {
        let gateway = std::sync::Arc::new(InMemoryGateway::new());
        let mut handles = vec![];
        for i in 0..20 {
            let gateway = gateway.clone();
            handles.push(tokio::spawn(async move {
                gateway.insert(record("executive-twin", 1 + i % 2)).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert_eq!(gateway.len(), 20);
    }

    #[test]
    fn test_backend_errors_wrap_anyhow() {
        let err: GatewayError = anyhow::anyhow!("connection pool exhausted").into();
        assert!(matches!(err, GatewayError::Backend(_)));
        assert_eq!(err.user_message(), "connection pool exhausted");
    }

    #[test]
    fn test_user_message() {
        let rejected = GatewayError::Rejected("duplicate key value".to_string());
        assert_eq!(rejected.user_message(), "duplicate key value");
        assert_eq!(
            GatewayError::Timeout(250).user_message(),
            "Store request timed out after 250ms"
        );
    }
}
