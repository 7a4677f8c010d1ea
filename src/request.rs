// Booking request as entered by the guest, and the record shapes that cross
// the persistence boundary.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// A guest's proposed reservation, exactly as captured by the booking form.
// `guests` stays a string because the form submits the selected option's
// value; the validator decides whether it is a usable number.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub check_in_date: Option<NaiveDate>,
    pub room_type: String,
    pub guests: String,
}

impl BookingRequest {
    // Builds the persistence record for an already validated request.
    // Returns `None` when the check-in date is missing or the guest count
    // does not parse, which cannot happen after a successful validation.
    pub fn to_record(&self) -> Option<BookingRecord> {
        let check_in_date = self.check_in_date?;
        let guests = parse_guest_count(&self.guests)?;

        Some(BookingRecord {
            room_type: self.room_type.clone(),
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            check_in_date,
            guests,
        })
    }
}

// Parses a guest count, accepting only positive integers.
pub fn parse_guest_count(value: &str) -> Option<u32> {
    match value.trim().parse::<u32>() {
        Ok(count) if count > 0 => Some(count),
        _ => None,
    }
}

// Row written to the bookings store. The date serialises as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub room_type: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub check_in_date: NaiveDate,
    pub guests: u32,
}

// A booking as returned by the store, including the identifiers it assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredBooking {
    pub id: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub record: BookingRecord,
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn sample_request() -> BookingRequest {
        BookingRequest {
            full_name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: "0412345678".to_string(),
            check_in_date: NaiveDate::from_ymd_opt(2026, 11, 3),
            room_type: "superior-suite".to_string(),
            guests: "3".to_string(),
        }
    }

    #[test_case("3", Some(3); "plain number")]
    #[test_case(" 2 ", Some(2); "surrounding whitespace")]
    #[test_case("0", None; "zero")]
    #[test_case("-1", None; "negative")]
    #[test_case("two", None; "word")]
    #[test_case("", None; "empty")]
    fn test_parse_guest_count(input: &str, expected: Option<u32>) {
        assert_eq!(parse_guest_count(input), expected);
    }

    #[test]
    fn test_record_uses_iso_date_and_snake_case_keys() {
        let record = sample_request().to_record().unwrap();
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["check_in_date"], "2026-11-03");
        assert_eq!(json["room_type"], "superior-suite");
        assert_eq!(json["full_name"], "Jane Doe");
        assert_eq!(json["guests"], 3);
    }

    #[test]
    fn test_record_requires_date_and_guests() {
        let mut request = sample_request();
        request.check_in_date = None;
        assert!(request.to_record().is_none());

        let mut request = sample_request();
        request.guests = "lots".to_string();
        assert!(request.to_record().is_none());
    }

    #[test]
    fn test_stored_booking_flattens_record() {
        let json = r#"{
            "id": "7f1c",
            "created_at": "2026-10-18T09:30:00Z",
            "room_type": "deluxe-suite",
            "full_name": "Sam Lee",
            "email": "sam@example.com",
            "phone": "0498765432",
            "check_in_date": "2026-12-24",
            "guests": 2
        }"#;

        let stored: StoredBooking = serde_json::from_str(json).unwrap();
        assert_eq!(stored.id, "7f1c");
        assert!(stored.created_at.is_some());
        assert_eq!(stored.record.room_type, "deluxe-suite");
        assert_eq!(stored.record.check_in_date, NaiveDate::from_ymd_opt(2026, 12, 24).unwrap());
        assert_eq!(stored.record.guests, 2);
    }
}
