// Booking form draft
// Holds what the guest has typed so far. Whenever the room type changes the
// guest bound is re-derived from the catalog and the guest count is pulled
// down to it if needed.

use crate::catalog::{derive_max_guests, RoomCatalog};
use crate::request::{parse_guest_count, BookingRequest};
use chrono::NaiveDate;
use tracing::debug;

// Reported when a room change forced the guest count down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuestAdjustment {
    pub from: u32,
    pub to: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct BookingDraft {
    catalog: RoomCatalog,
    full_name: String,
    email: String,
    phone: String,
    check_in_date: Option<NaiveDate>,
    room_type: String,
    guests: String,
}

impl BookingDraft {
    pub fn new(catalog: RoomCatalog) -> Self {
        Self {
            catalog,
            full_name: String::new(),
            email: String::new(),
            phone: String::new(),
            check_in_date: None,
            room_type: String::new(),
            guests: String::new(),
        }
    }

    pub fn with_preselected_room(catalog: RoomCatalog, room_type: Option<&str>) -> Self {
        let mut draft = Self::new(catalog);
        if let Some(room_type) = room_type {
            draft.set_room_type(room_type);
        }
        draft
    }

    pub fn set_full_name(&mut self, value: impl Into<String>) {
        self.full_name = value.into();
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        self.email = value.into();
    }

    pub fn set_phone(&mut self, value: impl Into<String>) {
        self.phone = value.into();
    }

    pub fn set_check_in_date(&mut self, value: NaiveDate) {
        self.check_in_date = Some(value);
    }

    // Selects a room type and clamps the guest count to the new room's bound.
    // An unknown room has no bound, so the count is left for the validator
    // to reject.
    pub fn set_room_type(&mut self, value: impl Into<String>) -> Option<GuestAdjustment> {
        self.room_type = value.into();
        let max_guests = derive_max_guests(&self.room_type, &self.catalog)?;
        let current = parse_guest_count(&self.guests)?;

        if current > max_guests {
            debug!(
                room_type = %self.room_type,
                from = current,
                to = max_guests,
                "clamping guest count to room capacity"
            );
            self.guests = max_guests.to_string();
            return Some(GuestAdjustment {
                from: current,
                to: max_guests,
            });
        }
        None
    }

    pub fn set_guests(&mut self, value: impl Into<String>) {
        self.guests = value.into();
    }

    pub fn room_type(&self) -> &str {
        &self.room_type
    }

    pub fn guests(&self) -> &str {
        &self.guests
    }

    pub fn max_guests(&self) -> Option<u32> {
        derive_max_guests(&self.room_type, &self.catalog)
    }

    // Choices for the guest selector; empty until a known room is picked.
    pub fn guest_options(&self) -> Vec<GuestOption> {
        let max_guests = self.max_guests().unwrap_or(0);
        (1..=max_guests)
            .map(|count| GuestOption {
                value: count.to_string(),
                label: if count == 1 {
                    "1 Guest".to_string()
                } else {
                    format!("{} Guests", count)
                },
            })
            .collect()
    }

    // Snapshot of the draft as an immutable request for one submission.
    pub fn to_request(&self) -> BookingRequest {
        BookingRequest {
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            check_in_date: self.check_in_date,
            room_type: self.room_type.clone(),
            guests: self.guests.clone(),
        }
    }

    // Refills the draft from an earlier request, e.g. after a failed submission.
    pub fn restore(catalog: RoomCatalog, request: &BookingRequest) -> Self {
        Self {
            catalog,
            full_name: request.full_name.clone(),
            email: request.email.clone(),
            phone: request.phone.clone(),
            check_in_date: request.check_in_date,
            room_type: request.room_type.clone(),
            guests: request.guests.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switching_to_smaller_room_clamps_guests() {
        let mut draft = BookingDraft::new(RoomCatalog::standard());
        assert_eq!(draft.set_room_type("presidential-suite"), None);
        draft.set_guests("5");

        let adjustment = draft.set_room_type("standard-twin");
        assert_eq!(adjustment, Some(GuestAdjustment { from: 5, to: 2 }));
        assert_eq!(draft.guests(), "2");
        assert_eq!(draft.max_guests(), Some(2));
    }

    #[test]
    fn test_switching_to_larger_room_keeps_guests() {
        let mut draft = BookingDraft::new(RoomCatalog::standard());
        draft.set_room_type("standard-twin");
        draft.set_guests("2");

        assert_eq!(draft.set_room_type("presidential-suite"), None);
        assert_eq!(draft.guests(), "2");
        assert_eq!(draft.max_guests(), Some(5));
    }

    #[test]
    fn test_unknown_room_leaves_guests_untouched() {
        let mut draft = BookingDraft::new(RoomCatalog::standard());
        draft.set_room_type("presidential-suite");
        draft.set_guests("4");

        assert_eq!(draft.set_room_type("attic"), None);
        assert_eq!(draft.guests(), "4");
        assert_eq!(draft.max_guests(), None);
        assert!(draft.guest_options().is_empty());
    }

    #[test]
    fn test_guest_options_follow_selected_room() {
        let draft =
            BookingDraft::with_preselected_room(RoomCatalog::standard(), Some("superior-suite"));
        let options = draft.guest_options();

        assert_eq!(options.len(), 3);
        assert_eq!(options[0].label, "1 Guest");
        assert_eq!(options[2].value, "3");
        assert_eq!(options[2].label, "3 Guests");
    }

    #[test]
    fn test_to_request_and_restore() {
        let mut draft = BookingDraft::new(RoomCatalog::standard());
        draft.set_full_name("Jane Doe");
        draft.set_email("jane@example.com");
        draft.set_phone("0412345678");
        draft.set_check_in_date(NaiveDate::from_ymd_opt(2026, 11, 1).unwrap());
        draft.set_room_type("deluxe-suite");
        draft.set_guests("3");

        let request = draft.to_request();
        assert_eq!(request.full_name, "Jane Doe");
        assert_eq!(request.room_type, "deluxe-suite");
        assert_eq!(request.guests, "3");

        let restored = BookingDraft::restore(RoomCatalog::standard(), &request);
        assert_eq!(restored.to_request(), request);
    }
}
