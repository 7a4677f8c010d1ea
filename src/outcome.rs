// Results of a submission and the user-facing artefacts derived from them.

use crate::catalog::RoomCatalog;
use crate::request::{BookingRequest, StoredBooking};
use crate::validation::FieldErrors;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

pub const GENERIC_FAILURE_REASON: &str =
    "There was an error submitting your booking. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BookingOutcome {
    Accepted { booking: StoredBooking },
    Rejected { errors: FieldErrors },
    NoAvailability,
    // The request comes back so the guest can retry without re-typing it
    SubmissionFailed {
        reason: String,
        request: BookingRequest,
    },
}

impl BookingOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, BookingOutcome::Accepted { .. })
    }

    // Toast to show for this outcome. Field errors are shown inline instead.
    pub fn notice(&self) -> Option<Notice> {
        match self {
            BookingOutcome::Accepted { .. } => Some(Notice {
                title: "Booking Submitted",
                description: "Your booking request has been successfully submitted!".to_string(),
                variant: NoticeVariant::Default,
            }),
            BookingOutcome::Rejected { .. } => None,
            BookingOutcome::NoAvailability => Some(Notice {
                title: "Booking Failed",
                description:
                    "Sorry! There is no room available for the selected date and room type."
                        .to_string(),
                variant: NoticeVariant::Destructive,
            }),
            BookingOutcome::SubmissionFailed { reason, .. } if reason == GENERIC_FAILURE_REASON => {
                Some(Notice {
                    title: "Error",
                    description: reason.clone(),
                    variant: NoticeVariant::Destructive,
                })
            }
            BookingOutcome::SubmissionFailed { reason, .. } => Some(Notice {
                title: "Booking Failed",
                description: reason.clone(),
                variant: NoticeVariant::Destructive,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeVariant {
    Default,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: &'static str,
    pub description: String,
    pub variant: NoticeVariant,
}

// Read-only summary of an accepted booking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingReceipt {
    pub booking_id: String,
    pub guest_name: String,
    pub email: String,
    pub phone: String,
    pub room_name: String,
    pub check_in_date: NaiveDate,
    pub guests: String,
}

impl BookingReceipt {
    pub fn new(request: &BookingRequest, stored: &StoredBooking, catalog: &RoomCatalog) -> Self {
        let room_name = catalog
            .lookup_by_type(&request.room_type)
            .map(|room| room.name.to_string())
            .unwrap_or_else(|| request.room_type.clone());

        Self {
            booking_id: stored.id.clone(),
            guest_name: request.full_name.clone(),
            email: request.email.clone(),
            phone: request.phone.clone(),
            room_name,
            check_in_date: stored.record.check_in_date,
            guests: request.guests.clone(),
        }
    }

    // e.g. "November 3rd, 2026"
    pub fn formatted_check_in(&self) -> String {
        use chrono::Datelike;

        let day = self.check_in_date.day();
        let suffix = match (day % 10, day % 100) {
            (_, 11..=13) => "th",
            (1, _) => "st",
            (2, _) => "nd",
            (3, _) => "rd",
            _ => "th",
        };
        format!(
            "{} {}{}, {}",
            self.check_in_date.format("%B"),
            day,
            suffix,
            self.check_in_date.year()
        )
    }
}

impl fmt::Display for BookingReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Booking reference: {}", self.booking_id)?;
        writeln!(f, "Guest Name: {}", self.guest_name)?;
        writeln!(f, "Email: {}", self.email)?;
        writeln!(f, "Phone: {}", self.phone)?;
        writeln!(f, "Room Type: {}", self.room_name)?;
        writeln!(f, "Check-in Date: {}", self.formatted_check_in())?;
        write!(f, "Number of Guests: {}", self.guests)
    }
}
