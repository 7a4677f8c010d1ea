// Booking form validation
// Every rule runs on every pass so the caller can highlight all offending
// fields at once. Nothing here touches the network or the clock, except
// `validate` which reads today's local date.

use crate::catalog::{derive_max_guests, RoomCatalog};
use crate::request::{parse_guest_count, BookingRequest};
use chrono::{Local, NaiveDate};
use regex::Regex;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    FullName,
    Email,
    Phone,
    CheckInDate,
    RoomType,
    Guests,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::FullName => "fullName",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::CheckInDate => "checkInDate",
            Field::RoomType => "roomType",
            Field::Guests => "guests",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Guest count checked against the room selected at validation time
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CapacityError {
    #[error("Maximum occupancy for this room type is {max_occupancy} people.")]
    Exceeded { max_occupancy: u32, requested: u32 },

    #[error("Maximum occupancy cannot be determined until a valid room type is selected.")]
    UnknownRoom,
}

// Per-field validation failures. The Display text is what the guest sees.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Full name must contain both first and last name separated by a space.")]
    FullName,

    #[error("Please enter a valid email address that includes @.")]
    Email,

    #[error("Phone number must be at least 10 digits.")]
    PhoneTooShort,

    #[error("Phone number must start with 04 and contain 10 digits.")]
    PhoneFormat,

    #[error("Please select a check-in date.")]
    MissingCheckInDate,

    #[error("Check-in date cannot be in the past.")]
    CheckInInPast,

    #[error("Please select a room type.")]
    MissingRoomType,

    #[error("Room type \"{0}\" is not available at this hotel.")]
    UnknownRoomType(String),

    #[error("Please enter a valid number of guests.")]
    InvalidGuestCount,

    #[error(transparent)]
    Capacity(#[from] CapacityError),
}

impl ValidationError {
    pub fn field(&self) -> Field {
        match self {
            ValidationError::FullName => Field::FullName,
            ValidationError::Email => Field::Email,
            ValidationError::PhoneTooShort | ValidationError::PhoneFormat => Field::Phone,
            ValidationError::MissingCheckInDate | ValidationError::CheckInInPast => {
                Field::CheckInDate
            }
            ValidationError::MissingRoomType | ValidationError::UnknownRoomType(_) => {
                Field::RoomType
            }
            ValidationError::InvalidGuestCount | ValidationError::Capacity(_) => Field::Guests,
        }
    }
}

impl Serialize for ValidationError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// Field-scoped errors from one validation pass, at most one per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, ValidationError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    // First failure for a field wins; later ones for the same field are dropped.
    pub fn push(&mut self, error: ValidationError) {
        self.0.entry(error.field()).or_insert(error);
    }

    pub fn get(&self, field: Field) -> Option<&ValidationError> {
        self.0.get(&field)
    }

    pub fn message(&self, field: Field) -> Option<String> {
        self.get(field).map(ToString::to_string)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &ValidationError)> + '_ {
        self.0.iter().map(|(field, error)| (*field, error))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, error) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, error)?;
            first = false;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid { errors: FieldErrors },
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}

// Validates against today's date in the local time zone.
pub fn validate(request: &BookingRequest, catalog: &RoomCatalog) -> ValidationResult {
    validate_on(request, catalog, Local::now().date_naive())
}

pub fn validate_on(
    request: &BookingRequest,
    catalog: &RoomCatalog,
    today: NaiveDate,
) -> ValidationResult {
    let checks = [
        check_full_name(&request.full_name),
        check_email(&request.email),
        check_phone(&request.phone),
        check_check_in_date(request.check_in_date, today),
        check_room_type(&request.room_type, catalog),
        check_guests(&request.guests, &request.room_type, catalog),
    ];

    let mut errors = FieldErrors::new();
    for error in checks.into_iter().flat_map(Result::err) {
        errors.push(error);
    }

    if errors.is_empty() {
        ValidationResult::Valid
    } else {
        ValidationResult::Invalid { errors }
    }
}

pub fn check_full_name(full_name: &str) -> Result<(), ValidationError> {
    if full_name.chars().count() >= 2 && full_name.contains(' ') {
        Ok(())
    } else {
        Err(ValidationError::FullName)
    }
}

pub fn check_email(email: &str) -> Result<(), ValidationError> {
    if validator::validate_email(email) {
        Ok(())
    } else {
        Err(ValidationError::Email)
    }
}

// Australian mobile: 04 followed by eight ASCII digits
static MOBILE_NUMBER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^04[0-9]{8}$").ok());

pub fn check_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.chars().count() < 10 {
        return Err(ValidationError::PhoneTooShort);
    }
    match MOBILE_NUMBER.as_ref() {
        Some(pattern) if pattern.is_match(phone) => Ok(()),
        _ => Err(ValidationError::PhoneFormat),
    }
}

pub fn check_check_in_date(
    check_in_date: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<(), ValidationError> {
    match check_in_date {
        None => Err(ValidationError::MissingCheckInDate),
        Some(date) if date < today => Err(ValidationError::CheckInInPast),
        Some(_) => Ok(()),
    }
}

pub fn check_room_type(room_type: &str, catalog: &RoomCatalog) -> Result<(), ValidationError> {
    if room_type.is_empty() {
        return Err(ValidationError::MissingRoomType);
    }
    match catalog.lookup_by_type(room_type) {
        Some(_) => Ok(()),
        None => Err(ValidationError::UnknownRoomType(room_type.to_string())),
    }
}

// Guest count rule. The bound is looked up on every call; an unknown room
// has no bound and the rule fails.
pub fn check_guests(
    guests: &str,
    room_type: &str,
    catalog: &RoomCatalog,
) -> Result<(), ValidationError> {
    let requested = parse_guest_count(guests).ok_or(ValidationError::InvalidGuestCount)?;

    match derive_max_guests(room_type, catalog) {
        None => Err(CapacityError::UnknownRoom.into()),
        Some(max_occupancy) if requested > max_occupancy => Err(CapacityError::Exceeded {
            max_occupancy,
            requested,
        }
        .into()),
        Some(_) => Ok(()),
    }
}
