// Booking submission workflow
// validate -> check availability -> persist, driven as an explicit state
// machine. One BookingSubmitter serves one form session and allows at most
// one submission in flight.

use crate::availability::{AvailabilityError, AvailabilityOracle};
use crate::catalog::RoomCatalog;
use crate::outcome::{BookingOutcome, BookingReceipt, GENERIC_FAILURE_REASON};
use crate::persistence::{GatewayError, PersistenceGateway};
use crate::request::{BookingRecord, BookingRequest, StoredBooking};
use crate::validation::{validate, ValidationResult};
use futures::FutureExt;
use parking_lot::Mutex;
use serde::Serialize;
use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{broadcast, watch};
use tracing::{debug, error, info, instrument, warn, Instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SubmissionState {
    Idle,
    Validating,
    CheckingAvailability,
    Persisting,
    Accepted,
    Rejected,
    NoAvailability,
    SubmissionFailed,
}

impl SubmissionState {
    pub fn name(&self) -> &'static str {
        match self {
            SubmissionState::Idle => "Idle",
            SubmissionState::Validating => "Validating",
            SubmissionState::CheckingAvailability => "CheckingAvailability",
            SubmissionState::Persisting => "Persisting",
            SubmissionState::Accepted => "Accepted",
            SubmissionState::Rejected => "Rejected",
            SubmissionState::NoAvailability => "NoAvailability",
            SubmissionState::SubmissionFailed => "SubmissionFailed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SubmissionState::Accepted
                | SubmissionState::Rejected
                | SubmissionState::NoAvailability
                | SubmissionState::SubmissionFailed
        )
    }

    // The submit trigger is disabled in these states
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            SubmissionState::Validating
                | SubmissionState::CheckingAvailability
                | SubmissionState::Persisting
        )
    }
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Published once for every state change of a submitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StateTransition {
    pub from: SubmissionState,
    pub to: SubmissionState,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("A booking submission is already in progress ({0})")]
    InFlight(SubmissionState),

    #[error("Booking submission was cancelled")]
    Cancelled,

    #[error("There is no earlier booking request to retry")]
    NothingToRetry,
}

// The insert has no deadline here: once dispatched it runs to completion and
// the gateway enforces its own timeout (see RestGatewayConfig::timeout_ms)
#[derive(Debug, Clone)]
pub struct SubmitterConfig {
    pub availability_timeout_ms: u64,
    pub event_capacity: usize,
}

impl Default for SubmitterConfig {
    fn default() -> Self {
        Self {
            availability_timeout_ms: 5_000,
            event_capacity: 32,
        }
    }
}

// Why a step after validation did not produce a result
enum Fault {
    // The gateway answered with an error meant for the guest
    Store(GatewayError),
    // Timeouts, panics and oracle errors; only a generic reason is shown
    Unexpected(String),
}

struct Session {
    state: SubmissionState,
    // Bumped by every submit that gets past the in-flight check
    attempt: u64,
    cancel: Option<watch::Sender<bool>>,
    retained: Option<BookingRequest>,
    receipt: Option<BookingReceipt>,
}

pub struct BookingSubmitter {
    catalog: RoomCatalog,
    oracle: Arc<dyn AvailabilityOracle>,
    gateway: Arc<dyn PersistenceGateway>,
    config: SubmitterConfig,
    session: Mutex<Session>,
    events: broadcast::Sender<StateTransition>,
}

impl BookingSubmitter {
    pub fn new(
        catalog: RoomCatalog,
        oracle: Arc<dyn AvailabilityOracle>,
        gateway: Arc<dyn PersistenceGateway>,
    ) -> Self {
        Self::with_config(catalog, oracle, gateway, SubmitterConfig::default())
    }

    pub fn with_config(
        catalog: RoomCatalog,
        oracle: Arc<dyn AvailabilityOracle>,
        gateway: Arc<dyn PersistenceGateway>,
        config: SubmitterConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            catalog,
            oracle,
            gateway,
            config,
            session: Mutex::new(Session {
                state: SubmissionState::Idle,
                attempt: 0,
                cancel: None,
                retained: None,
                receipt: None,
            }),
            events,
        }
    }

    pub fn current_state(&self) -> SubmissionState {
        self.session.lock().state
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StateTransition> {
        self.events.subscribe()
    }

    // The last request handed to `submit`, kept so a failed attempt can be retried.
    pub fn retained_request(&self) -> Option<BookingRequest> {
        self.session.lock().retained.clone()
    }

    // Receipt of the accepted booking, available while the session sits in `Accepted`.
    pub fn receipt(&self) -> Option<BookingReceipt> {
        self.session.lock().receipt.clone()
    }

    // Asks the in-flight submission to stop. Returns false when nothing is in flight.
    pub fn cancel(&self) -> bool {
        let session = self.session.lock();
        match &session.cancel {
            Some(sender) if session.state.is_in_flight() => {
                sender.send_replace(true);
                info!(state = %session.state, "cancellation requested");
                true
            }
            _ => false,
        }
    }

    // Returns a finished session to `Idle`, e.g. when the guest dismisses a notice.
    pub fn reset(&self) -> Result<(), SubmitError> {
        let mut session = self.session.lock();
        if session.state.is_in_flight() {
            return Err(SubmitError::InFlight(session.state));
        }
        session.receipt = None;
        if session.state != SubmissionState::Idle {
            self.transition(&mut session, SubmissionState::Idle);
        }
        Ok(())
    }

    pub async fn retry(&self) -> Result<BookingOutcome, SubmitError> {
        let request = self.retained_request().ok_or(SubmitError::NothingToRetry)?;
        self.submit(request).await
    }

    // Runs one submission to a terminal state.
    // Business results, including field errors and collaborator failures,
    // come back as `Ok(BookingOutcome)`. `Err` is reserved for a submit
    // issued while another is in flight, and for cancellation.
    #[instrument(
        skip_all,
        fields(room_type = %request.room_type, guests = %request.guests)
    )]
    pub async fn submit(&self, request: BookingRequest) -> Result<BookingOutcome, SubmitError> {
        let (attempt, mut cancelled) = self.begin(&request)?;
        let _in_flight = InFlight {
            submitter: self,
            attempt,
        };
        self.run(request, &mut cancelled).await
    }

    fn begin(
        &self,
        request: &BookingRequest,
    ) -> Result<(u64, watch::Receiver<bool>), SubmitError> {
        let mut session = self.session.lock();
        if session.state.is_in_flight() {
            warn!(state = %session.state, "ignoring submit while a booking is in flight");
            return Err(SubmitError::InFlight(session.state));
        }
        if session.state.is_terminal() {
            self.transition(&mut session, SubmissionState::Idle);
        }

        let (sender, receiver) = watch::channel(false);
        session.attempt += 1;
        session.cancel = Some(sender);
        session.receipt = None;
        session.retained = Some(request.clone());
        self.transition(&mut session, SubmissionState::Validating);
        Ok((session.attempt, receiver))
    }

    async fn run(
        &self,
        request: BookingRequest,
        cancelled: &mut watch::Receiver<bool>,
    ) -> Result<BookingOutcome, SubmitError> {
        if let ValidationResult::Invalid { errors } = validate(&request, &self.catalog) {
            info!(errors = %errors, "booking rejected by validation");
            self.set_state(SubmissionState::Rejected);
            return Ok(BookingOutcome::Rejected { errors });
        }

        let Some(record) = request.to_record() else {
            return Ok(self.fail(
                request,
                Fault::Unexpected("validated request has no usable date or guest count".into()),
            ));
        };

        if is_cancelled(cancelled) {
            return Err(self.abort());
        }
        self.set_state(SubmissionState::CheckingAvailability);

        let available = tokio::select! {
            biased;
            _ = cancellation(cancelled) => return Err(self.abort()),
            result = self.check_availability(&record) => result,
        };
        let available = match available {
            Ok(available) => available,
            Err(fault) => return Ok(self.fail(request, fault)),
        };

        if !available {
            info!(check_in = %record.check_in_date, "no availability for requested room");
            self.set_state(SubmissionState::NoAvailability);
            return Ok(BookingOutcome::NoAvailability);
        }

        if is_cancelled(cancelled) {
            return Err(self.abort());
        }
        self.set_state(SubmissionState::Persisting);

        // Once dispatched the insert runs to completion, even if cancelled meanwhile
        let persisted = self.persist(record).await;

        if is_cancelled(cancelled) {
            if let Ok(stored) = &persisted {
                warn!(booking_id = %stored.id, "discarding booking stored after cancellation");
            }
            return Err(self.abort());
        }

        match persisted {
            Ok(stored) => {
                info!(booking_id = %stored.id, "booking accepted");
                let receipt = BookingReceipt::new(&request, &stored, &self.catalog);
                let mut session = self.session.lock();
                session.receipt = Some(receipt);
                self.transition(&mut session, SubmissionState::Accepted);
                Ok(BookingOutcome::Accepted { booking: stored })
            }
            Err(fault) => Ok(self.fail(request, fault)),
        }
    }

    async fn check_availability(&self, record: &BookingRecord) -> Result<bool, Fault> {
        let timeout_ms = self.config.availability_timeout_ms;
        let call = AssertUnwindSafe(
            self.oracle
                .check(&record.room_type, record.check_in_date),
        )
        .catch_unwind();

        match tokio::time::timeout(Duration::from_millis(timeout_ms), call).await {
            Ok(Ok(Ok(available))) => {
                debug!(available, "availability checked");
                Ok(available)
            }
            Ok(Ok(Err(err))) => Err(Fault::Unexpected(err.to_string())),
            Ok(Err(panic)) => Err(Fault::Unexpected(format!(
                "availability oracle panicked: {}",
                panic_message(&*panic)
            ))),
            Err(_) => Err(Fault::Unexpected(
                AvailabilityError::Timeout(timeout_ms).to_string(),
            )),
        }
    }

    // The insert runs on its own task so it completes even when this
    // submission is cancelled or dropped while waiting for it
    async fn persist(&self, record: BookingRecord) -> Result<StoredBooking, Fault> {
        let gateway = Arc::clone(&self.gateway);
        let insert = tokio::spawn(
            async move {
                let result = gateway.insert(record).await;
                if let Ok(stored) = &result {
                    debug!(booking_id = %stored.id, "insert completed");
                }
                result
            }
            .in_current_span(),
        );

        match insert.await {
            Ok(Ok(stored)) => Ok(stored),
            Ok(Err(err)) => Err(Fault::Store(err)),
            Err(err) if err.is_panic() => Err(Fault::Unexpected(format!(
                "persistence gateway panicked: {}",
                panic_message(&*err.into_panic())
            ))),
            Err(err) => Err(Fault::Unexpected(format!("insert task failed: {}", err))),
        }
    }

    fn fail(&self, request: BookingRequest, fault: Fault) -> BookingOutcome {
        let reason = match fault {
            Fault::Store(err) => {
                error!(error = %err, "error saving booking");
                format!("Database error: {}", err.user_message())
            }
            Fault::Unexpected(detail) => {
                error!(detail = %detail, "error in booking process");
                GENERIC_FAILURE_REASON.to_string()
            }
        };
        self.set_state(SubmissionState::SubmissionFailed);
        BookingOutcome::SubmissionFailed { reason, request }
    }

    fn abort(&self) -> SubmitError {
        warn!("booking submission cancelled");
        self.set_state(SubmissionState::Idle);
        SubmitError::Cancelled
    }

    fn set_state(&self, to: SubmissionState) {
        let mut session = self.session.lock();
        self.transition(&mut session, to);
    }

    // Emitting under the session lock keeps events in transition order
    fn transition(&self, session: &mut Session, to: SubmissionState) {
        let from = session.state;
        session.state = to;
        debug!(%from, %to, "submission state changed");
        // No subscribers is fine
        let _ = self.events.send(StateTransition { from, to });
    }
}

// Held by `submit` for the lifetime of one attempt. Clears the attempt's cancel
// sender and, if the submit future was dropped mid-flight, returns the session
// to Idle. A newer attempt's session is left alone.
struct InFlight<'a> {
    submitter: &'a BookingSubmitter,
    attempt: u64,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut session = self.submitter.session.lock();
        if session.attempt != self.attempt {
            return;
        }
        session.cancel = None;
        if session.state.is_in_flight() {
            warn!(state = %session.state, "booking submission dropped before finishing");
            self.submitter.transition(&mut session, SubmissionState::Idle);
        }
    }
}

fn is_cancelled(receiver: &watch::Receiver<bool>) -> bool {
    *receiver.borrow()
}

// Resolves once cancellation is requested. The borrow of the flag is released
// before returning so the caller may take the session lock.
async fn cancellation(receiver: &mut watch::Receiver<bool>) {
    if receiver.wait_for(|flag| *flag).await.is_err() {
        // Sender gone: this submission can no longer be cancelled
        futures::future::pending::<()>().await;
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

// Test doubles for the collaborators (extend as needed)
#[cfg(test)]
pub mod mocks {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    #[derive(Debug, Clone, Copy)]
    pub enum OracleMode {
        Available,
        Unavailable,
        Error,
        Panic,
    }

    pub struct StubOracle {
        mode: OracleMode,
        gate: Option<Arc<Notify>>,
        calls: AtomicUsize,
    }

    impl StubOracle {
        pub fn new(mode: OracleMode) -> Self {
            Self {
                mode,
                gate: None,
                calls: AtomicUsize::new(0),
            }
        }

        // Holds every check until the gate is notified
        pub fn gated(mode: OracleMode, gate: Arc<Notify>) -> Self {
            Self {
                mode,
                gate: Some(gate),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AvailabilityOracle for StubOracle {
        async fn check(
            &self,
            _room_type: &str,
            _date: NaiveDate,
        ) -> Result<bool, AvailabilityError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            match self.mode {
                OracleMode::Available => Ok(true),
                OracleMode::Unavailable => Ok(false),
                OracleMode::Error => Err(AvailabilityError::ServiceUnavailable(
                    "inventory service returned 503".to_string(),
                )),
                OracleMode::Panic => panic!("inventory client bug"),
            }
        }
    }

    #[derive(Debug, Clone)]
    pub enum GatewayMode {
        Echo,
        // Echoes after sleeping, like a store that commits and then answers slowly
        Delayed(Duration),
        Reject(String),
        Panic,
    }

    pub struct StubGateway {
        mode: GatewayMode,
        gate: Option<Arc<Notify>>,
        calls: AtomicUsize,
        completed: AtomicUsize,
    }

    impl StubGateway {
        pub fn new(mode: GatewayMode) -> Self {
            Self {
                mode,
                gate: None,
                calls: AtomicUsize::new(0),
                completed: AtomicUsize::new(0),
            }
        }

        pub fn gated(mode: GatewayMode, gate: Arc<Notify>) -> Self {
            Self {
                mode,
                gate: Some(gate),
                calls: AtomicUsize::new(0),
                completed: AtomicUsize::new(0),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        // Inserts that ran to the end, whether or not anyone was still waiting
        pub fn completed(&self) -> usize {
            self.completed.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PersistenceGateway for StubGateway {
        async fn insert(&self, record: BookingRecord) -> Result<StoredBooking, GatewayError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            let result = match &self.mode {
                GatewayMode::Echo => Ok(StoredBooking {
                    id: format!("stored-{}", call),
                    created_at: None,
                    record,
                }),
                GatewayMode::Delayed(delay) => {
                    tokio::time::sleep(*delay).await;
                    Ok(StoredBooking {
                        id: format!("stored-{}", call),
                        created_at: None,
                        record,
                    })
                }
                GatewayMode::Reject(message) => Err(GatewayError::Rejected(message.clone())),
                GatewayMode::Panic => panic!("driver bug"),
            };
            self.completed.fetch_add(1, Ordering::SeqCst);
            result
        }
    }
}
