//! Domain types for the triage engine.
//!
//! A [`Request`] is one inbound support case. It is created by the intake
//! collaborator, drafted by the AI collaborator, acted on by an operator and
//! finally archived in the `CLOSED` state. The canonical record is owned by the
//! request store; everything else works on copies.

use crate::error::{Result, TriageError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

// ============================================================================
// Identifiers
// ============================================================================

/// Stable, unique identifier of a request
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(u64);

impl RequestId {
    /// Wrap a raw identifier
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw identifier
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The operator who acted on a request
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperatorRef {
    /// Operator account id
    pub id: u64,
    /// Display name, exported as `operatorName`
    pub name: String,
}

impl OperatorRef {
    /// Creates a new `OperatorRef`
    #[must_use]
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

// ============================================================================
// Enumerations
// ============================================================================

/// How the request reached the desk
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Channel {
    /// Inbound e-mail
    Email,
    /// Web form submission
    Form,
}

impl Channel {
    /// Wire name used by exports
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "EMAIL",
            Self::Form => "FORM",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a request
///
/// `NEW → PENDING → {APPROVED, EDITED} → SENT → CLOSED`. The legal moves are
/// centralised in [`crate::lifecycle::LifecycleAction`] and
/// [`RequestStatus::next`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    /// Produced by intake, not yet visible to operators
    New,
    /// Waiting in the triage queue
    Pending,
    /// Operator accepted the AI draft verbatim
    Approved,
    /// Operator replaced the AI draft
    Edited,
    /// Answer delivered to the customer
    Sent,
    /// Archived, terminal
    Closed,
}

impl RequestStatus {
    /// Wire name used by exports and logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Edited => "EDITED",
            Self::Sent => "SENT",
            Self::Closed => "CLOSED",
        }
    }

    /// Position along the lifecycle; `APPROVED` and `EDITED` share a rank
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::New => 0,
            Self::Pending => 1,
            Self::Approved | Self::Edited => 2,
            Self::Sent => 3,
            Self::Closed => 4,
        }
    }

    /// Whether an operator answer must be present in this state
    #[must_use]
    pub const fn has_operator_answer(self) -> bool {
        self.rank() >= 2
    }

    /// Whether the response has gone out in this state
    #[must_use]
    pub const fn is_responded(self) -> bool {
        matches!(self, Self::Sent | Self::Closed)
    }

    /// Whether the request still waits for an operator
    #[must_use]
    pub const fn is_awaiting_operator(self) -> bool {
        matches!(self, Self::New | Self::Pending)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which operator action resolved the request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Resolution {
    /// AI draft sent verbatim
    Approved,
    /// Operator-written answer sent
    Edited,
}

// ============================================================================
// Categories
// ============================================================================

/// Conventional request categories.
///
/// The category field is free-form; these are the values the desk knows how
/// to label. Anything else is kept verbatim.
pub mod category {
    /// Technical / product questions
    pub const TECHNICAL: &str = "TECHNICAL";
    /// Payments and invoices
    pub const BILLING: &str = "BILLING";
    /// Account management
    pub const ACCOUNT: &str = "ACCOUNT";
    /// General questions
    pub const GENERAL: &str = "GENERAL";
    /// Everything else
    pub const OTHER: &str = "OTHER";

    /// Known categories in canonical order
    pub const KNOWN: [&str; 5] = [TECHNICAL, BILLING, ACCOUNT, GENERAL, OTHER];

    /// Map a raw intake category onto the canonical spelling.
    ///
    /// Blank input becomes `OTHER`; recognised aliases (including the Russian
    /// labels used by the intake form) map onto the known set; anything else
    /// is trimmed and otherwise kept verbatim.
    #[must_use]
    pub fn normalize(raw: Option<&str>) -> String {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return OTHER.to_string();
        };

        let upper = raw.to_uppercase();
        let canonical = match upper.as_str() {
            "TECHNICAL" | "ОБРАЩЕНИЕ ПО ПРОДУКЦИИ" | "ПРОДУКЦИЯ" | "ТЕХНИЧЕСКОЕ" => TECHNICAL,
            "BILLING" | "ОПЛАТА" | "ФИНАНСЫ" => BILLING,
            "ACCOUNT" | "АККАУНТ" | "УЧЕТНАЯ ЗАПИСЬ" => ACCOUNT,
            "GENERAL" | "ОБЩЕЕ" => GENERAL,
            "OTHER" => OTHER,
            _ => return raw.to_string(),
        };
        canonical.to_string()
    }

    /// Human label for dashboards
    #[must_use]
    pub fn label(category: &str) -> String {
        match category {
            TECHNICAL => "Technical".to_string(),
            BILLING => "Billing".to_string(),
            ACCOUNT => "Account".to_string(),
            GENERAL => "General".to_string(),
            OTHER => "Other".to_string(),
            other => other.to_string(),
        }
    }

    /// Canonical position of a known category, `None` for custom ones
    #[must_use]
    pub fn position(category: &str) -> Option<usize> {
        KNOWN.iter().position(|known| *known == category)
    }
}

// ============================================================================
// Request
// ============================================================================

/// One inbound support case
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// Stable identity
    pub id: RequestId,
    /// Origin channel
    pub channel: Channel,

    /// Contact e-mail
    pub email: Option<String>,
    /// Contact full name
    pub full_name: Option<String>,
    /// Contact organization
    pub organization: Option<String>,
    /// Contact phone
    pub phone: Option<String>,
    /// Taxpayer id of the organization
    pub tax_id: Option<String>,
    /// Country or region
    pub country_region: Option<String>,

    /// Free-form category, conventionally one of [`category::KNOWN`]
    pub category: Option<String>,
    /// Project the request belongs to, present only on some requests
    pub project: Option<String>,
    /// Device the request is about
    pub device_type: Option<String>,
    /// Device serial number
    pub serial_number: Option<String>,

    /// Original inbound text
    pub user_message: String,
    /// Machine-generated candidate response
    pub ai_draft_answer: String,
    /// Answer committed by the operator
    pub operator_answer: Option<String>,
    /// Internal notes, never sent to the customer
    pub operator_notes: Option<String>,
    /// Drafting confidence in `[0.0, 1.0]`; display and sort only
    pub confidence_score: f64,

    /// Lifecycle state
    pub status: RequestStatus,
    /// How the operator resolved the request, once they have
    pub resolution: Option<Resolution>,
    /// Operator who acted on the request
    pub assigned_operator: Option<OperatorRef>,
    /// Intake time
    pub created_at: DateTime<Utc>,
    /// Last lifecycle change
    pub updated_at: DateTime<Utc>,
    /// When the answer was sent
    pub responded_at: Option<DateTime<Utc>>,

    /// Revision counter used for optimistic concurrency in the store
    pub version: u64,
}

impl Request {
    /// Creates a `NEW` request as the intake collaborator would
    #[must_use]
    pub fn new(
        id: RequestId,
        channel: Channel,
        user_message: impl Into<String>,
        ai_draft_answer: impl Into<String>,
        confidence_score: f64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            channel,
            email: None,
            full_name: None,
            organization: None,
            phone: None,
            tax_id: None,
            country_region: None,
            category: None,
            project: None,
            device_type: None,
            serial_number: None,
            user_message: user_message.into(),
            ai_draft_answer: ai_draft_answer.into(),
            operator_answer: None,
            operator_notes: None,
            confidence_score,
            status: RequestStatus::New,
            resolution: None,
            assigned_operator: None,
            created_at,
            updated_at: created_at,
            responded_at: None,
            version: 0,
        }
    }

    /// Whether the request sits in the operator queue
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }

    /// Whether the request has reached the archive
    #[must_use]
    pub fn is_archived(&self) -> bool {
        self.status == RequestStatus::Closed
    }

    /// Confidence rendered as a whole percentage
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to 0..=100 first
    pub fn confidence_percent(&self) -> u32 {
        (self.confidence_score.clamp(0.0, 1.0) * 100.0).round() as u32
    }

    /// Check the data-model invariants tying answer and response time to status.
    ///
    /// # Errors
    ///
    /// [`TriageError::InvalidRecord`] describing the first violated invariant.
    pub fn check_invariants(&self) -> Result<()> {
        if self.responded_at.is_some() != self.status.is_responded() {
            return Err(TriageError::InvalidRecord(format!(
                "request {}: responded_at must be set exactly in SENT/CLOSED, status is {}",
                self.id, self.status
            )));
        }
        if self.operator_answer.is_some() != self.status.has_operator_answer() {
            return Err(TriageError::InvalidRecord(format!(
                "request {}: operator_answer must be set exactly from APPROVED onwards, status is {}",
                self.id, self.status
            )));
        }
        if !(0.0..=1.0).contains(&self.confidence_score) {
            return Err(TriageError::InvalidRecord(format!(
                "request {}: confidence score {} outside [0, 1]",
                self.id, self.confidence_score
            )));
        }
        Ok(())
    }
}

/// Queue and archive ordering: most recently created first, ties by id ascending
#[must_use]
pub fn newest_first(a: &Request, b: &Request) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| a.id.cmp(&b.id))
}
