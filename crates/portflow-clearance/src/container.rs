// SPDX-License-Identifier: BUSL-1.1
//! # Container Aggregate
//!
//! The `Container` aggregate root: identity, the four status axes, the
//! assessed duty amount, immutable reference data from the bill of lading,
//! and the append-only audit ledger.
//!
//! Monetary amounts are exact integer minor units — never floats — so
//! payment matching is exact equality.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::status::{CustomsStatus, InspectionStatus, OverallStatus, ShippingStatus};

// ---------------------------------------------------------------------------
// Duty amount
// ---------------------------------------------------------------------------

/// Exact monetary amount in integer minor units (e.g. cents).
///
/// Equality is field-wise: a differing currency is a mismatch even when the
/// minor-unit count agrees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyAmount {
    /// ISO 4217 currency code (e.g. "USD").
    pub currency: String,
    /// Signed minor units. Assessed duties are always non-negative; the
    /// signed representation exists so a bogus negative offer can be
    /// represented and rejected rather than silently wrapped.
    pub minor_units: i64,
}

impl DutyAmount {
    pub fn new(currency: impl Into<String>, minor_units: i64) -> Self {
        Self {
            currency: currency.into(),
            minor_units,
        }
    }
}

impl std::fmt::Display for DutyAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} (minor units)", self.currency, self.minor_units)
    }
}

// ---------------------------------------------------------------------------
// Audit ledger
// ---------------------------------------------------------------------------

/// Short action code bound to one audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    ContainerCreated,
    Validated,
    DutyAssessed,
    CustomsPayment,
    ShippingUpdate,
    InspectionScheduled,
    InspectionStarted,
    InspectionCompleted,
    ContainerReleased,
}

impl AuditAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ContainerCreated => "CONTAINER_CREATED",
            Self::Validated => "VALIDATED",
            Self::DutyAssessed => "DUTY_ASSESSED",
            Self::CustomsPayment => "CUSTOMS_PAYMENT",
            Self::ShippingUpdate => "SHIPPING_UPDATE",
            Self::InspectionScheduled => "INSPECTION_SCHEDULED",
            Self::InspectionStarted => "INSPECTION_STARTED",
            Self::InspectionCompleted => "INSPECTION_COMPLETED",
            Self::ContainerReleased => "CONTAINER_RELEASED",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable record of an action and its outcome.
///
/// Entries are append-only, never edited or removed; insertion order is the
/// display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub entry_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub action: AuditAction,
    /// Human-readable description of what happened.
    pub details: String,
    /// Who or what performed the action.
    pub actor: String,
}

// ---------------------------------------------------------------------------
// Reference data
// ---------------------------------------------------------------------------

/// Immutable reference data captured from the bill of lading at creation.
/// Never mutated by clearance actions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vessel_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub importer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port_of_loading: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port_of_discharge: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cargo_description: Option<String>,
    /// Gross cargo weight in kilograms.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cargo_weight: Option<f64>,
}

// ---------------------------------------------------------------------------
// Container
// ---------------------------------------------------------------------------

/// The aggregate root: one tracked container moving through clearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    /// Carrier container number (e.g. "MSCU1234567"). Immutable.
    pub container_id: String,
    pub overall_status: OverallStatus,
    pub customs_status: CustomsStatus,
    pub shipping_status: ShippingStatus,
    pub inspection_status: InspectionStatus,
    /// Assessed duty. Set at most once; remains visible after payment for
    /// receipt display.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customs_duty_amount: Option<DutyAmount>,
    /// Calendar date the inspection is booked for, once scheduled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inspection_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub details: ContainerDetails,
    pub created_at: DateTime<Utc>,
    /// Set on every mutation.
    pub updated_at: DateTime<Utc>,
    /// Append-only audit ledger, insertion order significant.
    pub logs: Vec<AuditEntry>,
}

impl Container {
    /// A freshly ingested container: nothing validated, nothing assessed,
    /// vessel still in transit. The creation audit entry is appended by the
    /// registry in the same step.
    pub fn new(container_id: impl Into<String>, details: ContainerDetails) -> Self {
        let now = Utc::now();
        Self {
            container_id: container_id.into(),
            overall_status: OverallStatus::PendingValidation,
            customs_status: CustomsStatus::NotStarted,
            shipping_status: ShippingStatus::InTransit,
            inspection_status: InspectionStatus::NotStarted,
            customs_duty_amount: None,
            inspection_date: None,
            details,
            created_at: now,
            updated_at: now,
            logs: Vec::new(),
        }
    }

    /// Append an audit entry and advance `updated_at`.
    ///
    /// This is the only way ledger entries come into existence, and it is
    /// called exactly once per committed mutation.
    pub(crate) fn record(&mut self, action: AuditAction, details: String, actor: &str) {
        let now = Utc::now();
        self.updated_at = now;
        self.logs.push(AuditEntry {
            entry_id: Uuid::new_v4(),
            timestamp: now,
            action,
            details,
            actor: actor.to_string(),
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
