// SPDX-License-Identifier: BUSL-1.1
//! # Status Axes
//!
//! The four status dimensions of a container and the rules tying them
//! together. Each axis has a fixed forward ordering; an action moves its
//! axis exactly one step, and the primary lifecycle axis (`OverallStatus`)
//! is recomputed from the sub-axes by [`derive_overall`] after every change.
//!
//! Wire representation is SCREAMING_SNAKE_CASE (`PENDING_VALIDATION`,
//! `READY_FOR_PICKUP`, ...), matching the clearance API consumed by the
//! tracking front-end.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Clearance error type
// ---------------------------------------------------------------------------

/// Errors arising from clearance operations.
///
/// Every variant is recoverable: a failed action commits nothing, and the
/// message carries the current-vs-requested detail the caller needs to
/// explain the failure to a human.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClearanceError {
    /// The requested action violates an axis ordering or a required
    /// precursor state is absent.
    #[error("invalid transition: cannot apply '{action}' to container {container_id}: {detail}")]
    InvalidTransition {
        container_id: String,
        action: &'static str,
        detail: String,
    },

    /// Payment amount does not exactly equal the assessed customs duty.
    #[error("amount mismatch for container {container_id}: assessed {assessed}, offered {offered}")]
    AmountMismatch {
        container_id: String,
        assessed: String,
        offered: String,
    },

    /// Unknown container id.
    #[error("container not found: {0}")]
    NotFound(String),

    /// A container with this id already exists.
    #[error("container already exists: {0}")]
    AlreadyExists(String),
}

// ---------------------------------------------------------------------------
// Overall lifecycle axis
// ---------------------------------------------------------------------------

/// Primary lifecycle axis, ordered:
/// `PENDING_VALIDATION → VALIDATED → CUSTOMS_CLEARED → PENDING_INSPECTION →
/// INSPECTION_PASSED | INSPECTION_FAILED → RELEASED`.
///
/// `RELEASED` and `INSPECTION_FAILED` are terminal for automatic progression;
/// a failed inspection requires external remediation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverallStatus {
    PendingValidation,
    Validated,
    CustomsCleared,
    PendingInspection,
    InspectionPassed,
    InspectionFailed,
    Released,
}

impl OverallStatus {
    /// Position in the lifecycle order. The two inspection outcomes share a
    /// rank: entering the `INSPECTION_FAILED` sink is forward movement, and
    /// nothing moves between the two outcome branches.
    pub fn rank(self) -> u8 {
        match self {
            Self::PendingValidation => 0,
            Self::Validated => 1,
            Self::CustomsCleared => 2,
            Self::PendingInspection => 3,
            Self::InspectionPassed | Self::InspectionFailed => 4,
            Self::Released => 5,
        }
    }

    /// True once no further automatic transition is possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Released | Self::InspectionFailed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PendingValidation => "PENDING_VALIDATION",
            Self::Validated => "VALIDATED",
            Self::CustomsCleared => "CUSTOMS_CLEARED",
            Self::PendingInspection => "PENDING_INSPECTION",
            Self::InspectionPassed => "INSPECTION_PASSED",
            Self::InspectionFailed => "INSPECTION_FAILED",
            Self::Released => "RELEASED",
        }
    }
}

impl std::fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Customs axis
// ---------------------------------------------------------------------------

/// Customs axis: `NOT_STARTED → PENDING_PAYMENT → PAID`.
///
/// The transition to `PENDING_PAYMENT` requires an assessed duty amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomsStatus {
    NotStarted,
    PendingPayment,
    Paid,
}

impl CustomsStatus {
    pub fn rank(self) -> u8 {
        match self {
            Self::NotStarted => 0,
            Self::PendingPayment => 1,
            Self::Paid => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "NOT_STARTED",
            Self::PendingPayment => "PENDING_PAYMENT",
            Self::Paid => "PAID",
        }
    }
}

impl std::fmt::Display for CustomsStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Shipping axis
// ---------------------------------------------------------------------------

/// Shipping axis: `IN_TRANSIT → ARRIVED → READY_FOR_PICKUP`.
///
/// Informational: reported by the carrier feed, not gated by clearance
/// actions, but still forward-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShippingStatus {
    InTransit,
    Arrived,
    ReadyForPickup,
}

impl ShippingStatus {
    pub fn rank(self) -> u8 {
        match self {
            Self::InTransit => 0,
            Self::Arrived => 1,
            Self::ReadyForPickup => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::InTransit => "IN_TRANSIT",
            Self::Arrived => "ARRIVED",
            Self::ReadyForPickup => "READY_FOR_PICKUP",
        }
    }
}

impl std::fmt::Display for ShippingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Inspection axis
// ---------------------------------------------------------------------------

/// Inspection axis: `NOT_STARTED → SCHEDULED → IN_PROGRESS → PASSED | FAILED`.
///
/// Completion is permitted from either `SCHEDULED` or `IN_PROGRESS` — an
/// inspector may record the outcome without a separate begin step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InspectionStatus {
    NotStarted,
    Scheduled,
    InProgress,
    Passed,
    Failed,
}

impl InspectionStatus {
    pub fn rank(self) -> u8 {
        match self {
            Self::NotStarted => 0,
            Self::Scheduled => 1,
            Self::InProgress => 2,
            Self::Passed | Self::Failed => 3,
        }
    }

    /// True once an outcome has been recorded.
    pub fn is_concluded(self) -> bool {
        matches!(self, Self::Passed | Self::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "NOT_STARTED",
            Self::Scheduled => "SCHEDULED",
            Self::InProgress => "IN_PROGRESS",
            Self::Passed => "PASSED",
            Self::Failed => "FAILED",
        }
    }
}

impl std::fmt::Display for InspectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Derived overall status
// ---------------------------------------------------------------------------

/// Recompute the overall status from the sub-axes.
///
/// Pure and monotone: the result never ranks below `current`, so the overall
/// axis cannot revert once advanced. Evaluated after every sub-axis change.
///
/// - `inspection == FAILED` ⇒ `INSPECTION_FAILED` (sink pending remediation).
/// - `inspection == PASSED` ⇒ `INSPECTION_PASSED`.
/// - `customs == PAID` while `VALIDATED` ⇒ `CUSTOMS_CLEARED`.
/// - `RELEASED` is reached only by the explicit release action, never here.
pub fn derive_overall(
    current: OverallStatus,
    customs: CustomsStatus,
    inspection: InspectionStatus,
) -> OverallStatus {
    if current == OverallStatus::Released {
        return current;
    }
    match inspection {
        InspectionStatus::Failed => OverallStatus::InspectionFailed,
        InspectionStatus::Passed => forward(current, OverallStatus::InspectionPassed),
        _ => {
            if customs == CustomsStatus::Paid && current == OverallStatus::Validated {
                OverallStatus::CustomsCleared
            } else {
                current
            }
        }
    }
}

/// The later of two lifecycle positions. Guards monotonicity.
fn forward(current: OverallStatus, candidate: OverallStatus) -> OverallStatus {
    if candidate.rank() >= current.rank() {
        candidate
    } else {
        current
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
