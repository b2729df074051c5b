// SPDX-License-Identifier: BUSL-1.1
//! # Container Registry — the Action Gateway
//!
//! In-memory container store backed by `DashMap`. Every action is a single
//! validate-then-commit step executed under the per-container write lock:
//! the axis change, the derived overall status, the audit entry, and the
//! `updated_at` bump commit together or not at all.
//!
//! Duplicate delivery is safe: an action whose effect has already been
//! applied returns the current snapshot without appending a second audit
//! entry. Precondition violations return [`ClearanceError`] and leave the
//! container untouched.

use chrono::{NaiveDate, Utc};
use dashmap::DashMap;

use crate::container::{AuditAction, AuditEntry, Container, ContainerDetails, DutyAmount};
use crate::status::{
    derive_overall, ClearanceError, CustomsStatus, InspectionStatus, OverallStatus, ShippingStatus,
};

/// In-memory container registry.
///
/// Thread-safe via `DashMap`: operations on one container are serialized by
/// its shard lock, operations on different containers proceed in parallel.
/// Readers receive clone-out snapshots, so a status change and its audit
/// entry are always observed together.
pub struct ContainerRegistry {
    containers: DashMap<String, Container>,
}

impl ContainerRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            containers: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    // -----------------------------------------------------------------------
    // Ingestion-facing operations
    // -----------------------------------------------------------------------

    /// Register a freshly ingested container.
    ///
    /// Initial state: `PENDING_VALIDATION` / customs `NOT_STARTED` /
    /// shipping `IN_TRANSIT` / inspection `NOT_STARTED`.
    pub fn create_container(
        &self,
        container_id: &str,
        details: ContainerDetails,
        actor: &str,
    ) -> Result<Container, ClearanceError> {
        match self.containers.entry(container_id.to_string()) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                Err(ClearanceError::AlreadyExists(container_id.to_string()))
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                let mut container = Container::new(container_id, details);
                container.record(
                    AuditAction::ContainerCreated,
                    "bill of lading ingested, container registered for clearance".to_string(),
                    actor,
                );
                let snapshot = container.clone();
                slot.insert(container);
                Ok(snapshot)
            }
        }
    }

    /// Record the document-validation outcome: `PENDING_VALIDATION → VALIDATED`.
    ///
    /// Validation happens once; a repeat call on an already-validated
    /// container is a no-op.
    pub fn mark_validated(&self, container_id: &str, actor: &str) -> Result<Container, ClearanceError> {
        let mut entry = self.get_mut(container_id)?;
        let c = entry.value_mut();
        if c.overall_status != OverallStatus::PendingValidation {
            return Ok(c.clone());
        }
        // Payment may have landed before validation; re-derive so a paid
        // container clears customs the moment its documents check out.
        c.overall_status =
            derive_overall(OverallStatus::Validated, c.customs_status, c.inspection_status);
        c.record(
            AuditAction::Validated,
            "bill of lading documents validated".to_string(),
            actor,
        );
        Ok(c.clone())
    }

    /// Record the customs duty assessment and open the payment window:
    /// customs `NOT_STARTED → PENDING_PAYMENT`.
    ///
    /// The duty amount is set at most once per container.
    pub fn assess_customs_duty(
        &self,
        container_id: &str,
        amount: DutyAmount,
        actor: &str,
    ) -> Result<Container, ClearanceError> {
        let mut entry = self.get_mut(container_id)?;
        let c = entry.value_mut();

        if let Some(assessed) = &c.customs_duty_amount {
            if *assessed == amount {
                // Duplicate delivery of the same assessment.
                return Ok(c.clone());
            }
            return Err(invalid(
                c,
                "assess_customs_duty",
                format!("customs duty already assessed at {assessed}, cannot re-assess at {amount}"),
            ));
        }
        if amount.minor_units < 0 {
            return Err(invalid(
                c,
                "assess_customs_duty",
                format!("assessed duty must be non-negative, got {amount}"),
            ));
        }
        if c.customs_status != CustomsStatus::NotStarted {
            return Err(invalid(
                c,
                "assess_customs_duty",
                format!("customs status is {}, assessment requires NOT_STARTED", c.customs_status),
            ));
        }

        c.customs_duty_amount = Some(amount.clone());
        c.customs_status = CustomsStatus::PendingPayment;
        c.record(
            AuditAction::DutyAssessed,
            format!("customs duty assessed at {amount}, payment pending"),
            actor,
        );
        Ok(c.clone())
    }

    // -----------------------------------------------------------------------
    // Clearance actions
    // -----------------------------------------------------------------------

    /// Pay the assessed customs duty: customs `PENDING_PAYMENT → PAID`.
    ///
    /// The offered amount must equal the assessed duty exactly, currency
    /// included. When the container is already `VALIDATED`, payment clears
    /// customs on the primary axis as well.
    pub fn pay_customs_duty(
        &self,
        container_id: &str,
        amount: DutyAmount,
        actor: &str,
    ) -> Result<Container, ClearanceError> {
        let mut entry = self.get_mut(container_id)?;
        let c = entry.value_mut();

        let Some(assessed) = c.customs_duty_amount.clone() else {
            return Err(invalid(
                c,
                "pay_customs_duty",
                "customs duty has not been assessed yet".to_string(),
            ));
        };
        if amount != assessed {
            return Err(ClearanceError::AmountMismatch {
                container_id: c.container_id.clone(),
                assessed: assessed.to_string(),
                offered: amount.to_string(),
            });
        }
        if c.customs_status == CustomsStatus::Paid {
            // Duplicate delivery of a payment already recorded.
            return Ok(c.clone());
        }
        if c.customs_status != CustomsStatus::PendingPayment {
            return Err(invalid(
                c,
                "pay_customs_duty",
                format!("customs status is {}, payment requires PENDING_PAYMENT", c.customs_status),
            ));
        }

        c.customs_status = CustomsStatus::Paid;
        c.overall_status = derive_overall(c.overall_status, c.customs_status, c.inspection_status);
        c.record(
            AuditAction::CustomsPayment,
            format!("customs duty of {assessed} paid"),
            actor,
        );
        Ok(c.clone())
    }

    /// Record a carrier shipping update, one forward step at a time:
    /// `IN_TRANSIT → ARRIVED → READY_FOR_PICKUP`.
    ///
    /// Informational axis: it never feeds the derived overall status.
    pub fn advance_shipping(
        &self,
        container_id: &str,
        to: ShippingStatus,
        actor: &str,
    ) -> Result<Container, ClearanceError> {
        let mut entry = self.get_mut(container_id)?;
        let c = entry.value_mut();

        if to == c.shipping_status {
            return Ok(c.clone());
        }
        if to.rank() != c.shipping_status.rank() + 1 {
            return Err(invalid(
                c,
                "advance_shipping",
                format!("shipping status is {}, cannot move to {to}", c.shipping_status),
            ));
        }

        c.shipping_status = to;
        c.record(
            AuditAction::ShippingUpdate,
            format!("shipping status updated to {to}"),
            actor,
        );
        Ok(c.clone())
    }

    /// Book the physical inspection: inspection `NOT_STARTED → SCHEDULED`,
    /// overall `CUSTOMS_CLEARED → PENDING_INSPECTION`.
    ///
    /// Requires a cleared container and a strictly future calendar date.
    pub fn schedule_inspection(
        &self,
        container_id: &str,
        date: NaiveDate,
        actor: &str,
    ) -> Result<Container, ClearanceError> {
        let mut entry = self.get_mut(container_id)?;
        let c = entry.value_mut();

        if c.inspection_status == InspectionStatus::Scheduled && c.inspection_date == Some(date) {
            return Ok(c.clone());
        }
        if c.inspection_status != InspectionStatus::NotStarted {
            return Err(invalid(
                c,
                "schedule_inspection",
                format!(
                    "inspection status is {}, scheduling requires NOT_STARTED",
                    c.inspection_status
                ),
            ));
        }
        if c.overall_status != OverallStatus::CustomsCleared {
            return Err(invalid(
                c,
                "schedule_inspection",
                format!(
                    "overall status is {}, scheduling requires CUSTOMS_CLEARED",
                    c.overall_status
                ),
            ));
        }
        if date <= Utc::now().date_naive() {
            return Err(invalid(
                c,
                "schedule_inspection",
                format!("inspection date {date} is not in the future"),
            ));
        }

        c.inspection_status = InspectionStatus::Scheduled;
        c.inspection_date = Some(date);
        c.overall_status = OverallStatus::PendingInspection;
        c.record(
            AuditAction::InspectionScheduled,
            format!("physical inspection scheduled for {date}"),
            actor,
        );
        Ok(c.clone())
    }

    /// Record that the inspector has started work: `SCHEDULED → IN_PROGRESS`.
    pub fn begin_inspection(&self, container_id: &str, actor: &str) -> Result<Container, ClearanceError> {
        let mut entry = self.get_mut(container_id)?;
        let c = entry.value_mut();

        if c.inspection_status == InspectionStatus::InProgress {
            return Ok(c.clone());
        }
        if c.inspection_status != InspectionStatus::Scheduled {
            return Err(invalid(
                c,
                "begin_inspection",
                format!("inspection status is {}, begin requires SCHEDULED", c.inspection_status),
            ));
        }

        c.inspection_status = InspectionStatus::InProgress;
        c.record(
            AuditAction::InspectionStarted,
            "physical inspection started".to_string(),
            actor,
        );
        Ok(c.clone())
    }

    /// Record the inspection outcome: inspection `{SCHEDULED, IN_PROGRESS} →
    /// PASSED | FAILED`, overall derived (`INSPECTION_PASSED` or the
    /// `INSPECTION_FAILED` sink).
    pub fn complete_inspection(
        &self,
        container_id: &str,
        passed: bool,
        actor: &str,
    ) -> Result<Container, ClearanceError> {
        let mut entry = self.get_mut(container_id)?;
        let c = entry.value_mut();

        let outcome = if passed {
            InspectionStatus::Passed
        } else {
            InspectionStatus::Failed
        };
        if c.inspection_status == outcome {
            return Ok(c.clone());
        }
        if !matches!(
            c.inspection_status,
            InspectionStatus::Scheduled | InspectionStatus::InProgress
        ) {
            return Err(invalid(
                c,
                "complete_inspection",
                format!(
                    "inspection status is {}, completion requires SCHEDULED or IN_PROGRESS",
                    c.inspection_status
                ),
            ));
        }

        c.inspection_status = outcome;
        c.overall_status = derive_overall(c.overall_status, c.customs_status, c.inspection_status);
        c.record(
            AuditAction::InspectionCompleted,
            format!("physical inspection completed, outcome: {outcome}"),
            actor,
        );
        Ok(c.clone())
    }

    /// Release the container for pickup: overall `INSPECTION_PASSED → RELEASED`.
    ///
    /// The only non-derived transition on the primary axis. A repeat call on
    /// a released container is a no-op.
    pub fn release_container(&self, container_id: &str, actor: &str) -> Result<Container, ClearanceError> {
        let mut entry = self.get_mut(container_id)?;
        let c = entry.value_mut();

        if c.overall_status == OverallStatus::Released {
            return Ok(c.clone());
        }
        if c.overall_status != OverallStatus::InspectionPassed {
            return Err(invalid(
                c,
                "release_container",
                format!(
                    "overall status is {}, release requires INSPECTION_PASSED",
                    c.overall_status
                ),
            ));
        }

        c.overall_status = OverallStatus::Released;
        c.record(
            AuditAction::ContainerReleased,
            "container released for pickup".to_string(),
            actor,
        );
        Ok(c.clone())
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Get a container snapshot by id.
    pub fn get(&self, container_id: &str) -> Option<Container> {
        self.containers.get(container_id).map(|r| r.value().clone())
    }

    /// List containers, optionally filtered by overall status, together with
    /// the count. Ordered by creation time (id as tiebreak) so the listing
    /// is stable across polls.
    pub fn list(&self, status: Option<OverallStatus>) -> (Vec<Container>, usize) {
        let mut containers: Vec<Container> = self
            .containers
            .iter()
            .filter(|r| status.map_or(true, |s| r.value().overall_status == s))
            .map(|r| r.value().clone())
            .collect();
        containers.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.container_id.cmp(&b.container_id))
        });
        let count = containers.len();
        (containers, count)
    }

    /// Full audit ledger for a container, in insertion order.
    pub fn audit_log(&self, container_id: &str) -> Result<Vec<AuditEntry>, ClearanceError> {
        self.containers
            .get(container_id)
            .map(|r| r.value().logs.clone())
            .ok_or_else(|| ClearanceError::NotFound(container_id.to_string()))
    }

    fn get_mut(
        &self,
        container_id: &str,
    ) -> Result<dashmap::mapref::one::RefMut<'_, String, Container>, ClearanceError> {
        self.containers
            .get_mut(container_id)
            .ok_or_else(|| ClearanceError::NotFound(container_id.to_string()))
    }
}

impl Default for ContainerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ContainerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerRegistry")
            .field("containers_count", &self.containers.len())
            .finish()
    }
}

/// Build an `InvalidTransition` error for the container's current state.
fn invalid(c: &Container, action: &'static str, detail: String) -> ClearanceError {
    ClearanceError::InvalidTransition {
        container_id: c.container_id.clone(),
        action,
        detail,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
