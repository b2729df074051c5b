// SPDX-License-Identifier: BUSL-1.1
//! # portflow-clearance — Container Clearance State Model
//!
//! Tracks a shipping container through customs clearance, from bill-of-lading
//! ingestion to physical release. The container carries four independent
//! status axes; every axis moves strictly forward, one discrete step per
//! action, and the primary lifecycle axis is derived from the sub-axes by a
//! pure function rather than scattered conditional mutation.
//!
//! ## Modules
//!
//! - [`status`]: the four axes, their orderings, and [`status::derive_overall`].
//! - [`container`]: the `Container` aggregate, exact duty amounts, and the
//!   append-only audit ledger.
//! - [`registry`]: the action gateway — per-container serialized
//!   validate-then-commit operations, each producing exactly one audit entry.
//! - [`timeline`]: pure derivation of the five-milestone progress view.
//! - [`sync`]: polling synchronization with a stop condition on `RELEASED`.
//!
//! ## Design Principle
//!
//! Writes flow one way: gateway → status axes + audit ledger. A failed action
//! leaves the container byte-for-byte untouched; a successful one commits the
//! axis change, the derived overall status, and its audit entry in a single
//! critical section.

pub mod container;
pub mod registry;
pub mod status;
pub mod sync;
pub mod timeline;

// Re-export primary types.
pub use container::{AuditAction, AuditEntry, Container, ContainerDetails, DutyAmount};
pub use registry::ContainerRegistry;
pub use status::{
    derive_overall, ClearanceError, CustomsStatus, InspectionStatus, OverallStatus, ShippingStatus,
};
pub use sync::{next_poll, watch_container, ContainerSource, PollPolicy, WatchHandle};
pub use timeline::{derive_timeline, StepStatus, TimelineStep};
