//! Pure diffing for prescription reconciliation.
//!
//! An update payload carries the program's desired prescription set. Rows
//! that name a recognized existing id are updates, rows without one are
//! inserts, and existing rows missing from the payload become delete
//! candidates. The completion-history guard that protects referenced rows
//! from deletion lives in the program service, next to the query it needs.

use std::collections::HashSet;

use serde::Deserialize;

use super::{ServiceError, ServiceResult};

/// One prescription row as supplied in a program create/update payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionInput {
    pub id: Option<i32>,
    pub exercise_id: i32,
    pub order: Option<i32>,
    pub sets: i32,
    pub reps: Option<i32>,
    pub duration: Option<i32>,
    pub rest_duration: Option<i32>,
}

impl PrescriptionInput {
    /// Checks the invariants the storage layer also enforces, before any
    /// write happens.
    pub fn validate(&self) -> ServiceResult<()> {
        if self.reps.is_none() && self.duration.is_none() {
            return Err(ServiceError::Validation(
                "A prescription requires reps or a duration".to_string(),
            ));
        }
        if self.sets < 1 {
            return Err(ServiceError::Validation(
                "A prescription requires at least one set".to_string(),
            ));
        }
        if matches!(self.order, Some(order) if order < 1) {
            return Err(ServiceError::Validation(
                "Prescription order must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct ReconcilePlan {
    /// Payload rows whose id matched an existing row, updated in place
    pub to_update: Vec<PrescriptionInput>,
    /// Payload rows with no recognized id, inserted as new
    pub to_insert: Vec<PrescriptionInput>,
    /// Existing ids absent from the payload. Deletion of any candidate
    /// referenced by completion history is suppressed by the caller.
    pub to_delete_candidates: Vec<i32>,
}

pub fn reconcile(existing_ids: &[i32], incoming: &[PrescriptionInput]) -> ReconcilePlan {
    let existing: HashSet<i32> = existing_ids.iter().copied().collect();

    let mut plan = ReconcilePlan::default();
    let mut recognized = HashSet::new();

    for row in incoming {
        match row.id {
            Some(id) if existing.contains(&id) => {
                recognized.insert(id);
                plan.to_update.push(row.clone());
            }
            _ => plan.to_insert.push(row.clone()),
        }
    }

    plan.to_delete_candidates = existing_ids
        .iter()
        .copied()
        .filter(|id| !recognized.contains(id))
        .collect();

    plan
}
