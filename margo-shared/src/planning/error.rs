/// Planning error types
///
/// Closed set of failures the planning operations can report. Callers match
/// on the variant to pick a response; the store detail stays available via
/// [`std::error::Error::source`].

use thiserror::Error;
use uuid::Uuid;

use crate::store::{StoreError, StoreOperation};

#[derive(Debug, Error)]
pub enum PlanningError {
    /// A referenced record does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },

    /// A data-store call failed
    #[error("data store call {operation} failed")]
    Upstream {
        operation: StoreOperation,
        #[source]
        source: StoreError,
    },

    /// The request itself is invalid
    #[error("validation error: {0}")]
    Validation(String),
}

impl PlanningError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        PlanningError::NotFound { entity, id }
    }

    /// Wraps a store failure, keeping the operation that raised it
    pub fn upstream(source: StoreError) -> Self {
        PlanningError::Upstream {
            operation: source.operation,
            source,
        }
    }

    /// Short machine-readable label, used as a log field
    pub fn kind(&self) -> &'static str {
        match self {
            PlanningError::NotFound { .. } => "not_found",
            PlanningError::Upstream { .. } => "upstream",
            PlanningError::Validation(_) => "validation",
        }
    }
}

impl From<StoreError> for PlanningError {
    fn from(err: StoreError) -> Self {
        PlanningError::upstream(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreErrorKind;
    use std::error::Error as _;

    #[test]
    fn test_upstream_keeps_operation_and_source() {
        let err = PlanningError::from(StoreError::new(
            StoreOperation::InsertProjects,
            StoreErrorKind::NoRows,
        ));

        match &err {
            PlanningError::Upstream { operation, .. } => {
                assert_eq!(*operation, StoreOperation::InsertProjects)
            }
            other => panic!("unexpected variant: {other:?}"),
        }
        assert_eq!(err.to_string(), "data store call insert_projects failed");
        assert!(err.source().is_some());
        assert_eq!(err.kind(), "upstream");
    }

    #[test]
    fn test_not_found_display() {
        let id = Uuid::nil();
        let err = PlanningError::not_found("campaign", id);
        assert_eq!(err.to_string(), format!("campaign not found: {id}"));
    }
}
