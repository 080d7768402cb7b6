//! Tool error type
//!
//! Separates caller mistakes (bad input, missing rows, conflicts) from
//! failures on our side so the MCP layer can report them differently.

use thiserror::Error;

use crate::db::DbError;
use crate::portions::PortionError;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{entity} not found (id {id})")]
    NotFound { entity: &'static str, id: i64 },

    #[error("{0}")]
    Invalid(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Portion(#[from] PortionError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Export failed: {0}")]
    Export(String),
}

impl ToolError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        ToolError::Invalid(msg.into())
    }

    /// True when the caller can fix the request
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ToolError::NotFound { .. }
                | ToolError::Invalid(_)
                | ToolError::Conflict(_)
                | ToolError::Portion(_)
        )
    }
}

impl From<rusqlite::Error> for ToolError {
    fn from(e: rusqlite::Error) -> Self {
        ToolError::Database(DbError::Sqlite(e))
    }
}

pub type ToolResult<T> = Result<T, ToolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors() {
        assert!(ToolError::NotFound { entity: "Recipe", id: 3 }.is_client_error());
        assert!(ToolError::from(PortionError::InvalidServings { servings: 0 }).is_client_error());
        assert!(!ToolError::Export("disk full".into()).is_client_error());
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ToolError::NotFound { entity: "Meal plan", id: 9 }.to_string(),
            "Meal plan not found (id 9)"
        );
        assert_eq!(
            ToolError::from(PortionError::InvalidPeopleCount { people_count: 0 }).to_string(),
            "People count must be positive (got 0)"
        );
    }
}
