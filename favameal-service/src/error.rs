use diesel::result::{Error as DieselError, QueryResult};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Validation(String),
    #[error("database error: {0}")]
    Database(#[from] DieselError),
    #[error("failed to run migrations: {0}")]
    Migration(Box<dyn std::error::Error + Send + Sync>),
}

pub(crate) trait OrNotFound<T> {
    fn or_not_found(self, entity: &'static str) -> Result<T, ServiceError>;
}

impl<T> OrNotFound<T> for QueryResult<T> {
    fn or_not_found(self, entity: &'static str) -> Result<T, ServiceError> {
        self.map_err(|err| match err {
            DieselError::NotFound => ServiceError::NotFound(entity),
            err => ServiceError::Database(err),
        })
    }
}

/// Rejects blank text and text longer than `max_len` characters.
pub(crate) fn require_text(field: &str, value: &str, max_len: usize) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::Validation(format!("{field} is required")));
    }
    if value.chars().count() > max_len {
        return Err(ServiceError::Validation(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(())
}
