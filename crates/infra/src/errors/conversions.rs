//! Conversions from external infrastructure errors into domain errors.

use std::time::Duration;

use lago_domain::LagoError;
use r2d2::Error as PoolError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;
use serde_json::Error as JsonError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub LagoError);

impl From<InfraError> for LagoError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<LagoError> for InfraError {
    fn from(value: LagoError) -> Self {
        InfraError(value)
    }
}

trait IntoLagoError {
    fn into_lago(self) -> LagoError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → LagoError */
/* -------------------------------------------------------------------------- */

impl IntoLagoError for SqlError {
    fn into_lago(self) -> LagoError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match err.code {
                    ErrorCode::DatabaseBusy => LagoError::Storage("storage is busy".into()),
                    ErrorCode::DatabaseLocked => LagoError::Storage("storage is locked".into()),
                    ErrorCode::ReadOnly => LagoError::Storage("storage is read-only".into()),
                    ErrorCode::CannotOpen => {
                        LagoError::Storage(format!("cannot open storage file: {message}"))
                    }
                    _ => LagoError::Storage(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::FromSqlConversionFailure(_, _, cause) => {
                LagoError::Storage(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                LagoError::Storage(format!("invalid column type: {ty}"))
            }
            RE::InvalidPath(path) => {
                LagoError::Config(format!("invalid storage path: {}", path.to_string_lossy()))
            }
            other => LagoError::Storage(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_lago())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → LagoError */
/* -------------------------------------------------------------------------- */

impl From<PoolError> for InfraError {
    fn from(value: PoolError) -> Self {
        InfraError(LagoError::Storage(format!("storage pool unavailable: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → LagoError */
/* -------------------------------------------------------------------------- */

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(LagoError::Decode(value.to_string()))
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → LagoError */
/* -------------------------------------------------------------------------- */

/// Map a reqwest error, reporting `timeout` as the elapsed budget.
pub(crate) fn http_error(err: HttpError, timeout: Duration) -> LagoError {
    if err.is_timeout() {
        return LagoError::Timeout(timeout);
    }
    err.into_lago()
}

impl IntoLagoError for HttpError {
    fn into_lago(self) -> LagoError {
        if self.is_timeout() {
            return LagoError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return LagoError::Network("HTTP connection failure".into());
        }

        if self.is_decode() {
            return LagoError::Decode(format!("invalid response body: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));
            return LagoError::Http { status: code, message };
        }

        LagoError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_lago())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
