//! Conversions from external infrastructure errors into domain errors.

use memora_domain::MemoraError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub MemoraError);

impl From<InfraError> for MemoraError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<MemoraError> for InfraError {
    fn from(value: MemoraError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoMemoraError {
    fn into_memora(self) -> MemoraError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → MemoraError */
/* -------------------------------------------------------------------------- */

impl IntoMemoraError for SqlError {
    fn into_memora(self) -> MemoraError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => {
                        MemoraError::Persistence("database is busy".into())
                    }
                    (ErrorCode::DatabaseLocked, _) => {
                        MemoraError::Persistence("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, 2067) => {
                        MemoraError::Persistence("unique constraint violation".into())
                    }
                    (ErrorCode::ConstraintViolation, 787) => {
                        MemoraError::Persistence("foreign key constraint violation".into())
                    }
                    _ => MemoraError::Persistence(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => MemoraError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                MemoraError::Persistence(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                MemoraError::Persistence(format!("invalid column type: {ty}"))
            }
            RE::Utf8Error(_) => {
                MemoraError::Persistence("invalid UTF-8 returned from sqlite".into())
            }
            RE::InvalidParameterName(parameter_name) => {
                MemoraError::Persistence(format!("invalid parameter name: {parameter_name}"))
            }
            RE::InvalidPath(path) => MemoraError::Persistence(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            RE::InvalidQuery => MemoraError::Persistence("invalid SQL query".into()),
            other => MemoraError::Persistence(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_memora())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → MemoraError */
/* -------------------------------------------------------------------------- */

impl IntoMemoraError for HttpError {
    fn into_memora(self) -> MemoraError {
        if self.is_timeout() {
            return MemoraError::Network("HTTP request timed out".into());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return MemoraError::Network("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 => MemoraError::AuthRequired(format!(
                    "{message}: please reconnect your calendar account"
                )),
                404 => MemoraError::NotFound(message),
                _ => MemoraError::ExternalApi { status: code, message },
            };
        }

        MemoraError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_memora())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
