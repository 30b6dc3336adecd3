// sqlx::Error -> AppError mapping
//
// Orphan rules forbid `impl From<sqlx::Error> for AppError` here, so every
// call site goes through map_sqlx_error.

use claimq_core::error::AppError;

pub(crate) fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => match db_err.code() {
            // SQLite result codes: https://www.sqlite.org/rescode.html
            Some(code) if code.as_ref() == "5" => {
                AppError::Storage(format!("Database locked (SQLITE_BUSY): {}", db_err.message()))
            }
            Some(code) if code.as_ref() == "13" => {
                AppError::Storage(format!("Database full: {}", db_err.message()))
            }
            Some(code) => AppError::Storage(format!(
                "Database error [{}]: {}",
                code.as_ref(),
                db_err.message()
            )),
            None => AppError::Storage(format!("Database error: {}", db_err.message())),
        },
        sqlx::Error::RowNotFound => AppError::Storage("Row not found".to_string()),
        sqlx::Error::ColumnNotFound(col) => AppError::Storage(format!("Column not found: {}", col)),
        _ => AppError::Storage(err.to_string()),
    }
}

/// Ids and versions are u64 in the domain but INTEGER (i64) in SQLite
pub(crate) fn to_sql_int(value: u64, what: &str) -> Result<i64, AppError> {
    i64::try_from(value).map_err(|_| AppError::Storage(format!("{} out of range: {}", what, value)))
}

pub(crate) fn from_sql_int(value: i64, what: &str) -> Result<u64, AppError> {
    u64::try_from(value).map_err(|_| AppError::Storage(format!("Negative {} in database: {}", what, value)))
}
