use crate::common::error::AppError;

// ---
// Helper de escrita: converte violações de constraint em falha de gravação
// ---
/// Erros de banco que representam uma escrita rejeitada (unique, FK, check)
/// viram `AppError::WriteFailed`; o resto continua sendo erro interno.
pub(crate) fn map_write_error(e: sqlx::Error) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation()
            || db_err.is_foreign_key_violation()
            || db_err.is_check_violation()
        {
            tracing::warn!("Escrita rejeitada pelo banco: {}", db_err);
            return AppError::WriteFailed;
        }
    }
    e.into()
}

/// Escrita com zero linhas afetadas também é falha de gravação.
pub(crate) fn ensure_rows_affected(rows: u64) -> Result<(), AppError> {
    if rows == 0 {
        return Err(AppError::WriteFailed);
    }
    Ok(())
}
