use crate::common::error::AppError;

// ---
// Tradução de erros do Postgres em erros de negócio
// ---

/// Exclusão de um registro ainda referenciado (FK) vira conflito em vez de 500.
pub(crate) fn map_delete_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_foreign_key_violation() {
            return AppError::Conflict("still_referenced");
        }
    }
    err.into()
}

/// Violação de chave única vira o erro informado.
pub(crate) fn map_unique_violation(err: sqlx::Error, on_unique: AppError) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return on_unique;
        }
    }
    err.into()
}

/// `DELETE`/`UPDATE` que não afetou nenhuma linha significa registro inexistente.
pub(crate) fn ensure_affected(rows: u64, resource: &'static str) -> Result<(), AppError> {
    if rows == 0 {
        return Err(AppError::NotFound(resource));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rows_is_not_found() {
        assert!(matches!(ensure_affected(0, "bank"), Err(AppError::NotFound("bank"))));
        assert!(ensure_affected(1, "bank").is_ok());
    }

    #[test]
    fn non_database_errors_pass_through() {
        assert!(matches!(
            map_delete_error(sqlx::Error::RowNotFound),
            AppError::DatabaseError(_)
        ));
        assert!(matches!(
            map_unique_violation(sqlx::Error::PoolTimedOut, AppError::EmailAlreadyExists),
            AppError::DatabaseError(_)
        ));
    }
}
