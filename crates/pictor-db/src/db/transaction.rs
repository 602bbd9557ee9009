//! Database transaction utilities

use pictor_core::AppError;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};

/// A database transaction wrapper that makes commit/rollback explicit
///
/// Dropping the guard without committing rolls the transaction back (sqlx does this when
/// the connection returns to the pool); the guard logs it so a forgotten commit is
/// visible.
///
/// # Example
///
/// ```ignore
/// use pictor_db::db::transaction::TransactionGuard;
///
/// async fn example(pool: &sqlx::PgPool) -> Result<(), pictor_core::AppError> {
///     let mut tx = TransactionGuard::begin(pool).await?;
///     sqlx::query("DELETE FROM images WHERE id = $1")
///         .bind(1_i64)
///         .execute(tx.connection()?)
///         .await?;
///     tx.commit().await
/// }
/// ```
pub struct TransactionGuard {
    transaction: Option<Transaction<'static, Postgres>>,
}

impl TransactionGuard {
    /// Begin a new database transaction
    pub async fn begin(pool: &PgPool) -> Result<Self, AppError> {
        let transaction = pool.begin().await?;
        Ok(Self {
            transaction: Some(transaction),
        })
    }

    /// Connection to run statements on inside the transaction
    pub fn connection(&mut self) -> Result<&mut PgConnection, AppError> {
        self.transaction.as_deref_mut().ok_or_else(|| {
            AppError::Internal("Transaction was already committed or rolled back".to_string())
        })
    }

    /// Commit the transaction
    pub async fn commit(mut self) -> Result<(), AppError> {
        if let Some(tx) = self.transaction.take() {
            tx.commit().await?;
        }
        Ok(())
    }

    /// Rollback the transaction
    pub async fn rollback(mut self) -> Result<(), AppError> {
        if let Some(tx) = self.transaction.take() {
            tx.rollback().await?;
        }
        Ok(())
    }

    /// Roll back after `error` and return it. A failed rollback is logged, never returned.
    pub async fn rollback_with(self, error: AppError) -> AppError {
        keep_original(self.rollback().await, error)
    }
}

fn keep_original(rollback: Result<(), AppError>, error: AppError) -> AppError {
    if let Err(rollback_error) = rollback {
        tracing::error!(
            error = %rollback_error,
            original_error = %error,
            "Transaction rollback failed"
        );
    }
    error
}

impl Drop for TransactionGuard {
    fn drop(&mut self) {
        if self.transaction.is_some() {
            tracing::warn!("Transaction was dropped without explicit commit or rollback - rolling back");
        }
    }
}
