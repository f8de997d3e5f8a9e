//! Request-scoped deadline for store calls.

use std::future::Future;
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Await a store call, giving up after `deadline`.
///
/// On expiry the store future is dropped. A `sqlx::Transaction` held by that
/// future rolls back when dropped, so only a COMMIT that was already in
/// flight can still land after the caller has seen [`AppError::Timeout`].
pub async fn with_deadline<T, F>(deadline: Duration, operation: &'static str, call: F) -> AppResult<T>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(deadline, call).await {
        Ok(result) => Ok(result?),
        Err(_) => {
            tracing::warn!(operation, ?deadline, "Store call exceeded deadline");
            Err(AppError::Timeout { operation })
        }
    }
}
