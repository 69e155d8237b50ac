//! Instrumentation wrapper for facade operations

use super::*;
use std::future::Future;
use std::time::Instant;

/// Measure an asynchronous facade operation and record its outcome
///
/// # Example
/// ```no_run
/// use property_browser::metrics::measure_operation;
///
/// # async fn run() -> property_browser::error::Result<usize> {
/// let count = measure_operation("get_all", async {
///     Ok::<_, property_browser::AppError>(42usize)
/// })
/// .await?;
/// # Ok(count)
/// # }
/// ```
pub async fn measure_operation<F, T, E>(operation: &str, f: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    let start = Instant::now();
    let result = f.await;
    let duration = start.elapsed().as_secs_f64();

    let outcome = if result.is_ok() { "ok" } else { "error" };
    OPERATIONS_TOTAL
        .with_label_values(&[operation, outcome])
        .inc();
    OPERATION_DURATION_SECONDS
        .with_label_values(&[operation])
        .observe(duration);

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_measure_operation_counts_outcomes() {
        let ok_before = OPERATIONS_TOTAL.with_label_values(&["test_op", "ok"]).get();
        let err_before = OPERATIONS_TOTAL.with_label_values(&["test_op", "error"]).get();

        let value = measure_operation("test_op", async { Ok::<_, String>(7) }).await;
        assert_eq!(value, Ok(7));

        let failed = measure_operation("test_op", async { Err::<u32, _>("boom".to_string()) }).await;
        assert!(failed.is_err());

        assert_eq!(
            OPERATIONS_TOTAL.with_label_values(&["test_op", "ok"]).get(),
            ok_before + 1.0
        );
        assert_eq!(
            OPERATIONS_TOTAL.with_label_values(&["test_op", "error"]).get(),
            err_before + 1.0
        );
    }
}
