//! The driver seam.

use std::future::Future;

use crate::builder::value::BoundArgument;
use crate::error::Error;

/// Runs compiled statements against a database.
///
/// Implemented by driver crates. The statement layer never retries and
/// never interprets driver errors: whatever `execute_update` returns is
/// handed back to the caller unchanged.
pub trait Executor: Send + Sync {
    /// The driver's error type. Compile errors are converted into it so a
    /// single `?` covers both.
    type Error: From<Error> + Send;

    /// Executes `sql` with positional `arguments` and returns the number of
    /// affected rows.
    fn execute_update(
        &self,
        sql: &str,
        arguments: &[BoundArgument],
    ) -> impl Future<Output = Result<u64, Self::Error>> + Send;
}
