//! Failure logging shared by the managers.

use recorder_types::ManagerError;

/// Logs a failed manager operation at a level matching the error kind.
///
/// Domain rejections are `warn`, store failures are `error`.
pub(crate) fn log_failure(operation: &'static str, err: &ManagerError) {
    match err {
        ManagerError::Repository(source) => {
            tracing::error!(operation, error = %source, "store failure, unit of work rolled back");
        }
        other => {
            tracing::warn!(operation, error = %other, "request rejected");
        }
    }
}
