use autonomo_core::{AppError, AppResult};
use tracing::error;

use crate::ports::Notifier;

/// Derives the operator message for a failure, logs it and raises an error toast.
pub(crate) fn report_failure(
    notifier: &dyn Notifier,
    operation: &'static str,
    failure: &AppError,
    fallback: &str,
) -> String {
    let message = match failure {
        AppError::Validation(message) => message.clone(),
        other => other.user_message(fallback),
    };

    error!(
        operation,
        kind = failure.kind().as_str(),
        error = %failure,
        "{message}"
    );
    notifier.error(message.as_str());
    message
}

/// Converts a result into an option, reporting the failure when there is one.
pub(crate) fn settle<T>(
    notifier: &dyn Notifier,
    operation: &'static str,
    result: AppResult<T>,
    fallback: &str,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(failure) => {
            report_failure(notifier, operation, &failure, fallback);
            None
        }
    }
}
