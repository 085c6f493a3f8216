use anyhow::Result;
use inquire::InquireError;

mod spinner;
mod style;

pub use spinner::{Spinner, TransferBar};
pub use style::Style;

/// Ctrl+C and Escape both end a prompt without an answer.
const fn is_prompt_cancelled(err: &InquireError) -> bool {
    matches!(
        err,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

/// Runs an interactive flow, turning a cancelled prompt into `Ok(None)`.
///
/// Any other error is returned unchanged. The terminal line left behind by
/// the aborted prompt is closed before returning.
pub fn prompt_flow<T, F>(f: F) -> Result<Option<T>>
where
    F: FnOnce() -> Result<T>,
{
    match f() {
        Ok(value) => Ok(Some(value)),
        Err(e)
            if e.downcast_ref::<InquireError>()
                .is_some_and(is_prompt_cancelled) =>
        {
            eprintln!();
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
