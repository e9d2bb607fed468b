use crate::error::AppError;
use crate::state::response_state::ExecutionResult;

#[derive(Debug)]
pub enum Event {
    /// An in-flight send finished.
    Response(Result<ExecutionResult, AppError>),
}
