//! State management-specific error types.

/// Commands rejected by the state store. A rejected command leaves the state
/// untouched.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StateError {
    /// Title empty after trimming
    #[error("Title must not be blank")]
    BlankTitle,

    /// Task not found in state
    #[error("Task not found: {id}")]
    TaskNotFound { id: String },
}
