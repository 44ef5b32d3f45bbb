/// Domain module containing core business logic and data types
///
/// This module defines the Habit record, its validation rules, and the
/// lifecycle engine that toggles completion days, computes progress and
/// moves habits between active, completed and archived.

pub mod calendar;
pub mod filter;
pub mod habit;
pub mod lifecycle;
pub mod types;

// Re-export public types for easy access
pub use calendar::*;
pub use filter::*;
pub use habit::*;
pub use lifecycle::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid habit title: {0}")]
    InvalidTitle(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid value: {message}")]
    InvalidValue { message: String },

    #[error("Cannot move a {from} habit to {to}")]
    InvalidTransition { from: HabitStatus, to: HabitStatus },
}
