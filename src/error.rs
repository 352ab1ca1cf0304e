//! Error codes for the variant subsystem.
//!
//! Only allocation failures are true failures of the core. Type mismatches,
//! unbound slots and incomparable kinds all resolve to well-defined values and
//! never surface here.
//!
//! # Code ranges
//!
//! - E001..E099: write path (arena exhaustion, unusable containers)
//! - E100..E199: serde_json interop
//! - E200..E299: command-line I/O

use thiserror::Error;

/// All error codes produced by the crate.
///
/// Each variant carries the parameters needed to explain the failure; the
/// numeric code is stable and reported by the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[allow(non_camel_case_types)]
pub enum ErrorCode {
    /// E001_SlotPoolExhausted (code 1)
    #[error("E001_SlotPoolExhausted({0})")]
    E001_SlotPoolExhausted(/* limit */ u64),

    /// E002_StringPoolExhausted (code 2)
    #[error("E002_StringPoolExhausted({0}, {1})")]
    E002_StringPoolExhausted(/* requested */ u64, /* available */ u64),

    /// E003_IncompatibleContainer (code 3)
    #[error("E003_IncompatibleContainer({0})")]
    E003_IncompatibleContainer(/* kind */ &'static str),

    /// E004_NullKey (code 4)
    #[error("E004_NullKey")]
    E004_NullKey,

    /// E100_InvalidJSON (code 100)
    #[error("E100_InvalidJSON({0})")]
    E100_InvalidJSON(/* reason */ String),

    /// E101_NestingTooDeep (code 101)
    #[error("E101_NestingTooDeep({0})")]
    E101_NestingTooDeep(/* limit */ u64),

    /// E200_IoError (code 200)
    #[error("E200_IoError({0})")]
    E200_IoError(/* reason */ String),
}

impl ErrorCode {
    /// Get the numeric error code.
    pub fn code(&self) -> u32 {
        match self {
            ErrorCode::E001_SlotPoolExhausted(_) => 1,
            ErrorCode::E002_StringPoolExhausted(_, _) => 2,
            ErrorCode::E003_IncompatibleContainer(_) => 3,
            ErrorCode::E004_NullKey => 4,
            ErrorCode::E100_InvalidJSON(_) => 100,
            ErrorCode::E101_NestingTooDeep(_) => 101,
            ErrorCode::E200_IoError(_) => 200,
        }
    }

    /// Get the error name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            ErrorCode::E001_SlotPoolExhausted(_) => "E001_SlotPoolExhausted",
            ErrorCode::E002_StringPoolExhausted(_, _) => "E002_StringPoolExhausted",
            ErrorCode::E003_IncompatibleContainer(_) => "E003_IncompatibleContainer",
            ErrorCode::E004_NullKey => "E004_NullKey",
            ErrorCode::E100_InvalidJSON(_) => "E100_InvalidJSON",
            ErrorCode::E101_NestingTooDeep(_) => "E101_NestingTooDeep",
            ErrorCode::E200_IoError(_) => "E200_IoError",
        }
    }

    /// True when the arena ran out of slots or string capacity.
    pub fn is_allocation_failure(&self) -> bool {
        matches!(
            self,
            ErrorCode::E001_SlotPoolExhausted(_) | ErrorCode::E002_StringPoolExhausted(_, _)
        )
    }
}

/// Result type for operations that may allocate.
pub type VariantResult<T> = Result<T, ErrorCode>;
