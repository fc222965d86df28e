//! Transfer execution
//!
//! - `call` - transfer methods, arguments and the client trait
//! - `strategy` - ordered call shapes
//! - `executor` - balance pre-check, attempt loop and verification

pub mod balance;
pub mod call;
pub mod classify;
pub mod executor;
pub mod strategy;

pub use call::{ArgValue, CallArgs, TransferClient, TransferMethod};
pub use classify::{classify, FailureKind};
pub use executor::{
    verify, AttemptRecord, AttemptResult, TransferExecutor, TransferOutcome, TransferReport,
    Verification,
};
pub use strategy::{build_attempts, AttemptOutcome, CallShape, TransferStrategy};
