// Copyright 2026 Martin Pool.

//! Errors from checking captured output.

use thiserror::Error;

#[allow(unused)] // for docstrings
use crate::Tester;

/// Errors returned by [Tester].
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// [Tester::finalize] was called but no output was ever declared, so no
    /// capture episode is in progress.
    #[error("capture episode not started: declare expected output before finalizing")]
    NotStarted,
}

/// Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
