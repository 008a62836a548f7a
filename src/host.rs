// Copyright 2026 Martin Pool.

//! The interface a [crate::Tester] needs from the test runner whose output
//! it checks.

use std::sync::Arc;

use crate::Destination;

/// One of the two output streams of a test runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    /// Test results, conventionally stdout.
    Result,
    /// Diagnostics about failures, conventionally stderr.
    Diagnostic,
}

/// A test runner that a [crate::Tester] can redirect and report through.
///
/// [crate::Runner] is the implementation shipped with this crate.
///
/// Methods take `&self`: a host is shared between the code under test,
/// which reports results through it, and the tester that temporarily
/// redirects its output.
pub trait Host {
    /// Return where `stream` is currently sent.
    fn destination(&self, stream: Stream) -> Destination;

    /// Send `stream` to `destination` from now on.
    fn set_destination(&self, stream: Stream, destination: Destination);

    /// Return the number of the last test reported.
    fn test_counter(&self) -> usize;

    /// Set the number of the last test reported.
    fn set_test_counter(&self, counter: usize);

    /// Don't emit the automatic summary when the run ends.
    fn suppress_autosummary(&self);

    /// Record that a test passed or failed.
    fn report_result(&self, passed: bool, name: Option<&str>);

    /// Emit diagnostic text about a failure.
    fn report_diagnostic(&self, message: &str);
}

impl<H: Host + ?Sized> Host for &H {
    fn destination(&self, stream: Stream) -> Destination {
        (**self).destination(stream)
    }

    fn set_destination(&self, stream: Stream, destination: Destination) {
        (**self).set_destination(stream, destination)
    }

    fn test_counter(&self) -> usize {
        (**self).test_counter()
    }

    fn set_test_counter(&self, counter: usize) {
        (**self).set_test_counter(counter)
    }

    fn suppress_autosummary(&self) {
        (**self).suppress_autosummary()
    }

    fn report_result(&self, passed: bool, name: Option<&str>) {
        (**self).report_result(passed, name)
    }

    fn report_diagnostic(&self, message: &str) {
        (**self).report_diagnostic(message)
    }
}

impl<H: Host + ?Sized> Host for Arc<H> {
    fn destination(&self, stream: Stream) -> Destination {
        (**self).destination(stream)
    }

    fn set_destination(&self, stream: Stream, destination: Destination) {
        (**self).set_destination(stream, destination)
    }

    fn test_counter(&self) -> usize {
        (**self).test_counter()
    }

    fn set_test_counter(&self, counter: usize) {
        (**self).set_test_counter(counter)
    }

    fn suppress_autosummary(&self) {
        (**self).suppress_autosummary()
    }

    fn report_result(&self, passed: bool, name: Option<&str>) {
        (**self).report_result(passed, name)
    }

    fn report_diagnostic(&self, message: &str) {
        (**self).report_diagnostic(message)
    }
}
