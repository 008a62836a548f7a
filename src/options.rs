// Copyright 2022-2026 Martin Pool.

use crate::Destination;
#[allow(unused)] // for docstrings
use crate::Runner;

/// Options controlling a [Runner].
///
/// These are supplied to [Runner::new]. The destinations can later be
/// swapped through [crate::Host::set_destination], which is what
/// [crate::Tester] does while it captures output.
///
/// The default options created by [Options::default] print results to
/// stdout, diagnostics to stderr, and a plan line at [Runner::finish].
///
/// # Example
///
/// ```
/// use mace::{Destination, Options};
///
/// let options = Options::new()
///     .result(Destination::capture())
///     .autosummary(false); // Don't print "1..N" at the end.
/// ```
#[derive(Debug, Clone)]
pub struct Options {
    /// Where "ok" and "not ok" lines go.
    pub(crate) result: Destination,

    /// Where diagnostic comments go.
    pub(crate) diagnostic: Destination,

    /// Print the plan when the run is finished?
    pub(crate) autosummary: bool,
}

impl Options {
    /// Return the default options: results to stdout, diagnostics to stderr,
    /// and a summary at the end.
    pub const fn new() -> Options {
        Options {
            result: Destination::Stdout,
            diagnostic: Destination::Stderr,
            autosummary: true,
        }
    }

    /// Set where test results are written.
    pub fn result(self, result: Destination) -> Options {
        Options { result, ..self }
    }

    /// Set where diagnostics are written.
    pub fn diagnostic(self, diagnostic: Destination) -> Options {
        Options { diagnostic, ..self }
    }

    /// Set whether [Runner::finish] prints a `1..N` plan line.
    ///
    /// The summary is also suppressed, regardless of this setting, once a
    /// [crate::Tester] has captured the runner's output.
    pub fn autosummary(self, autosummary: bool) -> Options {
        Options {
            autosummary,
            ..self
        }
    }
}

impl Default for Options {
    /// Create default options.
    ///
    /// This is the same as [Options::new].
    fn default() -> Options {
        Options::new()
    }
}
