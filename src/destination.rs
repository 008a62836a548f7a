// Copyright 2022-2026 Martin Pool.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::Channel;
#[allow(unused)] // for docstrings
use crate::{Runner, Tester};

/// Where a [Runner] sends one of its output streams.
#[derive(Debug, Clone)]
pub enum Destination {
    /// Print to stdout.
    ///
    /// Output goes through `print!` so that the Rust test framework
    /// captures it.
    Stdout,
    /// Print to stderr, through `eprint!`.
    Stderr,
    /// Append to a shared string buffer.
    ///
    /// This is intended for testing; see [Destination::capture] and
    /// [Runner::captured_output].
    Capture(Arc<Mutex<String>>),
    /// Append to the actual output of a [Channel].
    ///
    /// [Tester] installs these while an episode is running.
    Channel(Channel),
}

impl Destination {
    /// Make a destination that writes into a new, empty capture buffer.
    pub fn capture() -> Destination {
        Destination::Capture(Arc::default())
    }

    /// Return the shared buffer, if this is a [Destination::Capture].
    pub fn captured_output(&self) -> Option<Arc<Mutex<String>>> {
        match self {
            Destination::Capture(buf) => Some(Arc::clone(buf)),
            _ => None,
        }
    }

    /// True if this destination feeds a [Channel].
    pub fn is_channel(&self) -> bool {
        matches!(self, Destination::Channel(_))
    }

    /// True if a [crate::Tester] installed this destination for an episode
    /// that is still running.
    pub(crate) fn in_episode(&self) -> bool {
        matches!(self, Destination::Channel(channel) if channel.in_episode())
    }

    pub(crate) fn write_str(&self, text: &str) {
        match self {
            Destination::Stdout => print!("{text}"),
            Destination::Stderr => eprint!("{text}"),
            Destination::Capture(buf) => buf.lock().push_str(text),
            Destination::Channel(channel) => channel.capture(text),
        }
    }
}
