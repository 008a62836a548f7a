// Copyright 2026 Martin Pool.

//! A capture channel: what was written to one output stream, and what the
//! test expected to be written.

use std::fmt;
use std::io;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use crate::color;
use crate::diff::{self, Highlighted};

/// One of the two buffers that stand in for an output stream while a
/// [crate::Tester] episode is running.
///
/// A channel holds the `actual` text written to it through
/// [Channel::capture], and separately the `expected` text built up by
/// [Channel::declare].
///
/// Channels are cheap handles: clones share the same buffers. This is how the
/// same channel is both owned by the [crate::Tester] and installed as a
/// [crate::Destination] of the host.
#[derive(Clone)]
pub struct Channel {
    label: &'static str,
    buffers: Arc<Mutex<Buffers>>,
}

#[derive(Default)]
struct Buffers {
    actual: String,
    expected: String,
    /// Set while a [crate::Tester] has this channel installed on its host.
    in_episode: bool,
}

impl Channel {
    /// Make a new empty channel, identified in complaints by `label`.
    pub fn new(label: &'static str) -> Channel {
        Channel {
            label,
            buffers: Arc::default(),
        }
    }

    /// The name used for this channel in complaints, such as `"STDOUT"`.
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Append lines to the expected output.
    ///
    /// Each item that does not already end in `\n` has one appended.
    /// Newlines inside an item are kept as they are, so
    /// `declare(["a\nb"])` expects the same as `declare(["a", "b"])`.
    ///
    /// ```
    /// let channel = mace::Channel::new("STDOUT");
    /// channel.declare(["ok 1", "ok 2\n"]);
    /// assert_eq!(channel.expected(), "ok 1\nok 2\n");
    /// ```
    pub fn declare<I, S>(&self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut buffers = self.buffers.lock();
        for line in lines {
            let line = line.as_ref();
            buffers.expected.push_str(line);
            if !line.ends_with('\n') {
                buffers.expected.push('\n');
            }
        }
    }

    /// Append text to the actual output, exactly as given.
    ///
    /// This is the hook that output written to a redirected host stream
    /// arrives through.
    pub fn capture(&self, text: &str) {
        trace!(channel = self.label, len = text.len(), "captured");
        self.buffers.lock().actual.push_str(text);
    }

    /// Return true if the captured output is exactly what was expected.
    ///
    /// A channel that nothing was written to and nothing was declared on
    /// passes.
    pub fn check(&self) -> bool {
        let buffers = self.buffers.lock();
        buffers.actual == buffers.expected
    }

    /// Describe how the captured output differs from what was expected.
    ///
    /// The result looks like `STDOUT is 'not ok 1\n' not 'ok 1\n' as
    /// expected`. If [crate::color_mode] is on, both strings are highlighted
    /// to show where they start to differ.
    ///
    /// This is only meaningful when [Channel::check] is false.
    pub fn complaint(&self) -> String {
        self.complaint_with(color::use_color())
    }

    /// Describe the mismatch, highlighting the point of divergence if
    /// `color` is true, regardless of [crate::color_mode].
    pub fn complaint_with(&self, color: bool) -> String {
        self.highlighted_complaint(color).to_string()
    }

    /// Describe the mismatch as [Highlighted] text, so that the markers can
    /// be stripped again.
    ///
    /// Stripping a colored complaint gives exactly the plain one, even when
    /// the captured output has escape codes of its own.
    ///
    /// ```
    /// let channel = mace::Channel::new("STDOUT");
    /// channel.declare(["ok 1"]);
    /// channel.capture("\x1b[1mok 1\x1b[0m\n");
    /// assert_eq!(
    ///     channel.highlighted_complaint(true).strip(),
    ///     channel.complaint_with(false),
    /// );
    /// ```
    pub fn highlighted_complaint(&self, color: bool) -> Highlighted {
        let buffers = self.buffers.lock();
        let (actual, expected) = (buffers.actual.as_str(), buffers.expected.as_str());
        let mut out = Highlighted::from(self.label);
        out.push_str(" is '");
        if color {
            let index = diff::divergence(actual, expected);
            out.push(&diff::highlight(actual, index));
            out.push_str("' not '");
            out.push(&diff::highlight(expected, index));
        } else {
            out.push_str(actual);
            out.push_str("' not '");
            out.push_str(expected);
        }
        out.push_str("' as expected");
        out
    }

    /// Clear both the captured and expected output.
    pub fn reset(&self) {
        let mut buffers = self.buffers.lock();
        buffers.actual.clear();
        buffers.expected.clear();
    }

    /// Return a copy of the output captured so far.
    pub fn actual(&self) -> String {
        self.buffers.lock().actual.clone()
    }

    /// Return a copy of the output expected so far.
    pub fn expected(&self) -> String {
        self.buffers.lock().expected.clone()
    }

    /// True while a [crate::Tester] episode has this channel installed.
    pub(crate) fn in_episode(&self) -> bool {
        self.buffers.lock().in_episode
    }

    pub(crate) fn set_in_episode(&self, in_episode: bool) {
        self.buffers.lock().in_episode = in_episode;
    }
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let buffers = self.buffers.lock();
        f.debug_struct("Channel")
            .field("label", &self.label)
            .field("actual", &buffers.actual)
            .field("expected", &buffers.expected)
            .finish()
    }
}

/// Bytes written through [io::Write] are captured as text; invalid UTF-8 is
/// replaced, so multi-byte characters should not be split across writes.
impl io::Write for Channel {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.capture(&String::from_utf8_lossy(buf));
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl fmt::Write for Channel {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.capture(s);
        Ok(())
    }
}
