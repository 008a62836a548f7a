// Copyright 2026 Martin Pool.

//! A minimal producer of Test Anything Protocol output.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::{Destination, Host, Options, Stream};

/// Reports test results as TAP text.
///
/// Results are written as `ok N - name` or `not ok N - name` lines to the
/// result destination, and failures are explained by `#`-prefixed
/// comments on the diagnostic destination.
///
/// The runner may be shared across threads: its state is internally
/// synchronized.
///
/// ```
/// use mace::{Destination, Options, Runner, Stream};
///
/// let runner = Runner::new(Options::new().result(Destination::capture()));
/// runner.ok(true, Some("first"));
/// runner.ok(true, None);
/// runner.finish();
/// let out = runner.captured_output(Stream::Result).unwrap();
/// assert_eq!(out.lock().as_str(), "ok 1 - first\nok 2\n1..2\n");
/// ```
pub struct Runner {
    inner: Mutex<InnerRunner>,
}

impl Runner {
    /// Construct a runner with the given options.
    pub fn new(options: Options) -> Runner {
        Runner {
            inner: Mutex::new(InnerRunner {
                result: options.result,
                diagnostic: options.diagnostic,
                counter: 0,
                autosummary: options.autosummary,
            }),
        }
    }

    /// Report a test result, returning `passed`.
    ///
    /// A failure is followed by a diagnostic naming the failed test.
    pub fn ok(&self, passed: bool, name: Option<&str>) -> bool {
        self.inner.lock().ok(passed, name);
        passed
    }

    /// Write a diagnostic comment to the diagnostic destination.
    ///
    /// Each line of `message` is prefixed by `# `.
    pub fn diag(&self, message: &str) {
        self.inner.lock().diag(message)
    }

    /// Write a comment to the result destination.
    ///
    /// This is formatted like [Runner::diag] but goes with the results.
    pub fn note(&self, message: &str) {
        let inner = self.inner.lock();
        inner.result.write_str(&commented(message));
    }

    /// Return the number of the last test reported.
    pub fn current_test(&self) -> usize {
        self.inner.lock().counter
    }

    /// Return the buffer that `stream` is written to, if it currently goes
    /// to a [Destination::Capture].
    pub fn captured_output(&self, stream: Stream) -> Option<Arc<Mutex<String>>> {
        self.destination(stream).captured_output()
    }

    /// Finish the run, returning the number of tests reported.
    ///
    /// Unless the summary was turned off, this prints the `1..N` plan.
    pub fn finish(&self) -> usize {
        let inner = self.inner.lock();
        if inner.autosummary {
            inner.result.write_str(&format!("1..{}\n", inner.counter));
        }
        inner.counter
    }
}

impl Default for Runner {
    fn default() -> Runner {
        Runner::new(Options::default())
    }
}

impl Host for Runner {
    fn destination(&self, stream: Stream) -> Destination {
        let inner = self.inner.lock();
        match stream {
            Stream::Result => inner.result.clone(),
            Stream::Diagnostic => inner.diagnostic.clone(),
        }
    }

    fn set_destination(&self, stream: Stream, destination: Destination) {
        let mut inner = self.inner.lock();
        match stream {
            Stream::Result => inner.result = destination,
            Stream::Diagnostic => inner.diagnostic = destination,
        }
    }

    fn test_counter(&self) -> usize {
        self.inner.lock().counter
    }

    fn set_test_counter(&self, counter: usize) {
        self.inner.lock().counter = counter;
    }

    fn suppress_autosummary(&self) {
        self.inner.lock().autosummary = false;
    }

    fn report_result(&self, passed: bool, name: Option<&str>) {
        self.ok(passed, name);
    }

    fn report_diagnostic(&self, message: &str) {
        self.diag(message)
    }
}

/// The real state of a Runner, inside a mutex.
struct InnerRunner {
    result: Destination,
    diagnostic: Destination,
    /// Number of the last test reported.
    counter: usize,
    autosummary: bool,
}

impl InnerRunner {
    fn ok(&mut self, passed: bool, name: Option<&str>) {
        self.counter += 1;
        self.result.write_str(&result_line(passed, self.counter, name));
        if !passed {
            self.diag(&failure_message(name));
        }
    }

    fn diag(&self, message: &str) {
        self.diagnostic.write_str(&commented(message));
    }
}

/// Format the TAP line reporting test number `n`, including the final newline.
pub(crate) fn result_line(passed: bool, n: usize, name: Option<&str>) -> String {
    let status = if passed { "ok" } else { "not ok" };
    match name {
        Some(name) if !name.is_empty() => format!("{status} {n} - {}\n", escape_name(name)),
        _ => format!("{status} {n}\n"),
    }
}

/// The diagnostic explaining that a test failed, before it is commented.
pub(crate) fn failure_message(name: Option<&str>) -> String {
    match name {
        Some(name) if !name.is_empty() => format!("  Failed test '{name}'"),
        _ => "  Failed test".to_owned(),
    }
}

/// Prefix each line of `message` with `# `, ending every line with a newline.
///
/// Lines are split only at `\n`, so a `\r` in the message is kept.
pub(crate) fn commented(message: &str) -> String {
    let mut buf = String::with_capacity(message.len() + 8);
    if message.is_empty() {
        return buf;
    }
    let body = message.strip_suffix('\n').unwrap_or(message);
    for line in body.split('\n') {
        buf.push_str("# ");
        buf.push_str(line);
        buf.push('\n');
    }
    buf
}

/// A `#` in a test name would start a TAP directive, and a newline would end
/// the line.
fn escape_name(name: &str) -> String {
    name.replace('#', "\\#").replace('\n', "\n# ")
}
