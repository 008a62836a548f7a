// Copyright 2026 Martin Pool.

//! Run an episode of captured output and judge it.

use tracing::debug;

use crate::runner::{commented, failure_message, result_line};
use crate::{Channel, Destination, Error, Host, Result, Stream};

/// Label of the channel standing in for the result stream.
pub const RESULT_LABEL: &str = "STDOUT";

/// Label of the channel standing in for the diagnostic stream.
pub const DIAGNOSTIC_LABEL: &str = "STDERR";

/// Checks that code reporting through a [Host] prints exactly what was
/// declared.
///
/// An *episode* starts the first time expected output is declared. From then
/// on the host's result and diagnostic streams are redirected into two
/// [Channel]s, and its test counter starts again from zero so that the tests
/// run inside the episode don't disturb the outer count. [Tester::finalize]
/// puts everything back and reports a single pass or fail to the host for
/// the whole episode.
///
/// ```
/// use mace::{Destination, Options, Runner, Stream, Tester};
///
/// let runner = Runner::new(
///     Options::new()
///         .result(Destination::capture())
///         .diagnostic(Destination::capture()),
/// );
/// let mut tester = Tester::new(&runner);
///
/// tester.declare_ok(Some("adds"));
/// tester.declare_not_ok(Some("subtracts"));
///
/// // The code under test:
/// runner.ok(1 + 1 == 2, Some("adds"));
/// runner.ok(1 - 1 == 1, Some("subtracts"));
///
/// assert_eq!(tester.finalize(Some("reports both")), Ok(true));
/// let out = runner.captured_output(Stream::Result).unwrap();
/// assert_eq!(out.lock().as_str(), "ok 1 - reports both\n");
/// ```
///
/// Only one episode may be running on a host at a time.
///
/// If the tester is dropped while an episode is running, the host's
/// destinations and counter are restored but nothing is reported.
pub struct Tester<H: Host> {
    host: H,
    result: Channel,
    diagnostic: Channel,
    /// Present while an episode is running.
    saved: Option<Saved>,
    /// Number of results declared by [Tester::declare_ok] and
    /// [Tester::declare_not_ok] in this episode.
    declared_results: usize,
}

/// Host state replaced for the duration of an episode.
struct Saved {
    result: Destination,
    diagnostic: Destination,
    counter: usize,
}

impl<H: Host> Tester<H> {
    /// Make a tester for output reported through `host`.
    ///
    /// Nothing is redirected until output is declared.
    pub fn new(host: H) -> Tester<H> {
        Tester {
            host,
            result: Channel::new(RESULT_LABEL),
            diagnostic: Channel::new(DIAGNOSTIC_LABEL),
            saved: None,
            declared_results: 0,
        }
    }

    /// Return the host whose output is checked.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Return the channel capturing the result stream.
    pub fn result_channel(&self) -> &Channel {
        &self.result
    }

    /// Return the channel capturing the diagnostic stream.
    pub fn diagnostic_channel(&self) -> &Channel {
        &self.diagnostic
    }

    /// True if an episode is running.
    pub fn is_active(&self) -> bool {
        self.saved.is_some()
    }

    /// Start an episode, unless one is already running.
    ///
    /// This redirects both of the host's streams into freshly reset
    /// channels, saves the host's test counter and sets it to zero, and
    /// suppresses the host's end-of-run summary.
    ///
    /// Declaring output calls this automatically.
    ///
    /// The host's destinations may themselves be [Channel]s, as long as they
    /// are not the channels of a running episode.
    ///
    /// # Panics
    ///
    /// If some other tester is already capturing this host's output.
    pub fn ensure_started(&mut self) {
        if self.saved.is_some() {
            return;
        }
        let result = self.host.destination(Stream::Result);
        let diagnostic = self.host.destination(Stream::Diagnostic);
        assert!(
            !result.in_episode() && !diagnostic.in_episode(),
            "capture episode already active on this host"
        );
        self.host.set_destination(
            Stream::Result,
            Destination::Channel(self.result.clone()),
        );
        self.host.set_destination(
            Stream::Diagnostic,
            Destination::Channel(self.diagnostic.clone()),
        );
        self.result.reset();
        self.diagnostic.reset();
        self.result.set_in_episode(true);
        self.diagnostic.set_in_episode(true);
        self.declared_results = 0;
        let counter = self.host.test_counter();
        self.host.set_test_counter(0);
        self.host.suppress_autosummary();
        debug!(counter, "capture episode started");
        self.saved = Some(Saved {
            result,
            diagnostic,
            counter,
        });
    }

    /// Declare lines expected on the result stream.
    ///
    /// Each line that doesn't end in `\n` gets one. See [Channel::declare].
    pub fn declare_result<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ensure_started();
        self.result.declare(lines);
    }

    /// Declare lines expected on the diagnostic stream, exactly as given
    /// apart from the final newline.
    pub fn declare_diagnostic<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ensure_started();
        self.diagnostic.declare(lines);
    }

    /// Declare diagnostic lines as a [crate::Runner] comments them, with a
    /// `# ` prefix on each.
    pub fn declare_diag<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ensure_started();
        for line in lines {
            // An empty comment prints nothing.
            let text = commented(line.as_ref());
            if !text.is_empty() {
                self.diagnostic.declare([text]);
            }
        }
    }

    /// Declare that the next test reported in this episode passes.
    ///
    /// Tests are numbered from 1 within each episode, counting only the
    /// results declared by [Tester::declare_ok] and [Tester::declare_not_ok].
    /// Result lines declared as raw text through [Tester::declare_result]
    /// are not counted, so don't mix the two for numbered results.
    pub fn declare_ok(&mut self, name: Option<&str>) {
        self.declare_outcome(true, name);
    }

    /// Declare that the next test reported in this episode fails, along with
    /// the diagnostic a [crate::Runner] prints for a failed test.
    pub fn declare_not_ok(&mut self, name: Option<&str>) {
        self.declare_outcome(false, name);
        self.diagnostic.declare([commented(&failure_message(name))]);
    }

    fn declare_outcome(&mut self, passed: bool, name: Option<&str>) {
        self.ensure_started();
        self.declared_results += 1;
        let line = result_line(passed, self.declared_results, name);
        self.result.declare([line]);
    }

    /// Finish the episode and report whether both streams matched.
    ///
    /// The host's destinations and test counter are restored before
    /// anything is reported, so the verdict appears on the real output as
    /// the next test after those run before the episode. For each stream
    /// that didn't match, a diagnostic explains the difference.
    ///
    /// Returns whether the episode passed, or [Error::NotStarted] if no
    /// output was declared since the last finalize.
    pub fn finalize(&mut self, name: Option<&str>) -> Result<bool> {
        self.finalize_with(Finalize::new().name(name))
    }

    /// Finish the episode, as [Tester::finalize], with options controlling
    /// which streams are checked.
    pub fn finalize_with(&mut self, finalize: Finalize<'_>) -> Result<bool> {
        if !self.restore() {
            return Err(Error::NotStarted);
        }
        let result_ok = finalize.skip_result || self.result.check();
        let diagnostic_ok = finalize.skip_diagnostic || self.diagnostic.check();
        let passed = result_ok && diagnostic_ok;
        debug!(passed, result_ok, diagnostic_ok, "capture episode finished");
        self.host.report_result(passed, finalize.name);
        if !result_ok {
            self.host.report_diagnostic(&self.result.complaint());
        }
        if !diagnostic_ok {
            self.host.report_diagnostic(&self.diagnostic.complaint());
        }
        Ok(passed)
    }

    /// Put back the host's destinations and counter, returning false if no
    /// episode was running.
    fn restore(&mut self) -> bool {
        let Some(saved) = self.saved.take() else {
            return false;
        };
        self.result.set_in_episode(false);
        self.diagnostic.set_in_episode(false);
        self.host.set_destination(Stream::Result, saved.result);
        self.host.set_destination(Stream::Diagnostic, saved.diagnostic);
        self.host.set_test_counter(saved.counter);
        true
    }
}

impl<H: Host> Drop for Tester<H> {
    fn drop(&mut self) {
        if self.restore() {
            debug!("capture episode abandoned");
        }
    }
}

/// Options for [Tester::finalize_with].
///
/// ```
/// use mace::Finalize;
///
/// // Compare only the result stream; ignore whatever diagnostics are printed.
/// let finalize = Finalize::named("results only").skip_diagnostic(true);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Finalize<'a> {
    name: Option<&'a str>,
    skip_result: bool,
    skip_diagnostic: bool,
}

impl<'a> Finalize<'a> {
    /// Check both streams and report the verdict without a name.
    pub const fn new() -> Finalize<'a> {
        Finalize {
            name: None,
            skip_result: false,
            skip_diagnostic: false,
        }
    }

    /// Check both streams and report the verdict under `name`.
    pub const fn named(name: &'a str) -> Finalize<'a> {
        Finalize::new().name(Some(name))
    }

    /// Set the name of the reported verdict.
    pub const fn name(self, name: Option<&'a str>) -> Finalize<'a> {
        Finalize { name, ..self }
    }

    /// Don't compare the result stream.
    pub const fn skip_result(self, skip_result: bool) -> Finalize<'a> {
        Finalize {
            skip_result,
            ..self
        }
    }

    /// Don't compare the diagnostic stream.
    pub const fn skip_diagnostic(self, skip_diagnostic: bool) -> Finalize<'a> {
        Finalize {
            skip_diagnostic,
            ..self
        }
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;
    use crate::{Options, Runner};

    fn capturing_runner() -> (Runner, Arc<Mutex<String>>, Arc<Mutex<String>>) {
        let out = Destination::capture();
        let err = Destination::capture();
        let (out_buf, err_buf) = (
            out.captured_output().unwrap(),
            err.captured_output().unwrap(),
        );
        let runner = Runner::new(Options::new().result(out).diagnostic(err));
        (runner, out_buf, err_buf)
    }

    #[test]
    fn starts_lazily_and_only_once() {
        let (runner, _, _) = capturing_runner();
        let mut tester = Tester::new(&runner);
        assert!(!tester.is_active());
        assert!(!runner.destination(Stream::Result).is_channel());

        tester.declare_result(["ok 1"]);
        assert!(tester.is_active());
        assert!(runner.destination(Stream::Result).is_channel());
        assert!(runner.destination(Stream::Diagnostic).is_channel());

        // A second declaration must not reset what was declared already.
        tester.declare_result(["ok 2"]);
        assert_eq!(tester.result_channel().expected(), "ok 1\nok 2\n");
    }

    #[test]
    fn declaring_nothing_still_starts() {
        let (runner, out, _) = capturing_runner();
        let mut tester = Tester::new(&runner);
        tester.declare_result(Vec::<&str>::new());
        assert!(tester.is_active());
        assert_eq!(tester.finalize(None), Ok(true));
        assert_eq!(out.lock().as_str(), "ok 1\n");
    }

    #[test]
    fn finalize_without_episode_is_an_error() {
        let (runner, out, err) = capturing_runner();
        let mut tester = Tester::new(&runner);
        assert_eq!(tester.finalize(Some("nothing")), Err(Error::NotStarted));
        assert!(!tester.is_active());
        assert_eq!(out.lock().as_str(), "");
        assert_eq!(err.lock().as_str(), "");
        assert_eq!(runner.current_test(), 0);
    }

    #[test]
    fn second_finalize_is_an_error() {
        let (runner, _, _) = capturing_runner();
        let mut tester = Tester::new(&runner);
        tester.declare_ok(None);
        runner.ok(true, None);
        assert_eq!(tester.finalize(None), Ok(true));
        assert_eq!(tester.finalize(None), Err(Error::NotStarted));
    }

    #[test]
    fn destinations_restored_before_verdict() {
        let (runner, out, err) = capturing_runner();
        let mut tester = Tester::new(&runner);
        tester.declare_result(["ok 1"]);
        runner.ok(false, None);
        assert_eq!(out.lock().as_str(), "", "inner output leaked");

        assert_eq!(tester.finalize(Some("inner passes")), Ok(false));
        assert!(!tester.is_active());
        assert!(!runner.destination(Stream::Result).is_channel());
        assert_eq!(out.lock().as_str(), "not ok 1 - inner passes\n");
        assert_eq!(
            err.lock().as_str(),
            "#   Failed test 'inner passes'\n\
             # STDOUT is 'not ok 1\n\
             # ' not 'ok 1\n\
             # ' as expected\n\
             # STDERR is '#   Failed test\n\
             # ' not '' as expected\n"
        );
    }

    #[test]
    fn counter_is_isolated() {
        let (runner, _, _) = capturing_runner();
        for _ in 0..5 {
            runner.ok(true, None);
        }
        let mut tester = Tester::new(&runner);
        assert_eq!(tester.host().current_test(), 5);
        tester.declare_ok(Some("a"));
        tester.declare_ok(Some("b"));
        assert_eq!(tester.host().current_test(), 0);
        runner.ok(true, Some("a"));
        runner.ok(true, Some("b"));
        assert_eq!(runner.current_test(), 2);
        assert_eq!(tester.finalize(Some("episode")), Ok(true));
        assert_eq!(runner.current_test(), 6);
    }

    #[test]
    fn autosummary_is_suppressed() {
        let (runner, out, _) = capturing_runner();
        let mut tester = Tester::new(&runner);
        tester.declare_ok(None);
        runner.ok(true, None);
        tester.finalize(None).unwrap();
        runner.finish();
        assert_eq!(out.lock().as_str(), "ok 1\n");
    }

    #[test]
    fn declared_results_are_numbered_per_episode() {
        let (runner, _, _) = capturing_runner();
        let mut tester = Tester::new(&runner);
        tester.declare_ok(Some("first"));
        tester.declare_not_ok(Some("second"));
        tester.declare_ok(None);
        assert_eq!(
            tester.result_channel().expected(),
            "ok 1 - first\nnot ok 2 - second\nok 3\n"
        );
        assert_eq!(
            tester.diagnostic_channel().expected(),
            "#   Failed test 'second'\n"
        );
        tester.finalize(None).unwrap();

        tester.declare_ok(Some("again"));
        assert_eq!(tester.result_channel().expected(), "ok 1 - again\n");
    }

    #[test]
    fn raw_result_lines_do_not_advance_numbering() {
        let (runner, _, _) = capturing_runner();
        let mut tester = Tester::new(&runner);
        tester.declare_result(["# setup"]);
        tester.declare_ok(Some("first"));
        tester.declare_result(["ok 2 - written by hand"]);
        tester.declare_ok(Some("second"));
        assert_eq!(
            tester.result_channel().expected(),
            "# setup\nok 1 - first\nok 2 - written by hand\nok 2 - second\n"
        );
    }

    #[test]
    fn declare_diag_comments_each_line() {
        let (runner, _, _) = capturing_runner();
        let mut tester = Tester::new(&runner);
        tester.declare_diag(["one", "two\nthree"]);
        assert_eq!(
            tester.diagnostic_channel().expected(),
            "# one\n# two\n# three\n"
        );
        runner.diag("one");
        runner.diag("two\nthree");
        assert_eq!(tester.finalize(None), Ok(true));

        tester.declare_diag([""]);
        runner.diag("");
        assert_eq!(tester.diagnostic_channel().expected(), "");
        assert_eq!(tester.finalize(None), Ok(true));
    }

    #[test]
    fn skipped_streams_are_not_judged() {
        let (runner, out, err) = capturing_runner();
        let mut tester = Tester::new(&runner);
        tester.declare_ok(None);
        runner.ok(true, None);
        runner.diag("unexpected chatter");
        let verdict = tester.finalize_with(Finalize::named("results").skip_diagnostic(true));
        assert_eq!(verdict, Ok(true));
        assert_eq!(out.lock().as_str(), "ok 1 - results\n");
        assert_eq!(err.lock().as_str(), "");

        tester.declare_ok(None);
        runner.ok(false, None);
        let verdict = tester.finalize_with(Finalize::new().skip_result(true));
        assert_eq!(verdict, Ok(false));
        assert!(err.lock().contains("STDERR is '#   Failed test\n"));
        assert!(!err.lock().contains("STDOUT is"));
    }

    #[test]
    fn channels_readable_after_finalize() {
        let (runner, _, _) = capturing_runner();
        let mut tester = Tester::new(&runner);
        tester.declare_ok(None);
        runner.ok(true, None);
        runner.ok(true, None);
        assert_eq!(tester.finalize(None), Ok(false));
        assert_eq!(tester.result_channel().actual(), "ok 1\nok 2\n");
        assert_eq!(tester.result_channel().expected(), "ok 1\n");

        // Output after finalize goes to the real destination, not the channel.
        runner.ok(true, None);
        assert_eq!(tester.result_channel().actual(), "ok 1\nok 2\n");
    }

    #[test]
    fn drop_restores_host() {
        let (runner, out, _) = capturing_runner();
        runner.ok(true, None);
        {
            let mut tester = Tester::new(&runner);
            tester.declare_ok(None);
            assert!(runner.destination(Stream::Result).is_channel());
        }
        assert!(!runner.destination(Stream::Result).is_channel());
        assert_eq!(runner.current_test(), 1);
        runner.ok(true, None);
        assert_eq!(out.lock().as_str(), "ok 1\nok 2\n");
    }

    #[test]
    #[should_panic(expected = "capture episode already active")]
    fn overlapping_episodes_are_rejected() {
        let runner = Runner::new(
            Options::new()
                .result(Destination::capture())
                .diagnostic(Destination::capture()),
        );
        let mut outer = Tester::new(&runner);
        outer.declare_ok(None);
        let mut inner = Tester::new(&runner);
        inner.declare_ok(None);
    }

    #[test]
    fn host_may_already_write_to_a_channel() {
        let log = Channel::new("LOG");
        let runner = Runner::new(
            Options::new()
                .result(Destination::Channel(log.clone()))
                .diagnostic(Destination::capture()),
        );
        runner.ok(true, Some("before"));
        let mut tester = Tester::new(&runner);
        tester.declare_ok(Some("inner"));
        runner.ok(true, Some("inner"));
        assert_eq!(log.actual(), "ok 1 - before\n", "inner output leaked");

        assert_eq!(tester.finalize(Some("episode")), Ok(true));
        assert_eq!(log.actual(), "ok 1 - before\nok 2 - episode\n");
        assert!(matches!(
            tester.host().destination(Stream::Result),
            Destination::Channel(c) if c.label() == "LOG"
        ));

        // A finished episode's channels don't block the next one.
        tester.declare_ok(None);
        runner.ok(true, None);
        assert_eq!(tester.finalize(None), Ok(true));
    }

    #[test]
    fn finished_episode_channel_can_be_a_destination() {
        let (runner, _, _) = capturing_runner();
        let mut first = Tester::new(&runner);
        first.declare_ok(None);
        runner.ok(true, None);
        first.finalize(None).unwrap();

        // Reuse the finished tester's channel as another host's output.
        let other = Runner::new(
            Options::new()
                .result(Destination::Channel(first.result_channel().clone()))
                .diagnostic(Destination::capture()),
        );
        let mut second = Tester::new(&other);
        second.declare_ok(None);
        other.ok(true, None);
        assert_eq!(second.finalize(None), Ok(true));
    }

    #[test]
    fn finalize_options_builder() {
        const SKIP_ALL: Finalize = Finalize::new().skip_result(true).skip_diagnostic(true);
        assert_eq!(SKIP_ALL.name, None);
        assert!(SKIP_ALL.skip_result && SKIP_ALL.skip_diagnostic);
        assert_eq!(Finalize::named("x").name, Some("x"));
        assert_eq!(Finalize::default(), Finalize::new());
    }
}
