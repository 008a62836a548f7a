// Copyright 2022-2026 Martin Pool.

/*!

Mace checks that code which reports test results prints exactly what you
expect, on both its result stream and its diagnostic stream.

# Concept

Code that emits test results, such as a custom assertion built on a TAP
runner, is itself worth testing: does a failing check print `not ok`, and
does it explain the failure with the right diagnostic? Mace runs such code
with its output redirected into memory and compares the captured text
against a declared expectation, character for character.

The application is responsible for:

1. Reporting results through a [Host], such as the [Runner] provided here.
2. Constructing a [Tester] for that host.
3. Declaring the expected output with [Tester::declare_result],
   [Tester::declare_diagnostic], or the helpers [Tester::declare_ok],
   [Tester::declare_not_ok] and [Tester::declare_diag].
4. Running the code under test.
5. Calling [Tester::finalize], which reports a single pass or fail for the
   whole episode back through the host.

The Mace library is responsible for:

* Redirecting the host's result and diagnostic streams into a pair of
  [Channel]s when the first expectation is declared, and putting them back
  on finalize.
* Isolating the host's test counter, so the tests run inside an episode
  don't change the numbering of the tests around it.
* Comparing what was captured against what was declared, exactly. There is
  no pattern matching and no fuzzy comparison.
* Explaining each mismatch as a diagnostic, optionally colored to show where
  the output first departs from what was expected (see [set_color_mode]).

Misuse, such as finalizing when nothing was declared, returns an [Error].
Starting a second episode on a host that is already being captured panics.

# Example

```
use mace::{Destination, Options, Runner, Tester};

let runner = Runner::new(
    Options::new()
        .result(Destination::capture())
        .diagnostic(Destination::capture()),
);
let mut tester = Tester::new(&runner);

// 1. Say what the code under test should print.
tester.declare_not_ok(Some("widget is shiny"));
tester.declare_diag(["     got: 'dull'", "expected: 'shiny'"]);

// 2. Run it.
let shine = "dull";
if !runner.ok(shine == "shiny", Some("widget is shiny")) {
    runner.diag(&format!("     got: '{shine}'\nexpected: 'shiny'"));
}

// 3. Check it.
assert_eq!(tester.finalize(Some("reports dull widgets")), Ok(true));
```

# Colored complaints

With [set_color_mode] on, a complaint highlights the identical prefix of
the captured and expected text in one color and the rest in another. This
needs the `color` cargo feature, which is on by default. Without it, or on a
Windows console where ANSI sequences can't be enabled, complaints are plain.

# Logging

Episode start and finish are logged at `debug` level and every captured
write at `trace` level through [tracing](https://docs.rs/tracing). No
subscriber is installed by this crate.

*/

#![warn(missing_docs)]

mod ansi;
mod channel;
mod color;
mod destination;
pub mod diff;
mod error;
mod host;
mod options;
mod runner;
mod session;
#[cfg(all(windows, feature = "color"))]
mod windows;

pub use crate::channel::Channel;
pub use crate::color::{color_mode, set_color_mode};
pub use crate::destination::Destination;
pub use crate::error::{Error, Result};
pub use crate::host::{Host, Stream};
pub use crate::options::Options;
pub use crate::runner::Runner;
pub use crate::session::{Finalize, Tester, DIAGNOSTIC_LABEL, RESULT_LABEL};
