// Copyright 2026 Martin Pool.

//! Process-wide switch for coloring complaints.

use std::sync::atomic::{AtomicBool, Ordering};

static COLOR_MODE: AtomicBool = AtomicBool::new(false);

/// Return true if complaints about mismatched output should be colored.
///
/// This is off by default.
pub fn color_mode() -> bool {
    COLOR_MODE.load(Ordering::SeqCst)
}

/// Turn coloring of complaints on or off for the whole process, returning
/// the previous setting.
///
/// When on, each complaint marks where the captured output departs from the
/// expected output. If this build or console can't draw colors the complaint
/// is left plain.
pub fn set_color_mode(color: bool) -> bool {
    COLOR_MODE.swap(color, Ordering::SeqCst)
}

/// True if complaints formatted now should be colored.
pub(crate) fn use_color() -> bool {
    color_mode() && crate::ansi::color_capable()
}
