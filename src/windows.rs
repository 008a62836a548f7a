// Copyright 2022-2026 Martin Pool.

//! Windows consoles only interpret color codes once ANSI processing is
//! turned on, which is attempted once per process.

#![cfg(all(windows, feature = "color"))]

use std::sync::OnceLock;

static ANSI_ENABLED: OnceLock<bool> = OnceLock::new();

pub(crate) fn enable_ansi() -> bool {
    *ANSI_ENABLED.get_or_init(yansi::Paint::enable_windows_ascii)
}
