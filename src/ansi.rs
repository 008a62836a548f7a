// Copyright 2022-2026 Martin Pool.

//! Draw ANSI escape sequences.

// References:
// * <https://gist.github.com/fnky/458719343aabd01cfb17a3a4f7296797>

#[cfg(all(windows, feature = "color"))]
pub(crate) fn enable_windows_ansi() -> bool {
    crate::windows::enable_ansi()
}

#[cfg(all(windows, not(feature = "color")))]
pub(crate) fn enable_windows_ansi() -> bool {
    false
}

#[cfg(not(windows))]
pub(crate) fn enable_windows_ansi() -> bool {
    true
}

/// True if this build can draw colored complaints on this console.
pub(crate) fn color_capable() -> bool {
    cfg!(feature = "color") && enable_windows_ansi()
}

/// The sequences that start and end one highlight color.
///
/// Both are empty when this build has no color support.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Markers {
    pub(crate) start: String,
    pub(crate) end: String,
}

#[cfg(feature = "color")]
fn markers(color: yansi::Color) -> Markers {
    let style = yansi::Style::new(color);
    let mut markers = Markers::default();
    // Writing into a String can't fail.
    let _ = style.fmt_prefix(&mut markers.start);
    let _ = style.fmt_suffix(&mut markers.end);
    markers
}

/// Markers around the part of the text that matches.
#[cfg(feature = "color")]
pub(crate) fn matching() -> Markers {
    markers(yansi::Color::Green)
}

/// Markers around the part of the text from the divergence point on.
#[cfg(feature = "color")]
pub(crate) fn diverging() -> Markers {
    markers(yansi::Color::Red)
}

#[cfg(not(feature = "color"))]
pub(crate) fn matching() -> Markers {
    Markers::default()
}

#[cfg(not(feature = "color"))]
pub(crate) fn diverging() -> Markers {
    Markers::default()
}
