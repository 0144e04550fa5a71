//! Terminal status output
//!
//! Plain stderr lines. Output here is decorative: it must never abort a
//! build, so nothing in this module returns an error.

/// Warning line, shown with a leading marker.
pub fn warn(message: &str) {
    eprintln!("⚠ {message}");
}

/// Progress line for a build step.
pub fn step(message: &str) {
    eprintln!("› {message}");
}

/// Completion line.
pub fn success(message: &str) {
    eprintln!("✓ {message}");
}
