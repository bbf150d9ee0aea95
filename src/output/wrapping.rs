//! Line wrapping human-readable output.

use std::fmt;
use std::io;
use std::sync::OnceLock;

/// A non-breaking space.
pub const NBSP: char = '\u{00A0}';

/// Writes the given message to `sink`, wrapping long lines.
///
/// Hint: Use `wwriteln!(..)` instead of invoking this function
/// directly.
pub fn wwriteln(sink: &mut dyn io::Write, msg: fmt::Arguments)
                -> io::Result<()>
{
    let m = format!("{}", msg);
    if m.is_empty() {
        return writeln!(sink);
    }
    for l in textwrap::wrap(&m, options()) {
        writeln!(sink, "{}", l)?;
    }
    Ok(())
}

/// Writes the given message to `sink`, indenting continuations.
///
/// Hint: Use `wwriteln!(indent="...", ..)` or
/// `wwriteln!(initial_indent="...", subsequent_indent="...", ..)`
/// instead of invoking this function directly.
pub fn iwwriteln(sink: &mut dyn io::Write,
                 initial_indent: &str,
                 subsequent_indent: &str,
                 msg: fmt::Arguments)
                 -> io::Result<()>
{
    let m = format!("{}", msg);
    for l in textwrap::wrap(&m,
                            options()
                            .initial_indent(initial_indent)
                            .subsequent_indent(subsequent_indent)) {
        writeln!(sink, "{}", l)?;
    }
    Ok(())
}

/// Returns options for text-wrapping.
fn options() -> textwrap::Options<'static> {
    static OPTIONS: OnceLock<textwrap::Options> = OnceLock::new();
    OPTIONS.get_or_init(|| {
        // It is better to use terminal_size instead of letting
        // textwrap do it, because textwrap uses an older version,
        // leading to duplicate crates.
        textwrap::Options::new(terminal_width())
    }).clone()
}

/// Returns the terminal width we assume for wrapping.
pub fn terminal_width() -> usize {
    terminal_size::terminal_size().map(|(w, _h)| w.0)
        .unwrap_or(80)
        .into()
}
