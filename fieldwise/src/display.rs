//! Rendering of a difference set into aligned text.
//!
//! The format is an exact contract:
//!
//! ```text
//! <path> Expect = <expect>
//! <spaces> Actual = <actual>
//! ```
//!
//! where `<spaces>` is as wide as `<path>`, so that `Actual` sits directly
//! under `Expect`. Blocks for multiple leaves are concatenated with no blank
//! line between them. Lines end in a single `\n`; no carriage returns.

use core::fmt;

use crate::report::{Diff, Path};

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments().iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Diff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for difference in self.differences() {
            let path = difference.path.to_string();
            writeln!(f, "{path} Expect = {}", difference.expect)?;
            writeln!(
                f,
                "{:indent$} Actual = {}",
                "",
                difference.actual,
                indent = path.chars().count(),
            )?;
        }
        Ok(())
    }
}
