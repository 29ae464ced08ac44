#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

mod custom;
mod differs;
mod display;
mod error;
mod macros;
mod registry;
mod report;
mod shape;

pub use custom::{
    AnyDiffer, CustomDiffer, build_custom_differ, custom_differ, map_custom_differ,
};
pub use differs::{DiffFn, DiffImpl, Differ};
pub use error::ResolveError;
pub use registry::{Registry, Resolver};
pub use report::{Diff, Difference, Path};
pub use shape::{Diffable, Field, Leaf, Shape};

/// Diff two values through the global [`Registry`] and render the result.
///
/// Returns an empty string when the values are structurally equal.
///
/// ```
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// fieldwise::diffable!(Point { x: i32, y: i32 });
///
/// let rendered = fieldwise::diff_to_string(&Point { x: 1, y: 2 }, &Point { x: 1, y: 3 })?;
/// assert_eq!(rendered, "y Expect = 2\n  Actual = 3\n");
/// # Ok::<(), fieldwise::ResolveError>(())
/// ```
pub fn diff_to_string<T: Diffable>(expected: &T, actual: &T) -> Result<String, ResolveError> {
    Registry::global().diff_to_string(expected, actual)
}

/// Register a custom differ with the global [`Registry`].
///
/// Registration only affects types that have not been resolved yet; a type
/// whose differ is already cached keeps it.
pub fn register(differ: impl CustomDiffer) {
    Registry::global().register(differ);
}
