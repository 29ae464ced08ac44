#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

use fieldwise::{Diff, Diffable, Registry, ResolveError};

/// Result of checking two values for structural sameness.
pub enum Sameness {
    /// The values are structurally equal.
    Same,
    /// The values differ; contains the difference set.
    Different(Diff),
    /// No differ could be resolved for the type being compared.
    Unresolvable(ResolveError),
}

/// Check two values through the global [`Registry`].
pub fn check_same<T: Diffable>(expected: &T, actual: &T) -> Sameness {
    check_same_in(Registry::global(), expected, actual)
}

/// Check two values through a specific [`Registry`], typically one carrying
/// custom differs.
pub fn check_same_in<T: Diffable>(registry: &Registry, expected: &T, actual: &T) -> Sameness {
    match registry.diff(expected, actual) {
        Ok(None) => Sameness::Same,
        Ok(Some(diff)) => Sameness::Different(diff),
        Err(error) => Sameness::Unresolvable(error),
    }
}

/// Asserts that two values of the same type are structurally equal.
///
/// On mismatch, panics with the rendered difference set: one aligned
/// `Expect`/`Actual` block per differing field, annotated with the dotted
/// path to that field.
///
/// ```
/// use fieldwise_assert::assert_same;
///
/// struct Person {
///     name: String,
///     age: u32,
/// }
///
/// fieldwise::diffable!(Person { name: String, age: u32 });
///
/// let a = Person { name: "Ada".into(), age: 36 };
/// let b = Person { name: "Ada".into(), age: 36 };
/// assert_same!(a, b);
/// ```
#[macro_export]
macro_rules! assert_same {
    ($expected:expr, $actual:expr $(,)?) => {
        match $crate::check_same(&$expected, &$actual) {
            $crate::Sameness::Same => {}
            $crate::Sameness::Different(diff) => {
                ::core::panic!("assertion `assert_same!(expected, actual)` failed\n{diff}");
            }
            $crate::Sameness::Unresolvable(error) => {
                ::core::panic!("assertion `assert_same!(expected, actual)` failed: {error}");
            }
        }
    };
}

/// Like [`assert_same!`], but resolves differs through the given
/// [`Registry`], so custom differs scoped to it apply.
#[macro_export]
macro_rules! assert_same_in {
    ($registry:expr, $expected:expr, $actual:expr $(,)?) => {
        match $crate::check_same_in(&$registry, &$expected, &$actual) {
            $crate::Sameness::Same => {}
            $crate::Sameness::Different(diff) => {
                ::core::panic!("assertion `assert_same_in!(registry, expected, actual)` failed\n{diff}");
            }
            $crate::Sameness::Unresolvable(error) => {
                ::core::panic!("assertion `assert_same_in!(registry, expected, actual)` failed: {error}");
            }
        }
    };
}
