//! The differ capability and the derived leaf/structural differs.

use std::sync::Arc;

use crate::report::Diff;
use crate::shape::Leaf;

/// A boxed comparison function over one type.
pub type DiffFn<T> = Box<dyn Fn(&T, &T) -> Option<Diff> + Send + Sync>;

/// The differ capability: compare two values of one type, yielding `None`
/// when they are structurally equal.
///
/// Implement this directly for the most general form of custom differ, then
/// register it with [`custom_differ`](crate::custom_differ). Implementations
/// are stateless across calls; anything they need (such as sub-differs) is
/// captured at construction time.
pub trait DiffImpl<T>: Send + Sync {
    /// Compare `expected` against `actual`.
    fn diff(&self, expected: &T, actual: &T) -> Option<Diff>;
}

/// A resolved, shareable differ for `T`.
///
/// Cloning is cheap; all clones share one underlying implementation. The
/// handle for a given type is constructed at most once per
/// [`Registry`](crate::Registry) and reused for every subsequent diff.
pub struct Differ<T> {
    inner: Arc<dyn DiffImpl<T>>,
}

impl<T> std::fmt::Debug for Differ<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Differ").finish_non_exhaustive()
    }
}

impl<T> Clone for Differ<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Differ<T> {
    /// Compare `expected` against `actual`; `None` means equal.
    pub fn diff(&self, expected: &T, actual: &T) -> Option<Diff> {
        self.inner.diff(expected, actual)
    }

    /// Wrap a [`DiffImpl`] into a shareable handle.
    pub fn from_impl(implementation: impl DiffImpl<T> + 'static) -> Self {
        Self {
            inner: Arc::new(implementation),
        }
    }

    pub(crate) fn from_arc(inner: Arc<dyn DiffImpl<T>>) -> Self {
        Self { inner }
    }
}

/// Base case: compares two leaf values by equality, reporting one difference
/// at the root path on mismatch.
pub(crate) struct LeafDiffer<T> {
    pub(crate) leaf: Leaf<T>,
}

impl<T> DiffImpl<T> for LeafDiffer<T> {
    fn diff(&self, expected: &T, actual: &T) -> Option<Diff> {
        if (self.leaf.eq)(expected, actual) {
            None
        } else {
            Some(Diff::leaf(
                (self.leaf.repr)(expected),
                (self.leaf.repr)(actual),
            ))
        }
    }
}

/// A member differ bound to its parent: name plus a closed-over comparison.
pub(crate) struct BoundField<T> {
    pub(crate) name: &'static str,
    pub(crate) diff: DiffFn<T>,
}

/// Derived differ for a composite type: diffs every member in declaration
/// order and merges the results.
///
/// Deliberately does not short-circuit, so one call reports every differing
/// field rather than the first.
pub(crate) struct StructDiffer<T> {
    pub(crate) fields: Vec<BoundField<T>>,
}

impl<T> DiffImpl<T> for StructDiffer<T> {
    fn diff(&self, expected: &T, actual: &T) -> Option<Diff> {
        let mut differences = Vec::new();
        for field in &self.fields {
            if let Some(diff) = (field.diff)(expected, actual) {
                differences.extend(diff.into_prefixed(field.name));
            }
        }
        Diff::from_differences(differences)
    }
}

/// Differ built from a plain comparison function (the `Build` combinator).
pub(crate) struct FnDiffer<T> {
    pub(crate) compare: DiffFn<T>,
}

impl<T> DiffImpl<T> for FnDiffer<T> {
    fn diff(&self, expected: &T, actual: &T) -> Option<Diff> {
        (self.compare)(expected, actual)
    }
}
