//! The difference model: paths, leaves and the non-empty difference set.
//!
//! "No difference" is always represented by `Option<Diff>::None`, never by an
//! empty [`Diff`], so that "equal" stays distinguishable with a single
//! `Option` check.

/// A dotted path from the diffed root value down to one leaf field.
///
/// Segments are member names in declaration order; the empty path refers to
/// the root value itself (a leaf compared directly).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Path(Vec<&'static str>);

impl Path {
    /// The empty path, referring to the diffed value itself.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// The member names traversed to reach the leaf, outermost first.
    pub fn segments(&self) -> &[&'static str] {
        &self.0
    }

    /// True for the root path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn prepend(&mut self, segment: &'static str) {
        self.0.insert(0, segment);
    }
}

/// One reported disagreement: where it is, and both sides' representations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Difference {
    /// Path to the differing leaf.
    pub path: Path,
    /// Representation of the expected value.
    pub expect: String,
    /// Representation of the actual value.
    pub actual: String,
}

impl Difference {
    /// Create a difference at the given path.
    pub fn new(path: Path, expect: String, actual: String) -> Self {
        Self {
            path,
            expect,
            actual,
        }
    }
}

/// An ordered, non-empty set of leaf differences.
///
/// Ordering follows traversal order: member declaration order, depth first.
/// Rendering via [`Display`](core::fmt::Display) is byte-for-byte
/// deterministic; see the crate docs for the exact format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diff {
    differences: Vec<Difference>,
}

impl Diff {
    /// A single leaf difference at the root path.
    ///
    /// This is what a leaf differ returns when two values compare unequal,
    /// and a convenient building block for custom differs.
    pub fn leaf(expect: String, actual: String) -> Self {
        Self {
            differences: vec![Difference::new(Path::root(), expect, actual)],
        }
    }

    /// Build a diff from collected differences.
    ///
    /// Returns `None` when `differences` is empty, upholding the non-empty
    /// invariant.
    pub fn from_differences(differences: Vec<Difference>) -> Option<Self> {
        if differences.is_empty() {
            None
        } else {
            Some(Self { differences })
        }
    }

    /// The differences, in traversal order.
    pub fn differences(&self) -> &[Difference] {
        &self.differences
    }

    /// Consume the diff, prefixing every leaf's path with `segment`.
    pub(crate) fn into_prefixed(self, segment: &'static str) -> Vec<Difference> {
        self.differences
            .into_iter()
            .map(|mut difference| {
                difference.path.prepend(segment);
                difference
            })
            .collect()
    }
}
