//! Static shape descriptions consumed by the differ registry.
//!
//! A type opts into diffing by implementing [`Diffable`], usually through the
//! [`diffable!`](crate::diffable), [`leaf!`](crate::leaf) or
//! [`opaque!`](crate::opaque) macros. The shape is the only structural
//! information the engine ever sees: members not listed in it (private
//! fields, fields deliberately left out) are invisible to structural diffing
//! and never appear in any path.

use core::fmt;

use crate::differs::DiffFn;
use crate::error::ResolveError;
use crate::registry::Resolver;

/// A type that can be diffed by this engine.
///
/// The shape is consulted once per type per registry, when the differ is
/// first resolved, and the resulting differ is cached.
pub trait Diffable: Sized + 'static {
    /// The structural description of this type.
    fn shape() -> Shape<Self>;
}

/// Structural description of a diffable type.
pub enum Shape<T> {
    /// No further decomposition; compared by equality.
    Leaf(Leaf<T>),
    /// Decomposed into named members, each independently diffed, in
    /// declaration order.
    Struct(Vec<Field<T>>),
    /// Declared but not describable. Resolving a differ for an opaque type
    /// (or for anything containing one) fails with
    /// [`ResolveError::ShapeUnavailable`] unless a custom differ is
    /// registered for it.
    Opaque,
}

/// Leaf comparison: an equality function and a textual representation.
pub struct Leaf<T> {
    /// Whether two leaf values are equal.
    pub eq: fn(&T, &T) -> bool,
    /// Human-readable representation of one leaf value.
    pub repr: fn(&T) -> String,
}

impl<T: PartialEq + fmt::Debug> Leaf<T> {
    /// A leaf compared with `PartialEq` and rendered with `Debug`.
    pub fn debug() -> Self {
        Self {
            eq: |a, b| a == b,
            repr: |value| format!("{value:?}"),
        }
    }
}

/// One member of a composite type's shape.
pub struct Field<T> {
    /// The member name, used as a path segment.
    pub name: &'static str,
    /// Resolve the member type's differ and close over it, yielding a
    /// comparison of the member on two parent values.
    ///
    /// Binding happens once, when the parent's structural differ is built.
    pub bind: fn(&mut Resolver<'_>) -> Result<DiffFn<T>, ResolveError>,
}

crate::leaf!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, String,
    &'static str,
);
