//! Errors surfaced while resolving a differ.
//!
//! All failures happen at resolution time, when a differ is first
//! constructed; a successfully resolved differ never fails during a `diff`
//! call.

use core::fmt;

/// Why a differ could not be resolved for a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The type's shape is [`Opaque`](crate::Shape::Opaque) and no custom
    /// differ is registered for it.
    ShapeUnavailable {
        /// Name of the type that could not be described.
        type_name: &'static str,
    },

    /// A custom differ answered for a type id but produced a differ for a
    /// different type.
    CustomDifferMismatch {
        /// Name of the type being resolved.
        type_name: &'static str,
    },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShapeUnavailable { type_name } => {
                write!(f, "no shape available for `{type_name}`")
            }
            Self::CustomDifferMismatch { type_name } => {
                write!(
                    f,
                    "custom differ claimed `{type_name}` but returned a differ for another type"
                )
            }
        }
    }
}

impl std::error::Error for ResolveError {}
