//! Declaration macros producing static member tables.
//!
//! These replace runtime member enumeration: each composite type declares its
//! diffable members once, and the engine derives everything else from that
//! table. Omitting a field keeps it out of every diff, which is how private
//! or intentionally ignored members are handled.

/// Declare the diffable members of a struct, in the order they should be
/// compared and reported.
///
/// Every listed field type must itself implement
/// [`Diffable`](crate::Diffable).
///
/// ```
/// struct Inner {
///     x: u32,
/// }
///
/// struct Outer {
///     label: String,
///     inner: Inner,
/// }
///
/// fieldwise::diffable!(Inner { x: u32 });
/// fieldwise::diffable!(Outer { label: String, inner: Inner });
/// ```
#[macro_export]
macro_rules! diffable {
    ($ty:ty { $($field:ident: $fty:ty),+ $(,)? }) => {
        impl $crate::Diffable for $ty {
            fn shape() -> $crate::Shape<Self> {
                $crate::Shape::Struct(::std::vec![
                    $($crate::Field {
                        name: ::core::stringify!($field),
                        bind: |resolver: &mut $crate::Resolver<'_>| {
                            let differ = resolver.differ::<$fty>()?;
                            ::core::result::Result::Ok(::std::boxed::Box::new(
                                move |expected: &$ty, actual: &$ty| {
                                    differ.diff(&expected.$field, &actual.$field)
                                },
                            ))
                        },
                    }),+
                ])
            }
        }
    };
}

/// Declare leaf types: compared with `PartialEq`, rendered with `Debug`.
///
/// The engine already declares the primitive scalars and `String`; this is
/// for caller-owned leaf types such as newtyped ids.
///
/// ```
/// #[derive(Debug, PartialEq)]
/// struct UserId(u64);
///
/// fieldwise::leaf!(UserId);
/// ```
#[macro_export]
macro_rules! leaf {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::Diffable for $ty {
            fn shape() -> $crate::Shape<Self> {
                $crate::Shape::Leaf($crate::Leaf::debug())
            }
        }
    )+};
}

/// Declare types that participate in shapes but cannot be diffed
/// structurally.
///
/// Resolving a differ for an opaque type fails with
/// [`ResolveError::ShapeUnavailable`](crate::ResolveError::ShapeUnavailable)
/// unless a custom differ is registered for it, which makes accidental
/// leaf-treatment of such types impossible.
#[macro_export]
macro_rules! opaque {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::Diffable for $ty {
            fn shape() -> $crate::Shape<Self> {
                $crate::Shape::Opaque
            }
        }
    )+};
}
