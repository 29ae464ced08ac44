//! Custom differ registration and the Build/Map combinators.
//!
//! A [`CustomDiffer`] is consulted before structural derivation, in
//! registration order, first match wins. The three constructors here cover
//! the three ways to express an override:
//!
//! - [`custom_differ`]: a hand-written [`DiffImpl`] with constructor-time
//!   access to the resolver (the most general form),
//! - [`build_custom_differ`]: one factory function returning a plain
//!   comparison closure,
//! - [`map_custom_differ`]: a projection into another diffable type whose
//!   differ is reused as-is.

use core::any::{Any, TypeId, type_name};
use core::marker::PhantomData;
use std::sync::Arc;

use crate::differs::{DiffFn, DiffImpl, Differ, FnDiffer};
use crate::error::ResolveError;
use crate::registry::Resolver;
use crate::report::Diff;
use crate::shape::Diffable;

/// A type-erased differ handle, as returned by custom differ providers.
pub struct AnyDiffer(Box<dyn Any + Send + Sync>);

impl AnyDiffer {
    /// Erase a resolved differ.
    pub fn new<T: Diffable>(differ: Differ<T>) -> Self {
        Self(Box::new(differ))
    }

    pub(crate) fn downcast<T: Diffable>(self) -> Result<Differ<T>, ResolveError> {
        self.0
            .downcast::<Differ<T>>()
            .map(|differ| *differ)
            .map_err(|_| ResolveError::CustomDifferMismatch {
                type_name: type_name::<T>(),
            })
    }
}

/// A provider of differ overrides, queried before structural derivation.
///
/// Providers are queried lazily, at most once per type per registry: once a
/// type's differ is cached, later registrations do not affect it.
///
/// Sub-differs must be resolved through the supplied [`Resolver`], not by
/// calling back into the owning [`Registry`](crate::Registry) handle, which
/// is busy for the duration of the resolution.
pub trait CustomDiffer: Send + Sync + 'static {
    /// Return a differ for the type identified by `ty`, or `None` to let the
    /// next provider (or structural derivation) handle it.
    fn try_differ(
        &self,
        ty: TypeId,
        resolver: &mut Resolver<'_>,
    ) -> Option<Result<AnyDiffer, ResolveError>>;
}

/// Register a hand-written [`DiffImpl`] for `T`.
///
/// `build` runs once, when `T`'s differ is first resolved, and may resolve
/// sub-differs for the implementation to capture.
pub fn custom_differ<T, D, F>(build: F) -> impl CustomDiffer
where
    T: Diffable,
    D: DiffImpl<T> + 'static,
    F: Fn(&mut Resolver<'_>) -> Result<D, ResolveError> + Send + Sync + 'static,
{
    Direct {
        build,
        _marker: PhantomData::<fn() -> (T, D)>,
    }
}

struct Direct<T, D, F> {
    build: F,
    _marker: PhantomData<fn() -> (T, D)>,
}

impl<T, D, F> CustomDiffer for Direct<T, D, F>
where
    T: Diffable,
    D: DiffImpl<T> + 'static,
    F: Fn(&mut Resolver<'_>) -> Result<D, ResolveError> + Send + Sync + 'static,
{
    fn try_differ(
        &self,
        ty: TypeId,
        resolver: &mut Resolver<'_>,
    ) -> Option<Result<AnyDiffer, ResolveError>> {
        (ty == TypeId::of::<T>()).then(|| {
            let implementation = (self.build)(resolver)?;
            Ok(AnyDiffer::new(Differ::from_impl(implementation)))
        })
    }
}

/// Register a differ for `T` expressed as one factory function.
///
/// The factory receives the resolver once, letting it close over resolved
/// sub-differs, and returns the comparison reused for every call.
pub fn build_custom_differ<T, F>(factory: F) -> impl CustomDiffer
where
    T: Diffable,
    F: Fn(&mut Resolver<'_>) -> Result<DiffFn<T>, ResolveError> + Send + Sync + 'static,
{
    custom_differ::<T, _, _>(move |resolver: &mut Resolver<'_>| {
        let compare = factory(resolver)?;
        Ok(FnDiffer { compare })
    })
}

/// Register a differ for `T` that diffs `project(value)` instead.
///
/// The projected type's differ is resolved through the registry and its
/// result is returned verbatim: no path segment is added for the projection,
/// and if `U` is composite, `U`'s member names appear in the paths exactly as
/// if the projected value were the original.
pub fn map_custom_differ<T, U, P>(project: P) -> impl CustomDiffer
where
    T: Diffable,
    U: Diffable,
    P: Fn(&T) -> U + Send + Sync + 'static,
{
    let project = Arc::new(project);
    custom_differ::<T, _, _>(move |resolver: &mut Resolver<'_>| {
        let inner = resolver.differ::<U>()?;
        Ok(Projected {
            project: Arc::clone(&project),
            inner,
        })
    })
}

struct Projected<U, P> {
    project: Arc<P>,
    inner: Differ<U>,
}

impl<T, U, P> DiffImpl<T> for Projected<U, P>
where
    P: Fn(&T) -> U + Send + Sync,
{
    fn diff(&self, expected: &T, actual: &T) -> Option<Diff> {
        self.inner
            .diff(&(self.project)(expected), &(self.project)(actual))
    }
}
