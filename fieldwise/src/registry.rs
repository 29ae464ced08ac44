//! Per-type differ resolution and caching.
//!
//! A [`Registry`] maps type identity to its resolved differ. Resolution is
//! lazy and memoized: the first request for a type constructs its differ
//! (custom differ if one is registered, otherwise a derived leaf or
//! structural differ) and every later request returns the cached handle.
//!
//! The whole resolution of a type runs under one mutex, so concurrent first
//! use from several threads constructs each differ exactly once. Recursive
//! resolution during construction (member types, sub-differs requested by
//! custom differs) goes through [`Resolver`], a re-entrant view into the
//! locked state.

use core::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex, OnceLock};

use tracing::{debug, trace};

use crate::custom::CustomDiffer;
use crate::differs::{BoundField, DiffImpl, Differ, LeafDiffer, StructDiffer};
use crate::error::ResolveError;
use crate::report::Diff;
use crate::shape::{Diffable, Shape};

/// The cache and lookup authority mapping types to their resolved differs.
///
/// Registries are cheap to create; scope one per test (or per custom differ
/// set) with [`Registry::new`] and [`Registry::with`], or use the
/// process-wide [`Registry::global`].
pub struct Registry {
    state: Mutex<State>,
}

struct State {
    providers: Vec<Arc<dyn CustomDiffer>>,
    cache: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Registry {
    /// An empty registry with no custom differs.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                providers: Vec::new(),
                cache: HashMap::new(),
            }),
        }
    }

    /// The process-wide registry used by [`diff_to_string`](crate::diff_to_string).
    pub fn global() -> &'static Registry {
        static GLOBAL: LazyLock<Registry> = LazyLock::new(Registry::new);
        &GLOBAL
    }

    /// Builder-style [`register`](Registry::register).
    pub fn with(self, differ: impl CustomDiffer) -> Self {
        self.register(differ);
        self
    }

    /// Append a custom differ, consulted in registration order before
    /// structural derivation, first match wins.
    ///
    /// Types already resolved keep their cached differ; registration only
    /// affects types resolved afterwards.
    pub fn register(&self, differ: impl CustomDiffer) {
        let mut state = self.lock();
        state.providers.push(Arc::new(differ));
    }

    /// Resolve (and cache) the differ for `T`.
    pub fn differ<T: Diffable>(&self) -> Result<Differ<T>, ResolveError> {
        let mut state = self.lock();
        Resolver {
            state: &mut *state,
            reserved: Vec::new(),
        }
        .differ::<T>()
    }

    /// Diff two values; `Ok(None)` means structurally equal.
    pub fn diff<T: Diffable>(
        &self,
        expected: &T,
        actual: &T,
    ) -> Result<Option<Diff>, ResolveError> {
        Ok(self.differ::<T>()?.diff(expected, actual))
    }

    /// Diff two values and render the result; empty string when equal.
    pub fn diff_to_string<T: Diffable>(
        &self,
        expected: &T,
        actual: &T,
    ) -> Result<String, ResolveError> {
        Ok(match self.diff(expected, actual)? {
            Some(diff) => diff.to_string(),
            None => String::new(),
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().expect("registry mutex poisoned")
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Re-entrant resolution view handed to field binders, custom differs and
/// combinator factories while a registry is resolving.
pub struct Resolver<'a> {
    state: &'a mut State,
    // Type ids reserved during the current top-level resolution, in
    // reservation order; frames roll back their own suffix on failure.
    reserved: Vec<TypeId>,
}

impl Resolver<'_> {
    /// Resolve (and cache) the differ for `T`.
    ///
    /// Safe to call for a type whose resolution is currently in progress
    /// higher up the stack: the slot is reserved before construction starts,
    /// so self-referential shapes resolve to a handle of themselves instead
    /// of recursing forever.
    pub fn differ<T: Diffable>(&mut self) -> Result<Differ<T>, ResolveError> {
        let id = TypeId::of::<T>();
        if let Some(cached) = self.state.cache.get(&id) {
            trace!(ty = %type_name::<T>(), "differ cache hit");
            let differ = cached
                .downcast_ref::<Differ<T>>()
                .expect("cache entry stored under the wrong type id");
            return Ok(differ.clone());
        }

        // Reserve the slot before building member sub-differs.
        let mark = self.reserved.len();
        self.reserved.push(id);
        let thunk = Arc::new(Thunk::<T> {
            cell: OnceLock::new(),
        });
        let handle = Differ::from_arc(thunk.clone());
        self.state.cache.insert(id, Box::new(handle.clone()));

        match self.build::<T>() {
            Ok(differ) => {
                let _ = thunk.cell.set(differ);
                Ok(handle)
            }
            Err(error) => {
                // Anything cached while building `T` may hold `T`'s unfilled
                // placeholder, so the whole reserved suffix goes with it.
                for reserved in self.reserved.drain(mark..) {
                    self.state.cache.remove(&reserved);
                }
                Err(error)
            }
        }
    }

    fn build<T: Diffable>(&mut self) -> Result<Differ<T>, ResolveError> {
        let id = TypeId::of::<T>();
        let providers = self.state.providers.clone();
        for provider in providers {
            if let Some(result) = provider.try_differ(id, self) {
                debug!(ty = %type_name::<T>(), "custom differ matched");
                return result?.downcast::<T>();
            }
        }

        match T::shape() {
            Shape::Leaf(leaf) => {
                trace!(ty = %type_name::<T>(), "derived leaf differ");
                Ok(Differ::from_impl(LeafDiffer { leaf }))
            }
            Shape::Struct(fields) => {
                let mut bound = Vec::with_capacity(fields.len());
                for field in fields {
                    bound.push(BoundField {
                        name: field.name,
                        diff: (field.bind)(self)?,
                    });
                }
                debug!(
                    ty = %type_name::<T>(),
                    fields = bound.len(),
                    "derived structural differ"
                );
                Ok(Differ::from_impl(StructDiffer { fields: bound }))
            }
            Shape::Opaque => Err(ResolveError::ShapeUnavailable {
                type_name: type_name::<T>(),
            }),
        }
    }
}

/// Placeholder handle occupying a type's cache slot during construction.
///
/// The cell is filled before the resolution that reserved it returns; on
/// failure every cache entry that could hold a clone of this handle is
/// removed. Either way, a handle reachable from the cache always delegates.
struct Thunk<T> {
    cell: OnceLock<Differ<T>>,
}

impl<T> DiffImpl<T> for Thunk<T> {
    fn diff(&self, expected: &T, actual: &T) -> Option<Diff> {
        self.cell
            .get()
            .expect("differ used while its resolution is still in progress")
            .diff(expected, actual)
    }
}
