//! Registry behavior: memoization, provider ordering, error surfacing,
//! concurrent first use, and self-referential types.

use std::any::TypeId;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use fieldwise::{
    AnyDiffer, CustomDiffer, Diff, DiffFn, Registry, ResolveError, Resolver, build_custom_differ,
};
use fieldwise_testhelpers::setup;

struct Probe {
    value: i32,
}

fieldwise::diffable!(Probe { value: i32 });

fn counting_probe_differ(builds: &Arc<AtomicUsize>) -> impl CustomDiffer {
    let builds = Arc::clone(builds);
    build_custom_differ::<Probe, _>(move |resolver: &mut Resolver<'_>| {
        builds.fetch_add(1, Ordering::SeqCst);
        let int = resolver.differ::<i32>()?;
        let compare: DiffFn<Probe> =
            Box::new(move |expected, actual| int.diff(&expected.value, &actual.value));
        Ok(compare)
    })
}

#[test]
fn differ_is_constructed_once_and_cached() {
    setup();
    let builds = Arc::new(AtomicUsize::new(0));
    let registry = Registry::new().with(counting_probe_differ(&builds));

    for _ in 0..4 {
        let rendered = registry
            .diff_to_string(&Probe { value: 1 }, &Probe { value: 2 })
            .unwrap();
        assert_eq!(rendered, " Expect = 1\n Actual = 2\n");
    }

    assert_eq!(builds.load(Ordering::SeqCst), 1);
}

#[test]
fn concurrent_first_use_constructs_once() {
    setup();
    let builds = Arc::new(AtomicUsize::new(0));
    let registry = Registry::new().with(counting_probe_differ(&builds));

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                let diff = registry
                    .diff(&Probe { value: 3 }, &Probe { value: 3 })
                    .unwrap();
                assert!(diff.is_none());
            });
        }
    });

    assert_eq!(builds.load(Ordering::SeqCst), 1);
}

fn constant_probe_differ(label: &'static str) -> impl CustomDiffer {
    build_custom_differ::<Probe, _>(move |_resolver: &mut Resolver<'_>| {
        let compare: DiffFn<Probe> =
            Box::new(move |_, _| Some(Diff::leaf(label.into(), label.into())));
        Ok(compare)
    })
}

#[test]
fn first_registered_provider_wins() {
    setup();
    let registry = Registry::new()
        .with(constant_probe_differ("first"))
        .with(constant_probe_differ("second"));

    let diff = registry
        .diff(&Probe { value: 0 }, &Probe { value: 0 })
        .unwrap()
        .unwrap();
    assert_eq!(diff.differences()[0].expect, "first");
}

#[test]
fn registration_after_first_resolution_has_no_effect() {
    setup();
    let registry = Registry::new();
    assert_eq!(
        registry
            .diff_to_string(&Probe { value: 1 }, &Probe { value: 2 })
            .unwrap(),
        "value Expect = 1\n      Actual = 2\n"
    );

    registry.register(constant_probe_differ("late"));
    assert_eq!(
        registry
            .diff_to_string(&Probe { value: 1 }, &Probe { value: 2 })
            .unwrap(),
        "value Expect = 1\n      Actual = 2\n"
    );
}

struct Handle;

fieldwise::opaque!(Handle);

struct Holder {
    handle: Handle,
}

fieldwise::diffable!(Holder { handle: Handle });

#[test]
fn opaque_member_surfaces_shape_unavailable() {
    setup();
    let registry = Registry::new();
    let error = registry.differ::<Holder>().unwrap_err();
    match error {
        ResolveError::ShapeUnavailable { type_name } => {
            assert!(type_name.ends_with("Handle"), "got `{type_name}`");
        }
        other => panic!("expected ShapeUnavailable, got {other}"),
    }
}

#[test]
fn failed_resolution_is_not_cached() {
    setup();
    let registry = Registry::new();
    assert!(registry.differ::<Holder>().is_err());

    // A custom differ registered after the failure fixes later resolutions;
    // a sticky placeholder would shadow it.
    registry.register(build_custom_differ::<Handle, _>(
        |_resolver: &mut Resolver<'_>| {
            let compare: DiffFn<Handle> = Box::new(|_, _| None);
            Ok(compare)
        },
    ));
    assert!(registry.differ::<Holder>().is_ok());
}

/// A provider that claims `Probe` but hands back a differ for `i32`.
struct LyingProvider;

impl CustomDiffer for LyingProvider {
    fn try_differ(
        &self,
        ty: TypeId,
        resolver: &mut Resolver<'_>,
    ) -> Option<Result<AnyDiffer, ResolveError>> {
        if ty == TypeId::of::<Probe>() {
            Some(resolver.differ::<i32>().map(AnyDiffer::new))
        } else {
            None
        }
    }
}

#[test]
fn mismatched_custom_differ_is_an_error() {
    setup();
    let registry = Registry::new().with(LyingProvider);
    let error = registry.differ::<Probe>().unwrap_err();
    assert!(matches!(
        error,
        ResolveError::CustomDifferMismatch { type_name } if type_name.ends_with("Probe")
    ));
}

// A self-referential type: resolution must reserve the cache slot before
// descending, so `Node`'s differ can reference itself.

struct Node {
    value: i32,
    next: Link,
}

struct Link(Option<Box<Node>>);

fieldwise::diffable!(Node { value: i32, next: Link });
fieldwise::opaque!(Link);

fn presence(link: &Option<Box<Node>>) -> String {
    match link {
        None => "None".into(),
        Some(_) => "Some(..)".into(),
    }
}

fn list(values: &[i32]) -> Node {
    let (&first, rest) = values.split_first().expect("list needs at least one value");
    let mut next = Link(None);
    for &value in rest.iter().rev() {
        next = Link(Some(Box::new(Node { value, next })));
    }
    Node { value: first, next }
}

fn linked_list_registry() -> Registry {
    Registry::new().with(build_custom_differ::<Link, _>(
        |resolver: &mut Resolver<'_>| {
            let node = resolver.differ::<Node>()?;
            let compare: DiffFn<Link> = Box::new(move |expected, actual| {
                match (&expected.0, &actual.0) {
                    (None, None) => None,
                    (Some(expected), Some(actual)) => node.diff(expected, actual),
                    (expected, actual) => {
                        Some(Diff::leaf(presence(expected), presence(actual)))
                    }
                }
            });
            Ok(compare)
        },
    ))
}

#[test]
fn self_referential_type_resolves_through_the_placeholder() {
    setup();
    let registry = linked_list_registry();

    assert_eq!(
        registry
            .diff_to_string(&list(&[1, 2]), &list(&[1, 3]))
            .unwrap(),
        "next.value Expect = 2\n           Actual = 3\n"
    );
    assert_eq!(
        registry.diff_to_string(&list(&[1, 2]), &list(&[1, 2])).unwrap(),
        ""
    );
}

#[test]
fn presence_mismatch_reports_one_leaf() {
    setup();
    let registry = linked_list_registry();

    assert_eq!(
        registry
            .diff_to_string(&list(&[1]), &list(&[1, 2]))
            .unwrap(),
        "next Expect = None\n     Actual = Some(..)\n"
    );
}

// A failing resolution must also evict sub-differs built along the way: the
// cycle differ below is constructed (and cached) before the opaque `handle`
// member aborts the build, and it holds a handle to the aborted `Cyclic`
// placeholder.

struct Cyclic {
    value: i32,
    cycle: CycleLink,
    handle: Handle,
}

struct CycleLink(Option<Box<Cyclic>>);

fieldwise::diffable!(Cyclic { value: i32, cycle: CycleLink, handle: Handle });
fieldwise::opaque!(CycleLink);

fn cyclic(value: i32, next: Option<Cyclic>) -> Cyclic {
    Cyclic {
        value,
        cycle: CycleLink(next.map(Box::new)),
        handle: Handle,
    }
}

#[test]
fn recovery_after_a_failed_resolution_rebuilds_the_whole_subtree() {
    setup();
    let registry = Registry::new().with(build_custom_differ::<CycleLink, _>(
        |resolver: &mut Resolver<'_>| {
            let node = resolver.differ::<Cyclic>()?;
            let compare: DiffFn<CycleLink> =
                Box::new(move |expected, actual| match (&expected.0, &actual.0) {
                    (Some(expected), Some(actual)) => node.diff(expected, actual),
                    _ => None,
                });
            Ok(compare)
        },
    ));

    assert!(registry.differ::<Cyclic>().is_err());

    registry.register(build_custom_differ::<Handle, _>(
        |_resolver: &mut Resolver<'_>| {
            let compare: DiffFn<Handle> = Box::new(|_, _| None);
            Ok(compare)
        },
    ));

    // Diffing must reach through the cycle differ; a stale one kept from the
    // failed attempt would still point at the aborted placeholder.
    assert_eq!(
        registry
            .diff_to_string(
                &cyclic(1, Some(cyclic(2, None))),
                &cyclic(1, Some(cyclic(3, None))),
            )
            .unwrap(),
        "cycle.value Expect = 2\n            Actual = 3\n"
    );
}
