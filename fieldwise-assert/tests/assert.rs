//! Assertion macro behavior, including the rendered panic payload.

use fieldwise::{DiffFn, Registry, Resolver, build_custom_differ};
use fieldwise_assert::{Sameness, assert_same, assert_same_in, check_same};
use fieldwise_testhelpers::setup;

struct Person {
    name: String,
    age: u32,
}

fieldwise::diffable!(Person { name: String, age: u32 });

fn person(name: &str, age: u32) -> Person {
    Person {
        name: name.into(),
        age,
    }
}

#[test]
fn equal_values_pass() {
    setup();
    assert_same!(person("Ada", 36), person("Ada", 36));
}

#[test]
#[should_panic(expected = "age Expect = 36\n    Actual = 41\n")]
fn differing_values_panic_with_the_rendered_diff() {
    setup();
    assert_same!(person("Ada", 36), person("Ada", 41));
}

#[test]
fn check_same_reports_differences_without_panicking() {
    setup();
    match check_same(&person("Ada", 36), &person("Alan", 36)) {
        Sameness::Different(diff) => {
            assert_eq!(diff.differences().len(), 1);
            assert_eq!(diff.differences()[0].path.to_string(), "name");
        }
        _ => panic!("expected a difference"),
    }
}

struct Version {
    major: u32,
    build: u32,
}

fieldwise::diffable!(Version { major: u32, build: u32 });

#[test]
fn scoped_registry_assertions_honor_custom_differs() {
    setup();
    // Ignore the build number.
    let registry = Registry::new().with(build_custom_differ::<Version, _>(
        |resolver: &mut Resolver<'_>| {
            let int = resolver.differ::<u32>()?;
            let compare: DiffFn<Version> =
                Box::new(move |expected, actual| int.diff(&expected.major, &actual.major));
            Ok(compare)
        },
    ));

    assert_same_in!(
        registry,
        Version { major: 2, build: 17 },
        Version { major: 2, build: 99 },
    );
}

#[test]
#[should_panic(expected = "assertion `assert_same!(expected, actual)` failed")]
fn panic_message_names_the_macro() {
    setup();
    assert_same!(person("Ada", 1), person("Ada", 2));
}
