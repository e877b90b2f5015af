//! # Formbind Testing
//!
//! Testing utilities and helpers for formbind.
//!
//! This crate provides:
//! - The [`source!`] macro for literal sources
//! - Fixtures for times and uploaded files
//! - A Given-When-Then [`BindTest`] builder
//! - Property-based testing strategies
//!
//! ## Example
//!
//! ```ignore
//! use formbind_testing::{BindTest, source};
//!
//! #[test]
//! fn test_page_defaults() {
//!     BindTest::<Listing>::form()
//!         .when_source(source! { "tag" => ["rust"] })
//!         .then_record(|listing| assert_eq!(listing.page, 1))
//!         .run();
//! }
//! ```


pub use bind_test::{BindTest, assertions};
pub use helpers::init_tracing;

/// Build a [`Source`](formbind_core::Source) from literal key/value lists.
///
/// An empty list marks the key as present with no values.
///
/// ```
/// use formbind_testing::source;
///
/// let source = source! {
///     "tag" => ["rust", "web"],
///     "empty" => [],
/// };
/// assert_eq!(source.get("tag").map(<[String]>::len), Some(2));
/// assert_eq!(source.get("empty"), Some(&[][..]));
/// ```
#[macro_export]
macro_rules! source {
    () => {
        ::formbind_core::Source::new()
    };
    ($($key:expr => [$($value:expr),* $(,)?]),+ $(,)?) => {{
        let mut source = ::formbind_core::Source::new();
        $(
            source.insert(
                $key,
                ::std::vec::Vec::<::std::string::String>::from([
                    $(::std::string::String::from($value)),*
                ]),
            );
        )+
        source
    }};
}

/// Deterministic fixtures.
pub mod fixtures {
    use chrono::{DateTime, FixedOffset};
    use formbind_core::FileHeader;

    /// A fixed instant for time assertions (2019-01-20 16:02:58 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn fixed_time() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2019-01-20T16:02:58Z")
            .expect("hardcoded timestamp should always parse")
    }

    /// A small text upload named `filename`.
    #[must_use]
    pub fn text_upload(filename: &str, body: &str) -> FileHeader {
        FileHeader::new(filename, body).with_content_type("text/plain")
    }
}

/// Test helpers and utilities.
pub mod helpers {
    use tracing_subscriber::EnvFilter;

    /// Install a test-friendly `tracing` subscriber once per process.
    ///
    /// Honors `RUST_LOG`; defaults to `formbind_core=trace`. Output goes
    /// through the test harness's capture.
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("formbind_core=trace"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use proptest::prelude::*;

    /// Every accepted boolean spelling with its meaning.
    pub const BOOL_SPELLINGS: [(&str, bool); 12] = [
        ("1", true),
        ("t", true),
        ("T", true),
        ("TRUE", true),
        ("true", true),
        ("True", true),
        ("0", false),
        ("f", false),
        ("F", false),
        ("FALSE", false),
        ("false", false),
        ("False", false),
    ];

    /// A boolean spelling paired with the value it denotes.
    pub fn bool_spelling() -> impl Strategy<Value = (&'static str, bool)> {
        proptest::sample::select(BOOL_SPELLINGS.to_vec())
    }

    /// An external field name made of lowercase letters, digits and `_`.
    pub fn field_name() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_]{0,15}"
    }

    /// Integers rendered as decimal text.
    pub fn int_texts(max_len: usize) -> impl Strategy<Value = (Vec<i64>, Vec<String>)> {
        proptest::collection::vec(any::<i64>(), 0..max_len).prop_map(|ints| {
            let texts = ints.iter().map(ToString::to_string).collect();
            (ints, texts)
        })
    }

    /// Non-empty words that contain no collection separator.
    pub fn plain_words(max_len: usize) -> impl Strategy<Value = Vec<String>> {
        proptest::collection::vec("[A-Za-z0-9]{1,12}", 1..max_len)
    }
}
