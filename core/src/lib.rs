//! # Formbind Core
//!
//! Binds a flat, multi-valued string source (decoded form fields, query
//! parameters, path parameters) into a typed record.
//!
//! ## Core Concepts
//!
//! - **Source**: read-only map from external name to an ordered list of strings
//! - **Record shape**: per-field name, default, skip and time directives,
//!   generated at compile time by `#[derive(Bind)]`
//! - **Binding plan**: the `{name, skip, default}` decision for one field
//! - **Coercion**: conversion of the selected strings into the field's type,
//!   dispatched through the [`Coerce`] trait
//! - **Custom decoders**: [`DecodeParam`] implementations that override every
//!   generic rule
//!
//! ## Example
//!
//! ```ignore
//! use formbind_core::{bind_form, Source};
//! use formbind_macros::Bind;
//!
//! #[derive(Bind, Default)]
//! struct Listing {
//!     #[bind(form = "page,default=1")]
//!     pub page: u32,
//!     #[bind(form = "tag")]
//!     pub tags: Vec<String>,
//!     #[bind(form = "-")]
//!     pub internal: bool,
//! }
//!
//! let mut listing = Listing::default();
//! bind_form(&mut listing, &Source::new().with("tag", ["rust", "web"]))?;
//! assert_eq!(listing.page, 1);
//! assert_eq!(listing.tags, ["rust", "web"]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod bind;
pub mod coerce;
pub mod config;
pub mod duration;
pub mod error;
pub mod file;
pub mod param;
pub mod plan;
pub mod source;
pub mod time;

// Re-export key types for convenience
pub use bind::{
    Bind, BindContext, Binder, FORM_TAG, PATH_TAG, bind_field, bind_flattened, bind_form,
    bind_path, bind_with_tag,
};
pub use coerce::{Coerce, Field, coerce_slot};
pub use config::{BindConfig, ConfigError};
pub use error::{BindError, BoxError, ErrorKind};
pub use file::FileHeader;
pub use param::{DecodeParam, ParamError};
pub use plan::{BindingPlan, CollectionFormat, FieldSpec, RecordShape, SKIP_SENTINEL, TimeDirectives};
pub use source::Source;

/// Items used by derive-generated code.
#[doc(hidden)]
pub mod __private {
    pub use serde::de::DeserializeOwned;
}
