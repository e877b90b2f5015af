//! Binding entry points.
//!
//! A binding call walks a record's fields in declaration order, resolves each
//! field's [`BindingPlan`](crate::BindingPlan) within the selected tag
//! namespace and coerces the matching source values into it:
//!
//! 1. skipped fields are never touched;
//! 2. a present key (even with no values) is coerced;
//! 3. an absent key with a default literal coerces the expanded literal;
//! 4. otherwise the field keeps its current value.
//!
//! The first failure aborts the call. Fields bound before it keep their new
//! values.

use crate::coerce::{Coerce, Field, coerce_slot};
use crate::config::BindConfig;
use crate::error::BindError;
use crate::plan::{FieldSpec, RecordShape};
use crate::source::Source;

/// Tag namespace for form and query fields.
pub const FORM_TAG: &str = "form";

/// Tag namespace for path parameters.
pub const PATH_TAG: &str = "uri";

/// A record whose fields can be bound from a [`Source`].
///
/// Implemented by `#[derive(Bind)]`.
pub trait Bind {
    /// Static description of the record's fields.
    const SHAPE: RecordShape;

    /// Bind every eligible field, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns the first [`BindError`] raised by any field.
    fn bind_fields(&mut self, source: &Source, ctx: &BindContext<'_>) -> Result<(), BindError>;
}

/// Tag namespace and configuration of one binding call.
#[derive(Debug, Clone, Copy)]
pub struct BindContext<'a> {
    tag: &'a str,
    config: &'a BindConfig,
}

impl<'a> BindContext<'a> {
    /// Create a context.
    #[must_use]
    pub const fn new(tag: &'a str, config: &'a BindConfig) -> Self {
        Self { tag, config }
    }

    /// Selected tag namespace.
    #[must_use]
    pub const fn tag(&self) -> &'a str {
        self.tag
    }

    /// Configuration of this call.
    #[must_use]
    pub const fn config(&self) -> &'a BindConfig {
        self.config
    }
}

/// Bind one field according to its plan.
///
/// Called by `#[derive(Bind)]` for every `pub` field.
///
/// # Errors
///
/// Returns the field's coercion error.
pub fn bind_field<T>(
    slot: &mut T,
    spec: &FieldSpec,
    source: &Source,
    ctx: &BindContext<'_>,
) -> Result<(), BindError>
where
    T: Coerce,
{
    let plan = spec.plan(ctx.tag());
    if plan.skip {
        tracing::trace!(field = spec.ident, "skipped");
        return Ok(());
    }

    let field = Field::new(plan.name, spec, ctx.config());

    if T::ACCEPTS_FILES {
        if let Some(files) = source.files(plan.name) {
            tracing::trace!(field = plan.name, count = files.len(), "binding files");
            return slot.bind_files(files, &field);
        }
    }

    if let Some(values) = source.get(plan.name) {
        tracing::trace!(field = plan.name, count = values.len(), "binding from source");
        return coerce_slot(slot, values, &field);
    }

    if let Some(literal) = plan.default {
        tracing::debug!(field = plan.name, default = literal, "applying default");
        let values = spec.collection.split_default(literal);
        return coerce_slot(slot, &values, &field);
    }

    tracing::trace!(field = plan.name, "absent");
    Ok(())
}

/// Bind a `#[bind(flatten)]` field's own fields from the parent's source.
///
/// # Errors
///
/// Returns the first error raised by the nested record.
pub fn bind_flattened<T>(
    slot: &mut T,
    spec: &FieldSpec,
    source: &Source,
    ctx: &BindContext<'_>,
) -> Result<(), BindError>
where
    T: Bind,
{
    if spec.plan(ctx.tag()).skip {
        tracing::trace!(field = spec.ident, "skipped");
        return Ok(());
    }
    tracing::debug!(field = spec.ident, record = T::SHAPE.name, "entering flattened record");
    slot.bind_fields(source, ctx)
}

/// Binds records with an explicit [`BindConfig`].
///
/// # Examples
///
/// ```ignore
/// use formbind_core::{Binder, BindConfig, Source};
/// use formbind_macros::Bind;
///
/// #[derive(Bind, Default)]
/// struct Search {
///     #[bind(form = "q")]
///     pub query: String,
///     #[bind(form = "page,default=1")]
///     pub page: u32,
/// }
///
/// let binder = Binder::new(BindConfig::default());
/// let mut search = Search::default();
/// binder.bind_form(&mut search, &Source::new().with("q", ["rust"]))?;
/// assert_eq!(search.page, 1);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Binder {
    config: BindConfig,
}

impl Binder {
    /// Create a binder.
    #[must_use]
    pub const fn new(config: BindConfig) -> Self {
        Self { config }
    }

    /// Configuration used by this binder.
    #[must_use]
    pub const fn config(&self) -> &BindConfig {
        &self.config
    }

    /// Bind `target` from `source`, reading names from the `tag` namespace.
    ///
    /// # Errors
    ///
    /// Returns the first [`BindError`] encountered.
    pub fn bind_with_tag<T>(&self, target: &mut T, source: &Source, tag: &str) -> Result<(), BindError>
    where
        T: Bind,
    {
        let span = tracing::debug_span!("bind", record = T::SHAPE.name, tag);
        let _entered = span.enter();
        target.bind_fields(source, &BindContext::new(tag, &self.config))
    }

    /// Bind using the [`FORM_TAG`] namespace.
    ///
    /// # Errors
    ///
    /// Returns the first [`BindError`] encountered.
    pub fn bind_form<T: Bind>(&self, target: &mut T, source: &Source) -> Result<(), BindError> {
        self.bind_with_tag(target, source, FORM_TAG)
    }

    /// Bind using the [`PATH_TAG`] namespace.
    ///
    /// # Errors
    ///
    /// Returns the first [`BindError`] encountered.
    pub fn bind_path<T: Bind>(&self, target: &mut T, source: &Source) -> Result<(), BindError> {
        self.bind_with_tag(target, source, PATH_TAG)
    }
}

/// [`Binder::bind_with_tag`] with the default configuration.
///
/// # Errors
///
/// Returns the first [`BindError`] encountered.
pub fn bind_with_tag<T: Bind>(target: &mut T, source: &Source, tag: &str) -> Result<(), BindError> {
    Binder::default().bind_with_tag(target, source, tag)
}

/// [`Binder::bind_form`] with the default configuration.
///
/// # Errors
///
/// Returns the first [`BindError`] encountered.
pub fn bind_form<T: Bind>(target: &mut T, source: &Source) -> Result<(), BindError> {
    Binder::default().bind_form(target, source)
}

/// [`Binder::bind_path`] with the default configuration.
///
/// # Errors
///
/// Returns the first [`BindError`] encountered.
pub fn bind_path<T: Bind>(target: &mut T, source: &Source) -> Result<(), BindError> {
    Binder::default().bind_path(target, source)
}
