//! Record descriptions and the field resolver.
//!
//! `#[derive(Bind)]` emits one [`FieldSpec`] per declared field, in
//! declaration order, collected into a [`RecordShape`]. Resolving a spec
//! against a tag namespace yields its [`BindingPlan`]: the external name, the
//! skip decision and the default literal.
//!
//! Tags follow the `name,default=literal` convention. Everything after
//! `default=` is the literal, so multi-value defaults are written
//! comma-joined: `#[bind(form = "ids,default=1,2,3")]`.

use std::borrow::Cow;

/// External name that forces a field to be skipped.
pub const SKIP_SENTINEL: &str = "-";

/// How each source string of a sequence or array field is split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CollectionFormat {
    /// One element per source string.
    #[default]
    Multi,
    /// Comma separated.
    Csv,
    /// Space separated.
    Ssv,
    /// Tab separated.
    Tsv,
    /// Pipe separated.
    Pipes,
}

impl CollectionFormat {
    /// Separator for this format, `None` for [`CollectionFormat::Multi`].
    #[must_use]
    pub const fn separator(self) -> Option<char> {
        match self {
            Self::Multi => None,
            Self::Csv => Some(','),
            Self::Ssv => Some(' '),
            Self::Tsv => Some('\t'),
            Self::Pipes => Some('|'),
        }
    }

    /// Split every source string on the separator, keeping order.
    #[must_use]
    pub fn split(self, values: &[String]) -> Cow<'_, [String]> {
        match self.separator() {
            None => Cow::Borrowed(values),
            Some(separator) => Cow::Owned(
                values
                    .iter()
                    .flat_map(|value| value.split(separator))
                    .map(str::to_owned)
                    .collect(),
            ),
        }
    }

    /// Expand a default literal into the values it stands for.
    ///
    /// `multi` splits on commas and accepts `;` as an alternative
    /// separator; other formats split on their own separator.
    #[must_use]
    pub fn split_default(self, literal: &str) -> Vec<String> {
        match self.separator() {
            None => literal
                .split([',', ';'])
                .map(str::to_owned)
                .collect(),
            Some(separator) => literal.split(separator).map(str::to_owned).collect(),
        }
    }
}

/// Directives for timestamp fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeDirectives {
    /// `strftime` format, or one of `unix`, `unixmilli`, `unixmicro`,
    /// `unixnano`. `None` means RFC 3339.
    pub format: Option<&'static str>,
    /// IANA zone used to interpret zone-less timestamps.
    pub location: Option<&'static str>,
    /// Normalise the parsed instant to UTC.
    pub utc: bool,
}

/// Static description of one declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Declared field identifier.
    pub ident: &'static str,
    /// Whether the field is `pub`.
    pub public: bool,
    /// Skipped in every namespace (`#[bind(skip)]`).
    pub skip: bool,
    /// Bound from the same source as its parent (`#[bind(flatten)]`).
    pub flatten: bool,
    /// `(namespace, tag)` pairs in declaration order.
    pub tags: &'static [(&'static str, &'static str)],
    /// Timestamp directives.
    pub time: TimeDirectives,
    /// Splitting rule for sequences and arrays.
    pub collection: CollectionFormat,
}

/// Resolved decision for one field within one namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingPlan {
    /// Key looked up in the source.
    pub name: &'static str,
    /// Whether the field is left untouched.
    pub skip: bool,
    /// Default literal applied when the key is absent.
    pub default: Option<&'static str>,
}

impl FieldSpec {
    /// A private, untagged field.
    #[must_use]
    pub const fn new(ident: &'static str) -> Self {
        Self {
            ident,
            public: false,
            skip: false,
            flatten: false,
            tags: &[],
            time: TimeDirectives {
                format: None,
                location: None,
                utc: false,
            },
            collection: CollectionFormat::Multi,
        }
    }

    /// Mark the field as `pub`.
    #[must_use]
    pub const fn exported(mut self) -> Self {
        self.public = true;
        self
    }

    /// Skip the field in every namespace.
    #[must_use]
    pub const fn skipped(mut self) -> Self {
        self.skip = true;
        self
    }

    /// Bind the field's own fields from the parent's source.
    #[must_use]
    pub const fn flattened(mut self) -> Self {
        self.flatten = true;
        self
    }

    /// Set the `(namespace, tag)` table.
    #[must_use]
    pub const fn with_tags(mut self, tags: &'static [(&'static str, &'static str)]) -> Self {
        self.tags = tags;
        self
    }

    /// Set timestamp directives.
    #[must_use]
    pub const fn with_time(mut self, time: TimeDirectives) -> Self {
        self.time = time;
        self
    }

    /// Set the collection format.
    #[must_use]
    pub const fn with_collection(mut self, collection: CollectionFormat) -> Self {
        self.collection = collection;
        self
    }

    /// Raw tag declared for `namespace`.
    #[must_use]
    pub fn tag(&self, namespace: &str) -> Option<&'static str> {
        self.tags
            .iter()
            .find(|(candidate, _)| *candidate == namespace)
            .map(|(_, tag)| *tag)
    }

    /// Resolve this field within `namespace`.
    ///
    /// An explicit skip (`#[bind(skip)]` or the `-` name) wins over
    /// everything, then non-`pub` fields are skipped, then the external name
    /// falls back to the identifier when the tag leaves it empty.
    #[must_use]
    pub fn plan(&self, namespace: &str) -> BindingPlan {
        let (name, options) = match self.tag(namespace) {
            Some(tag) => match tag.split_once(',') {
                Some((name, options)) => (name, Some(options)),
                None => (tag, None),
            },
            None => ("", None),
        };

        if self.skip || name == SKIP_SENTINEL || !self.public {
            return BindingPlan {
                name: self.ident,
                skip: true,
                default: None,
            };
        }

        BindingPlan {
            name: if name.is_empty() { self.ident } else { name },
            skip: false,
            default: options.and_then(default_literal),
        }
    }
}

/// Find `default=` at an option boundary; the literal runs to the end.
fn default_literal(options: &'static str) -> Option<&'static str> {
    let mut rest = options;
    loop {
        if let Some(literal) = rest.strip_prefix("default=") {
            return Some(literal);
        }
        rest = rest.split_once(',')?.1;
    }
}

/// Static description of a record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordShape {
    /// Type name.
    pub name: &'static str,
    /// Fields in declaration order, including private ones.
    pub fields: &'static [FieldSpec],
}

impl RecordShape {
    /// Look up a field by identifier.
    #[must_use]
    pub fn field(&self, ident: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|field| field.ident == ident)
    }

    /// Binding plans of every field within `namespace`, in declaration order.
    pub fn plans<'a>(
        &self,
        namespace: &'a str,
    ) -> impl Iterator<Item = (&'static FieldSpec, BindingPlan)> + 'a {
        self.fields.iter().map(move |field| (field, field.plan(namespace)))
    }
}
