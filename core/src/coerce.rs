//! The value coercer.
//!
//! Every bindable type implements [`Coerce`], one impl per type category:
//!
//! | Category              | Types                                                  |
//! |-----------------------|--------------------------------------------------------|
//! | scalar                | integers, `f32`, `f64`, `bool`, `String`               |
//! | time                  | `DateTime<FixedOffset>`, `DateTime<Utc>`, `Duration`   |
//! | pointer               | `Option<T>`, `Box<T>`                                  |
//! | fixed array           | `[T; N]`                                               |
//! | sequence              | `Vec<T>`                                               |
//! | mapping               | `HashMap<String, V>`, `BTreeMap<String, V>`            |
//! | dynamic               | `serde_json::Value`                                    |
//! | nested record         | `#[derive(Structured)]`                                |
//! | custom decoder        | `#[derive(Param)]`                                     |
//! | file                  | [`FileHeader`]                                         |
//! | unsupported           | `*const T`, `*mut T`                                   |
//!
//! [`coerce_slot`] is the single dispatch point: it asks the slot for a
//! custom decoder first and only falls back to the type's generic rule when
//! there is none. Containers recurse through it for their elements.

use crate::config::BindConfig;
use crate::error::{BindError, BoxError, InvalidBool};
use crate::file::FileHeader;
use crate::param::{self, DecodeParam};
use crate::plan::FieldSpec;
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashMap};
use std::slice;

/// The field currently being coerced.
#[derive(Debug, Clone, Copy)]
pub struct Field<'a> {
    name: &'a str,
    spec: &'a FieldSpec,
    config: &'a BindConfig,
}

impl<'a> Field<'a> {
    /// Create a field context.
    #[must_use]
    pub const fn new(name: &'a str, spec: &'a FieldSpec, config: &'a BindConfig) -> Self {
        Self { name, spec, config }
    }

    /// External name of the field.
    #[must_use]
    pub const fn name(&self) -> &'a str {
        self.name
    }

    /// Declared description of the field.
    #[must_use]
    pub const fn spec(&self) -> &'a FieldSpec {
        self.spec
    }

    /// Configuration of the binding call.
    #[must_use]
    pub const fn config(&self) -> &'a BindConfig {
        self.config
    }

    /// Build a conversion error for `value`.
    #[must_use]
    pub fn conversion(
        &self,
        value: &str,
        target: &'static str,
        source: impl Into<BoxError>,
    ) -> BindError {
        BindError::Conversion {
            field: self.name.to_owned(),
            value: value.to_owned(),
            target,
            source: source.into(),
        }
    }
}

/// A type that can be populated from source strings.
pub trait Coerce {
    /// Whether uploaded files can be bound into this type.
    const ACCEPTS_FILES: bool = false;

    /// Capability query for a custom single-string decoder.
    ///
    /// Returning `Some` makes [`coerce_slot`] bypass [`Coerce::coerce`].
    fn param_decoder(&mut self) -> Option<&mut dyn DecodeParam> {
        None
    }

    /// Convert `values` and assign the result in place.
    ///
    /// # Errors
    ///
    /// Returns a [`BindError`] naming `field` when conversion fails.
    fn coerce(&mut self, values: &[String], field: &Field<'_>) -> Result<(), BindError>;

    /// Assign uploaded files. Only called when [`Coerce::ACCEPTS_FILES`].
    ///
    /// # Errors
    ///
    /// Returns a [`BindError`] naming `field` when the files do not fit.
    fn bind_files(&mut self, files: &[FileHeader], field: &Field<'_>) -> Result<(), BindError> {
        let _ = (files, field);
        Ok(())
    }
}

/// Coerce `values` into `slot`, letting a custom decoder take precedence.
///
/// # Errors
///
/// Propagates the decoder's or the generic rule's [`BindError`].
pub fn coerce_slot<T>(slot: &mut T, values: &[String], field: &Field<'_>) -> Result<(), BindError>
where
    T: Coerce + ?Sized,
{
    if let Some(decoder) = slot.param_decoder() {
        return param::decode_first(decoder, values, field);
    }
    slot.coerce(values, field)
}

/// Decode the first value as structured text into a nested record.
///
/// Used by `#[derive(Structured)]`. An empty list leaves the record as is.
///
/// # Errors
///
/// Returns [`BindError::StructuredDecode`] for malformed JSON.
pub fn decode_structured<T>(
    slot: &mut T,
    values: &[String],
    field: &Field<'_>,
) -> Result<(), BindError>
where
    T: DeserializeOwned,
{
    let Some(first) = values.first() else {
        return Ok(());
    };
    *slot = serde_json::from_str(first).map_err(|source| BindError::StructuredDecode {
        field: field.name().to_owned(),
        source,
    })?;
    Ok(())
}

/// Parse the first value with `FromStr`; no values resets to the zero value.
fn parse_first<T>(
    slot: &mut T,
    values: &[String],
    field: &Field<'_>,
    target: &'static str,
) -> Result<(), BindError>
where
    T: std::str::FromStr + Default,
    T::Err: Into<BoxError>,
{
    *slot = match values.first() {
        Some(text) => text
            .parse()
            .map_err(|source| field.conversion(text, target, source))?,
        None => T::default(),
    };
    Ok(())
}

macro_rules! coerce_from_str {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Coerce for $ty {
                fn coerce(&mut self, values: &[String], field: &Field<'_>) -> Result<(), BindError> {
                    parse_first(self, values, field, stringify!($ty))
                }
            }
        )*
    };
}

coerce_from_str!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

/// Parse the boolean spellings `1 t T TRUE true True 0 f F FALSE false False`.
///
/// # Errors
///
/// Returns [`InvalidBool`] for anything else, including the empty string.
pub fn parse_bool(text: &str) -> Result<bool, InvalidBool> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(InvalidBool),
    }
}

impl Coerce for bool {
    fn coerce(&mut self, values: &[String], field: &Field<'_>) -> Result<(), BindError> {
        *self = match values.first() {
            Some(text) => parse_bool(text).map_err(|source| field.conversion(text, "bool", source))?,
            None => false,
        };
        Ok(())
    }
}

impl Coerce for String {
    fn coerce(&mut self, values: &[String], _field: &Field<'_>) -> Result<(), BindError> {
        match values.first() {
            Some(text) => self.clone_from(text),
            None => self.clear(),
        }
        Ok(())
    }
}

impl<T> Coerce for Option<T>
where
    T: Coerce + Default,
{
    const ACCEPTS_FILES: bool = T::ACCEPTS_FILES;

    fn coerce(&mut self, values: &[String], field: &Field<'_>) -> Result<(), BindError> {
        if let Some(inner) = self {
            return coerce_slot(inner, values, field);
        }

        let mut inner = T::default();
        // A decoder is never handed an empty list, so there is nothing to allocate for.
        if values.is_empty() && inner.param_decoder().is_some() {
            return Ok(());
        }
        coerce_slot(&mut inner, values, field)?;
        *self = Some(inner);
        Ok(())
    }

    fn bind_files(&mut self, files: &[FileHeader], field: &Field<'_>) -> Result<(), BindError> {
        self.get_or_insert_with(T::default).bind_files(files, field)
    }
}

impl<T> Coerce for Box<T>
where
    T: Coerce,
{
    const ACCEPTS_FILES: bool = T::ACCEPTS_FILES;

    fn param_decoder(&mut self) -> Option<&mut dyn DecodeParam> {
        (**self).param_decoder()
    }

    fn coerce(&mut self, values: &[String], field: &Field<'_>) -> Result<(), BindError> {
        coerce_slot(&mut **self, values, field)
    }

    fn bind_files(&mut self, files: &[FileHeader], field: &Field<'_>) -> Result<(), BindError> {
        (**self).bind_files(files, field)
    }
}

impl<T> Coerce for Vec<T>
where
    T: Coerce + Default,
{
    const ACCEPTS_FILES: bool = T::ACCEPTS_FILES;

    fn coerce(&mut self, values: &[String], field: &Field<'_>) -> Result<(), BindError> {
        let values = field.spec().collection.split(values);
        let mut elements = Vec::with_capacity(values.len());
        for value in values.iter() {
            let mut element = T::default();
            coerce_slot(&mut element, slice::from_ref(value), field)?;
            elements.push(element);
        }
        *self = elements;
        Ok(())
    }

    fn bind_files(&mut self, files: &[FileHeader], field: &Field<'_>) -> Result<(), BindError> {
        let mut elements = Vec::with_capacity(files.len());
        for file in files {
            let mut element = T::default();
            element.bind_files(slice::from_ref(file), field)?;
            elements.push(element);
        }
        *self = elements;
        Ok(())
    }
}

impl<T, const N: usize> Coerce for [T; N]
where
    T: Coerce,
{
    const ACCEPTS_FILES: bool = T::ACCEPTS_FILES;

    fn coerce(&mut self, values: &[String], field: &Field<'_>) -> Result<(), BindError> {
        let values = field.spec().collection.split(values);
        if values.is_empty() {
            return Ok(());
        }
        check_arity::<N>(values.len(), field)?;
        for (slot, value) in self.iter_mut().zip(values.iter()) {
            coerce_slot(slot, slice::from_ref(value), field)?;
        }
        Ok(())
    }

    fn bind_files(&mut self, files: &[FileHeader], field: &Field<'_>) -> Result<(), BindError> {
        check_arity::<N>(files.len(), field)?;
        for (slot, file) in self.iter_mut().zip(files) {
            slot.bind_files(slice::from_ref(file), field)?;
        }
        Ok(())
    }
}

fn check_arity<const N: usize>(actual: usize, field: &Field<'_>) -> Result<(), BindError> {
    if actual == N {
        Ok(())
    } else {
        Err(BindError::Arity {
            field: field.name().to_owned(),
            expected: N,
            actual,
        })
    }
}

impl<V> Coerce for HashMap<String, V>
where
    V: DeserializeOwned,
{
    fn coerce(&mut self, values: &[String], field: &Field<'_>) -> Result<(), BindError> {
        decode_structured(self, values, field)
    }
}

impl<V> Coerce for BTreeMap<String, V>
where
    V: DeserializeOwned,
{
    fn coerce(&mut self, values: &[String], field: &Field<'_>) -> Result<(), BindError> {
        decode_structured(self, values, field)
    }
}

/// The dynamic type keeps strings as strings: one value becomes a JSON
/// string, several become an array of strings.
impl Coerce for serde_json::Value {
    fn coerce(&mut self, values: &[String], _field: &Field<'_>) -> Result<(), BindError> {
        match values {
            [] => {}
            [single] => *self = Self::String(single.clone()),
            many => *self = Self::Array(many.iter().cloned().map(Self::String).collect()),
        }
        Ok(())
    }
}

impl<T> Coerce for *const T {
    fn coerce(&mut self, _values: &[String], field: &Field<'_>) -> Result<(), BindError> {
        Err(unsupported::<Self>(field))
    }
}

impl<T> Coerce for *mut T {
    fn coerce(&mut self, _values: &[String], field: &Field<'_>) -> Result<(), BindError> {
        Err(unsupported::<Self>(field))
    }
}

fn unsupported<T: ?Sized>(field: &Field<'_>) -> BindError {
    BindError::UnsupportedType {
        field: field.name().to_owned(),
        type_name: std::any::type_name::<T>(),
    }
}
