//! Custom single-string decoders.
//!
//! A type opts into custom decoding by implementing [`DecodeParam`] and
//! deriving `Param`. The derive answers the capability query in
//! [`Coerce::param_decoder`](crate::Coerce::param_decoder), so the decoder
//! wins over every generic rule, including for array- or sequence-shaped
//! newtypes.
//!
//! # Example
//!
//! ```ignore
//! use formbind_core::{DecodeParam, ParamError};
//! use formbind_macros::Param;
//!
//! #[derive(Param, Default)]
//! struct Hex(i64);
//!
//! impl DecodeParam for Hex {
//!     fn decode_param(&mut self, param: &str) -> Result<(), ParamError> {
//!         self.0 = i64::from_str_radix(param, 16)?;
//!         Ok(())
//!     }
//! }
//! ```

use crate::coerce::Field;
use crate::error::{BindError, BoxError};

/// Error returned by a custom decoder.
pub type ParamError = BoxError;

/// Decode a value from a single source string, in place.
pub trait DecodeParam {
    /// Replace `self` with the value encoded by `param`.
    ///
    /// # Errors
    ///
    /// Returns the decoder's own error; the binder wraps it in
    /// [`BindError::CustomDecode`] without altering the message.
    fn decode_param(&mut self, param: &str) -> Result<(), ParamError>;
}

/// Run `decoder` on the first value; extra values are ignored and an empty
/// list leaves the target untouched.
///
/// # Errors
///
/// Returns [`BindError::CustomDecode`] when the decoder fails.
pub fn decode_first(
    decoder: &mut dyn DecodeParam,
    values: &[String],
    field: &Field<'_>,
) -> Result<(), BindError> {
    let Some(first) = values.first() else {
        return Ok(());
    };
    tracing::trace!(field = field.name(), "using custom decoder");
    decoder
        .decode_param(first)
        .map_err(|source| BindError::CustomDecode {
            field: field.name().to_owned(),
            source,
        })
}
