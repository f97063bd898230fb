//! Property types and the sample trait.
//!
//! PLY payload values are dynamically typed according to the header. This module
//! provides:
//! - [`ScalarType`] / [`PropertyType`] to describe the types declared in the header.
//! - [`Sample`] to let the decoder build the caller's point type from the coordinates
//!   it extracted.

/// Scalar type used to encode properties in the payload.
///
/// For the translation to rust types, see individual documentation.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ScalarType {
    /// Signed 8 bit integer, rust: `i8`.
    Char,
    /// Unsigned 8 bit integer, rust: `u8`.
    UChar,
    /// Signed 16 bit integer, rust: `i16`.
    Short,
    /// Unsigned 16 bit integer, rust: `u16`.
    UShort,
    /// Signed 32 bit integer, rust: `i32`.
    Int,
    /// Unsigned 32 bit integer, rust: `u32`.
    UInt,
    /// 32 bit floating point number, rust: `f32`.
    Float,
    /// 64 bit floating point number, rust: `f64`.
    Double,
}

impl ScalarType {
    /// Number of bytes one value occupies in a binary payload.
    pub fn byte_width(self) -> usize {
        match self {
            ScalarType::Char | ScalarType::UChar => 1,
            ScalarType::Short | ScalarType::UShort => 2,
            ScalarType::Int | ScalarType::UInt | ScalarType::Float => 4,
            ScalarType::Double => 8,
        }
    }

    /// Integer types may act as list length prefixes, floating point types can't.
    pub fn is_integer(self) -> bool {
        !matches!(self, ScalarType::Float | ScalarType::Double)
    }
}

/// Data type of a declared property.
///
/// There are two well-formed kinds: scalars and lists.
/// Lists are a sequence of scalars with a leading integer value defining how many elements the list contains.
/// A type token the decoder doesn't know is kept verbatim; it only becomes an error once
/// its width is needed.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum PropertyType {
    /// Simple, "one-number" type.
    Scalar(ScalarType),
    /// Sequence of scalars with the same type.
    ///
    /// First value is the index type, second value is the type of the list elements.
    List(ScalarType, ScalarType),
    /// Type token(s) not found in the PLY type table, as written in the header.
    Unsupported(String),
}

impl PropertyType {
    /// `true` for list declarations, including lists with unsupported element types.
    pub fn is_list(&self) -> bool {
        match *self {
            PropertyType::Scalar(_) => false,
            PropertyType::List(_, _) => true,
            PropertyType::Unsupported(ref t) => t.starts_with("list "),
        }
    }
}

/// A point type the decoder can produce.
///
/// The decoder looks up each name of [`Sample::DIMENSIONS`] in the vertex schema,
/// extracts the values in that order and hands them to [`Sample::from_coordinates`].
/// Screen projection only ever looks at [`Sample::planar`].
pub trait Sample: Sized {
    /// Names of the vertex properties this sample is built from.
    const DIMENSIONS: &'static [&'static str];

    /// Builds a sample. `coordinates` has exactly `DIMENSIONS.len()` entries.
    fn from_coordinates(coordinates: &[f64]) -> Self;

    /// Data-space position used for projection onto a canvas.
    fn planar(&self) -> (f64, f64);
}
