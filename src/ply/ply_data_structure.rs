//! Core data structures representing a decoded PLY file.
//!
//! This module defines [`PointCloud`], its [`Header`], and the type definitions needed to
//! describe element/property declarations.

use std::fmt::{ Display, Formatter };
use std::fmt;
use super::{ KeyMap, PropertySchema, PropertyType };

/// Name of the element holding the points.
pub const VERTEX_ELEMENT: &str = "vertex";

/// A fully decoded point set together with the header it was declared by.
///
/// A `PointCloud` is only ever produced complete: `samples.len()` equals
/// `header.vertex_count()`.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud<S> {
    /// All header information found in the PLY file.
    pub header: Header,
    /// Decoded samples in file order.
    pub samples: Vec<S>,
}

impl<S> PointCloud<S> {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// `true` if the cloud holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl<S> Default for PointCloud<S> {
    fn default() -> Self {
        PointCloud { header: Header::new(), samples: Vec::new() }
    }
}

// Header Types

/// Models the header of a PLY file.
///
/// The header is fixed once `end_header` has been read; decoding only borrows it.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Header {
    /// In which format is the payload encoded?
    pub encoding: Encoding,
    /// Arbitrary object metadata lines (`obj_info ...`) as found in the header.
    pub obj_infos: Vec<String>,
    /// File comments.
    pub comments: Vec<String>,
    /// Ordered map of elements as they appear in the payload.
    pub elements: KeyMap<ElementDef>,
}

impl Default for Header {
    fn default() -> Self {
        Self::new()
    }
}

impl Header {
    /// Constructs an empty `Header` using ASCII encoding.
    pub fn new() -> Self {
        Header {
            encoding: Encoding::Ascii,
            obj_infos: Vec::new(),
            comments: Vec::new(),
            elements: KeyMap::new(),
        }
    }

    /// The `vertex` element definition, if declared.
    pub fn vertex_element(&self) -> Option<&ElementDef> {
        self.elements.get(VERTEX_ELEMENT)
    }

    /// Declared number of vertices, `0` without a `vertex` element.
    pub fn vertex_count(&self) -> usize {
        self.vertex_element().map_or(0, |e| e.count)
    }

    /// Ordered per-vertex properties.
    pub fn vertex_properties(&self) -> Option<&PropertySchema> {
        self.vertex_element().map(|e| &e.properties)
    }

    /// Elements whose records come before the vertex records in the payload.
    pub fn leading_elements(&self) -> impl Iterator<Item = &ElementDef> {
        self.elements.values().take_while(|e| e.name != VERTEX_ELEMENT)
    }
}

/// Models possible encoding standards for the payload.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Encoding {
    /// Numbers in their ascii representation (e.g. -13, 6.28, etc.).
    /// Properties are separated by spaces and elements are separated by line breaks.
    Ascii,
    /// Payload encoded as big endian.
    BinaryBigEndian,
    /// Payload encoded as little endian.
    BinaryLittleEndian,
}

impl Encoding {
    /// Detects the encoding named in the remainder of a `format` line.
    ///
    /// Little endian wins over big endian, which wins over ascii, when a line
    /// mentions more than one of them.
    pub fn detect(format_line: &str) -> Option<Encoding> {
        if format_line.contains("binary_little_endian") {
            Some(Encoding::BinaryLittleEndian)
        } else if format_line.contains("binary_big_endian") {
            Some(Encoding::BinaryBigEndian)
        } else if format_line.contains("ascii") {
            Some(Encoding::Ascii)
        } else {
            None
        }
    }
}

impl Display for Encoding {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        f.write_str(
            match *self {
                Encoding::Ascii => "ascii",
                Encoding::BinaryBigEndian => "binary_big_endian",
                Encoding::BinaryLittleEndian => "binary_little_endian",
            }
        )
    }
}

/// Models the definition of an element.
///
/// Only the `vertex` element is decoded. Other elements are kept so their records
/// can be stepped over when they precede the vertices.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ElementDef {
    /// Name of the element.
    pub name: String,
    /// How many records of this element appear in the payload.
    pub count: usize,
    /// Properties of one record, in declaration order.
    pub properties: PropertySchema,
}
impl ElementDef {
    /// Creates a new element definition without properties.
    pub fn new(name: String, count: usize) -> Self {
        ElementDef {
            name,
            count,
            properties: KeyMap::new(),
        }
    }
}

/// Defines a property of an element.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct PropertyDef {
    /// Name of the property, case-sensitive.
    pub name: String,
    /// Declared data type.
    pub data_type: PropertyType,
}

impl PropertyDef {
    /// Creates a new property definition.
    pub fn new(name: String, data_type: PropertyType) -> Self {
        PropertyDef {
            name,
            data_type,
        }
    }
}
