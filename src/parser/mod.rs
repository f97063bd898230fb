//! Reads ascii or binary PLY data into a `PointCloud`.

use std::io;
use std::io::{ BufRead, BufReader, ErrorKind, Read };
use std::marker::PhantomData;
use std::result;

use byteorder::{ BigEndian, ByteOrder, LittleEndian, ReadBytesExt };
use tracing::{ debug, info, trace };

use crate::errors::{ DecodeError, DecodeResult };
use crate::ply::{ Addable, ElementDef, Encoding, Header, PointCloud, PropertyDef, PropertySchema, PropertyType, Sample, ScalarType };
use crate::util::LocationTracker;

mod ply_grammar;

use self::ply_grammar::grammar;
pub use self::ply_grammar::Line;

type Result<T> = DecodeResult<T>;

/// Upper bound on the samples reserved up front; the declared count is untrusted.
const MAX_PREALLOCATED_SAMPLES: usize = 1 << 16;

/// Decodes PLY streams into samples of type `S`.
///
/// In most cases `read_ply()` should suffice. It takes ownership of the stream,
/// so the stream is closed by the time the call returns, whatever the outcome.
/// If you need finer control, the header and the vertex data can be read separately.
///
/// # Examples
///
/// ```rust
/// # use plyview::*;
/// let txt = "ply\n\
/// format ascii 1.0\n\
/// element vertex 2\n\
/// property float x\n\
/// property float y\n\
/// property float z\n\
/// end_header\n\
/// 0 0 0\n\
/// 10 10 0\n";
///
/// let p = parser::Parser::<ply::PointSample>::new();
/// let cloud = p.read_ply(txt.as_bytes()).unwrap();
/// assert_eq!(cloud.samples.len(), 2);
/// assert_eq!(cloud.samples[1], ply::PointSample::new(10.0, 10.0, 0.0));
/// ```
///
/// Reading the header first, then the samples:
///
/// ```rust
/// # use plyview::*;
/// # let txt = "ply\nformat ascii 1.0\nelement vertex 1\nproperty float x\nproperty float y\nend_header\n3 4\n";
/// let mut buf_read = std::io::BufReader::new(txt.as_bytes());
/// let p = parser::Parser::<ply::Measurement>::new();
///
/// let header = p.read_header(&mut buf_read).unwrap();
/// assert_eq!(header.vertex_count(), 1);
///
/// let samples = p.read_samples(&mut buf_read, &header).unwrap();
/// assert_eq!(samples, vec![ply::Measurement::new(3.0, 4.0)]);
/// ```
#[derive(Debug)]
pub struct Parser<S: Sample> {
    phantom: PhantomData<S>,
}

impl<S: Sample> Clone for Parser<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: Sample> Copy for Parser<S> {}

impl<S: Sample> Default for Parser<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Sample> Parser<S> {
    /// Creates a new `Parser<S>`, where `S` is the sample type to produce.
    pub fn new() -> Self {
        Parser { phantom: PhantomData }
    }

    /// Decodes a complete PLY stream.
    ///
    /// Reads the header, checks that the vertex element has every property `S` needs,
    /// then reads exactly `vertex_count` samples. Trailing data is left unread.
    pub fn read_ply<T: Read>(&self, source: T) -> Result<PointCloud<S>> {
        let mut source = BufReader::new(source);
        let mut location = LocationTracker::new();
        let decoded = self.__read_header(&mut source, &mut location)
            .and_then(|header| {
                let samples = self.__read_samples(&mut source, &mut location, &header)?;
                Ok(PointCloud { header, samples })
            });
        match decoded {
            Ok(cloud) => {
                info!(vertices = cloud.samples.len(), encoding = %cloud.header.encoding, "decoded PLY stream");
                Ok(cloud)
            }
            Err(e) => {
                debug!(kind = %e.kind(), "PLY decode failed: {}", e);
                Err(e)
            }
        }
    }
}

// ////////////////////////
/// #Header
// ////////////////////////
impl<S: Sample> Parser<S> {
    /// Reads header until and including `end_header`.
    ///
    /// The reader is left positioned at the first byte of the payload.
    pub fn read_header<T: BufRead>(&self, reader: &mut T) -> Result<Header> {
        let mut location = LocationTracker::new();
        self.__read_header(reader, &mut location)
    }

    /// Classifies a single PLY header line.
    ///
    /// This is a low-level helper that exposes the header grammar; most callers
    /// should use [`Parser::read_header`] or [`Parser::read_ply`].
    pub fn read_header_line<'a>(&self, line: &'a str) -> Result<Line<'a>> {
        self.__read_header_line(line)
            .map_err(|e| DecodeError::malformed(0, format!("couldn't parse line '{}': {}", line, e)))
    }

    // private
    fn __read_header_line<'a>(&self, line_str: &'a str) -> result::Result<Line<'a>, peg::error::ParseError<peg::str::LineCol>> {
        grammar::line(line_str)
    }
    fn __read_header<T: BufRead>(&self, reader: &mut T, location: &mut LocationTracker) -> Result<Header> {
        let mut header = Header::new();
        let mut encoding: Option<Encoding> = None;
        let mut buf = Vec::<u8>::with_capacity(128);
        'readlines: loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                return Err(DecodeError::TruncatedHeader { line: location.line_index });
            }
            location.next_line();
            let line_str = match std::str::from_utf8(&buf) {
                Ok(s) => trim_line_end(s),
                Err(_) => return Err(DecodeError::malformed(location.line_index, "header line is not valid UTF-8")),
            };
            let line = self.__read_header_line(line_str)
                .map_err(|e| DecodeError::malformed(location.line_index, format!("couldn't parse line: {}", e)))?;

            match line {
                Line::MagicNumber => (),
                Line::Format(rest) => {
                    let detected = match Encoding::detect(rest) {
                        Some(e) => e,
                        None => return Err(DecodeError::UnsupportedFormat { line: location.line_index }),
                    };
                    if let Some(previous) = encoding {
                        if previous != detected {
                            return Err(DecodeError::malformed(
                                location.line_index,
                                format!("format '{}' contradicts earlier format '{}'", detected, previous),
                            ));
                        }
                    }
                    encoding = Some(detected);
                },
                Line::Comment(c) => header.comments.push(c.to_string()),
                Line::ObjInfo(o) => header.obj_infos.push(o.to_string()),
                Line::Element { name, count } => {
                    let count = grammar::count(count).map_err(|_| DecodeError::malformed(
                        location.line_index,
                        format!("element '{}' has invalid count '{}'", name, count),
                    ))?;
                    if !header.elements.add(ElementDef::new(name.to_string(), count)) {
                        return Err(DecodeError::malformed(location.line_index, format!("element '{}' declared twice", name)));
                    }
                },
                Line::Property { data_type, name } => {
                    let element = match header.elements.last_mut() {
                        Some((_, e)) => e,
                        None => return Err(DecodeError::malformed(
                            location.line_index,
                            format!("property '{}' found without preceding element", name),
                        )),
                    };
                    if !element.properties.add(PropertyDef::new(name.to_string(), data_type)) {
                        return Err(DecodeError::malformed(
                            location.line_index,
                            format!("property '{}' declared twice for element '{}'", name, element.name),
                        ));
                    }
                },
                Line::Malformed(_) => return Err(DecodeError::malformed(
                    location.line_index,
                    format!("incomplete declaration '{}'", line_str),
                )),
                Line::EndHeader => break 'readlines,
                Line::Other(o) => trace!(line = location.line_index, "ignoring header line '{}'", o),
            }
        }

        header.encoding = match encoding {
            Some(e) => e,
            None => return Err(DecodeError::malformed(0, "no format line found")),
        };
        debug!(
            encoding = %header.encoding,
            vertices = header.vertex_count(),
            elements = header.elements.len(),
            "parsed PLY header"
        );
        Ok(header)
    }
}

fn trim_line_end(s: &str) -> &str {
    let s = s.strip_suffix('\n').unwrap_or(s);
    s.strip_suffix('\r').unwrap_or(s)
}

// //////////////////////
// # Samples
// //////////////////////
impl<S: Sample> Parser<S> {
    /// Reads the vertex samples declared by `header`. Encoding is chosen according to the header.
    ///
    /// Records of elements declared before `vertex` are stepped over first.
    /// Line numbers in errors count from the start of the payload.
    pub fn read_samples<T: BufRead>(&self, reader: &mut T, header: &Header) -> Result<Vec<S>> {
        let mut location = LocationTracker::new();
        self.__read_samples(reader, &mut location, header)
    }

    fn __read_samples<T: BufRead>(&self, reader: &mut T, location: &mut LocationTracker, header: &Header) -> Result<Vec<S>> {
        let schema = match header.vertex_properties() {
            Some(p) => p,
            None => return Err(DecodeError::MissingDimension { name: S::DIMENSIONS[0].to_string() }),
        };
        let targets = dimension_targets::<S>(schema)?;
        match header.encoding {
            Encoding::Ascii => self.__read_ascii_samples(reader, location, header, schema, &targets),
            Encoding::BinaryBigEndian => self.__read_binary_samples::<T, BigEndian>(reader, header, schema, &targets),
            Encoding::BinaryLittleEndian => self.__read_binary_samples::<T, LittleEndian>(reader, header, schema, &targets),
        }
    }
}

/// Maps every schema position to the coordinate it feeds, if any.
fn dimension_targets<S: Sample>(schema: &PropertySchema) -> Result<Vec<Option<usize>>> {
    let mut targets = vec![None; schema.len()];
    for (dimension, name) in S::DIMENSIONS.iter().enumerate() {
        let position = match schema.get_index_of(*name) {
            Some(p) => p,
            None => return Err(DecodeError::MissingDimension { name: name.to_string() }),
        };
        let property = &schema[position];
        if property.data_type.is_list() {
            return Err(unsupported(property));
        }
        targets[position] = Some(dimension);
    }
    Ok(targets)
}

fn unsupported(property: &PropertyDef) -> DecodeError {
    let type_name = match property.data_type {
        PropertyType::Scalar(s) => format!("{:?}", s),
        PropertyType::List(i, t) => format!("list {:?} {:?}", i, t),
        PropertyType::Unsupported(ref t) => t.clone(),
    };
    DecodeError::UnsupportedPropertyType { property: property.name.clone(), type_name }
}

/// # Ascii
impl<S: Sample> Parser<S> {
    fn __read_ascii_samples<T: BufRead>(&self, reader: &mut T, location: &mut LocationTracker, header: &Header, schema: &PropertySchema, targets: &[Option<usize>]) -> Result<Vec<S>> {
        for property in schema.values() {
            if let PropertyType::Unsupported(_) = property.data_type {
                if property.data_type.is_list() {
                    return Err(unsupported(property));
                }
            }
        }

        let mut buf = Vec::<u8>::with_capacity(128);
        for element in header.leading_elements() {
            for _ in 0..element.count {
                buf.clear();
                if reader.read_until(b'\n', &mut buf)? == 0 {
                    return Err(DecodeError::UnexpectedEndOfStream { vertex: 1 });
                }
                location.next_line();
            }
        }

        let count = header.vertex_count();
        let mut samples = Vec::<S>::with_capacity(count.min(MAX_PREALLOCATED_SAMPLES));
        let mut coordinates = vec![0.0f64; S::DIMENSIONS.len()];
        for i in 0..count {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                return Err(DecodeError::TruncatedVertexRecord { vertex: i + 1 });
            }
            location.next_line();
            let line = String::from_utf8_lossy(&buf);
            self.__read_ascii_record(trim_line_end(&line), location.line_index, i + 1, schema, targets, &mut coordinates)?;
            samples.push(S::from_coordinates(&coordinates));
        }
        Ok(samples)
    }

    fn __read_ascii_record(&self, line: &str, line_index: usize, vertex: usize, schema: &PropertySchema, targets: &[Option<usize>], coordinates: &mut [f64]) -> Result<()> {
        let tokens: Vec<&str> = line.split([' ', '\t']).filter(|t| !t.is_empty()).collect();
        if tokens.len() < schema.len() {
            return Err(DecodeError::TruncatedVertexRecord { vertex });
        }
        let invalid = |property: &PropertyDef, value: &str| DecodeError::InvalidNumber {
            line: line_index,
            field: property.name.clone(),
            value: value.to_string(),
        };

        let mut it = tokens.iter();
        for (property, target) in schema.values().zip(targets) {
            let token = match it.next() {
                Some(t) => *t,
                None => return Err(DecodeError::TruncatedVertexRecord { vertex }),
            };
            if property.data_type.is_list() {
                let length = grammar::count(token).map_err(|_| invalid(property, token))?;
                for _ in 0..length {
                    if it.next().is_none() {
                        return Err(DecodeError::TruncatedVertexRecord { vertex });
                    }
                }
            } else if let Some(dimension) = *target {
                coordinates[dimension] = grammar::number(token).map_err(|_| invalid(property, token))?;
            }
        }
        Ok(())
    }
}

/// Binary layout of one property.
#[derive(Debug, Clone, Copy)]
enum Slot {
    Value(ScalarType),
    List(ScalarType, ScalarType),
}

fn binary_layout(schema: &PropertySchema) -> Result<Vec<Slot>> {
    schema.values()
        .map(|property| match property.data_type {
            PropertyType::Scalar(s) => Ok(Slot::Value(s)),
            PropertyType::List(i, t) => Ok(Slot::List(i, t)),
            PropertyType::Unsupported(_) => Err(unsupported(property)),
        })
        .collect()
}

/// # Binary
impl<S: Sample> Parser<S> {
    fn __read_binary_samples<T: Read, B: ByteOrder>(&self, reader: &mut T, header: &Header, schema: &PropertySchema, targets: &[Option<usize>]) -> Result<Vec<S>> {
        let leading = header.leading_elements()
            .map(|e| Ok((e.count, binary_layout(&e.properties)?)))
            .collect::<Result<Vec<(usize, Vec<Slot>)>>>()?;
        let layout = binary_layout(schema)?;

        for (count, slots) in &leading {
            for _ in 0..*count {
                for slot in slots {
                    skip_slot::<T, B>(reader, *slot).map_err(|e| eof_to_stream_end(e, 1))?;
                }
            }
        }

        let count = header.vertex_count();
        let mut samples = Vec::<S>::with_capacity(count.min(MAX_PREALLOCATED_SAMPLES));
        let mut coordinates = vec![0.0f64; S::DIMENSIONS.len()];
        for i in 0..count {
            for (slot, target) in layout.iter().zip(targets) {
                let read = match (*slot, *target) {
                    (Slot::Value(s), Some(dimension)) => read_scalar::<T, B>(reader, s).map(|v| coordinates[dimension] = v),
                    (slot, _) => skip_slot::<T, B>(reader, slot),
                };
                read.map_err(|e| eof_to_stream_end(e, i + 1))?;
            }
            samples.push(S::from_coordinates(&coordinates));
        }
        Ok(samples)
    }
}

fn eof_to_stream_end(e: io::Error, vertex: usize) -> DecodeError {
    if e.kind() == ErrorKind::UnexpectedEof {
        DecodeError::UnexpectedEndOfStream { vertex }
    } else {
        DecodeError::Io(e)
    }
}

fn read_scalar<T: Read, B: ByteOrder>(reader: &mut T, scalar: ScalarType) -> io::Result<f64> {
    Ok(match scalar {
        ScalarType::Char => f64::from(reader.read_i8()?),
        ScalarType::UChar => f64::from(reader.read_u8()?),
        ScalarType::Short => f64::from(reader.read_i16::<B>()?),
        ScalarType::UShort => f64::from(reader.read_u16::<B>()?),
        ScalarType::Int => f64::from(reader.read_i32::<B>()?),
        ScalarType::UInt => f64::from(reader.read_u32::<B>()?),
        ScalarType::Float => f64::from(reader.read_f32::<B>()?),
        ScalarType::Double => reader.read_f64::<B>()?,
    })
}

fn skip_slot<T: Read, B: ByteOrder>(reader: &mut T, slot: Slot) -> io::Result<()> {
    match slot {
        Slot::Value(s) => skip_bytes(reader, s.byte_width() as u64),
        Slot::List(index, item) => {
            let length = read_scalar::<T, B>(reader, index)?;
            if length < 0.0 {
                return Err(io::Error::new(ErrorKind::InvalidData, format!("list length cannot be negative ({})", length)));
            }
            skip_bytes(reader, length as u64 * item.byte_width() as u64)
        }
    }
}

fn skip_bytes<T: Read>(reader: &mut T, n: u64) -> io::Result<()> {
    let skipped = io::copy(&mut reader.by_ref().take(n), &mut io::sink())?;
    if skipped < n {
        return Err(io::Error::new(ErrorKind::UnexpectedEof, format!("expected {} more bytes, got {}", n, skipped)));
    }
    Ok(())
}
