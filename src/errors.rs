use std::fmt::{ Display, Formatter };
use std::fmt;
use thiserror::Error;

/// Errors that can occur while decoding a PLY stream.
///
/// Every variant is terminal for the current decode attempt. Nothing is retried
/// and no partially decoded samples are ever handed out alongside an error.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The `format` line names none of the supported encodings.
    #[error("Line {line}: unsupported PLY format")]
    UnsupportedFormat {
        /// 1-based header line of the offending `format` statement.
        line: usize,
    },
    /// A header statement could not be interpreted.
    #[error("Line {line}: malformed header: {reason}")]
    MalformedHeader {
        /// 1-based header line, `0` if the problem concerns the header as a whole.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },
    /// The stream ended before `end_header` was seen.
    #[error("Line {line}: unexpected end of stream while reading header (missing 'end_header')")]
    TruncatedHeader {
        /// Number of header lines that were read.
        line: usize,
    },
    /// The vertex element lacks a coordinate property the caller asked for.
    #[error("Vertex element has no '{name}' property")]
    MissingDimension {
        /// Name of the missing property.
        name: String,
    },
    /// A property whose byte width is required has a type the decoder doesn't know.
    #[error("Property '{property}' has unsupported type '{type_name}'")]
    UnsupportedPropertyType {
        /// Name of the property.
        property: String,
        /// Type token as written in the header.
        type_name: String,
    },
    /// An ASCII vertex line is missing or holds fewer values than declared.
    #[error("Vertex {vertex}: record is truncated")]
    TruncatedVertexRecord {
        /// 1-based index of the vertex.
        vertex: usize,
    },
    /// An ASCII value is not a decimal number.
    #[error("Line {line}: invalid number '{value}' for property '{field}'")]
    InvalidNumber {
        /// 1-based line in the file.
        line: usize,
        /// Property the value belongs to.
        field: String,
        /// The offending token.
        value: String,
    },
    /// A binary stream ended in the middle of the vertex data.
    #[error("Vertex {vertex}: unexpected end of stream")]
    UnexpectedEndOfStream {
        /// 1-based index of the vertex being read.
        vertex: usize,
    },
    /// Any other I/O failure of the underlying reader.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DecodeError {
    /// Returns the kind tag of this error, suitable for display next to the message.
    pub fn kind(&self) -> ErrorKind {
        match *self {
            DecodeError::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            DecodeError::MalformedHeader { .. } => ErrorKind::MalformedHeader,
            DecodeError::TruncatedHeader { .. } => ErrorKind::TruncatedHeader,
            DecodeError::MissingDimension { .. } => ErrorKind::MissingDimension,
            DecodeError::UnsupportedPropertyType { .. } => ErrorKind::UnsupportedPropertyType,
            DecodeError::TruncatedVertexRecord { .. } => ErrorKind::TruncatedVertexRecord,
            DecodeError::InvalidNumber { .. } => ErrorKind::InvalidNumber,
            DecodeError::UnexpectedEndOfStream { .. } => ErrorKind::UnexpectedEndOfStream,
            DecodeError::Io(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        DecodeError::MalformedHeader { line, reason: reason.into() }
    }
}

/// Flat tag for [`DecodeError`] variants.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum ErrorKind {
    /// See [`DecodeError::UnsupportedFormat`].
    UnsupportedFormat,
    /// See [`DecodeError::MalformedHeader`].
    MalformedHeader,
    /// See [`DecodeError::TruncatedHeader`].
    TruncatedHeader,
    /// See [`DecodeError::MissingDimension`].
    MissingDimension,
    /// See [`DecodeError::UnsupportedPropertyType`].
    UnsupportedPropertyType,
    /// See [`DecodeError::TruncatedVertexRecord`].
    TruncatedVertexRecord,
    /// See [`DecodeError::InvalidNumber`].
    InvalidNumber,
    /// See [`DecodeError::UnexpectedEndOfStream`].
    UnexpectedEndOfStream,
    /// See [`DecodeError::Io`].
    Io,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        f.write_str(
            match *self {
                ErrorKind::UnsupportedFormat => "UnsupportedFormat",
                ErrorKind::MalformedHeader => "MalformedHeader",
                ErrorKind::TruncatedHeader => "TruncatedHeader",
                ErrorKind::MissingDimension => "MissingDimension",
                ErrorKind::UnsupportedPropertyType => "UnsupportedPropertyType",
                ErrorKind::TruncatedVertexRecord => "TruncatedVertexRecord",
                ErrorKind::InvalidNumber => "InvalidNumber",
                ErrorKind::UnexpectedEndOfStream => "UnexpectedEndOfStream",
                ErrorKind::Io => "Io",
            }
        )
    }
}

/// A specialized `Result` type for decode operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Errors for measurement coordinates typed in by a user.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeasurementError {
    /// The text isn't two comma separated values.
    #[error("expected 'x,y', found {found} value(s)")]
    WrongArity {
        /// Number of comma separated parts found.
        found: usize,
    },
    /// One of the values isn't a finite decimal number.
    #[error("'{0}' is not a valid coordinate")]
    InvalidCoordinate(String),
}

/// Errors raised while browsing and loading a folder of PLY files.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// The folder could not be listed or a file could not be opened.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// No PLY file of that name exists in the folder.
    #[error("No PLY file named '{name}'")]
    NotFound {
        /// Requested file name.
        name: String,
    },
    /// The file was found but failed to decode.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}
