use std::error;
use std::fmt;
use std::io;
use std::str;
use std::string;

/// Represents results from this library
pub type Result<T> = std::result::Result<T, Error>;

/// Represents different failure cases
#[derive(Debug)]
pub enum Error {
    /// a std::io error
    Io(io::Error),
    /// a std::str::Utf8Error
    Utf8(str::Utf8Error),
    /// a JSON parsing related failure
    BadJson(usize, usize, String),
    /// a VLQ string contained a byte outside of the base64 alphabet
    VlqInvalidBase64(u8),
    /// a VLQ string ended while a continuation bit was still set
    VlqLeftover,
    /// a VLQ value does not fit into the supported integer range
    VlqOverflow,
    /// a delta resolved to a negative absolute value
    NegativeValue(&'static str),
    /// a segment of the `mappings` string could not be decoded
    MalformedMapping {
        /// the 1-based generated line the segment is on
        line: u32,
        /// the 0-based index of the segment within its line
        segment: usize,
        /// the underlying decoding failure
        cause: Box<Error>,
    },
    /// no line record exists for the given generated line
    NoMappingForLine(u32),
    /// the queried column lies before the first mapped column of the line
    NoMappingForColumn {
        /// the 1-based generated line that was queried
        line: u32,
        /// the queried column
        column: u32,
    },
    /// a frame matched a sourcemap but its position could not be resolved
    UnresolvableFrame {
        /// the generated file named by the frame
        file: String,
        /// the generated line of the frame
        line: u32,
        /// the generated column of the frame
        column: u32,
        /// the lookup failure for the frame's position
        cause: Box<Error>,
    },
    /// a reference to a non existing source was encountered
    BadSourceReference(u32),
    /// a reference to a non existing name was encountered
    BadNameReference(u32),
    /// Indicates that an indexed sourcemap was encountered when
    /// a regular sourcemap was expected
    IndexedSourcemap,
    /// Indicates an invalid data URL
    InvalidDataUrl,
    /// A sourcemap file found during discovery failed to load
    BadSourcemapFile(String, Box<Error>),
}

impl Error {
    /// If the error originated in a JSON file that can be located, then
    /// this method returns that location.
    pub fn source_location(&self) -> Option<(usize, usize)> {
        match *self {
            Error::BadJson(lineno, col, _) => Some((lineno, col)),
            Error::BadSourcemapFile(_, ref err) => err.source_location(),
            _ => None,
        }
    }

    /// Returns `true` if this error is caused by a position lookup miss.
    pub fn is_lookup_miss(&self) -> bool {
        matches!(
            *self,
            Error::NoMappingForLine(..) | Error::NoMappingForColumn { .. }
        )
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<string::FromUtf8Error> for Error {
    fn from(err: string::FromUtf8Error) -> Error {
        From::from(err.utf8_error())
    }
}

impl From<str::Utf8Error> for Error {
    fn from(err: str::Utf8Error) -> Error {
        Error::Utf8(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        if err.is_io() {
            return Error::Io(err.into());
        }
        Error::BadJson(err.line(), err.column(), err.to_string())
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Io(ref err) => Some(err),
            Error::Utf8(ref err) => Some(err),
            Error::MalformedMapping { ref cause, .. } => Some(&**cause),
            Error::UnresolvableFrame { ref cause, .. } => Some(&**cause),
            Error::BadSourcemapFile(_, ref err) => Some(&**err),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::Io(ref msg) => write!(f, "{msg}"),
            Error::Utf8(ref msg) => write!(f, "{msg}"),
            Error::BadJson(line, col, ref msg) => {
                write!(f, "bad json in line {line}, column {col}: {msg}")
            }
            Error::VlqInvalidBase64(byte) => {
                write!(f, "invalid vlq character {:?}", char::from(byte))
            }
            Error::VlqLeftover => write!(f, "leftover cur/shift in vlq decode"),
            Error::VlqOverflow => write!(f, "vlq decode overflowed"),
            Error::NegativeValue(field) => write!(f, "{field} resolved to a negative value"),
            Error::MalformedMapping {
                line,
                segment,
                ref cause,
            } => write!(
                f,
                "malformed mapping in line {line}, segment {segment}: {cause}"
            ),
            Error::NoMappingForLine(line) => {
                write!(f, "could not find a mapping for line {line}")
            }
            Error::NoMappingForColumn { line, column } => {
                write!(f, "could not find a mapping for column {column} in line {line}")
            }
            Error::UnresolvableFrame {
                ref file,
                line,
                column,
                ref cause,
            } => write!(f, "cannot resolve frame {file}:{line}:{column}: {cause}"),
            Error::BadSourceReference(id) => write!(f, "bad reference to source #{id}"),
            Error::BadNameReference(id) => write!(f, "bad reference to name #{id}"),
            Error::IndexedSourcemap => write!(f, "encountered unexpected indexed sourcemap"),
            Error::InvalidDataUrl => write!(f, "the provided data URL is invalid"),
            Error::BadSourcemapFile(ref path, ref err) => {
                write!(f, "failed to load sourcemap {path}: {err}")
            }
        }
    }
}
