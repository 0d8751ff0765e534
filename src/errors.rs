//! Errors

use core::fmt;

/// Configuration errors.
/// Transport failures are never folded into this type, see `device::DeviceError`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Error {
    /// Requested output frequency is not a positive finite number
    InvalidOutputFrequency,

    /// Reference frequency is not a positive finite number
    InvalidReferenceFrequency,

    /// Computed VCO frequency is outside of all four VCO bands
    VcoOutOfRange { vco_mhz: f64 },

    /// Computed field value does not fit into its bit field
    FieldOverflow {
        register: &'static str,
        field: &'static str,
        value: u32,
    },

    /// Register dump line (1-based) does not end with a hex value
    MalformedHexLine { line: usize },

    /// Register dump does not contain exactly one value per register slot
    RegisterCount { found: usize },

    /// Register dump could not be read
    #[cfg(feature = "std")]
    Io(std::io::ErrorKind),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidOutputFrequency => write!(f, "invalid output frequency"),
            Error::InvalidReferenceFrequency => write!(f, "invalid reference frequency"),
            Error::VcoOutOfRange { vco_mhz } => {
                write!(f, "VCO frequency {} MHz is outside of all VCO bands", vco_mhz)
            }
            Error::FieldOverflow { register, field, value } => {
                write!(f, "value {} does not fit into {}.{}", value, register, field)
            }
            Error::MalformedHexLine { line } => write!(f, "malformed hex value on line {}", line),
            Error::RegisterCount { found } => {
                write!(f, "expected {} register values, found {}", crate::register::NUM_SLOTS, found)
            }
            #[cfg(feature = "std")]
            Error::Io(kind) => write!(f, "register dump I/O error: {:?}", kind),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.kind())
    }
}
