use std::fmt;

/// Classification of one argument slot expected by a printf-style format string.
///
/// One `ParamType` is produced for every argument a call site has to supply:
/// each `*` placeholder (width or precision) gets its own entry, followed by
/// the entry for the conversion's value.
///
/// # Raw Encoding
///
/// Every variant maps onto a stable `i32`, which is handy for packing
/// classification tables into binary headers:
///
/// | Variant                      | Raw |
/// |------------------------------|-----|
/// | `Invalid`                    | -6  |
/// | `DynamicWidth`               | -5  |
/// | `DynamicPrecision`           | -4  |
/// | `NonString`                  | -3  |
/// | `StringWithDynamicPrecision` | -2  |
/// | `StringWithNoPrecision`      | -1  |
/// | `String(p)`                  | p   |
///
/// Everything at or below `NonString` is "not a string" for sizing purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// Unrecognized, malformed or unsupported specifier (including `%n`)
    Invalid,

    /// The `*` in `%*d`
    DynamicWidth,

    /// The `*` in `%.*d`
    DynamicPrecision,

    /// Any non-string conversion (`%d`, `%lf`, `%p`, ...)
    NonString,

    /// `%.*s`
    StringWithDynamicPrecision,

    /// `%s`
    StringWithNoPrecision,

    /// `%.Ns`, carrying the static precision `N`
    String(u32),
}

/// Largest static precision representable in the raw encoding.
pub const MAX_PRECISION: u32 = i32::MAX as u32;

impl ParamType {
    /// Returns the raw `i32` encoding of this classification.
    pub const fn to_raw(self) -> i32 {
        match self {
            ParamType::Invalid => -6,
            ParamType::DynamicWidth => -5,
            ParamType::DynamicPrecision => -4,
            ParamType::NonString => -3,
            ParamType::StringWithDynamicPrecision => -2,
            ParamType::StringWithNoPrecision => -1,
            ParamType::String(precision) => {
                if precision > MAX_PRECISION {
                    MAX_PRECISION as i32
                } else {
                    precision as i32
                }
            }
        }
    }

    /// Decodes a raw value. Anything below -6 is treated as `Invalid`.
    pub const fn from_raw(raw: i32) -> Self {
        match raw {
            -5 => ParamType::DynamicWidth,
            -4 => ParamType::DynamicPrecision,
            -3 => ParamType::NonString,
            -2 => ParamType::StringWithDynamicPrecision,
            -1 => ParamType::StringWithNoPrecision,
            p if p >= 0 => ParamType::String(p as u32),
            _ => ParamType::Invalid,
        }
    }

    /// True for the three string classifications (`%s`, `%.Ns`, `%.*s`).
    #[inline]
    pub const fn is_string(self) -> bool {
        self.to_raw() > ParamType::NonString.to_raw()
    }

    #[inline]
    pub const fn is_invalid(self) -> bool {
        matches!(self, ParamType::Invalid)
    }

    /// Static truncation precision, if the format declared one.
    #[inline]
    pub const fn static_precision(self) -> Option<u32> {
        match self {
            ParamType::String(precision) => Some(precision),
            _ => None,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Invalid => write!(f, "invalid"),
            ParamType::DynamicWidth => write!(f, "dynamic width"),
            ParamType::DynamicPrecision => write!(f, "dynamic precision"),
            ParamType::NonString => write!(f, "non-string"),
            ParamType::StringWithDynamicPrecision => write!(f, "string (dynamic precision)"),
            ParamType::StringWithNoPrecision => write!(f, "string"),
            ParamType::String(precision) => write!(f, "string (precision {})", precision),
        }
    }
}
