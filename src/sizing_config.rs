/// Width constants used when sizing log arguments.
///
/// All widths are in bytes. The defaults match the host platform: native
/// pointer width, a `u32` length prefix in front of every string payload, and
/// the platform's `wchar_t` width for wide strings.
///
/// # Examples
///
/// ```
/// # use format_sizer::SizingConfig;
/// // Size UTF-16 wide strings regardless of host platform
/// let config = SizingConfig::new().with_wide_char_width(2);
/// assert_eq!(config.wide_char_width, 2);
/// assert_eq!(config.length_prefix_width, 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizingConfig {
    /// Bytes stored for an opaque pointer, or for string data passed to a
    /// non-string conversion such as `%p`
    pub pointer_width: usize,

    /// Bytes of the length prefix written before each string payload
    pub length_prefix_width: usize,

    /// Bytes per element of a wide string
    pub wide_char_width: usize,
}

/// Native `wchar_t` width.
#[cfg(windows)]
pub const DEFAULT_WIDE_CHAR_WIDTH: usize = 2;
#[cfg(not(windows))]
pub const DEFAULT_WIDE_CHAR_WIDTH: usize = 4;

pub const DEFAULT_LENGTH_PREFIX_WIDTH: usize = std::mem::size_of::<u32>();

pub const DEFAULT_POINTER_WIDTH: usize = std::mem::size_of::<*const ()>();

impl SizingConfig {
    pub const fn new() -> Self {
        Self {
            pointer_width: DEFAULT_POINTER_WIDTH,
            length_prefix_width: DEFAULT_LENGTH_PREFIX_WIDTH,
            wide_char_width: DEFAULT_WIDE_CHAR_WIDTH,
        }
    }

    pub const fn with_pointer_width(mut self, width: usize) -> Self {
        self.pointer_width = width;
        self
    }

    pub const fn with_length_prefix_width(mut self, width: usize) -> Self {
        self.length_prefix_width = width;
        self
    }

    pub const fn with_wide_char_width(mut self, width: usize) -> Self {
        self.wide_char_width = width;
        self
    }
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self::new()
    }
}
