//! Per-argument size calculation for the compact log buffer.
//!
//! Each argument of a logging call is measured against its [`ParamType`] to
//! find out how many bytes it will occupy once packed. Strings are stored as
//! a length prefix followed by their (possibly truncated) content; everything
//! else is stored at its natural width.

use std::ffi::{CStr, CString};
use std::ptr::NonNull;

use crate::param_type::ParamType;
use crate::sizing_config::SizingConfig;

/// Most recent dynamic precision seen while sizing one logging call.
///
/// Written when a scalar classified [`ParamType::DynamicPrecision`] is sized
/// and read by the `%.*s` string that follows it. Create a fresh value for
/// every logging call and thread it through the arguments left to right;
/// it must never be shared between calls or threads.
///
/// A fresh value is "unset" and truncates nothing. Negative precisions are
/// treated the same way, as printf ignores them. So is a NaN float.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunningPrecision(u64);

impl RunningPrecision {
    const UNSET: u64 = u64::MAX;

    pub const fn new() -> Self {
        Self(Self::UNSET)
    }

    #[inline]
    pub const fn get(&self) -> u64 {
        self.0
    }

    #[inline]
    pub fn observe(&mut self, precision: u64) {
        self.0 = precision;
    }

    /// Clamps a content length (in elements) to the observed precision.
    #[inline]
    pub fn truncate(&self, len: usize) -> usize {
        if len as u64 > self.0 {
            self.0 as usize
        } else {
            len
        }
    }
}

impl Default for RunningPrecision {
    fn default() -> Self {
        Self::new()
    }
}

/// A value that can be sized for the compact log buffer.
///
/// Implemented for primitive scalars, raw pointers, narrow strings
/// (`str`, `String`, `CStr`, `CString`) and [`WideStr`]. References forward
/// to their referent.
pub trait ArgSize {
    /// Returns the number of bytes this argument occupies.
    ///
    /// # Arguments
    ///
    /// * `param` - Classification of the argument's slot in the format string
    /// * `precision` - Call-scoped dynamic precision, updated by
    ///   `DynamicPrecision` scalars and consulted by `%.*s` strings
    /// * `content_len` - Set to the truncated payload byte count for strings
    ///   sized as strings; left untouched otherwise
    /// * `config` - Pointer, prefix and wide element widths
    fn arg_size(
        &self,
        param: ParamType,
        precision: &mut RunningPrecision,
        content_len: &mut usize,
        config: &SizingConfig,
    ) -> usize;

    /// True for string and character-sequence values.
    fn is_string_shaped(&self) -> bool {
        false
    }
}

impl<A: ArgSize + ?Sized> ArgSize for &A {
    #[inline]
    fn arg_size(
        &self,
        param: ParamType,
        precision: &mut RunningPrecision,
        content_len: &mut usize,
        config: &SizingConfig,
    ) -> usize {
        (**self).arg_size(param, precision, content_len, config)
    }

    fn is_string_shaped(&self) -> bool {
        (**self).is_string_shaped()
    }
}

#[inline]
fn widen_signed(value: i64) -> u64 {
    if value < 0 {
        RunningPrecision::UNSET
    } else {
        value as u64
    }
}

#[inline]
fn widen_float(value: f64) -> u64 {
    if value.is_nan() || value < 0.0 {
        RunningPrecision::UNSET
    } else {
        value as u64
    }
}

macro_rules! impl_scalar_arg {
    ($($ty:ty => |$v:ident| $widen:expr;)*) => {$(
        impl ArgSize for $ty {
            #[inline]
            fn arg_size(
                &self,
                param: ParamType,
                precision: &mut RunningPrecision,
                _content_len: &mut usize,
                _config: &SizingConfig,
            ) -> usize {
                if param == ParamType::DynamicPrecision {
                    let $v = *self;
                    precision.observe($widen);
                }
                std::mem::size_of::<$ty>()
            }
        }
    )*};
}

impl_scalar_arg! {
    i8 => |v| widen_signed(v as i64);
    i16 => |v| widen_signed(v as i64);
    i32 => |v| widen_signed(v as i64);
    i64 => |v| widen_signed(v);
    isize => |v| widen_signed(v as i64);
    i128 => |v| if v < 0 { RunningPrecision::UNSET } else { v.min(u64::MAX as i128) as u64 };
    u8 => |v| v as u64;
    u16 => |v| v as u64;
    u32 => |v| v as u64;
    u64 => |v| v;
    usize => |v| v as u64;
    u128 => |v| v.min(u64::MAX as u128) as u64;
    f32 => |v| widen_float(v as f64);
    f64 => |v| widen_float(v);
    bool => |v| v as u64;
    char => |v| v as u64;
}

impl<T: ?Sized> ArgSize for *const T {
    #[inline]
    fn arg_size(
        &self,
        _param: ParamType,
        _precision: &mut RunningPrecision,
        _content_len: &mut usize,
        config: &SizingConfig,
    ) -> usize {
        config.pointer_width
    }
}

impl<T: ?Sized> ArgSize for *mut T {
    #[inline]
    fn arg_size(
        &self,
        _param: ParamType,
        _precision: &mut RunningPrecision,
        _content_len: &mut usize,
        config: &SizingConfig,
    ) -> usize {
        config.pointer_width
    }
}

impl<T: ?Sized> ArgSize for NonNull<T> {
    #[inline]
    fn arg_size(
        &self,
        _param: ParamType,
        _precision: &mut RunningPrecision,
        _content_len: &mut usize,
        config: &SizingConfig,
    ) -> usize {
        config.pointer_width
    }
}

/// Shared sizing rule for every string encoding.
///
/// A string passed to a non-string conversion (typically `%p`) is an address
/// and collapses to pointer width without looking at its content.
fn string_size(
    param: ParamType,
    precision: &RunningPrecision,
    content_len: &mut usize,
    elements: usize,
    element_width: usize,
    config: &SizingConfig,
) -> usize {
    if !param.is_string() {
        return config.pointer_width;
    }

    let kept = match param {
        ParamType::String(limit) => elements.min(limit as usize),
        ParamType::StringWithDynamicPrecision => precision.truncate(elements),
        _ => elements,
    };

    *content_len = kept * element_width;
    *content_len + config.length_prefix_width
}

impl ArgSize for str {
    #[inline]
    fn arg_size(
        &self,
        param: ParamType,
        precision: &mut RunningPrecision,
        content_len: &mut usize,
        config: &SizingConfig,
    ) -> usize {
        string_size(param, precision, content_len, self.len(), 1, config)
    }

    fn is_string_shaped(&self) -> bool {
        true
    }
}

impl ArgSize for String {
    #[inline]
    fn arg_size(
        &self,
        param: ParamType,
        precision: &mut RunningPrecision,
        content_len: &mut usize,
        config: &SizingConfig,
    ) -> usize {
        self.as_str().arg_size(param, precision, content_len, config)
    }

    fn is_string_shaped(&self) -> bool {
        true
    }
}

impl ArgSize for CStr {
    #[inline]
    fn arg_size(
        &self,
        param: ParamType,
        precision: &mut RunningPrecision,
        content_len: &mut usize,
        config: &SizingConfig,
    ) -> usize {
        string_size(param, precision, content_len, self.to_bytes().len(), 1, config)
    }

    fn is_string_shaped(&self) -> bool {
        true
    }
}

impl ArgSize for CString {
    #[inline]
    fn arg_size(
        &self,
        param: ParamType,
        precision: &mut RunningPrecision,
        content_len: &mut usize,
        config: &SizingConfig,
    ) -> usize {
        self.as_c_str().arg_size(param, precision, content_len, config)
    }

    fn is_string_shaped(&self) -> bool {
        true
    }
}

/// Borrowed wide-character string, terminated by the first zero unit or the
/// end of the slice.
///
/// The byte width of each element comes from
/// [`SizingConfig::wide_char_width`], not from `U`, so UTF-16 and UTF-32
/// targets can be sized from either host.
///
/// # Examples
///
/// ```
/// # use format_sizer::{ArgSize, ParamType, RunningPrecision, SizingConfig, WideStr};
/// let units: Vec<u32> = "héllo\0junk".chars().map(|c| c as u32).collect();
/// let wide = WideStr::new(&units);
/// assert_eq!(wide.len(), 5);
///
/// let config = SizingConfig::new().with_wide_char_width(4);
/// let mut precision = RunningPrecision::new();
/// let mut content_len = 0;
/// let size = wide.arg_size(ParamType::String(3), &mut precision, &mut content_len, &config);
/// assert_eq!(content_len, 12);
/// assert_eq!(size, 12 + config.length_prefix_width);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct WideStr<'a, U = u32> {
    units: &'a [U],
}

impl<'a, U: Copy + Default + PartialEq> WideStr<'a, U> {
    pub fn new(units: &'a [U]) -> Self {
        Self { units }
    }

    /// Number of elements before the terminator.
    pub fn len(&self) -> usize {
        let nul = U::default();
        self.units
            .iter()
            .position(|&unit| unit == nul)
            .unwrap_or(self.units.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<U: Copy + Default + PartialEq> ArgSize for WideStr<'_, U> {
    fn arg_size(
        &self,
        param: ParamType,
        precision: &mut RunningPrecision,
        content_len: &mut usize,
        config: &SizingConfig,
    ) -> usize {
        string_size(
            param,
            precision,
            content_len,
            self.len(),
            config.wide_char_width,
            config,
        )
    }

    fn is_string_shaped(&self) -> bool {
        true
    }
}

/// Sizes log arguments against their classifications.
///
/// Holds only configuration; all per-call state lives in the caller's
/// [`RunningPrecision`] and content-length slots, so one calculator can be
/// shared freely between threads.
///
/// # Examples
///
/// ```
/// # use format_sizer::{classify, RunningPrecision, SizeCalculator};
/// let params = classify("%.*s");
/// let calc = SizeCalculator::default();
/// let mut precision = RunningPrecision::new();
/// let mut content_len = 0;
///
/// let width = calc.size_of(params[0], &mut precision, &mut content_len, &3i32);
/// let size = calc.size_of(params[1], &mut precision, &mut content_len, "hello");
///
/// assert_eq!(width, 4);
/// assert_eq!(content_len, 3);
/// assert_eq!(size, 3 + 4);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SizeCalculator {
    config: SizingConfig,
}

impl SizeCalculator {
    pub const fn new(config: SizingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SizingConfig {
        &self.config
    }

    /// Returns the number of bytes `value` occupies for the slot `param`.
    ///
    /// Arguments of one call must be sized in order with the same
    /// `precision`, so a `%.*s` string sees the precision argument before it.
    #[inline]
    pub fn size_of<A: ArgSize + ?Sized>(
        &self,
        param: ParamType,
        precision: &mut RunningPrecision,
        content_len: &mut usize,
        value: &A,
    ) -> usize {
        value.arg_size(param, precision, content_len, &self.config)
    }
}
