//! Static analysis of printf-style format strings.
//!
//! A format string is scanned once, left to right, and every specifier of the
//! shape `%<flags><width>.<precision><length><conversion>` is reduced to the
//! handful of facts needed for sizing: dynamic `*` markers, string versus
//! non-string, and any static truncation precision.
//!
//! The scanner is a `const fn`, so the same code runs at compile time (see
//! [`param_types!`](crate::param_types)) and on the logging hot path. It never
//! fails: malformed specifiers become [`ParamType::Invalid`] entries and the
//! scan continues after them.

use crate::param_type::{ParamType, MAX_PRECISION};

/// Upper bound of entries a single specifier can produce (`%*.*s`).
const MAX_PARAMS_PER_SPEC: usize = 3;

/// Classifications produced by one specifier, plus where scanning resumes.
#[derive(Debug, Clone, Copy)]
struct Specifier {
    params: [ParamType; MAX_PARAMS_PER_SPEC],
    count: usize,
    end: usize,
}

impl Specifier {
    const EMPTY: Specifier = Specifier {
        params: [ParamType::Invalid; MAX_PARAMS_PER_SPEC],
        count: 0,
        end: 0,
    };

    const fn push(mut self, param: ParamType) -> Self {
        self.params[self.count] = param;
        self.count += 1;
        self
    }
}

const fn is_flag(c: u8) -> bool {
    matches!(c, b'-' | b'+' | b' ' | b'#' | b'0')
}

const fn is_length(c: u8) -> bool {
    matches!(c, b'h' | b'l' | b'j' | b'z' | b't' | b'L')
}

const fn is_terminal(c: u8) -> bool {
    matches!(
        c,
        b'd' | b'i'
            | b'u'
            | b'o'
            | b'x'
            | b'X'
            | b'f'
            | b'F'
            | b'e'
            | b'E'
            | b'g'
            | b'G'
            | b'a'
            | b'A'
            | b'c'
            | b'p'
            | b'%'
            | b's'
            | b'n'
    )
}

/// Finds the next argument-consuming specifier at or after `pos`.
///
/// Returns `None` once only literal text (and `%%` escapes) remain. Every
/// returned specifier has at least one entry and `end > pos`.
const fn next_specifier(bytes: &[u8], mut pos: usize) -> Option<Specifier> {
    let len = bytes.len();

    loop {
        while pos < len && bytes[pos] != b'%' {
            pos += 1;
        }
        if pos >= len {
            return None;
        }
        pos += 1;

        // %% is a literal percent
        if pos < len && bytes[pos] == b'%' {
            pos += 1;
            continue;
        }
        break;
    }

    let mut spec = Specifier::EMPTY;

    while pos < len && is_flag(bytes[pos]) {
        pos += 1;
    }

    if pos < len && bytes[pos] == b'*' {
        spec = spec.push(ParamType::DynamicWidth);
        pos += 1;
    } else {
        while pos < len && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
    }

    let mut dynamic_precision = false;
    let mut precision: Option<u32> = None;
    if pos < len && bytes[pos] == b'.' {
        pos += 1;
        if pos < len && bytes[pos] == b'*' {
            spec = spec.push(ParamType::DynamicPrecision);
            dynamic_precision = true;
            pos += 1;
        } else {
            let mut value: u32 = 0;
            while pos < len && bytes[pos].is_ascii_digit() {
                value = value
                    .saturating_mul(10)
                    .saturating_add((bytes[pos] - b'0') as u32);
                pos += 1;
            }
            if value > MAX_PRECISION {
                value = MAX_PRECISION;
            }
            precision = Some(value);
        }
    }

    while pos < len && is_length(bytes[pos]) {
        pos += 1;
    }

    // Unterminated specifier at the end of the string
    if pos >= len {
        spec = spec.push(ParamType::Invalid);
        spec.end = len;
        return Some(spec);
    }

    let conversion = bytes[pos];
    pos += 1;

    // %n stores the output position, which is unknowable without formatting
    let param = if !is_terminal(conversion) || conversion == b'n' {
        ParamType::Invalid
    } else if conversion != b's' {
        ParamType::NonString
    } else if dynamic_precision {
        ParamType::StringWithDynamicPrecision
    } else {
        match precision {
            None => ParamType::StringWithNoPrecision,
            Some(p) => ParamType::String(p),
        }
    };

    spec = spec.push(param);
    spec.end = pos;
    Some(spec)
}

/// Lazy, allocation-free iterator over the classifications of a format string.
///
/// # Examples
///
/// ```
/// # use format_sizer::{ParamIter, ParamType};
/// let mut params = ParamIter::new("id=%d name=%.*s");
/// assert_eq!(params.next(), Some(ParamType::NonString));
/// assert_eq!(params.next(), Some(ParamType::DynamicPrecision));
/// assert_eq!(params.next(), Some(ParamType::StringWithDynamicPrecision));
/// assert_eq!(params.next(), None);
/// ```
#[derive(Debug, Clone)]
pub struct ParamIter<'a> {
    bytes: &'a [u8],
    pos: usize,
    current: Specifier,
    cursor: usize,
}

impl<'a> ParamIter<'a> {
    pub fn new(format: &'a str) -> Self {
        Self::from_bytes(format.as_bytes())
    }

    pub fn from_bytes(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            pos: 0,
            current: Specifier::EMPTY,
            cursor: 0,
        }
    }
}

impl Iterator for ParamIter<'_> {
    type Item = ParamType;

    fn next(&mut self) -> Option<ParamType> {
        if self.cursor >= self.current.count {
            self.current = next_specifier(self.bytes, self.pos)?;
            self.pos = self.current.end;
            self.cursor = 0;
        }
        let param = self.current.params[self.cursor];
        self.cursor += 1;
        Some(param)
    }
}

impl std::iter::FusedIterator for ParamIter<'_> {}

/// Classifies every argument slot of `format`, in call-site order.
///
/// # Examples
///
/// ```
/// # use format_sizer::{classify, ParamType};
/// assert!(classify("100%% done").is_empty());
/// assert_eq!(
///     classify("%*d %.5s"),
///     vec![ParamType::DynamicWidth, ParamType::NonString, ParamType::String(5)]
/// );
/// ```
pub fn classify(format: &str) -> Vec<ParamType> {
    classify_bytes(format.as_bytes(), format.len())
}

/// Classifies the first `len` bytes of `bytes`.
///
/// `len` is clamped to the slice length, so a stale or oversized length can
/// never cause a read past the end of the buffer.
pub fn classify_bytes(bytes: &[u8], len: usize) -> Vec<ParamType> {
    let bytes = &bytes[..len.min(bytes.len())];
    let mut params = Vec::with_capacity(param_count_bytes(bytes));
    params.extend(ParamIter::from_bytes(bytes));
    params
}

/// Number of argument slots `format` requires.
pub const fn param_count(format: &str) -> usize {
    param_count_bytes(format.as_bytes())
}

const fn param_count_bytes(bytes: &[u8]) -> usize {
    let mut count = 0;
    let mut pos = 0;
    while let Some(spec) = next_specifier(bytes, pos) {
        count += spec.count;
        pos = spec.end;
    }
    count
}

/// Compile-time classification into a fixed-size array.
///
/// # Panics
///
/// Panics (at compile time when used in a `const`) if `N` differs from
/// [`param_count`] of `format`.
pub const fn classify_const<const N: usize>(format: &str) -> [ParamType; N] {
    let bytes = format.as_bytes();
    let mut params = [ParamType::Invalid; N];
    let mut filled = 0;
    let mut pos = 0;
    while let Some(spec) = next_specifier(bytes, pos) {
        let mut i = 0;
        while i < spec.count {
            assert!(filled < N, "format string has more parameters than N");
            params[filled] = spec.params[i];
            filled += 1;
            i += 1;
        }
        pos = spec.end;
    }
    assert!(filled == N, "format string has fewer parameters than N");
    params
}

/// True if any classification is [`ParamType::Invalid`].
pub const fn contains_invalid(params: &[ParamType]) -> bool {
    let mut i = 0;
    while i < params.len() {
        if params[i].is_invalid() {
            return true;
        }
        i += 1;
    }
    false
}

/// Classifies a format string literal at compile time.
///
/// Expands to a `[ParamType; N]` array. A format containing an invalid or
/// unsupported specifier (such as `%n`) fails to compile.
///
/// # Examples
///
/// ```
/// # use format_sizer::{param_types, ParamType};
/// const PARAMS: [ParamType; 2] = param_types!("%.*s");
/// assert_eq!(PARAMS, [ParamType::DynamicPrecision, ParamType::StringWithDynamicPrecision]);
/// ```
///
/// ```compile_fail
/// # use format_sizer::param_types;
/// let _ = param_types!("written %n bytes");
/// ```
#[macro_export]
macro_rules! param_types {
    ($fmt:expr) => {{
        const COUNT: usize = $crate::format_classifier::param_count($fmt);
        const PARAMS: [$crate::ParamType; COUNT] =
            $crate::format_classifier::classify_const::<COUNT>($fmt);
        const _: () = assert!(
            !$crate::format_classifier::contains_invalid(&PARAMS),
            "invalid or unsupported printf specifier in format string"
        );
        PARAMS
    }};
}
