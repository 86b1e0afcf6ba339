//! # Format Sizer
//!
//! Static format-string classification and per-argument sizing for
//! low-overhead binary logging:
//!
//! * **Classify once**: each printf-style format string is scanned a single
//!   time, at compile time or on first use, into one [`ParamType`] per
//!   argument slot
//! * **Size cheaply**: each runtime argument is measured against its
//!   classification, including `%.Ns` and `%.*s` string truncation
//! * **No hidden state**: the only state carried between arguments is a
//!   [`RunningPrecision`] owned by the caller for the duration of one call
//!
//! ## Main Components
//!
//! * `format_classifier`: `const fn` printf specifier scanner
//! * `arg_size`: size rules for scalars, pointers, narrow and wide strings
//! * `call_layout`: sizes a whole logging call at once
//! * `format_registry`: caches classifications per call-site format string
//!
//! Formatting the text, draining buffers and decoding logs are left to the
//! surrounding logging pipeline.
//!
//! ## Quick Start
//!
//! ```
//! use format_sizer::{classify, InvalidPolicy, ParamType, SizeCalculator};
//!
//! let params = classify("%s took %.*s ms");
//! assert_eq!(
//!     params,
//!     vec![
//!         ParamType::StringWithNoPrecision,
//!         ParamType::DynamicPrecision,
//!         ParamType::StringWithDynamicPrecision,
//!     ]
//! );
//!
//! let calc = SizeCalculator::default();
//! let layout = calc
//!     .measure_call(&params, &[&"compaction", &2i32, &"153.25"], InvalidPolicy::Degrade)
//!     .unwrap();
//!
//! assert_eq!(layout.slots()[2].content_len, Some(2));
//! assert_eq!(layout.total(), (10 + 4) + 4 + (2 + 4));
//! ```

pub mod arg_size;
pub mod call_layout;
pub mod error;
pub mod format_classifier;
pub mod format_registry;
pub mod param_type;
pub mod sizing_config;

pub use arg_size::{ArgSize, RunningPrecision, SizeCalculator, WideStr};
pub use call_layout::{ArgSlot, CallLayout, InvalidPolicy};
pub use error::SizerError;
pub use format_classifier::{classify, classify_bytes, ParamIter};
pub use param_type::ParamType;
pub use sizing_config::SizingConfig;
