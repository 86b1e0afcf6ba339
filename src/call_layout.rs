use tracing::{debug, trace};

use crate::arg_size::{ArgSize, RunningPrecision, SizeCalculator};
use crate::error::{Result, SizerError};
use crate::param_type::ParamType;

/// What to do with arguments whose slot classified as [`ParamType::Invalid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvalidPolicy {
    /// Size the argument as a non-string and carry on
    #[default]
    Degrade,

    /// Fail the whole call with [`SizerError::InvalidSpecifier`]
    Reject,
}

/// Size of one argument within a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgSlot {
    /// Classification from the format string, `Invalid` included
    pub param: ParamType,

    /// Bytes the argument occupies, including any length prefix
    pub size: usize,

    /// Payload bytes to copy for string arguments sized as strings
    pub content_len: Option<usize>,
}

/// Byte layout of all arguments of one logging call.
///
/// The total is what the buffer allocator has to reserve; the per-slot
/// content lengths let the packer copy string payloads without measuring
/// them a second time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallLayout {
    slots: Vec<ArgSlot>,
    total: usize,
}

impl CallLayout {
    pub fn slots(&self) -> &[ArgSlot] {
        &self.slots
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl SizeCalculator {
    /// Sizes every argument of one logging call.
    ///
    /// Classifications and arguments are paired by position and sized left
    /// to right with a fresh [`RunningPrecision`], so state never leaks from
    /// one call into another.
    ///
    /// # Errors
    ///
    /// * [`SizerError::ArgumentCountMismatch`] if `args` and `params` differ
    ///   in length
    /// * [`SizerError::InvalidSpecifier`] for an `Invalid` slot under
    ///   [`InvalidPolicy::Reject`]
    ///
    /// # Examples
    ///
    /// ```
    /// # use format_sizer::{classify, InvalidPolicy, SizeCalculator};
    /// let params = classify("user=%s id=%u");
    /// let calc = SizeCalculator::default();
    /// let layout = calc
    ///     .measure_call(&params, &[&"alice", &7u32], InvalidPolicy::Degrade)
    ///     .unwrap();
    ///
    /// assert_eq!(layout.slots()[0].content_len, Some(5));
    /// assert_eq!(layout.total(), (5 + 4) + 4);
    /// ```
    pub fn measure_call(
        &self,
        params: &[ParamType],
        args: &[&dyn ArgSize],
        policy: InvalidPolicy,
    ) -> Result<CallLayout> {
        if params.len() != args.len() {
            return Err(SizerError::ArgumentCountMismatch {
                expected: params.len(),
                actual: args.len(),
            });
        }

        let mut precision = RunningPrecision::new();
        let mut slots = Vec::with_capacity(args.len());
        let mut total = 0;

        for (index, (&param, arg)) in params.iter().zip(args).enumerate() {
            let sized_as = if param.is_invalid() {
                if policy == InvalidPolicy::Reject {
                    return Err(SizerError::InvalidSpecifier { index, param });
                }
                debug!(index, "sizing invalid specifier as non-string");
                ParamType::NonString
            } else {
                param
            };

            let mut content_len = 0;
            let size = self.size_of(sized_as, &mut precision, &mut content_len, *arg);
            let content_len =
                (arg.is_string_shaped() && sized_as.is_string()).then_some(content_len);

            total += size;
            slots.push(ArgSlot {
                param,
                size,
                content_len,
            });
        }

        trace!(args = slots.len(), total, "measured logging call");
        Ok(CallLayout { slots, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format_classifier::classify;

    #[test]
    fn test_empty_call() {
        let layout = SizeCalculator::default()
            .measure_call(&[], &[], InvalidPolicy::Reject)
            .unwrap();
        assert!(layout.is_empty());
        assert_eq!(layout.total(), 0);
    }

    #[test]
    fn test_degraded_slot_keeps_invalid_param() {
        let params = classify("%q");
        let layout = SizeCalculator::default()
            .measure_call(&params, &[&"text"], InvalidPolicy::Degrade)
            .unwrap();
        assert_eq!(layout.slots()[0].param, ParamType::Invalid);
        assert_eq!(layout.slots()[0].size, std::mem::size_of::<*const ()>());
        assert_eq!(layout.slots()[0].content_len, None);
    }
}
