use format_sizer::{
    classify, ArgSize, InvalidPolicy, ParamType, SizeCalculator, SizerError, WideStr,
};
use std::sync::Once;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: Once = Once::new();

// RUST_LOG=format_sizer=trace shows the per-call events
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

const PREFIX: usize = 4;

#[test]
fn test_layout_of_mixed_call() {
    init_tracing();
    let params = classify("%s: %d items, %.*s, tag=%.3s at %p");
    let ptr = 0x1000 as *const u8;
    let args: [&dyn ArgSize; 6] = [&"inventory", &42i32, &4usize, &"truncated", &"ABCDEF", &ptr];

    let layout = SizeCalculator::default()
        .measure_call(&params, &args, InvalidPolicy::Degrade)
        .unwrap();

    let sizes: Vec<_> = layout.slots().iter().map(|slot| slot.size).collect();
    let pointer = std::mem::size_of::<*const ()>();
    assert_eq!(
        sizes,
        vec![9 + PREFIX, 4, std::mem::size_of::<usize>(), 4 + PREFIX, 3 + PREFIX, pointer]
    );

    let content: Vec<_> = layout.slots().iter().map(|slot| slot.content_len).collect();
    assert_eq!(content, vec![Some(9), None, None, Some(4), Some(3), None]);
    assert_eq!(layout.total(), sizes.iter().sum::<usize>());
}

#[test]
fn test_argument_count_mismatch() {
    let params = classify("%d %d");
    let result = SizeCalculator::default().measure_call(&params, &[&1i32], InvalidPolicy::Degrade);
    assert_eq!(
        result,
        Err(SizerError::ArgumentCountMismatch {
            expected: 2,
            actual: 1
        })
    );
}

#[test]
fn test_reject_policy() {
    init_tracing();
    let params = classify("%d %n");
    let result =
        SizeCalculator::default().measure_call(&params, &[&1i32, &0i32], InvalidPolicy::Reject);
    assert_eq!(
        result,
        Err(SizerError::InvalidSpecifier {
            index: 1,
            param: ParamType::Invalid
        })
    );
}

#[test]
fn test_degrade_policy_continues_past_invalid() {
    init_tracing();
    let params = classify("%q %s");
    let layout = SizeCalculator::default()
        .measure_call(&params, &[&7u16, &"after"], InvalidPolicy::Degrade)
        .unwrap();

    assert_eq!(layout.len(), 2);
    assert_eq!(layout.slots()[0].param, ParamType::Invalid);
    assert_eq!(layout.slots()[0].size, 2);
    assert_eq!(layout.slots()[1].content_len, Some(5));
}

#[test]
fn test_degraded_n_slot_is_distinguishable() {
    let params = classify("%n %d");
    let layout = SizeCalculator::default()
        .measure_call(&params, &[&1i32, &2i32], InvalidPolicy::Degrade)
        .unwrap();

    assert_eq!(layout.slots()[0].param, ParamType::Invalid);
    assert_eq!(layout.slots()[1].param, ParamType::NonString);
    assert_eq!(layout.slots()[0].size, layout.slots()[1].size);
}

#[test]
fn test_precision_does_not_leak_between_calls() {
    let params = classify("%.*s");
    let calc = SizeCalculator::default();

    let first = calc
        .measure_call(&params, &[&1i32, &"abcdef"], InvalidPolicy::Degrade)
        .unwrap();
    assert_eq!(first.slots()[1].content_len, Some(1));

    // A second call whose string slot has no preceding precision of its own
    let lone = [ParamType::StringWithDynamicPrecision];
    let second = calc
        .measure_call(&lone, &[&"abcdef"], InvalidPolicy::Degrade)
        .unwrap();
    assert_eq!(second.slots()[0].content_len, Some(6));
}

#[test]
fn test_wide_string_in_call() {
    let units: Vec<u32> = "wide".chars().map(|c| c as u32).collect();
    let wide = WideStr::new(&units);
    let params = classify("%ls");
    let calc = SizeCalculator::default();

    let layout = calc
        .measure_call(&params, &[&wide], InvalidPolicy::Degrade)
        .unwrap();
    let width = calc.config().wide_char_width;
    assert_eq!(layout.slots()[0].content_len, Some(4 * width));
    assert_eq!(layout.total(), 4 * width + PREFIX);
}

#[test]
fn test_error_messages() {
    let err = SizerError::ArgumentCountMismatch {
        expected: 3,
        actual: 1,
    };
    assert_eq!(err.to_string(), "format expects 3 arguments but 1 were supplied");

    let err = SizerError::InvalidSpecifier {
        index: 0,
        param: ParamType::Invalid,
    };
    assert_eq!(
        err.to_string(),
        "argument 0 has an invalid or unsupported specifier (invalid)"
    );
}
