//! Unit conversion tests across every supported clock configuration.
//!
//! Tests that validate:
//! - Tick/microsecond round trips floor the way integer division does
//! - Reference configuration constants (16 MHz / 64)
//! - Durations at and beyond the counter span
//! - Every accepted configuration keeps its compare period within 4% of 1 ms
//! - Compile-time constants are usable in const contexts

#[allow(clippy::duplicate_mod)]
#[path = "fixtures/mod.rs"]
mod fixtures;

use fixtures::valid_conversions;
use uptime_clock::config::{ClockConfig, FineConfig, Prescaler, ReferenceConfig};
use uptime_clock::convert::{Conversion, Strategy, COUNTER_MAX};
use uptime_clock::TimerError;

// ============================================================================
// Round Trips
// ============================================================================

#[test]
fn test_ticks_round_trip_within_floor_error() {
    let conversions = valid_conversions();
    assert!(conversions.len() > 20, "expected a broad set of configurations");

    for conversion in conversions {
        for ticks in (0..=COUNTER_MAX as u16).step_by(7).chain([u16::MAX]) {
            let back = conversion.us_to_ticks(conversion.ticks_to_us(ticks));
            match conversion.strategy() {
                Strategy::MicrosPerTick(_) => assert_eq!(
                    back, ticks,
                    "{:?}: round trip of {} ticks gave {}",
                    conversion, ticks, back
                ),
                Strategy::TicksPerMicro(n) => {
                    // Sub-microsecond ticks are dropped, never added
                    assert!(back <= ticks);
                    assert!(
                        ((ticks - back) as u32) < n,
                        "{:?}: round trip of {} ticks gave {}",
                        conversion,
                        ticks,
                        back
                    );
                }
            }
        }
    }
}

#[test]
fn test_valid_configs_keep_period_near_one_millisecond() {
    for conversion in valid_conversions() {
        let period = conversion.period_us();
        assert!(
            (960..=1000).contains(&period),
            "{:?}: compare period {} us",
            conversion,
            period
        );
    }

    // Slow clocks with large divisors are filtered out
    let rejected = Conversion::new(2_000_000, Prescaler::Div1024);
    assert!(!valid_conversions().contains(&rejected));
    assert_eq!(
        rejected.validate(),
        Err(TimerError::PeriodTooShort { period_us: 512 })
    );
}

#[test]
fn test_micros_round_trip_never_overshoots() {
    for conversion in valid_conversions() {
        let step = (conversion.max_us() / 997).max(1);
        for us in (0..=conversion.max_us()).step_by(step as usize) {
            let back = conversion.ticks_to_us(conversion.us_to_ticks(us));
            assert!(back <= us, "{:?}: {} us came back as {}", conversion, us, back);
            if let Strategy::MicrosPerTick(n) = conversion.strategy() {
                assert!(us - back < n);
            }
        }
    }
}

// ============================================================================
// Reference Configuration
// ============================================================================

#[test]
fn test_reference_millisecond_is_250_ticks() {
    let conversion = ReferenceConfig::CONVERSION;
    assert_eq!(conversion.ms_to_ticks(1), 250);
    assert_eq!(conversion.compare_target(), 250);
    assert_eq!(conversion.us_to_ticks(1000), 250);
    assert_eq!(conversion.strategy(), Strategy::MicrosPerTick(4));
}

#[test]
fn test_reference_max_span() {
    assert_eq!(ReferenceConfig::CONVERSION.max_us(), 65_535 * 64 / 16);
    assert_eq!(ReferenceConfig::CONVERSION.max_us(), 262_140);
}

#[test]
fn test_fine_config_scales_by_ticks_per_micro() {
    let conversion = FineConfig::CONVERSION;
    assert_eq!(conversion.strategy(), Strategy::TicksPerMicro(2));
    assert_eq!(conversion.us_to_ticks(1000), 2000);
    assert_eq!(conversion.ticks_to_us(1999), 999);
}

// ============================================================================
// Counter Span Edge Cases
// ============================================================================

#[test]
fn test_duration_at_span_limit_converts() {
    let conversion = ReferenceConfig::CONVERSION;
    assert_eq!(conversion.checked_us_to_ticks(262_140), Ok(65_535));
    assert_eq!(conversion.us_to_ticks(262_140), 65_535);
}

#[test]
fn test_duration_beyond_span_is_rejected_when_checked() {
    let conversion = ReferenceConfig::CONVERSION;
    assert_eq!(
        conversion.checked_us_to_ticks(262_141),
        Err(TimerError::DurationOutOfRange {
            requested_us: 262_141,
            max_us: 262_140,
        })
    );
    assert_eq!(
        conversion.checked_us_to_ticks(u32::MAX),
        Err(TimerError::DurationOutOfRange {
            requested_us: u32::MAX,
            max_us: 262_140,
        })
    );
}

#[test]
fn test_duration_beyond_span_wraps_when_unchecked() {
    let conversion = ReferenceConfig::CONVERSION;
    // 65536 ticks does not fit the counter: truncated to zero
    assert_eq!(conversion.us_to_ticks(262_144), 0);
    assert_eq!(conversion.us_to_ticks(262_148), 1);

    let fine = FineConfig::CONVERSION;
    assert_eq!(fine.checked_us_to_ticks(32_767), Ok(65_534));
    assert!(fine.checked_us_to_ticks(32_768).is_err());
    assert_eq!(fine.us_to_ticks(32_768), 0);
}

#[test]
fn test_span_grows_with_prescaler() {
    let spans: Vec<u32> = Prescaler::ALL
        .iter()
        .map(|p| Conversion::new(16_000_000, *p).max_us())
        .collect();
    assert_eq!(spans, vec![4_095, 32_767, 262_140, 1_048_560, 4_194_240]);
}

// ============================================================================
// Const Evaluation
// ============================================================================

#[test]
fn test_constants_usable_in_const_context() {
    const TARGET: u16 = ReferenceConfig::CONVERSION.compare_target();
    const SPAN: u32 = ReferenceConfig::CONVERSION.max_us();
    const TEN_MS: u32 = ReferenceConfig::CONVERSION.ms_to_ticks(10);
    const CHECKED: Result<u16, TimerError> = ReferenceConfig::CONVERSION.checked_us_to_ticks(400);

    assert_eq!(TARGET, 250);
    assert_eq!(SPAN, 262_140);
    assert_eq!(TEN_MS, 2_500);
    assert_eq!(CHECKED, Ok(100));
}
