//! Animated numbers that count up (or down) to a new value.

use std::time::Duration;

use crate::currency::CurrencyFormatter;

/// How long a value takes to reach its new target.
pub const COUNT_UP_DURATION: Duration = Duration::from_millis(500);

/// A number displayed with a short ease-out animation whenever its target changes.
///
/// The animation is advanced by calling [CountUp::tick] once per frame with
/// the time since the previous frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CountUp {
    /// Showing `value` with nothing left to animate.
    Idle {
        /// The value on screen.
        value: f64,
    },
    /// Moving from `from` to `to`.
    Transitioning {
        /// The value shown when the animation started.
        from: f64,
        /// The value the animation ends at.
        to: f64,
        /// Time spent animating so far.
        elapsed: Duration,
    },
}

impl Default for CountUp {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl CountUp {
    /// A value that is not animating.
    pub fn new(value: f64) -> Self {
        Self::Idle { value }
    }

    /// Animate from the currently displayed value towards `to`.
    ///
    /// Retargeting mid-animation starts from wherever the animation got to,
    /// so the displayed number never jumps.
    pub fn retarget(&mut self, to: f64) {
        let from = self.value();

        *self = if from == to {
            Self::Idle { value: to }
        } else {
            Self::Transitioning {
                from,
                to,
                elapsed: Duration::ZERO,
            }
        };
    }

    /// Advance the animation by `delta`.
    pub fn tick(&mut self, delta: Duration) {
        if let Self::Transitioning { from, to, elapsed } = *self {
            let elapsed = elapsed.saturating_add(delta);

            *self = if elapsed >= COUNT_UP_DURATION {
                Self::Idle { value: to }
            } else {
                Self::Transitioning { from, to, elapsed }
            };
        }
    }

    /// The exact value at this point of the animation.
    pub fn value(&self) -> f64 {
        match *self {
            Self::Idle { value } => value,
            Self::Transitioning { from, to, elapsed } => {
                let progress = elapsed.as_secs_f64() / COUNT_UP_DURATION.as_secs_f64();

                from + (to - from) * ease_out_expo(progress)
            }
        }
    }

    /// The value shown to the user, rounded to whole units.
    pub fn displayed(&self) -> f64 {
        round_half_away_from_zero(self.value())
    }

    /// The value the animation ends at.
    pub fn target(&self) -> f64 {
        match *self {
            Self::Idle { value } => value,
            Self::Transitioning { to, .. } => to,
        }
    }

    /// Whether the animation has finished.
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle { .. })
    }

    /// The displayed value formatted as money.
    pub fn display(&self, formatter: &CurrencyFormatter) -> String {
        formatter.format(self.displayed())
    }
}

/// Exponential ease-out, scaled so that it reaches exactly 1 at the end.
fn ease_out_expo(progress: f64) -> f64 {
    if progress >= 1.0 {
        return 1.0;
    }

    (1.0 - 2f64.powf(-10.0 * progress)) * 1024.0 / 1023.0
}

// Halves round away from zero, so -2.5 is shown as -3.
fn round_half_away_from_zero(value: f64) -> f64 {
    let rounded = value.round();

    if rounded == 0.0 { 0.0 } else { rounded }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::currency::{Currency, CurrencyFormatter};

    use super::{COUNT_UP_DURATION, CountUp, ease_out_expo};

    fn usd() -> CurrencyFormatter {
        CurrencyFormatter::new(Currency::USD).unwrap()
    }

    #[test]
    fn easing_starts_at_zero_and_ends_at_one() {
        assert_eq!(ease_out_expo(0.0), 0.0);
        assert_eq!(ease_out_expo(1.0), 1.0);
        assert_eq!(ease_out_expo(2.0), 1.0);
    }

    #[test]
    fn easing_is_fast_then_slow() {
        let halfway = ease_out_expo(0.5);

        assert!(halfway > 0.9, "got {halfway}");
        assert!(halfway < 1.0, "got {halfway}");
    }

    #[test]
    fn new_value_is_idle() {
        let count_up = CountUp::new(42.0);

        assert!(count_up.is_idle());
        assert_eq!(count_up.value(), 42.0);
        assert_eq!(count_up.target(), 42.0);
    }

    #[test]
    fn first_display_counts_up_from_zero() {
        let mut count_up = CountUp::default();

        count_up.retarget(150.0);

        assert!(!count_up.is_idle());
        assert_eq!(count_up.value(), 0.0);
        assert_eq!(count_up.display(&usd()), "$0.00");
    }

    #[test]
    fn reaches_target_after_duration() {
        let mut count_up = CountUp::default();
        count_up.retarget(150.0);

        count_up.tick(COUNT_UP_DURATION);

        assert_eq!(count_up, CountUp::Idle { value: 150.0 });
        assert_eq!(count_up.display(&usd()), "$150.00");
    }

    #[test]
    fn mid_animation_value_is_between_endpoints_and_formatted() {
        let mut count_up = CountUp::default();
        count_up.retarget(1000.0);

        count_up.tick(Duration::from_millis(100));

        let value = count_up.value();
        assert!(value > 0.0 && value < 1000.0, "got {value}");
        // 1000 * (1 - 2^-2) * 1024 / 1023 = 750.73...
        assert_eq!(count_up.displayed(), 751.0);
        assert_eq!(count_up.display(&usd()), "$751.00");
    }

    #[test]
    fn ticks_accumulate() {
        let mut count_up = CountUp::default();
        count_up.retarget(10.0);

        for _ in 0..5 {
            count_up.tick(Duration::from_millis(100));
        }

        assert!(count_up.is_idle());
        assert_eq!(count_up.value(), 10.0);
    }

    #[test]
    fn retarget_starts_from_displayed_value() {
        let mut count_up = CountUp::new(100.0);

        count_up.retarget(200.0);

        assert_eq!(
            count_up,
            CountUp::Transitioning {
                from: 100.0,
                to: 200.0,
                elapsed: Duration::ZERO
            }
        );
    }

    #[test]
    fn retarget_mid_animation_does_not_jump() {
        let mut count_up = CountUp::default();
        count_up.retarget(1000.0);
        count_up.tick(Duration::from_millis(100));
        let before = count_up.value();

        count_up.retarget(0.0);

        assert_eq!(count_up.value(), before);
        assert_eq!(count_up.target(), 0.0);
    }

    #[test]
    fn retarget_to_same_value_stays_idle() {
        let mut count_up = CountUp::new(5.0);

        count_up.retarget(5.0);

        assert!(count_up.is_idle());
    }

    #[test]
    fn idle_tick_is_a_no_op() {
        let mut count_up = CountUp::new(5.0);

        count_up.tick(Duration::from_secs(10));

        assert_eq!(count_up, CountUp::new(5.0));
    }

    #[test]
    fn displayed_value_is_rounded_to_whole_units() {
        assert_eq!(CountUp::new(99.6).displayed(), 100.0);
        assert_eq!(CountUp::new(99.4).displayed(), 99.0);
        assert_eq!(CountUp::new(-50.4).display(&usd()), "-$50.00");
        assert_eq!(CountUp::new(-0.4).display(&usd()), "$0.00");
        assert_eq!(CountUp::new(2.5).displayed(), 3.0);
    }

    #[test]
    fn negative_halves_round_away_from_zero() {
        assert_eq!(CountUp::new(-2.5).displayed(), -3.0);
        assert_eq!(CountUp::new(-2.5).display(&usd()), "-$3.00");
        assert_eq!(CountUp::new(-45.5).display(&usd()), "-$46.00");
    }
}
