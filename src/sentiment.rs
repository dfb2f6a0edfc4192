//! Sentiment projection: maps a pressure reading to badge and gradient styling.
//!
//! Three buckets with fixed, exclusive thresholds and no hysteresis. A reading
//! oscillating around 40 or 60 flips bucket on every update.

use crate::models::{Sentiment, SentimentReading};

/// Buy pressure strictly above this is bullish.
pub const BULLISH_ABOVE: f64 = 60.0;
/// Buy pressure strictly below this is bearish.
pub const BEARISH_BELOW: f64 = 40.0;

/// Color family used by the consuming UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Bullish,
    Bearish,
    Neutral,
}

/// Two-color gradient with a split position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStops {
    pub tone: Tone,
    pub from: &'static str,
    pub to: &'static str,
    /// Split point in percent, the buy pressure clamped to `[0, 100]`.
    pub stop: f64,
}

/// Presentation derived from a [`SentimentReading`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentStyle {
    pub icon: &'static str,
    pub color_class: &'static str,
    /// Tone of the reported label (badge coloring).
    pub tone: Tone,
    pub gradient: GradientStops,
}

/// Buckets a buy pressure percentage.
pub fn bucket(buy_pressure: f64) -> Sentiment {
    if buy_pressure > BULLISH_ABOVE {
        Sentiment::Bullish
    } else if buy_pressure < BEARISH_BELOW {
        Sentiment::Bearish
    } else {
        Sentiment::Neutral
    }
}

/// Classifies a reading.
///
/// Icon and color class follow the host's label; the gradient follows the
/// buy pressure bucket. NaN pressure falls through to neutral.
pub fn classify(reading: &SentimentReading) -> SentimentStyle {
    let (icon, color_class, tone) = match reading.sentiment {
        Sentiment::Bullish => ("▲", "sentiment-bullish", Tone::Bullish),
        Sentiment::Bearish => ("▼", "sentiment-bearish", Tone::Bearish),
        Sentiment::Neutral => ("◆", "sentiment-neutral", Tone::Neutral),
    };

    let stop = if reading.buy_pressure.is_nan() {
        50.0
    } else {
        reading.buy_pressure.clamp(0.0, 100.0)
    };

    let gradient = match bucket(reading.buy_pressure) {
        Sentiment::Bullish => GradientStops {
            tone: Tone::Bullish,
            from: "bullish-strong",
            to: "bullish-soft",
            stop,
        },
        Sentiment::Bearish => GradientStops {
            tone: Tone::Bearish,
            from: "bearish-soft",
            to: "bearish-strong",
            stop,
        },
        Sentiment::Neutral => GradientStops {
            tone: Tone::Neutral,
            from: "neutral",
            to: "neutral",
            stop,
        },
    };

    SentimentStyle {
        icon,
        color_class,
        tone,
        gradient,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(sentiment: Sentiment, buy: f64) -> SentimentReading {
        SentimentReading {
            sentiment,
            buy_pressure: buy,
            sell_pressure: 100.0 - buy,
        }
    }

    #[test]
    fn boundaries_are_exclusive() {
        assert_eq!(bucket(60.0), Sentiment::Neutral);
        assert_eq!(bucket(60.0001), Sentiment::Bullish);
        assert_eq!(bucket(40.0), Sentiment::Neutral);
        assert_eq!(bucket(39.9999), Sentiment::Bearish);
    }

    #[test]
    fn icon_follows_label_gradient_follows_pressure() {
        let style = classify(&reading(Sentiment::Bullish, 50.0));
        assert_eq!(style.icon, "▲");
        assert_eq!(style.tone, Tone::Bullish);
        assert_eq!(style.gradient.tone, Tone::Neutral);
        assert_eq!(style.gradient.from, style.gradient.to);
    }

    #[test]
    fn stop_is_clamped() {
        assert_eq!(classify(&reading(Sentiment::Bullish, 140.0)).gradient.stop, 100.0);
        assert_eq!(classify(&reading(Sentiment::Bearish, -5.0)).gradient.stop, 0.0);
    }

    #[test]
    fn nan_pressure_is_neutral() {
        let style = classify(&reading(Sentiment::Neutral, f64::NAN));
        assert_eq!(style.gradient.tone, Tone::Neutral);
        assert_eq!(style.gradient.stop, 50.0);
    }
}
