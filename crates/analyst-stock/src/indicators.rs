//! Indicator engine: moving averages, RSI and trend classification
//!
//! All functions are pure. Positions without enough history are `None`
//! rather than zero, so a short series never produces a misleading number.

use ta::Next;
use ta::indicators::SimpleMovingAverage;
use tracing::warn;

use crate::error::{Result, StockError};
use crate::model::{PriceSeries, TechnicalIndicators, Trend, round2};

/// Short moving-average window
pub const SMA_SHORT_WINDOW: usize = 50;
/// Long moving-average window
pub const SMA_LONG_WINDOW: usize = 200;
/// RSI lookback
pub const RSI_WINDOW: usize = 14;
/// RSI above this is overbought
pub const OVERBOUGHT_THRESHOLD: f64 = 70.0;
/// RSI below this is oversold
pub const OVERSOLD_THRESHOLD: f64 = 30.0;

/// Trailing arithmetic mean ending at each position
///
/// Position `i` is `Some` only once `window` values are available.
/// A zero window yields no values.
pub fn moving_average(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let Ok(mut sma) = SimpleMovingAverage::new(window) else {
        return vec![None; values.len()];
    };

    values
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            let mean = sma.next(value);
            (i + 1 >= window).then_some(mean)
        })
        .collect()
}

/// Relative strength index at each position
///
/// Average gain over the last `window` daily changes divided by the
/// average loss, mapped through `100 - 100 / (1 + RS)`. A window with no
/// losses scores 100. Needs `window + 1` closes before the first value.
pub fn relative_strength_index(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut rsi = vec![None; values.len()];
    if values.len() < 2 {
        return rsi;
    }

    let gains: Vec<f64> = values.windows(2).map(|w| (w[1] - w[0]).max(0.0)).collect();
    let losses: Vec<f64> = values.windows(2).map(|w| (w[0] - w[1]).max(0.0)).collect();

    let avg_gains = moving_average(&gains, window);
    let avg_losses = moving_average(&losses, window);

    for (i, (gain, loss)) in avg_gains.into_iter().zip(avg_losses).enumerate() {
        if let (Some(gain), Some(loss)) = (gain, loss) {
            // change i sits between closes i and i + 1
            rsi[i + 1] = Some(rsi_from_averages(gain, loss));
        }
    }

    rsi
}

/// Note: the SMA's running sum can leave a tiny positive `avg_loss` after a
/// loss drops out of the window, so `avg_loss <= 0.0` does not catch every
/// window without losses; the result is within rounding of 100 either way.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss <= 0.0 {
        return 100.0;
    }
    let rs = avg_gain.max(0.0) / avg_loss;
    (100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0)
}

/// Strict three-way ordering of price and moving averages
///
/// Bullish iff `price > sma50 > sma200`, bearish iff `price < sma50 < sma200`,
/// neutral otherwise.
pub fn classify_trend(price: f64, sma50: f64, sma200: f64) -> Trend {
    if price > sma50 && sma50 > sma200 {
        Trend::Bullish
    } else if price < sma50 && sma50 < sma200 {
        Trend::Bearish
    } else {
        Trend::Neutral
    }
}

/// Trend when either average may be missing; missing inputs are neutral
pub fn classify_partial_trend(price: f64, sma50: Option<f64>, sma200: Option<f64>) -> Trend {
    match (sma50, sma200) {
        (Some(short), Some(long)) => classify_trend(price, short, long),
        _ => Trend::Neutral,
    }
}

/// Whether an RSI reading is overbought
pub fn is_overbought(rsi: Option<f64>) -> bool {
    rsi.is_some_and(|r| r > OVERBOUGHT_THRESHOLD)
}

/// Whether an RSI reading is oversold
pub fn is_oversold(rsi: Option<f64>) -> bool {
    rsi.is_some_and(|r| r < OVERSOLD_THRESHOLD)
}

fn latest(values: &[Option<f64>]) -> Option<f64> {
    values.last().copied().flatten()
}

/// Compute the indicator set for the latest close in `series`
///
/// Fails only on an empty series. Short series produce `None` for the
/// windows they cannot fill and a neutral trend.
pub fn compute_indicators(series: &PriceSeries) -> Result<TechnicalIndicators> {
    let closes = series.closes();
    let Some(&latest_price) = closes.last() else {
        return Err(StockError::InsufficientHistory {
            symbol: series.symbol().to_string(),
            available: 0,
        });
    };

    let sma50 = latest(&moving_average(&closes, SMA_SHORT_WINDOW));
    let sma200 = latest(&moving_average(&closes, SMA_LONG_WINDOW));
    let rsi = latest(&relative_strength_index(&closes, RSI_WINDOW));

    let trend = classify_partial_trend(latest_price, sma50, sma200);

    let indicators = TechnicalIndicators {
        latest_price: round2(latest_price),
        sma50: sma50.map(round2),
        sma200: sma200.map(round2),
        rsi: rsi.map(round2),
        trend,
        overbought: is_overbought(rsi),
        oversold: is_oversold(rsi),
        observations: closes.len(),
    };

    if !indicators.has_full_history() {
        warn!(
            symbol = series.symbol(),
            observations = closes.len(),
            required = SMA_LONG_WINDOW,
            "Price history too short for every indicator window"
        );
    }

    Ok(indicators)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PricePoint;
    use chrono::NaiveDate;

    fn series(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PricePoint::new(start + chrono::Days::new(i as u64), c))
            .collect();
        PriceSeries::new("TEST", points)
    }

    fn close_to(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_moving_average_defined_after_window() {
        let ma = moving_average(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_eq!(ma[0], None);
        assert_eq!(ma[1], None);
        assert!(close_to(ma[2].unwrap(), 2.0));
        assert!(close_to(ma[3].unwrap(), 3.0));
        assert!(close_to(ma[4].unwrap(), 4.0));
    }

    #[test]
    fn test_moving_average_absent_when_series_shorter_than_window() {
        for window in [2, 5, 50, 200] {
            let values: Vec<f64> = (0..window - 1).map(|i| 10.0 + i as f64).collect();
            assert!(moving_average(&values, window).iter().all(Option::is_none));
        }
        assert!(moving_average(&[], 3).is_empty());
        assert!(moving_average(&[1.0, 2.0], 0).iter().all(Option::is_none));
    }

    #[test]
    fn test_rsi_matches_hand_computation() {
        // changes: +1, -2, +3, -1 -> window 4: avg gain 1.0, avg loss 0.75
        let rsi = relative_strength_index(&[10.0, 11.0, 9.0, 12.0, 11.0], 4);
        assert_eq!(&rsi[..4], &[None, None, None, None]);
        let expected = 100.0 - 100.0 / (1.0 + 1.0 / 0.75);
        assert!(close_to(rsi[4].unwrap(), expected));
    }

    #[test]
    fn test_rsi_without_losses_is_100() {
        let rising: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        assert_eq!(relative_strength_index(&rising, 14).last().copied().flatten(), Some(100.0));

        let flat = vec![50.0; 20];
        assert_eq!(relative_strength_index(&flat, 14).last().copied().flatten(), Some(100.0));
    }

    #[test]
    fn test_rsi_after_loss_leaves_window_rounds_to_100() {
        // changes: -0.3 then four gains; the last window of 3 has no losses
        let closes = [10.0, 9.7, 9.8, 10.1, 10.4, 10.7];
        let rsi = relative_strength_index(&closes, 3).last().copied().flatten().unwrap();
        assert_eq!(round2(rsi), 100.0);
        assert!(is_overbought(Some(rsi)));
    }

    #[test]
    fn test_rsi_without_gains_is_0() {
        let falling: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
        let rsi = relative_strength_index(&falling, 14).last().copied().flatten().unwrap();
        assert!(close_to(rsi, 0.0));
    }

    #[test]
    fn test_rsi_bounded_and_flags_exclusive() {
        let mut price = 100.0_f64;
        let mut closes = Vec::new();
        for i in 0..300 {
            // deterministic zig-zag with drift changes
            let step = ((i * 37) % 11) as f64 - 5.0 + if i % 50 < 25 { 0.8 } else { -0.8 };
            price = (price + step).max(1.0);
            closes.push(price);
        }

        for rsi in relative_strength_index(&closes, 14).into_iter().flatten() {
            assert!((0.0..=100.0).contains(&rsi), "rsi = {rsi}");
            assert!(!(is_overbought(Some(rsi)) && is_oversold(Some(rsi))));
        }
    }

    #[test]
    fn test_rsi_thresholds_are_strict() {
        assert!(!is_overbought(Some(70.0)));
        assert!(is_overbought(Some(70.01)));
        assert!(!is_oversold(Some(30.0)));
        assert!(is_oversold(Some(29.99)));
        assert!(!is_overbought(None));
        assert!(!is_oversold(None));
    }

    #[test]
    fn test_classify_trend() {
        assert_eq!(classify_trend(10.0, 9.0, 8.0), Trend::Bullish);
        assert_eq!(classify_trend(8.0, 9.0, 10.0), Trend::Bearish);
        assert_eq!(classify_trend(9.0, 10.0, 8.0), Trend::Neutral);
        // price above sma200 but below sma50, sma50 below sma200
        assert_eq!(classify_trend(9.0, 8.0, 8.5), Trend::Neutral);
        // equality breaks the strict chain
        assert_eq!(classify_trend(10.0, 10.0, 8.0), Trend::Neutral);
        assert_eq!(classify_trend(8.0, 9.0, 9.0), Trend::Neutral);
    }

    #[test]
    fn test_partial_trend_is_neutral() {
        assert_eq!(classify_partial_trend(10.0, Some(9.0), None), Trend::Neutral);
        assert_eq!(classify_partial_trend(10.0, None, None), Trend::Neutral);
        assert_eq!(classify_partial_trend(10.0, Some(9.0), Some(8.0)), Trend::Bullish);
    }

    #[test]
    fn test_compute_indicators_full_history() {
        let closes: Vec<f64> = (0..250).map(|i| 50.0 + f64::from(i) * 0.5).collect();
        let ind = compute_indicators(&series(&closes)).unwrap();

        assert_eq!(ind.latest_price, 174.5);
        // mean of the last 50 closes: 150.0 ..= 174.5
        assert_eq!(ind.sma50, Some(162.25));
        // mean of the last 200 closes: 75.0 ..= 174.5
        assert_eq!(ind.sma200, Some(124.75));
        assert_eq!(ind.rsi, Some(100.0));
        assert_eq!(ind.trend, Trend::Bullish);
        assert!(ind.overbought);
        assert!(!ind.oversold);
        assert!(ind.has_full_history());
        assert_eq!(ind.observations, 250);
    }

    #[test]
    fn test_compute_indicators_short_history() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 - f64::from(i) * 0.25).collect();
        let ind = compute_indicators(&series(&closes)).unwrap();

        assert!(ind.sma50.is_some());
        assert_eq!(ind.sma200, None);
        assert_eq!(ind.trend, Trend::Neutral);
        assert!(ind.oversold);
        assert!(!ind.has_full_history());
    }

    #[test]
    fn test_compute_indicators_empty_series() {
        let err = compute_indicators(&series(&[])).unwrap_err();
        assert!(matches!(err, StockError::InsufficientHistory { available: 0, .. }));
    }
}
