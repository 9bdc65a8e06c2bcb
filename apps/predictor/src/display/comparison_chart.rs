use std::fmt;

use crate::client::ComparisonData;
use crate::display::amount::{group_thousands, to_fixed};

/// Characters in a full-width bar.
const BAR_CELLS: usize = 40;

/// How the prediction sits relative to the market average.
/// Percentages are absolute values of `(predicted - actual) / actual * 100`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Comparison {
    Above(f64),
    Below(f64),
    Matches,
    /// Average missing or zero, so a percentage would be meaningless.
    NoMarketData,
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparison::Above(pct) => write!(f, "{}% above market average", to_fixed(*pct, 1)),
            Comparison::Below(pct) => write!(f, "{}% below market average", to_fixed(*pct, 1)),
            Comparison::Matches => f.write_str("Matches market average"),
            Comparison::NoMarketData => f.write_str("No market data for comparison"),
        }
    }
}

pub fn compare(data: &ComparisonData) -> Comparison {
    if !data.actual.is_finite() || data.actual <= 0.0 {
        return Comparison::NoMarketData;
    }

    let diff = data.predicted - data.actual;
    let pct = diff / data.actual * 100.0;
    if diff > 0.0 {
        Comparison::Above(pct)
    } else if diff < 0.0 {
        Comparison::Below(pct.abs())
    } else {
        Comparison::Matches
    }
}

/// Bar widths as percentages of the larger of the two values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarWidths {
    pub actual: f64,
    pub predicted: f64,
}

pub fn bar_widths(data: &ComparisonData) -> BarWidths {
    let max = data.actual.max(data.predicted);
    if !max.is_finite() || max <= 0.0 {
        return BarWidths {
            actual: 0.0,
            predicted: 0.0,
        };
    }

    BarWidths {
        actual: (data.actual / max * 100.0).clamp(0.0, 100.0),
        predicted: (data.predicted / max * 100.0).clamp(0.0, 100.0),
    }
}

fn bar(width_pct: f64) -> String {
    let filled = ((width_pct / 100.0) * BAR_CELLS as f64).round() as usize;
    let filled = filled.min(BAR_CELLS);
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_CELLS - filled))
}

pub fn render_chart(data: &ComparisonData) -> String {
    let widths = bar_widths(data);
    format!(
        "Salary Comparison\n  Market Average   ₹{}\n  {}\n  Your Prediction  ₹{}\n  {}\n  {}\n",
        group_thousands(data.actual),
        bar(widths.actual),
        group_thousands(data.predicted),
        bar(widths.predicted),
        compare(data)
    )
}
