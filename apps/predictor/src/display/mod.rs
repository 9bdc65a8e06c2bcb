//! Text rendering of a prediction and its market comparison.
//! Everything here is a pure function of data held by `PredictionClient`.

pub mod amount;
pub mod comparison_chart;
pub mod result_view;
