use crate::client::PredictionResult;
use crate::display::amount::{group_thousands, to_fixed};

/// Rupees per US dollar used for the USD estimate.
///
/// Fixed approximation, not a live exchange rate. Change it here if the
/// displayed estimate drifts too far from the market rate.
pub const INR_PER_USD: f64 = 83.0;

/// USD equivalent of a rupee salary, to two decimal places.
pub fn usd_estimate(predicted_salary: f64) -> String {
    to_fixed(predicted_salary / INR_PER_USD, 2)
}

pub fn render_result(result: &PredictionResult) -> String {
    format!(
        "Predicted Salary\n  ₹ {}\n  per year\n  ≈ $ {} USD / year\n",
        group_thousands(result.predicted_salary),
        usd_estimate(result.predicted_salary)
    )
}
