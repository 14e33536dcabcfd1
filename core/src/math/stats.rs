use ndarray::ArrayView1;

pub struct StatsHelper;

impl StatsHelper {
    /// Amplitude in decibels, `20·log10(x)`. Zero maps to negative infinity.
    pub fn to_db(amplitude: f64) -> f64 {
        20.0 * amplitude.log10()
    }

    /// Euclidean norm of the sample-wise difference of two equal-length curves.
    ///
    /// Returns NaN when the lengths differ.
    pub fn root_sum_squares_diff(lhs: ArrayView1<f64>, rhs: ArrayView1<f64>) -> f64 {
        if lhs.len() != rhs.len() {
            return f64::NAN;
        }
        let diff = &lhs - &rhs;
        diff.dot(&diff).sqrt()
    }
}
