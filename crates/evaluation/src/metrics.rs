//! Error metrics.

/// Root-mean-square error from an accumulated sum of squared errors.
///
/// `None` for `n == 0`: an empty sum is not a perfect score.
pub fn rmse(sum_of_squares: f64, n: usize) -> Option<f64> {
    if n == 0 {
        return None;
    }
    Some((sum_of_squares / n as f64).sqrt())
}

/// Running sum of squared errors
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SquaredError {
    sum: f64,
    count: usize,
}

impl SquaredError {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, predicted: f64, actual: f64) {
        self.sum += (predicted - actual).powi(2);
        self.count += 1;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn rmse(&self) -> Option<f64> {
        rmse(self.sum, self.count)
    }
}

/// Arithmetic mean, 0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation, 0 for an empty slice
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = mean(values);
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
