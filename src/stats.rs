/// Running numeric statistics for one column.
///
/// Values are kept so the median can be taken exactly; everything else is
/// accumulated as values arrive.
#[derive(Debug, Clone, Default)]
pub struct NumericAccumulator {
    values: Vec<f64>,
    sum: f64,
    min: Option<f64>,
    max: Option<f64>,
}

impl NumericAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_value(&mut self, value: f64) {
        self.sum += value;
        self.min = Some(match self.min {
            Some(current) => current.min(value),
            None => value,
        });
        self.max = Some(match self.max {
            Some(current) => current.max(value),
            None => value,
        });
        self.values.push(value);
    }

    pub fn count(&self) -> usize {
        self.values.len()
    }

    /// Total of every value, or `None` when it does not fit in an `f64`.
    pub fn sum(&self) -> Option<f64> {
        if self.sum.is_finite() {
            return Some(self.sum);
        }
        // An intermediate total overflowed; the final one may still fit.
        let scale = self.magnitude();
        let total = self.values.iter().map(|value| value / scale).sum::<f64>() * scale;
        total.is_finite().then_some(total)
    }

    pub fn min(&self) -> Option<f64> {
        self.min
    }

    pub fn max(&self) -> Option<f64> {
        self.max
    }

    pub fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        let count = self.count() as f64;
        let mean = self.sum / count;
        if mean.is_finite() {
            return Some(mean);
        }
        // The running sum overflowed; average the values scaled into [-1, 1].
        let scale = self.magnitude();
        let scaled = self.values.iter().map(|value| value / scale).sum::<f64>();
        Some(scaled / count * scale)
    }

    pub fn median(&self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        let mut sorted = self.values.clone();
        sorted.sort_by(f64::total_cmp);
        let mid = sorted.len() / 2;
        if sorted.len().is_multiple_of(2) {
            Some(sorted[mid - 1].midpoint(sorted[mid]))
        } else {
            Some(sorted[mid])
        }
    }

    /// Population standard deviation: square root of the mean squared deviation.
    pub fn std_dev(&self) -> Option<f64> {
        let mean = self.mean()?;
        let count = self.count() as f64;
        let squared = self
            .values
            .iter()
            .map(|value| (value - mean).powi(2))
            .sum::<f64>();
        let std_dev = (squared / count).sqrt();
        if std_dev.is_finite() {
            return Some(std_dev);
        }
        // Deviations too large to square; scaled values keep every term below 4.
        let scale = self.magnitude();
        let scaled_mean = mean / scale;
        let scaled = self
            .values
            .iter()
            .map(|value| (value / scale - scaled_mean).powi(2))
            .sum::<f64>();
        Some((scaled / count).sqrt() * scale)
    }

    /// Largest absolute value seen.
    fn magnitude(&self) -> f64 {
        match (self.min, self.max) {
            (Some(min), Some(max)) => min.abs().max(max.abs()),
            _ => 0.0,
        }
    }
}

impl Extend<f64> for NumericAccumulator {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for value in iter {
            self.add_value(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accumulate(values: &[f64]) -> NumericAccumulator {
        let mut acc = NumericAccumulator::new();
        acc.extend(values.iter().copied());
        acc
    }

    #[test]
    fn empty_accumulator_has_no_metrics() {
        let acc = NumericAccumulator::new();
        assert_eq!(acc.count(), 0);
        assert_eq!(acc.mean(), None);
        assert_eq!(acc.median(), None);
        assert_eq!(acc.std_dev(), None);
        assert_eq!(acc.min(), None);
    }

    #[test]
    fn median_averages_the_middle_pair_for_even_counts() {
        assert_eq!(accumulate(&[4.0, 1.0, 3.0, 2.0]).median(), Some(2.5));
        assert_eq!(accumulate(&[5.0, 1.0, 3.0]).median(), Some(3.0));
    }

    #[test]
    fn std_dev_is_population_not_sample() {
        let acc = accumulate(&[10.0, 20.0, 30.0]);
        let expected = (200.0_f64 / 3.0).sqrt();
        assert!((acc.std_dev().unwrap() - expected).abs() < 1e-12);
        assert_eq!(accumulate(&[7.0]).std_dev(), Some(0.0));
    }

    #[test]
    fn min_max_and_sum_track_every_value() {
        let acc = accumulate(&[3.0, -1.5, 8.0]);
        assert_eq!(acc.min(), Some(-1.5));
        assert_eq!(acc.max(), Some(8.0));
        assert_eq!(acc.sum(), Some(9.5));
        assert_eq!(acc.mean(), Some(9.5 / 3.0));
    }

    #[test]
    fn huge_values_keep_every_metric_finite() {
        let acc = accumulate(&[1e308, 1e308]);
        assert_eq!(acc.sum(), None);
        assert_eq!(acc.mean(), Some(1e308));
        assert_eq!(acc.median(), Some(1e308));
        assert_eq!(acc.std_dev(), Some(0.0));

        let acc = accumulate(&[1e200, -1e200]);
        assert_eq!(acc.sum(), Some(0.0));
        assert_eq!(acc.mean(), Some(0.0));
        assert_eq!(acc.median(), Some(0.0));
        assert_eq!(accumulate(&[1e308, 1e308, -1e308]).sum(), Some(1e308));
        let std_dev = acc.std_dev().expect("std dev");
        assert!(std_dev.is_finite());
        assert!((std_dev / 1e200 - 1.0).abs() < 1e-12);

        let acc = accumulate(&[f64::MAX, -f64::MAX, f64::MAX]);
        for metric in [acc.mean(), acc.median(), acc.std_dev()] {
            assert!(metric.is_some_and(f64::is_finite));
        }
    }
}
