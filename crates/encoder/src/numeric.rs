//! Catalog-wide scaling of numeric attributes.

use crate::config::ScalingMode;
use crate::schema::NumericField;

/// One record's raw numeric attributes, in `NumericField::ALL` order
pub type NumericRow = [Option<f32>; NumericField::COUNT];

/// Spread below this is treated as a constant column
const MIN_SPREAD: f64 = 1e-9;

/// Z-scores are clipped to this many standard deviations
pub const Z_SCORE_CLIP: f32 = 3.0;

/// Summary statistics of one numeric column (missing values excluded)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColumnStats {
    pub observed: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl ColumnStats {
    fn fit(values: impl Iterator<Item = f32>) -> Self {
        let values: Vec<f64> = values.map(f64::from).collect();
        if values.is_empty() {
            return Self::default();
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Self {
            observed: values.len(),
            mean,
            std_dev: variance.sqrt(),
            min,
            max,
        }
    }

    /// Scale one value; `None` is imputed with the column mean.
    ///
    /// A column with no observations or no spread scales everything to 0,
    /// so it carries no signal instead of dividing by zero.
    fn scale(&self, value: Option<f32>, mode: ScalingMode) -> f32 {
        if self.observed == 0 {
            return 0.0;
        }
        let x = value.map(f64::from).unwrap_or(self.mean);

        let scaled = match mode {
            ScalingMode::ZScore if self.std_dev > MIN_SPREAD => {
                let clip = f64::from(Z_SCORE_CLIP);
                ((x - self.mean) / self.std_dev).clamp(-clip, clip)
            }
            ScalingMode::MinMax if self.max - self.min > MIN_SPREAD => {
                (x - self.min) / (self.max - self.min)
            }
            _ => 0.0,
        };
        scaled as f32
    }
}

/// Column statistics learned from the whole catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericScaler {
    mode: ScalingMode,
    columns: [ColumnStats; NumericField::COUNT],
}

impl NumericScaler {
    /// Learn per-column statistics over all rows.
    pub fn fit(rows: &[NumericRow], mode: ScalingMode) -> Self {
        let columns = std::array::from_fn(|col| ColumnStats::fit(rows.iter().filter_map(|row| row[col])));
        Self { mode, columns }
    }

    pub fn mode(&self) -> ScalingMode {
        self.mode
    }

    /// Largest magnitude a scaled value can take.
    pub fn bound(&self) -> f32 {
        match self.mode {
            ScalingMode::ZScore => Z_SCORE_CLIP,
            ScalingMode::MinMax => 1.0,
        }
    }

    pub fn stats(&self, field: NumericField) -> &ColumnStats {
        &self.columns[field as usize]
    }

    /// Scale one row. Output is in `NumericField::ALL` order.
    pub fn transform(&self, row: &NumericRow) -> [f32; NumericField::COUNT] {
        std::array::from_fn(|col| self.columns[col].scale(row[col], self.mode))
    }
}
