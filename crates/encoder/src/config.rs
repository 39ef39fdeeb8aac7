//! Encoding configuration.
//!
//! Every knob has a default, and the whole tree derives `Deserialize` with
//! `#[serde(default)]`, so a partial JSON config only overrides what it names.

use crate::schema::CategoricalField;
use serde::{Deserialize, Serialize};

/// What to do when a field is malformed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldPolicy {
    /// Drop the malformed part and keep going
    #[default]
    Degrade,
    /// Abort the whole encode with `EncodeError::Encoding`
    Fail,
}

/// How numeric attributes are scaled across the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalingMode {
    /// (x - mean) / std_dev
    #[default]
    ZScore,
    /// (x - min) / (max - min)
    MinMax,
}

/// Settings for one categorical field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub delimiter: char,
    /// Multiplier applied to the field's unit-length sub-vector
    pub weight: f32,
    pub lowercase: bool,
    pub policy: FieldPolicy,
    /// Tokens excluded from the vocabulary (matched after trimming and,
    /// if enabled, lowercasing)
    pub stop_words: Vec<String>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            delimiter: '|',
            weight: 1.0,
            lowercase: true,
            policy: FieldPolicy::Degrade,
            stop_words: Vec::new(),
        }
    }
}

/// Settings for the numeric block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumericConfig {
    /// Overall weight of the numeric block; 0 leaves numeric attributes out
    pub weight: f32,
    pub scaling: ScalingMode,
    /// Applies to non-finite values (NaN, infinity)
    pub policy: FieldPolicy,
}

impl Default for NumericConfig {
    fn default() -> Self {
        Self {
            weight: 0.5,
            scaling: ScalingMode::ZScore,
            policy: FieldPolicy::Degrade,
        }
    }
}

impl NumericConfig {
    pub fn is_enabled(&self) -> bool {
        self.weight > 0.0
    }
}

/// Full encoder configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    pub genres: FieldConfig,
    pub keywords: FieldConfig,
    pub cast: FieldConfig,
    pub companies: FieldConfig,
    pub numeric: NumericConfig,
}

impl EncoderConfig {
    pub fn field(&self, field: CategoricalField) -> &FieldConfig {
        match field {
            CategoricalField::Genres => &self.genres,
            CategoricalField::Keywords => &self.keywords,
            CategoricalField::Cast => &self.cast,
            CategoricalField::Companies => &self.companies,
        }
    }

    pub fn field_mut(&mut self, field: CategoricalField) -> &mut FieldConfig {
        match field {
            CategoricalField::Genres => &mut self.genres,
            CategoricalField::Keywords => &mut self.keywords,
            CategoricalField::Cast => &mut self.cast,
            CategoricalField::Companies => &mut self.companies,
        }
    }

    /// Same configuration with the numeric block switched off
    pub fn without_numeric(mut self) -> Self {
        self.numeric.weight = 0.0;
        self
    }

    /// Same configuration with one policy applied to every field
    pub fn with_policy(mut self, policy: FieldPolicy) -> Self {
        for field in CategoricalField::ALL {
            self.field_mut(field).policy = policy;
        }
        self.numeric.policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EncoderConfig::default();

        for field in CategoricalField::ALL {
            let fc = config.field(field);
            assert_eq!(fc.delimiter, '|');
            assert_eq!(fc.weight, 1.0);
            assert_eq!(fc.policy, FieldPolicy::Degrade);
        }
        assert!(config.numeric.is_enabled());
        assert_eq!(config.numeric.scaling, ScalingMode::ZScore);
    }

    #[test]
    fn test_partial_json_overrides_only_named_fields() {
        let config: EncoderConfig = serde_json::from_str(
            r#"{
                "cast": { "delimiter": ",", "weight": 0.5, "stop_words": ["Stan Lee"] },
                "numeric": { "scaling": "min_max", "policy": "fail" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.cast.delimiter, ',');
        assert_eq!(config.cast.weight, 0.5);
        assert!(config.cast.lowercase);
        assert_eq!(config.cast.stop_words, vec!["Stan Lee".to_string()]);
        assert_eq!(config.genres, FieldConfig::default());
        assert_eq!(config.numeric.scaling, ScalingMode::MinMax);
        assert_eq!(config.numeric.policy, FieldPolicy::Fail);
        assert_eq!(config.numeric.weight, 0.5);
    }

    #[test]
    fn test_with_policy_and_without_numeric() {
        let config = EncoderConfig::default()
            .with_policy(FieldPolicy::Fail)
            .without_numeric();

        assert!(CategoricalField::ALL
            .into_iter()
            .all(|f| config.field(f).policy == FieldPolicy::Fail));
        assert!(!config.numeric.is_enabled());
    }
}
