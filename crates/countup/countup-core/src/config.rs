//! Count-up configuration: value range, timing, and display formatting.

use serde::{Deserialize, Serialize};

use crate::codec::{format_value, MAX_DECIMAL_PLACES};
use crate::easing::Easing;
use crate::error::CountupError;
use crate::Result;

/// Everything a controller needs to know to animate and render a number.
///
/// Missing fields in a JSON document fall back to [`CountupConfig::default`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountupConfig {
    pub start_value: f64,
    pub end_value: f64,
    /// Run length in milliseconds; `0` jumps straight to the end value.
    pub duration_ms: u64,
    pub decimal_places: u32,
    /// Separator between integer and fractional digits
    pub decimal: String,
    /// Separator between groups of three integer digits
    pub thousands_separator: String,
    pub prefix: String,
    pub suffix: String,
    /// When false, negative values render as `-<prefix><digits>` instead of
    /// `<prefix>-<digits>`.
    pub prefix_before_minus: bool,
    /// `None` runs linearly.
    pub easing: Option<Easing>,
}

impl Default for CountupConfig {
    fn default() -> Self {
        Self {
            start_value: 0.0,
            end_value: 100.0,
            duration_ms: 1000,
            decimal_places: 0,
            decimal: ".".to_string(),
            thousands_separator: String::new(),
            prefix: String::new(),
            suffix: String::new(),
            prefix_before_minus: true,
            easing: Some(Easing::OutExpo),
        }
    }
}

impl CountupConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json(s: &str) -> Result<Self> {
        let config: CountupConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to JSON. Fails for custom easing curves.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        validate_decimal_places(self.decimal_places)?;
        validate_finite("start_value", self.start_value)?;
        validate_finite("end_value", self.end_value)?;
        Ok(())
    }

    /// Render `value` the way the display sink receives it: prefix, sign
    /// placement, grouped digits, suffix.
    pub fn render(&self, value: f64) -> String {
        let body = format_value(
            value,
            self.decimal_places,
            &self.decimal,
            &self.thousands_separator,
        );
        if !self.prefix_before_minus && value < 0.0 {
            if let Some(digits) = body.strip_prefix('-') {
                return format!("-{}{}{}", self.prefix, digits, self.suffix);
            }
        }
        format!("{}{}{}", self.prefix, body, self.suffix)
    }

    pub fn with_range(mut self, start_value: f64, end_value: f64) -> Self {
        self.start_value = start_value;
        self.end_value = end_value;
        self
    }

    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn with_decimal_places(mut self, decimal_places: u32) -> Self {
        self.decimal_places = decimal_places;
        self
    }

    pub fn with_separators(mut self, decimal: &str, thousands_separator: &str) -> Self {
        self.decimal = decimal.to_string();
        self.thousands_separator = thousands_separator.to_string();
        self
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    pub fn with_suffix(mut self, suffix: &str) -> Self {
        self.suffix = suffix.to_string();
        self
    }

    pub fn with_prefix_before_minus(mut self, enabled: bool) -> Self {
        self.prefix_before_minus = enabled;
        self
    }

    pub fn with_easing(mut self, easing: Option<Easing>) -> Self {
        self.easing = easing;
        self
    }
}

pub(crate) fn validate_decimal_places(decimal_places: u32) -> Result<()> {
    if decimal_places > MAX_DECIMAL_PLACES {
        return Err(CountupError::invalid_config(
            "decimal_places",
            format!("{decimal_places} exceeds the maximum of {MAX_DECIMAL_PLACES}"),
        ));
    }
    Ok(())
}

pub(crate) fn validate_finite(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(CountupError::invalid_config(
            field,
            format!("{value} is not a finite number"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_widget_defaults() {
        let cfg = CountupConfig::default();
        assert_eq!(cfg.start_value, 0.0);
        assert_eq!(cfg.end_value, 100.0);
        assert_eq!(cfg.duration_ms, 1000);
        assert_eq!(cfg.decimal_places, 0);
        assert_eq!(cfg.decimal, ".");
        assert_eq!(cfg.thousands_separator, "");
        assert!(cfg.prefix_before_minus);
        assert_eq!(cfg.easing, Some(Easing::OutExpo));
    }

    #[test]
    fn render_places_minus_around_prefix() {
        let cfg = CountupConfig::default().with_prefix("$");
        assert_eq!(cfg.render(-500.0), "$-500");
        let cfg = cfg.with_prefix_before_minus(false);
        assert_eq!(cfg.render(-500.0), "-$500");
        assert_eq!(cfg.render(500.0), "$500");
    }

    #[test]
    fn render_keeps_rounded_zero_unsigned() {
        let cfg = CountupConfig::default()
            .with_prefix("$")
            .with_prefix_before_minus(false);
        assert_eq!(cfg.render(-0.2), "$0");
    }

    #[test]
    fn render_applies_suffix_and_separators() {
        let cfg = CountupConfig::default()
            .with_decimal_places(2)
            .with_separators(",", ".")
            .with_prefix("€")
            .with_suffix(" EUR")
            .with_prefix_before_minus(false);
        assert_eq!(cfg.render(-2124.24), "-€2.124,24 EUR");
    }

    #[test]
    fn validate_rejects_excess_decimal_places() {
        let cfg = CountupConfig::default().with_decimal_places(16);
        let err = cfg.validate().unwrap_err();
        assert!(matches!(
            err,
            CountupError::InvalidConfiguration { ref field, .. } if field == "decimal_places"
        ));
        assert!(CountupConfig::default()
            .with_decimal_places(MAX_DECIMAL_PLACES)
            .validate()
            .is_ok());
    }

    #[test]
    fn validate_rejects_non_finite_range() {
        let cfg = CountupConfig::default().with_range(f64::NAN, 1.0);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg = CountupConfig::from_json(r#"{ "end_value": 9172.52, "decimal_places": 2 }"#)
            .unwrap();
        assert_eq!(cfg.end_value, 9172.52);
        assert_eq!(cfg.decimal_places, 2);
        assert_eq!(cfg.duration_ms, 1000);
        assert_eq!(cfg.easing, Some(Easing::OutExpo));
    }

    #[test]
    fn json_round_trip_and_null_easing() {
        let cfg = CountupConfig::default().with_easing(None);
        let json = cfg.to_json().unwrap();
        assert!(json.contains("\"easing\":null"));
        assert_eq!(CountupConfig::from_json(&json).unwrap(), cfg);
    }

    #[test]
    fn from_json_reports_parse_errors() {
        let err = CountupConfig::from_json("{ nope").unwrap_err();
        assert_eq!(err.category(), "serialization");
    }
}
