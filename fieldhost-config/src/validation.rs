use thiserror::Error;

use crate::models::HostingConfig;

/// A configuration value the engine cannot work with.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostingConfigError {
    #[error("{field} must be a finite, non-negative number (got {value})")]
    NegativeMargin { field: &'static str, value: f32 },

    #[error("max_visible_ratio must lie in (0, 1] (got {0})")]
    RatioOutOfRange(f32),

    #[error("min_content_area must be a finite, non-negative number (got {0})")]
    NegativeArea(f32),
}

impl HostingConfig {
    pub fn validate(&self) -> Result<(), HostingConfigError> {
        let margins = [
            ("margin_x", self.margin_x),
            ("margin_y", self.margin_y),
            ("content_margin.width", self.content_margin.width),
            ("content_margin.height", self.content_margin.height),
        ];
        if let Some((field, value)) = margins
            .into_iter()
            .find(|(_, value)| !is_non_negative(*value))
        {
            return Err(HostingConfigError::NegativeMargin { field, value });
        }

        let ratio = self.max_visible_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(HostingConfigError::RatioOutOfRange(ratio));
        }

        if !is_non_negative(self.min_content_area) {
            return Err(HostingConfigError::NegativeArea(self.min_content_area));
        }

        Ok(())
    }
}

fn is_non_negative(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}
