//! Overlay configuration
//!
//! Settings recognised at overlay construction. They can be built in code or
//! loaded from RON text; unspecified fields fall back to their defaults.

use serde::{Deserialize, Serialize};

use crate::constants::{
    CLICK_THRESHOLD, DEFAULT_HANDLE_SIZE, DEFAULT_MIN_HEIGHT, DEFAULT_MIN_WIDTH, HIT_TOLERANCE,
    ROTATE_BAR_LENGTH,
};

/// What to do with a resize step that would shrink the box below a minimum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MinSizePolicy {
    /// No lower bound; width and height may reach zero or go negative
    Unclamped,
    /// Discard any pointer move that yields a size below the bounds
    Reject { min_width: f32, min_height: f32 },
}

impl Default for MinSizePolicy {
    fn default() -> Self {
        MinSizePolicy::Reject {
            min_width: DEFAULT_MIN_WIDTH,
            min_height: DEFAULT_MIN_HEIGHT,
        }
    }
}

impl MinSizePolicy {
    /// Returns true if a box of this size may be committed.
    pub fn accepts(&self, width: f32, height: f32) -> bool {
        match *self {
            MinSizePolicy::Unclamped => true,
            MinSizePolicy::Reject {
                min_width,
                min_height,
            } => width >= min_width && height >= min_height,
        }
    }
}

/// How aspect-ratio lock derives the second resize delta from the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AspectPolicy {
    /// The derived delta equals the driving one, signed by the handle
    #[default]
    Mirror,
    /// The derived delta is scaled by the start ratio `width / height`, so
    /// a non-square box keeps its shape
    Proportional,
}

/// Overlay construction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Initial box width
    pub width: f32,
    /// Initial box height
    pub height: f32,
    /// Handle diameter
    pub handle_size: f32,
    /// Show the rotate handle and allow rotation
    pub rotateable: bool,
    /// Allow dragging the whole box
    pub moveable: bool,
    /// Skip the confirm affordance
    pub hide_check_icon: bool,
    /// Minimum size handling during resize
    pub min_size: MinSizePolicy,
    /// Second-axis delta under aspect-ratio lock
    pub aspect_policy: AspectPolicy,
    /// Pointer travel below which a rotate gesture is a click
    pub click_threshold: f32,
    /// Gap between the box top edge and the rotate handle
    pub rotate_bar_length: f32,
    /// Extra hit slack around handles
    pub hit_tolerance: f32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 100.0,
            handle_size: DEFAULT_HANDLE_SIZE,
            rotateable: false,
            moveable: false,
            hide_check_icon: false,
            min_size: MinSizePolicy::default(),
            aspect_policy: AspectPolicy::default(),
            click_threshold: CLICK_THRESHOLD,
            rotate_bar_length: ROTATE_BAR_LENGTH,
            hit_tolerance: HIT_TOLERANCE,
        }
    }
}

impl OverlayConfig {
    /// Create a config for a box of the given initial size
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn with_handle_size(mut self, handle_size: f32) -> Self {
        self.handle_size = handle_size;
        self
    }

    pub fn rotateable(mut self, rotateable: bool) -> Self {
        self.rotateable = rotateable;
        self
    }

    pub fn moveable(mut self, moveable: bool) -> Self {
        self.moveable = moveable;
        self
    }

    pub fn hide_check_icon(mut self, hide: bool) -> Self {
        self.hide_check_icon = hide;
        self
    }

    pub fn with_min_size(mut self, min_size: MinSizePolicy) -> Self {
        self.min_size = min_size;
        self
    }

    pub fn with_aspect_policy(mut self, aspect_policy: AspectPolicy) -> Self {
        self.aspect_policy = aspect_policy;
        self
    }

    /// Check that sizes are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sizes = [
            ("width", self.width),
            ("height", self.height),
            ("handle_size", self.handle_size),
            ("click_threshold", self.click_threshold),
            ("rotate_bar_length", self.rotate_bar_length),
            ("hit_tolerance", self.hit_tolerance),
        ];
        for (field, value) in sizes {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }
        if self.handle_size == 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "handle_size",
                value: self.handle_size,
            });
        }
        if let MinSizePolicy::Reject {
            min_width,
            min_height,
        } = self.min_size
        {
            for (field, value) in [("min_width", min_width), ("min_height", min_height)] {
                if !value.is_finite() || value < 0.0 {
                    return Err(ConfigError::InvalidValue { field, value });
                }
            }
        }
        Ok(())
    }

    /// Parse a config from RON text
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: OverlayConfig =
            ron::from_str(text).map_err(|e| ConfigError::Deserialize(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the config to pretty RON text
    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: f32 },
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OverlayConfig::default();
        assert_eq!(config.handle_size, 8.0);
        assert_eq!(
            config.min_size,
            MinSizePolicy::Reject {
                min_width: 1.0,
                min_height: 1.0
            }
        );
        assert!(!config.rotateable);
        assert!(!config.moveable);
        assert!(!config.hide_check_icon);
        assert_eq!(config.aspect_policy, AspectPolicy::Mirror);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_min_size_policy() {
        let policy = MinSizePolicy::default();
        assert!(policy.accepts(1.0, 1.0));
        assert!(!policy.accepts(0.5, 10.0));
        assert!(!policy.accepts(10.0, 0.0));
        assert!(MinSizePolicy::Unclamped.accepts(-5.0, 0.0));
    }

    #[test]
    fn test_ron_partial_config() {
        let config =
            OverlayConfig::from_ron_str("(width: 120.0, height: 80.0, moveable: true)").unwrap();
        assert_eq!(config.width, 120.0);
        assert_eq!(config.height, 80.0);
        assert!(config.moveable);
        assert_eq!(config.handle_size, 8.0);

        let config = OverlayConfig::from_ron_str("(aspect_policy: Proportional)").unwrap();
        assert_eq!(config.aspect_policy, AspectPolicy::Proportional);
    }

    #[test]
    fn test_ron_round_trip() {
        let config = OverlayConfig::new(40.0, 30.0)
            .rotateable(true)
            .with_min_size(MinSizePolicy::Unclamped)
            .with_aspect_policy(AspectPolicy::Proportional);
        let text = config.to_ron_string().unwrap();
        assert_eq!(OverlayConfig::from_ron_str(&text).unwrap(), config);
    }

    #[test]
    fn test_invalid_values() {
        let err = OverlayConfig::new(-1.0, 10.0).validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "width", .. }));

        let err = OverlayConfig::default()
            .with_handle_size(0.0)
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "handle_size",
                ..
            }
        ));

        assert!(matches!(
            OverlayConfig::from_ron_str("(width: "),
            Err(ConfigError::Deserialize(_))
        ));
    }
}
