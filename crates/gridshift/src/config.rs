#![forbid(unsafe_code)]

//! Engine configuration.
//!
//! [`GridConfig`] is the runtime configuration consumed by
//! [`DragController`](crate::DragController). [`GridPolicyConfig`] is the same
//! set of knobs expressed in plain numbers so it can be loaded from TOML or
//! JSON (feature `policy-config`) and converted with
//! [`GridPolicyConfig::to_grid_config`].
//!
//! ```toml
//! # gridshift.toml
//! shift_ms = 250
//!
//! [combine]
//! ratio = 0.25
//! basis = "width"
//!
//! [autoscroll]
//! enabled = true
//! step_ms = 14
//!
//! [gesture]
//! strategy = "delayed"
//! delay_ms = 500
//! ```
//!
//! Every default matches the engine's built-in behavior, so
//! `GridPolicyConfig::default().to_grid_config()` equals `GridConfig::default()`.

use std::time::Duration;

#[cfg(feature = "policy-config")]
use std::path::Path;

#[cfg(feature = "policy-config")]
use serde::{Deserialize, Serialize};

use gridshift_core::geometry::{Axis, Rect};
use gridshift_core::gesture::{
    AxisConstrained, DEFAULT_LONG_PRESS_TIMEOUT, DEFAULT_TOUCH_SLOP, Delayed,
    GestureStartStrategy, Immediate,
};

pub const DEFAULT_SHIFT_DURATION: Duration = Duration::from_millis(250);
pub const DEFAULT_PROXY_DURATION: Duration = Duration::from_millis(250);
pub const DEFAULT_SETTLE_DURATION: Duration = Duration::from_millis(250);
pub const DEFAULT_AUTOSCROLL_STEP: Duration = Duration::from_millis(14);

// ---------------------------------------------------------------------------
// Combine threshold
// ---------------------------------------------------------------------------

/// Which dimension of the hovered tile scales the combine threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(rename_all = "snake_case"))]
pub enum ThresholdBasis {
    /// Tile width regardless of scroll axis.
    #[default]
    Width,
    /// Tile height regardless of scroll axis.
    Height,
    /// Tile extent along the grid's scroll axis.
    MainAxis,
    /// The smaller of width and height.
    ShortestSide,
}

/// Radius around a tile's center inside which a hovered tile is combined
/// with rather than reordered around.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombineThreshold {
    pub ratio: f32,
    pub basis: ThresholdBasis,
}

impl Default for CombineThreshold {
    fn default() -> Self {
        Self {
            ratio: 0.25,
            basis: ThresholdBasis::Width,
        }
    }
}

impl CombineThreshold {
    /// Threshold distance for a candidate tile.
    #[must_use]
    pub fn distance_for(&self, rect: Rect, axis: Axis) -> f32 {
        let basis = match self.basis {
            ThresholdBasis::Width => rect.width,
            ThresholdBasis::Height => rect.height,
            ThresholdBasis::MainAxis => rect.size().extent(axis),
            ThresholdBasis::ShortestSide => rect.width.min(rect.height),
        };
        basis * self.ratio
    }
}

// ---------------------------------------------------------------------------
// Autoscroll
// ---------------------------------------------------------------------------

/// Edge autoscroll tuning.
///
/// Each step moves the scroll offset by
/// `step_scale * max(overshoot, min_overshoot) / overshoot_divisor`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoscrollConfig {
    pub enabled: bool,
    /// Duration of one scroll step.
    pub step_duration: Duration,
    /// Overshoot is never considered smaller than this.
    pub min_overshoot: f32,
    pub overshoot_divisor: f32,
    pub step_scale: f32,
    /// Steps smaller than this are skipped.
    pub min_step: f32,
}

impl Default for AutoscrollConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            step_duration: DEFAULT_AUTOSCROLL_STEP,
            min_overshoot: 20.0,
            overshoot_divisor: 10.0,
            step_scale: 1.0,
            min_step: 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Gesture strategy
// ---------------------------------------------------------------------------

/// Serializable choice of drag-start strategy.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum StartStrategyConfig {
    #[default]
    Immediate,
    Delayed { timeout: Duration, slop: f32 },
    AxisConstrained { axis: Axis, slop: f32 },
}

impl StartStrategyConfig {
    /// Long-press start with the platform-typical timeout and slop.
    #[must_use]
    pub const fn long_press() -> Self {
        Self::Delayed {
            timeout: DEFAULT_LONG_PRESS_TIMEOUT,
            slop: DEFAULT_TOUCH_SLOP,
        }
    }

    /// Instantiate the strategy.
    #[must_use]
    pub fn build(&self) -> Box<dyn GestureStartStrategy> {
        match *self {
            Self::Immediate => Box::new(Immediate),
            Self::Delayed { timeout, slop } => Box::new(Delayed { timeout, slop }),
            Self::AxisConstrained { axis, slop } => Box::new(AxisConstrained { axis, slop }),
        }
    }
}

// ---------------------------------------------------------------------------
// GridConfig
// ---------------------------------------------------------------------------

/// Runtime configuration of a [`DragController`](crate::DragController).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridConfig {
    /// Scroll/flow axis of the grid. Only consulted for
    /// [`ThresholdBasis::MainAxis`]; autoscroll reads the axis from the
    /// host's scroll metrics.
    pub axis: Axis,
    /// Duration of sibling shift transitions.
    pub shift_duration: Duration,
    /// Duration of the proxy lift-in on drag start.
    pub proxy_duration: Duration,
    /// Duration of the proxy settle after drop.
    pub settle_duration: Duration,
    pub combine: CombineThreshold,
    pub autoscroll: AutoscrollConfig,
    pub start_strategy: StartStrategyConfig,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            axis: Axis::Vertical,
            shift_duration: DEFAULT_SHIFT_DURATION,
            proxy_duration: DEFAULT_PROXY_DURATION,
            settle_duration: DEFAULT_SETTLE_DURATION,
            combine: CombineThreshold::default(),
            autoscroll: AutoscrollConfig::default(),
            start_strategy: StartStrategyConfig::default(),
        }
    }
}

impl GridConfig {
    /// Validate all parameters. An empty list means the config is usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !(self.combine.ratio.is_finite() && self.combine.ratio >= 0.0) {
            errors.push(format!(
                "combine.ratio must be finite and >= 0, got {}",
                self.combine.ratio
            ));
        }
        let scroll = &self.autoscroll;
        if !(scroll.overshoot_divisor.is_finite() && scroll.overshoot_divisor > 0.0) {
            errors.push(format!(
                "autoscroll.overshoot_divisor must be > 0, got {}",
                scroll.overshoot_divisor
            ));
        }
        if !(scroll.step_scale.is_finite() && scroll.step_scale > 0.0) {
            errors.push(format!(
                "autoscroll.step_scale must be > 0, got {}",
                scroll.step_scale
            ));
        }
        if !(scroll.min_overshoot.is_finite() && scroll.min_overshoot >= 0.0) {
            errors.push(format!(
                "autoscroll.min_overshoot must be >= 0, got {}",
                scroll.min_overshoot
            ));
        }
        if !(scroll.min_step.is_finite() && scroll.min_step >= 0.0) {
            errors.push(format!(
                "autoscroll.min_step must be >= 0, got {}",
                scroll.min_step
            ));
        }
        if scroll.enabled && scroll.step_duration.is_zero() {
            errors.push("autoscroll.step_ms must be > 0 when autoscroll is enabled".into());
        }
        match self.start_strategy {
            StartStrategyConfig::Immediate => {}
            StartStrategyConfig::Delayed { slop, .. }
            | StartStrategyConfig::AxisConstrained { slop, .. } => {
                if !(slop.is_finite() && slop >= 0.0) {
                    errors.push(format!("gesture.slop must be >= 0, got {slop}"));
                }
            }
        }
        errors
    }
}

// ---------------------------------------------------------------------------
// Policy-as-data
// ---------------------------------------------------------------------------

/// Loadable form of [`GridConfig`] using milliseconds and plain numbers.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct GridPolicyConfig {
    pub axis: Axis,
    pub shift_ms: u64,
    pub proxy_ms: u64,
    pub settle_ms: u64,
    pub combine: CombinePolicyConfig,
    pub autoscroll: AutoscrollPolicyConfig,
    pub gesture: GesturePolicyConfig,
}

impl Default for GridPolicyConfig {
    fn default() -> Self {
        Self {
            axis: Axis::Vertical,
            shift_ms: millis(DEFAULT_SHIFT_DURATION),
            proxy_ms: millis(DEFAULT_PROXY_DURATION),
            settle_ms: millis(DEFAULT_SETTLE_DURATION),
            combine: CombinePolicyConfig::default(),
            autoscroll: AutoscrollPolicyConfig::default(),
            gesture: GesturePolicyConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct CombinePolicyConfig {
    pub ratio: f32,
    pub basis: ThresholdBasis,
}

impl Default for CombinePolicyConfig {
    fn default() -> Self {
        let threshold = CombineThreshold::default();
        Self {
            ratio: threshold.ratio,
            basis: threshold.basis,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct AutoscrollPolicyConfig {
    pub enabled: bool,
    pub step_ms: u64,
    pub min_overshoot: f32,
    pub overshoot_divisor: f32,
    pub step_scale: f32,
    pub min_step: f32,
}

impl Default for AutoscrollPolicyConfig {
    fn default() -> Self {
        let d = AutoscrollConfig::default();
        Self {
            enabled: d.enabled,
            step_ms: millis(d.step_duration),
            min_overshoot: d.min_overshoot,
            overshoot_divisor: d.overshoot_divisor,
            step_scale: d.step_scale,
            min_step: d.min_step,
        }
    }
}

/// Name of a drag-start strategy in policy files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(rename_all = "snake_case"))]
pub enum StrategyKind {
    #[default]
    Immediate,
    Delayed,
    AxisConstrained,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct GesturePolicyConfig {
    pub strategy: StrategyKind,
    /// Hold time for `delayed`.
    pub delay_ms: u64,
    /// Axis for `axis_constrained`.
    pub axis: Axis,
    pub slop: f32,
}

impl Default for GesturePolicyConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::Immediate,
            delay_ms: millis(DEFAULT_LONG_PRESS_TIMEOUT),
            axis: Axis::Vertical,
            slop: DEFAULT_TOUCH_SLOP,
        }
    }
}

impl GridPolicyConfig {
    /// Load from a TOML string.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, PolicyConfigError> {
        toml::from_str(s).map_err(PolicyConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, PolicyConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(PolicyConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "policy-config")]
    pub fn from_json_str(s: &str) -> Result<Self, PolicyConfigError> {
        serde_json::from_str(s).map_err(PolicyConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "policy-config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PolicyConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(PolicyConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Convert into a runtime config without validating.
    #[must_use]
    pub fn to_grid_config(&self) -> GridConfig {
        let start_strategy = match self.gesture.strategy {
            StrategyKind::Immediate => StartStrategyConfig::Immediate,
            StrategyKind::Delayed => StartStrategyConfig::Delayed {
                timeout: Duration::from_millis(self.gesture.delay_ms),
                slop: self.gesture.slop,
            },
            StrategyKind::AxisConstrained => StartStrategyConfig::AxisConstrained {
                axis: self.gesture.axis,
                slop: self.gesture.slop,
            },
        };
        GridConfig {
            axis: self.axis,
            shift_duration: Duration::from_millis(self.shift_ms),
            proxy_duration: Duration::from_millis(self.proxy_ms),
            settle_duration: Duration::from_millis(self.settle_ms),
            combine: CombineThreshold {
                ratio: self.combine.ratio,
                basis: self.combine.basis,
            },
            autoscroll: AutoscrollConfig {
                enabled: self.autoscroll.enabled,
                step_duration: Duration::from_millis(self.autoscroll.step_ms),
                min_overshoot: self.autoscroll.min_overshoot,
                overshoot_divisor: self.autoscroll.overshoot_divisor,
                step_scale: self.autoscroll.step_scale,
                min_step: self.autoscroll.min_step,
            },
            start_strategy,
        }
    }

    /// Convert and validate.
    pub fn try_into_grid_config(&self) -> Result<GridConfig, PolicyConfigError> {
        let config = self.to_grid_config();
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(PolicyConfigError::Validation(errors))
        }
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from loading or validating a [`GridPolicyConfig`].
#[derive(Debug)]
pub enum PolicyConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "policy-config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "policy-config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for PolicyConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "policy-config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "policy-config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for PolicyConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "policy-config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "policy-config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(GridConfig::default().validate().is_empty());
    }

    #[test]
    fn policy_defaults_match_runtime_defaults() {
        assert_eq!(
            GridPolicyConfig::default().to_grid_config(),
            GridConfig::default()
        );
    }

    #[test]
    fn threshold_basis_selects_dimension() {
        let rect = Rect::new(0.0, 0.0, 80.0, 40.0);
        let mut threshold = CombineThreshold::default();
        assert_eq!(threshold.distance_for(rect, Axis::Vertical), 20.0);
        threshold.basis = ThresholdBasis::Height;
        assert_eq!(threshold.distance_for(rect, Axis::Vertical), 10.0);
        threshold.basis = ThresholdBasis::MainAxis;
        assert_eq!(threshold.distance_for(rect, Axis::Vertical), 10.0);
        assert_eq!(threshold.distance_for(rect, Axis::Horizontal), 20.0);
        threshold.basis = ThresholdBasis::ShortestSide;
        assert_eq!(threshold.distance_for(rect, Axis::Horizontal), 10.0);
    }

    #[test]
    fn validate_reports_bad_values() {
        let mut config = GridConfig::default();
        config.combine.ratio = -1.0;
        config.autoscroll.overshoot_divisor = 0.0;
        config.autoscroll.step_duration = Duration::ZERO;
        let errors = config.validate();
        assert_eq!(errors.len(), 3, "{errors:?}");
    }

    #[test]
    fn disabled_autoscroll_allows_zero_step() {
        let mut config = GridConfig::default();
        config.autoscroll.enabled = false;
        config.autoscroll.step_duration = Duration::ZERO;
        assert!(config.validate().is_empty());
    }

    #[test]
    fn policy_builds_delayed_strategy() {
        let mut policy = GridPolicyConfig::default();
        policy.gesture.strategy = StrategyKind::Delayed;
        policy.gesture.delay_ms = 300;
        let config = policy.to_grid_config();
        assert_eq!(
            config.start_strategy,
            StartStrategyConfig::Delayed {
                timeout: Duration::from_millis(300),
                slop: DEFAULT_TOUCH_SLOP,
            }
        );
        assert_eq!(config.start_strategy.build().name(), "delayed");
    }

    #[test]
    fn try_into_rejects_invalid_policy() {
        let mut policy = GridPolicyConfig::default();
        policy.autoscroll.step_scale = 0.0;
        let err = policy.try_into_grid_config().unwrap_err();
        assert!(err.to_string().contains("step_scale"));
    }
}
