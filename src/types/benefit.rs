//! Quantified benefits attached to tasks.
//!
//! A benefit is a before/after measurement. Its `direction` says how to read
//! the change and its `value_meaning` says whether baseline and expected are
//! absolute readings or deltas. Values are a closed sum type so every
//! direction-specific check can match exhaustively.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of value a benefit measures.
///
/// Also used as the project-level primary value driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BenefitKind {
    /// Processing time before/after.
    Time,
    /// Output quality (error rate, precision, ...).
    Quality,
    /// Risk exposure (incidents, findings, ...).
    Risk,
    /// New capability or coverage.
    Enablement,
    /// Monetary cost.
    Cost,
}

impl BenefitKind {
    /// All kinds in display order.
    pub const ALL: [BenefitKind; 5] = [
        Self::Time,
        Self::Quality,
        Self::Risk,
        Self::Enablement,
        Self::Cost,
    ];

    /// Parse from the wire spelling.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim() {
            "time" => Some(Self::Time),
            "quality" => Some(Self::Quality),
            "risk" => Some(Self::Risk),
            "enablement" => Some(Self::Enablement),
            "cost" => Some(Self::Cost),
            _ => None,
        }
    }

    /// Wire spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::Quality => "quality",
            Self::Risk => "risk",
            Self::Enablement => "enablement",
            Self::Cost => "cost",
        }
    }
}

impl fmt::Display for BenefitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Project-level primary value driver shares the benefit vocabulary.
pub type ValueDriver = BenefitKind;

/// How a change in the measured value should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Higher is better.
    #[serde(rename = "increaseIsBetter")]
    IncreaseIsBetter,
    /// Lower is better.
    #[serde(rename = "decreaseIsBetter")]
    DecreaseIsBetter,
    /// Closeness to `target` is better. Requires a target.
    #[serde(rename = "targetIsBetter")]
    TargetIsBetter,
    /// `true` is better.
    #[serde(rename = "boolIsBetter")]
    BoolIsBetter,
}

impl Direction {
    /// Whether this direction needs a `target` value.
    pub fn requires_target(&self) -> bool {
        matches!(self, Self::TargetIsBetter)
    }
}

/// Whether baseline/expected are absolute readings or deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueMeaning {
    /// Absolute reading.
    Absolute,
    /// Change relative to an implicit reference.
    Delta,
}

/// Basis a benefit is aggregated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregationBasis {
    /// Per unit of work (multiplied by monthly volume).
    #[serde(rename = "perUnit")]
    PerUnit,
    /// Already a monthly figure.
    #[serde(rename = "perMonth")]
    PerMonth,
    /// One-off, not recurring.
    #[serde(rename = "oneOff")]
    OneOff,
}

impl Default for AggregationBasis {
    fn default() -> Self {
        Self::PerUnit
    }
}

/// Low / medium / high scale used by categorical values and confidences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Low.
    Low,
    /// Medium.
    Medium,
    /// High.
    High,
}

/// A baseline or expected benefit value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BenefitValue {
    /// A number in `benefit_unit`.
    Numeric {
        /// The reading.
        value: f64,
    },
    /// A coarse level.
    Categorical {
        /// The level.
        category: Level,
    },
    /// Present / absent.
    Binary {
        /// The flag.
        #[serde(rename = "bool")]
        flag: bool,
    },
}

impl BenefitValue {
    /// Numeric reading, if this is a numeric value.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Numeric { value } => Some(*value),
            _ => None,
        }
    }

    /// Short variant name used in diagnostics.
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Numeric { .. } => "numeric",
            Self::Categorical { .. } => "categorical",
            Self::Binary { .. } => "binary",
        }
    }
}

impl Default for BenefitValue {
    fn default() -> Self {
        Self::Numeric { value: 0.0 }
    }
}

/// A quantified benefit of a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Benefit {
    /// What the benefit measures.
    #[serde(rename = "benefitType")]
    pub kind: BenefitKind,
    /// Controlled-vocabulary metric id, or "custom".
    #[serde(default)]
    pub metric_id: String,
    /// Human-readable metric label.
    #[serde(default)]
    pub metric_label: String,
    /// Interpretation direction. Absent only in documents that fail validation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    /// Absolute or delta. Absent only in documents that fail validation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_meaning: Option<ValueMeaning>,
    /// Target value, required when direction is target-is-better.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<f64>,
    /// Aggregation basis; per-unit when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation_basis: Option<AggregationBasis>,
    /// Unit string, e.g. "minutes", "%".
    #[serde(default)]
    pub benefit_unit: String,
    /// Value before automation.
    pub baseline: BenefitValue,
    /// Value expected after automation.
    pub expected: BenefitValue,
    /// Human oversight per unit of work, for per-unit benefits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oversight_minutes_per_unit: Option<f64>,
    /// Human oversight per month, for per-month benefits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oversight_minutes_per_month: Option<f64>,
    /// User confidence in the estimate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_user: Option<Level>,
    /// Developer confidence in the estimate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_dev: Option<Level>,
    /// Free-text assumptions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assumptions: Option<String>,
}

impl Benefit {
    /// Create a benefit with the two classifiers set and numeric values.
    pub fn numeric(
        kind: BenefitKind,
        metric_id: impl Into<String>,
        direction: Direction,
        baseline: f64,
        expected: f64,
    ) -> Self {
        Self {
            kind,
            metric_id: metric_id.into(),
            metric_label: String::new(),
            direction: Some(direction),
            value_meaning: Some(ValueMeaning::Absolute),
            target: None,
            aggregation_basis: None,
            benefit_unit: String::new(),
            baseline: BenefitValue::Numeric { value: baseline },
            expected: BenefitValue::Numeric { value: expected },
            oversight_minutes_per_unit: None,
            oversight_minutes_per_month: None,
            confidence_user: None,
            confidence_dev: None,
            assumptions: None,
        }
    }

    /// Set the unit string.
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.benefit_unit = unit.into();
        self
    }

    /// Set the target value.
    pub fn with_target(mut self, target: f64) -> Self {
        self.target = Some(target);
        self
    }

    /// Set the aggregation basis.
    pub fn with_basis(mut self, basis: AggregationBasis) -> Self {
        self.aggregation_basis = Some(basis);
        self
    }

    /// Effective aggregation basis (per-unit when unset).
    pub fn basis(&self) -> AggregationBasis {
        self.aggregation_basis.unwrap_or_default()
    }

    /// Time saved per unit of work, in the benefit's own unit.
    ///
    /// Only meaningful for numeric time benefits; never negative.
    pub fn time_saved_per_unit(&self) -> Option<f64> {
        if self.kind != BenefitKind::Time {
            return None;
        }
        let baseline = self.baseline.as_number()?;
        let expected = self.expected.as_number()?;
        Some((baseline - expected).max(0.0))
    }
}
