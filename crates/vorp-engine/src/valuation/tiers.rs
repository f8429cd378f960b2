// Threshold tables that bucket a number into a labeled tier.
//
// Used for per-player VORP tiers and for ADP value tiers. Both tables are
// configuration (strategy.toml); the constructors below only supply the
// shipped defaults.

use serde::{Deserialize, Serialize};

use crate::error::VorpError;

/// One labeled cutoff. A value belongs to the tier when it reaches `min`
/// (or exceeds it, when `exclusive`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierCutoff {
    pub label: String,
    pub min: f64,
    #[serde(default)]
    pub exclusive: bool,
}

impl TierCutoff {
    pub fn new(label: impl Into<String>, min: f64) -> Self {
        TierCutoff {
            label: label.into(),
            min,
            exclusive: false,
        }
    }

    pub fn exclusive(label: impl Into<String>, min: f64) -> Self {
        TierCutoff {
            label: label.into(),
            min,
            exclusive: true,
        }
    }

    fn admits(&self, value: f64) -> bool {
        if self.exclusive {
            value > self.min
        } else {
            value >= self.min
        }
    }
}

/// Ordered cutoffs, highest first, plus the label for everything below them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierTable {
    pub tiers: Vec<TierCutoff>,
    pub floor_label: String,
}

impl TierTable {
    /// Default per-player VORP tiers.
    pub fn vorp_default() -> Self {
        TierTable {
            tiers: vec![
                TierCutoff::new("Elite VORP", 80.0),
                TierCutoff::new("High VORP", 60.0),
                TierCutoff::new("Good VORP", 40.0),
                TierCutoff::new("Average VORP", 20.0),
                TierCutoff::exclusive("Low VORP", 0.0),
            ],
            floor_label: "Replacement Level".into(),
        }
    }

    /// Default `vorp_adp_value` tiers.
    pub fn adp_default() -> Self {
        TierTable {
            tiers: vec![
                TierCutoff::new("Great Value", 25.0),
                TierCutoff::new("Good Value", 10.0),
                TierCutoff::new("Fair", -10.0),
                TierCutoff::new("Overvalued", -25.0),
            ],
            floor_label: "Avoid".into(),
        }
    }

    /// Label for `value`. NaN falls through to the floor label.
    pub fn classify(&self, value: f64) -> &str {
        self.tiers
            .iter()
            .find(|t| t.admits(value))
            .map(|t| t.label.as_str())
            .unwrap_or(&self.floor_label)
    }

    /// Label of the highest tier, if any tiers are configured.
    pub fn top_label(&self) -> Option<&str> {
        self.tiers.first().map(|t| t.label.as_str())
    }

    /// Cutoffs must be finite and strictly descending; labels non-empty.
    pub fn validate(&self, field: &str) -> Result<(), VorpError> {
        if self.floor_label.trim().is_empty() {
            return Err(VorpError::invalid(
                format!("{field}.floor_label"),
                "must not be empty",
            ));
        }
        for (i, tier) in self.tiers.iter().enumerate() {
            let tier_field = format!("{field}.tiers[{i}]");
            if tier.label.trim().is_empty() {
                return Err(VorpError::invalid(tier_field, "label must not be empty"));
            }
            if !tier.min.is_finite() {
                return Err(VorpError::invalid(tier_field, "min must be a finite number"));
            }
            if i > 0 && tier.min >= self.tiers[i - 1].min {
                return Err(VorpError::invalid(
                    tier_field,
                    format!(
                        "cutoffs must be strictly descending ({} follows {})",
                        tier.min,
                        self.tiers[i - 1].min
                    ),
                ));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
