// src/metrics/coupling.rs
//! Afferent/efferent coupling and the instability index.

use serde::Serialize;

/// Coupling counts for a single file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Coupling {
    /// Afferent coupling (fan-in): files that depend ON this file.
    afferent: usize,
    /// Efferent coupling (fan-out): modules this file depends ON.
    efferent: usize,
}

impl Coupling {
    #[must_use]
    pub fn new(afferent: usize, efferent: usize) -> Self {
        Self { afferent, efferent }
    }

    /// Instability Index: I = Cₑ / (Cₐ + Cₑ), 0 for an isolated file.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn instability(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.efferent as f64 / total as f64
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.afferent + self.efferent
    }

    #[must_use] pub fn afferent(&self) -> usize { self.afferent }
    #[must_use] pub fn efferent(&self) -> usize { self.efferent }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InstabilityBand {
    #[serde(rename = "Stable (Abstract)")]
    Stable,
    Balanced,
    Flexible,
    #[serde(rename = "Unstable (Concrete)")]
    Unstable,
}

impl InstabilityBand {
    #[must_use]
    pub fn of(instability: f64) -> Self {
        if instability <= 0.2 {
            Self::Stable
        } else if instability <= 0.5 {
            Self::Balanced
        } else if instability <= 0.8 {
            Self::Flexible
        } else {
            Self::Unstable
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Stable => "Stable (Abstract)",
            Self::Balanced => "Balanced",
            Self::Flexible => "Flexible",
            Self::Unstable => "Unstable (Concrete)",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Stable => "Many dependents, few dependencies; changes here ripple outward",
            Self::Balanced => "Moderate mix of dependents and dependencies",
            Self::Flexible => "Depends on more than it is depended on; easy to change",
            Self::Unstable => "Almost only outgoing dependencies; sensitive to upstream changes",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InstabilityMetric {
    pub value: f64,
    pub classification: InstabilityBand,
}

#[must_use]
pub fn calculate_instability(afferent: usize, efferent: usize) -> InstabilityMetric {
    let value = Coupling::new(afferent, efferent).instability();
    InstabilityMetric {
        value,
        classification: InstabilityBand::of(value),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CouplingQuality {
    Good,
    Moderate,
    High,
    VeryHigh,
}

impl CouplingQuality {
    #[must_use]
    pub fn of(total: usize) -> Self {
        match total {
            0..=5 => Self::Good,
            6..=15 => Self::Moderate,
            16..=25 => Self::High,
            _ => Self::VeryHigh,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CouplingMetric {
    pub afferent: usize,
    pub efferent: usize,
    pub total: usize,
    pub quality: CouplingQuality,
}

impl From<Coupling> for CouplingMetric {
    fn from(c: Coupling) -> Self {
        Self {
            afferent: c.afferent(),
            efferent: c.efferent(),
            total: c.total(),
            quality: CouplingQuality::of(c.total()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isolated_file_is_stable() {
        let m = calculate_instability(0, 0);
        assert_eq!(m.value, 0.0);
        assert_eq!(m.classification.label(), "Stable (Abstract)");
    }

    #[test]
    fn test_mostly_outgoing_is_unstable() {
        let m = calculate_instability(1, 9);
        assert!((m.value - 0.9).abs() < 1e-9);
        assert_eq!(m.classification.label(), "Unstable (Concrete)");
    }

    #[test]
    fn test_band_edges() {
        assert_eq!(InstabilityBand::of(0.2), InstabilityBand::Stable);
        assert_eq!(InstabilityBand::of(0.5), InstabilityBand::Balanced);
        assert_eq!(InstabilityBand::of(0.8), InstabilityBand::Flexible);
        assert_eq!(InstabilityBand::of(0.81), InstabilityBand::Unstable);
    }

    #[test]
    fn test_coupling_quality_tiers() {
        assert_eq!(CouplingQuality::of(5), CouplingQuality::Good);
        assert_eq!(CouplingQuality::of(6), CouplingQuality::Moderate);
        assert_eq!(CouplingQuality::of(25), CouplingQuality::High);
        assert_eq!(CouplingQuality::of(26), CouplingQuality::VeryHigh);

        let metric = CouplingMetric::from(Coupling::new(3, 4));
        assert_eq!(metric.total, 7);
        assert_eq!(metric.quality, CouplingQuality::Moderate);
    }
}
