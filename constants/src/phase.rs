use serde::Serialize;

/// Number of narrative phases; also the terminal step value.
pub const PHASE_COUNT: u8 = 4;

/// Symbolic icon reference for a phase badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseIcon {
    Radio,
    Processor,
    Layers,
    Check,
}

impl PhaseIcon {
    /// ASCII glyph drawn inside stepper badges (the default UI font has no icon set).
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Radio => "(o)",
            Self::Processor => "[#]",
            Self::Layers => "=",
            Self::Check => "v",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseInfo {
    pub number: u8,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: PhaseIcon,
}

pub const PHASES: &[PhaseInfo] = &[
    PhaseInfo {
        number: 1,
        title: "Global Perception",
        description: "Resident demands auto-mapped onto the CIM base",
        icon: PhaseIcon::Radio,
    },
    PhaseInfo {
        number: 2,
        title: "Intelligent Modeling",
        description: "Semantic conversion into parametric BIM models",
        icon: PhaseIcon::Processor,
    },
    PhaseInfo {
        number: 3,
        title: "Conflict Simulation",
        description: "CIM+BIM spatial negotiation and pipeline conflict self-correction",
        icon: PhaseIcon::Layers,
    },
    PhaseInfo {
        number: 4,
        title: "Value Realization",
        description: "ROI accounting and digital asset ledger generation",
        icon: PhaseIcon::Check,
    },
];

/// Look up a phase by its 1-based number. Returns `None` for 0 and anything past the table.
pub fn phase(number: u8) -> Option<&'static PhaseInfo> {
    PHASES.iter().find(|p| p.number == number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_one_indexed_and_ordered() {
        assert_eq!(PHASES.len(), PHASE_COUNT as usize);
        for (i, p) in PHASES.iter().enumerate() {
            assert_eq!(p.number as usize, i + 1);
        }
    }

    #[test]
    fn lookup_rejects_idle_and_past_end() {
        assert!(phase(0).is_none());
        assert!(phase(5).is_none());
        assert_eq!(phase(3).map(|p| p.title), Some("Conflict Simulation"));
    }
}
