//! Indoor air quality classification
//!
//! Maps the engine's IAQ index (0-500) to the coarse levels shown to the user.

/// Air quality level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IaqLevel {
    /// 0-50
    Excellent,
    /// 51-100
    Good,
    /// 101-150
    Fair,
    /// 151-200
    Poor,
    /// 201-250
    Bad,
    /// 251-350
    VeryBad,
    /// 351-500
    Terrible,
}

/// Inclusive IAQ index ranges, in ascending order
const IAQ_RANGES: &[(u16, u16, IaqLevel)] = &[
    (0, 50, IaqLevel::Excellent),
    (51, 100, IaqLevel::Good),
    (101, 150, IaqLevel::Fair),
    (151, 200, IaqLevel::Poor),
    (201, 250, IaqLevel::Bad),
    (251, 350, IaqLevel::VeryBad),
    (351, 500, IaqLevel::Terrible),
];

/// Label for readings that cannot be classified
pub const UNKNOWN_LABEL: &str = "unknown";

impl IaqLevel {
    /// Classify an IAQ reading
    ///
    /// Returns `None` while the engine has no confidence in the reading
    /// (accuracy 0) or when the index is outside 0-500. Fractions are
    /// truncated before classification.
    pub fn classify(iaq: f32, accuracy: u8) -> Option<Self> {
        if accuracy == 0 || !(0.0..=u16::MAX as f32).contains(&iaq) {
            return None;
        }

        let index = iaq as u16;
        IAQ_RANGES
            .iter()
            .find(|(low, high, _)| (*low..=*high).contains(&index))
            .map(|&(_, _, level)| level)
    }

    /// Human-readable label
    pub const fn label(self) -> &'static str {
        match self {
            IaqLevel::Excellent => "Excellent",
            IaqLevel::Good => "Good",
            IaqLevel::Fair => "Fair",
            IaqLevel::Poor => "Poor",
            IaqLevel::Bad => "Bad",
            IaqLevel::VeryBad => "Very bad",
            IaqLevel::Terrible => "Terrible",
        }
    }
}

/// Label for a reading, falling back to [`UNKNOWN_LABEL`]
pub fn iaq_label(iaq: f32, accuracy: u8) -> &'static str {
    IaqLevel::classify(iaq, accuracy).map_or(UNKNOWN_LABEL, IaqLevel::label)
}

/// Engine accuracy relative to its maximum, e.g. for an "ACC: 2/3" readout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AccuracyStatus {
    /// Current accuracy level
    pub current: u8,
    /// Highest level the engine reports
    pub max: u8,
}

impl AccuracyStatus {
    /// Create a new status
    pub const fn new(current: u8, max: u8) -> Self {
        Self { current, max }
    }

    /// Read the status from an engine
    pub fn of<E: crate::traits::FusionEngine>(engine: &E) -> Self {
        Self::new(engine.accuracy(), E::MAX_ACCURACY)
    }

    /// Check if the engine is fully calibrated
    pub const fn is_calibrated(&self) -> bool {
        self.current >= self.max
    }
}
