//! The Score-Band Resolver: maps a numeric score to a curated
//! explanation string using a per-quiz set of tiled bands.

/// One band of the `[0, 1]` tiling: `[lo, hi)`, except the highest band in
/// a [`ScoreBandSet`], which is closed at both ends.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBand {
    pub lo: f64,
    pub hi: f64,
    pub explanation: String,
}

impl ScoreBand {
    pub fn new(lo: f64, hi: f64, explanation: impl Into<String>) -> Self {
        Self {
            lo,
            hi,
            explanation: explanation.into(),
        }
    }
}

/// A validated, score-ordered tiling of `[0, 1]`. Precondition is checked
/// once at construction, not on every [`resolve`](ScoreBandSet::resolve)
/// call.
#[derive(Debug, Clone)]
pub struct ScoreBandSet {
    bands: Vec<ScoreBand>,
}

impl ScoreBandSet {
    /// Validates and wraps `bands`. Bands must already be in ascending
    /// order; returns `None` if the tiling has gaps, overlaps, or does not
    /// span exactly `[0, 1]`.
    pub fn validate(bands: Vec<ScoreBand>) -> Option<Self> {
        if bands.is_empty() {
            return None;
        }
        if bands[0].lo != 0.0 {
            return None;
        }
        if bands.last().unwrap().hi != 1.0 {
            return None;
        }
        for band in &bands {
            if !(band.lo < band.hi) {
                return None;
            }
        }
        for pair in bands.windows(2) {
            if pair[0].hi != pair[1].lo {
                return None;
            }
        }
        Some(Self { bands })
    }

    /// Resolves `score` against the tiling. The highest band (last in the
    /// validated, ascending-order list) matches inclusively at both ends;
    /// every other band matches `[lo, hi)`.
    pub fn resolve(&self, score: f64) -> Option<&str> {
        let last_index = self.bands.len() - 1;
        for (i, band) in self.bands.iter().enumerate() {
            let matches = if i == last_index {
                band.lo <= score && score <= band.hi
            } else {
                band.lo <= score && score < band.hi
            };
            if matches {
                return Some(&band.explanation);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bands() -> Vec<ScoreBand> {
        vec![
            ScoreBand::new(0.0, 0.5, "Needs work"),
            ScoreBand::new(0.5, 0.8, "Solid"),
            ScoreBand::new(0.8, 1.0, "Excellent"),
        ]
    }

    #[test]
    fn resolves_each_band_correctly() {
        let set = ScoreBandSet::validate(sample_bands()).unwrap();
        assert_eq!(set.resolve(0.0), Some("Needs work"));
        assert_eq!(set.resolve(0.49), Some("Needs work"));
        assert_eq!(set.resolve(0.5), Some("Solid"));
        assert_eq!(set.resolve(0.72), Some("Solid"));
        assert_eq!(set.resolve(0.8), Some("Excellent"));
        assert_eq!(set.resolve(1.0), Some("Excellent"));
    }

    #[test]
    fn rejects_tiling_with_a_gap() {
        let bands = vec![
            ScoreBand::new(0.0, 0.4, "Low"),
            ScoreBand::new(0.5, 1.0, "High"),
        ];
        assert!(ScoreBandSet::validate(bands).is_none());
    }

    #[test]
    fn rejects_tiling_not_starting_at_zero() {
        let bands = vec![ScoreBand::new(0.1, 1.0, "All")];
        assert!(ScoreBandSet::validate(bands).is_none());
    }

    #[test]
    fn rejects_tiling_not_ending_at_one() {
        let bands = vec![ScoreBand::new(0.0, 0.9, "All")];
        assert!(ScoreBandSet::validate(bands).is_none());
    }

    #[test]
    fn rejects_empty_bands() {
        assert!(ScoreBandSet::validate(Vec::new()).is_none());
    }
}
