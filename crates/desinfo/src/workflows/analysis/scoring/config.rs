use super::super::domain::{Category, CategoryTable};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound for a single category weight; keeps the composite score
/// inside `[0.0, 5.0]`.
pub const MAX_CATEGORY_POINTS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    E,
}

impl Grade {
    pub const fn ordered() -> [Self; 5] {
        [Self::A, Self::B, Self::C, Self::D, Self::E]
    }

    pub const fn letter(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

/// Closed score interval `[min, max]` mapped to a grade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeBand {
    pub grade: Grade,
    pub min: f64,
    pub max: f64,
    pub label: String,
    pub description: String,
}

impl GradeBand {
    pub fn new(
        grade: Grade,
        min: f64,
        max: f64,
        label: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            grade,
            min,
            max,
            label: label.into(),
            description: description.into(),
        }
    }

    pub fn contains(&self, score: f64) -> bool {
        self.min <= score && score <= self.max
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringConfigError {
    #[error("grade scale must contain at least one band")]
    EmptyScale,
    #[error("grade band {grade} has min {min} above max {max}")]
    InvertedBand { grade: Grade, min: f64, max: f64 },
    #[error("grade bands {lower} and {upper} overlap or are out of order")]
    Overlap { lower: Grade, upper: Grade },
    #[error("weight {points} for {category} exceeds the maximum of 5")]
    WeightOutOfRange { category: Category, points: u32 },
}

/// Ordered set of grade bands. Lookup scans bands in order and falls back to
/// grade `E` (or the last band) when no interval contains the score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeScale {
    bands: Vec<GradeBand>,
    #[serde(skip)]
    fallback: usize,
}

impl GradeScale {
    pub fn new(bands: Vec<GradeBand>) -> Result<Self, ScoringConfigError> {
        if bands.is_empty() {
            return Err(ScoringConfigError::EmptyScale);
        }

        for band in &bands {
            if band.min > band.max {
                return Err(ScoringConfigError::InvertedBand {
                    grade: band.grade,
                    min: band.min,
                    max: band.max,
                });
            }
        }

        for pair in bands.windows(2) {
            if pair[1].min <= pair[0].max {
                return Err(ScoringConfigError::Overlap {
                    lower: pair[0].grade,
                    upper: pair[1].grade,
                });
            }
        }

        let fallback = bands
            .iter()
            .position(|band| band.grade == Grade::E)
            .unwrap_or(bands.len() - 1);

        Ok(Self { bands, fallback })
    }

    pub fn standard() -> Self {
        let bands = vec![
            GradeBand::new(
                Grade::A,
                0.0,
                0.4,
                "wahr",
                "Die Aussagen entsprechen nachprüfbaren Fakten und sind wahrheitsgetreu.",
            ),
            GradeBand::new(
                Grade::B,
                0.5,
                1.4,
                "geframed",
                "Die Aussagen enthalten wahre Kernaussagen, die durch normative Framings eingefärbt werden.",
            ),
            GradeBand::new(
                Grade::C,
                1.5,
                2.4,
                "verzerrend",
                "Die Aussagen enthalten formal richtige Kernaussagen, die durch Übertreibung, Verkürzung oder Kontextausblendung ein schiefes Bild erzeugen.",
            ),
            GradeBand::new(
                Grade::D,
                2.5,
                3.4,
                "demokratisch dysfunktional",
                "Die Aussagen enthalten substanzielle Falschbehauptungen und delegitimierende Elemente, die den demokratischen Diskurs belasten.",
            ),
            GradeBand::new(
                Grade::E,
                3.5,
                5.0,
                "demokratisch destruktiv",
                "Die Aussagen sind überwiegend falsch und delegitimierend, untergraben systematisch Vertrauen und demokratische Institutionen.",
            ),
        ];

        Self { bands, fallback: 4 }
    }

    pub fn bands(&self) -> &[GradeBand] {
        &self.bands
    }

    pub fn band_for(&self, score: f64) -> &GradeBand {
        self.bands
            .iter()
            .find(|band| band.contains(score))
            .unwrap_or(&self.bands[self.fallback])
    }
}

/// Category weights and grade bands shared by the aggregator and renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringConfig {
    weights: CategoryTable<u32>,
    grades: GradeScale,
}

impl ScoringConfig {
    pub fn new(
        weights: CategoryTable<u32>,
        grades: GradeScale,
    ) -> Result<Self, ScoringConfigError> {
        if let Some((category, points)) = weights
            .iter()
            .find(|(_, points)| **points > MAX_CATEGORY_POINTS)
        {
            return Err(ScoringConfigError::WeightOutOfRange {
                category,
                points: *points,
            });
        }

        Ok(Self { weights, grades })
    }

    pub fn standard() -> Self {
        Self {
            weights: standard_weights(),
            grades: GradeScale::standard(),
        }
    }

    pub fn weights(&self) -> &CategoryTable<u32> {
        &self.weights
    }

    pub fn grades(&self) -> &GradeScale {
        &self.grades
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::standard()
    }
}

pub fn standard_weights() -> CategoryTable<u32> {
    CategoryTable {
        falsch: 5,
        delegitimierung: 4,
        verzerrung: 3,
        frame: 1,
        wahr: 0,
    }
}
