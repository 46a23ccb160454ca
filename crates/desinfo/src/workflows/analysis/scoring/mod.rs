mod config;
mod summary;

pub use config::{
    standard_weights, Grade, GradeBand, GradeScale, ScoringConfig, ScoringConfigError,
    MAX_CATEGORY_POINTS,
};
pub use summary::{InvariantViolation, Summary};

use super::domain::{Category, CategoryLabel, ClassifiedStatement};
use std::collections::BTreeMap;
use tracing::warn;

/// Stateless aggregator applying a [`ScoringConfig`] to classified records.
#[derive(Debug, Clone)]
pub struct ScoreAggregator {
    config: ScoringConfig,
}

impl ScoreAggregator {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Configured weight for a label; unrecognized labels score 0.
    pub fn points_for(&self, label: &CategoryLabel) -> u32 {
        label
            .known()
            .map(|category| *self.config.weights().get(category))
            .unwrap_or(0)
    }

    /// Builds the [`Summary`] for `statements`.
    ///
    /// Points always come from the configured weights, never from the value
    /// the classifier attached to a record. The score is
    /// `total_points / total` rounded half up to one decimal, computed in
    /// integer tenths so band boundaries compare exactly.
    pub fn summarize(&self, statements: &[ClassifiedStatement]) -> Summary {
        let mut category_counts: BTreeMap<Category, usize> = Category::ordered()
            .into_iter()
            .map(|category| (category, 0))
            .collect();
        let mut unrecognized = 0;
        let mut total_points: u32 = 0;

        for statement in statements {
            match &statement.category {
                CategoryLabel::Known(category) => {
                    *category_counts.entry(*category).or_insert(0) += 1;
                }
                CategoryLabel::Unrecognized(label) => {
                    warn!(
                        category = %label,
                        "unrecognized category excluded from category breakdown"
                    );
                    unrecognized += 1;
                }
            }
            total_points += self.points_for(&statement.category);
        }

        let total = statements.len();
        let score = score_in_tenths(total_points, total) as f64 / 10.0;
        let band = self.config.grades().band_for(score);

        Summary {
            total,
            category_counts,
            unrecognized,
            total_points,
            score,
            grade: band.grade,
            grade_label: band.label.clone(),
            grade_description: band.description.clone(),
        }
    }
}

impl Default for ScoreAggregator {
    fn default() -> Self {
        Self::new(ScoringConfig::standard())
    }
}

fn score_in_tenths(total_points: u32, total: usize) -> u64 {
    if total == 0 {
        return 0;
    }
    let (points, total) = (u64::from(total_points), total as u64);
    (20 * points + total) / (2 * total)
}
