use super::super::domain::{Category, ClassifiedStatement};
use super::config::Grade;
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregate over one classified collection.
///
/// `category_counts` always carries all five categories. Records with an
/// unrecognized label are counted in `unrecognized` and in `total` only, so
/// `sum(category_counts) + unrecognized == total`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub category_counts: BTreeMap<Category, usize>,
    pub unrecognized: usize,
    pub total_points: u32,
    pub score: f64,
    pub grade: Grade,
    pub grade_label: String,
    pub grade_description: String,
}

impl Summary {
    pub fn count(&self, category: Category) -> usize {
        self.category_counts.get(&category).copied().unwrap_or(0)
    }

    /// Share of `total` in whole percent, rounded half up; 0 for an empty run.
    pub fn percentage(&self, category: Category) -> u32 {
        whole_percent(self.count(category), self.total)
    }

    /// Score formatted with one decimal place.
    pub fn score_display(&self) -> String {
        format!("{:.1}", self.score)
    }

    /// Confirms the summary describes exactly these records.
    pub fn verify_against(
        &self,
        statements: &[ClassifiedStatement],
    ) -> Result<(), InvariantViolation> {
        if self.total != statements.len() {
            return Err(InvariantViolation::TotalMismatch {
                summary: self.total,
                records: statements.len(),
            });
        }

        let counted: usize = self.category_counts.values().sum();
        if counted + self.unrecognized != self.total {
            return Err(InvariantViolation::Unbalanced {
                counted,
                unrecognized: self.unrecognized,
                total: self.total,
            });
        }

        for category in Category::ordered() {
            let actual = statements
                .iter()
                .filter(|statement| statement.category.known() == Some(category))
                .count();
            let reported = self.count(category);
            if reported != actual {
                return Err(InvariantViolation::CategoryMismatch {
                    category,
                    summary: reported,
                    records: actual,
                });
            }
        }

        Ok(())
    }
}

/// Summary and records disagree; rendering them would print wrong numbers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("summary total {summary} does not match {records} records")]
    TotalMismatch { summary: usize, records: usize },
    #[error("category counts ({counted}) plus unrecognized ({unrecognized}) do not sum to total {total}")]
    Unbalanced {
        counted: usize,
        unrecognized: usize,
        total: usize,
    },
    #[error("summary reports {summary} {category} records but {records} are present")]
    CategoryMismatch {
        category: Category,
        summary: usize,
        records: usize,
    },
}

fn whole_percent(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let (count, total) = (count as u64, total as u64);
    ((200 * count + total) / (2 * total)) as u32
}
