use super::super::domain::{Category, ClassifiedStatement};
use super::super::scoring::{Grade, GradeScale, Summary};
use super::config::ReportConfig;
use super::layout::{category_groups, summary_sentence};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ScoreBoxView {
    pub score: f64,
    pub score_display: String,
    pub grade: Grade,
    pub grade_label: String,
    pub grade_description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryMetricView {
    pub category: Category,
    pub label: &'static str,
    pub color: String,
    pub count: usize,
    pub percentage: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct GradeBandView {
    pub grade: Grade,
    pub min: f64,
    pub max: f64,
    pub label: String,
    pub description: String,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatementView {
    pub index: usize,
    pub marker: &'static str,
    pub text: String,
    pub points: u32,
    pub justification: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryGroupView {
    pub category: Category,
    pub label: &'static str,
    pub color: String,
    pub description: String,
    pub count: usize,
    pub items: Vec<StatementView>,
}

/// Everything an interactive client needs to draw the analysis screen.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisView {
    pub title: String,
    pub total: usize,
    pub summary_text: String,
    pub score: ScoreBoxView,
    pub metrics: Vec<CategoryMetricView>,
    pub unrecognized: usize,
    pub grade_scale: Vec<GradeBandView>,
    pub groups: Vec<CategoryGroupView>,
    pub records: Vec<ClassifiedStatement>,
}

impl AnalysisView {
    pub(super) fn build(
        summary: &Summary,
        statements: &[ClassifiedStatement],
        config: &ReportConfig,
        grades: &GradeScale,
    ) -> Self {
        let metrics = Category::ordered()
            .into_iter()
            .map(|category| CategoryMetricView {
                category,
                label: category.label(),
                color: config.color(category).css(),
                count: summary.count(category),
                percentage: summary.percentage(category),
            })
            .collect();

        let grade_scale = grades
            .bands()
            .iter()
            .map(|band| GradeBandView {
                grade: band.grade,
                min: band.min,
                max: band.max,
                label: band.label.clone(),
                description: band.description.clone(),
                active: band.grade == summary.grade,
            })
            .collect();

        let groups = category_groups(statements)
            .into_iter()
            .map(|(category, members)| CategoryGroupView {
                category,
                label: category.label(),
                color: config.color(category).css(),
                description: config.description(category).to_string(),
                count: members.len(),
                items: members
                    .into_iter()
                    .enumerate()
                    .map(|(index, statement)| StatementView {
                        index: index + 1,
                        marker: category.marker().symbol(),
                        text: statement.text.clone(),
                        points: statement.points,
                        justification: statement.justification.clone(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            title: config.title.clone(),
            total: summary.total,
            summary_text: summary_sentence(summary),
            score: ScoreBoxView {
                score: summary.score,
                score_display: summary.score_display(),
                grade: summary.grade,
                grade_label: summary.grade_label.clone(),
                grade_description: summary.grade_description.clone(),
            },
            metrics,
            unrecognized: summary.unrecognized,
            grade_scale,
            groups,
            records: statements.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::analysis::scoring::ScoreAggregator;

    fn view_of(records: &[ClassifiedStatement]) -> AnalysisView {
        let summary = ScoreAggregator::default().summarize(records);
        AnalysisView::build(
            &summary,
            records,
            &ReportConfig::standard(),
            &GradeScale::standard(),
        )
    }

    #[test]
    fn view_carries_the_summary_sentence() {
        let view = view_of(&[
            ClassifiedStatement::new("a", Category::Falsch, "", 5),
            ClassifiedStatement::new("b", Category::Falsch, "", 5),
            ClassifiedStatement::new("c", Category::Wahr, "", 0),
        ]);

        assert!(view.summary_text.contains("untersucht 3 Aussagen"));
        assert!(view.summary_text.contains(&view.score.grade_label));
    }

    #[test]
    fn metrics_cover_every_category_in_fixed_order() {
        let view = view_of(&[ClassifiedStatement::new("c", Category::Wahr, "", 0)]);

        let labels: Vec<&str> = view.metrics.iter().map(|metric| metric.label).collect();
        assert_eq!(
            labels,
            vec!["FALSCH", "DELEGITIMIERUNG", "VERZERRUNG", "FRAME", "WAHR"]
        );
        assert_eq!(view.metrics[0].percentage, 0);
        assert_eq!(view.metrics[4].percentage, 100);
    }

    #[test]
    fn empty_groups_are_skipped() {
        let view = view_of(&[
            ClassifiedStatement::new("wahr", Category::Wahr, "belegt", 0),
            ClassifiedStatement::new("frame", Category::Frame, "gerahmt", 1),
            ClassifiedStatement::new("noch wahr", Category::Wahr, "belegt", 0),
        ]);

        let groups: Vec<(Category, usize)> = view
            .groups
            .iter()
            .map(|group| (group.category, group.count))
            .collect();
        assert_eq!(groups, vec![(Category::Frame, 1), (Category::Wahr, 2)]);
        assert_eq!(view.groups[1].items[1].index, 2);
        assert_eq!(view.groups[1].items[1].text, "noch wahr");
    }
}
