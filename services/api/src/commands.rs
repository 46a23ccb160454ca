use crate::infra::build_analysis_service;
use chrono::Local;
use clap::Args;
use desinfo::config::AppConfig;
use desinfo::error::AppError;
use desinfo::workflows::analysis::{
    export_csv, import_csv, import_json, report_file_name, Category, ClassifiedStatement, ModelId,
    ReportConfig, ReportFormat, ReportRenderer, ScoreAggregator, ScoringConfig, Summary,
};
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

#[derive(Args, Debug, Default)]
pub(crate) struct OutputArgs {
    /// Write a PDF report
    #[arg(long)]
    pub(crate) pdf: bool,
    /// Write a DOCX report
    #[arg(long)]
    pub(crate) docx: bool,
    /// Write an HTML report
    #[arg(long)]
    pub(crate) html: bool,
    /// Directory receiving the report files
    #[arg(long, default_value = ".")]
    pub(crate) out_dir: PathBuf,
}

impl OutputArgs {
    pub(crate) fn formats(&self) -> Vec<ReportFormat> {
        ReportFormat::ordered()
            .into_iter()
            .filter(|format| match format {
                ReportFormat::Pdf => self.pdf,
                ReportFormat::Docx => self.docx,
                ReportFormat::Html => self.html,
            })
            .collect()
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct ModelsArgs {
    /// Print the listing as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// Statements separated by `|` or newlines
    #[arg(long, conflicts_with = "input", required_unless_present = "input")]
    pub(crate) text: Option<String>,
    /// Read statements from a file (`-` for stdin)
    #[arg(long)]
    pub(crate) input: Option<PathBuf>,
    /// Model id to classify with (defaults to the first valid model)
    #[arg(long)]
    pub(crate) model: Option<String>,
    /// Export the classified records as CSV for later `render` runs
    #[arg(long)]
    pub(crate) records_out: Option<PathBuf>,
    #[command(flatten)]
    pub(crate) output: OutputArgs,
}

#[derive(Args, Debug)]
pub(crate) struct RenderArgs {
    /// Records exported by `analyze --records-out` (CSV) or the service (JSON)
    #[arg(long)]
    pub(crate) records: PathBuf,
    #[command(flatten)]
    pub(crate) output: OutputArgs,
}

pub(crate) async fn run_models(args: ModelsArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = build_analysis_service(&config.classifier)?;
    let models = service.available_models().await?;

    if args.json {
        match serde_json::to_string_pretty(&models) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("Model listing unavailable as JSON: {err}"),
        }
        return Ok(());
    }

    println!("Available models ({})", models.len());
    for model in &models {
        println!("  {:>6}  {}", model.id, model.display_label());
    }
    Ok(())
}

pub(crate) async fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let AnalyzeArgs {
        text,
        input,
        model,
        records_out,
        output,
    } = args;

    let text = match (text, input) {
        (Some(text), _) => text,
        (None, Some(path)) => read_input(&path)?,
        (None, None) => String::new(),
    };
    let model = model.map(ModelId::new);

    let config = AppConfig::load()?;
    let service = build_analysis_service(&config.classifier)?;
    let analysis = service.analyze(&text, model.as_ref()).await?;

    println!("DESINFO analysis with {}", analysis.model.display_label());
    for line in summary_lines(&analysis.summary) {
        println!("  {line}");
    }

    if let Some(path) = records_out {
        export_csv(File::create(&path)?, &analysis.statements)?;
        println!("Records written to {}", path.display());
    }

    for format in output.formats() {
        let report = service.render(&analysis, format)?;
        let path = write_report(&output.out_dir, &analysis.file_name(format), &report.bytes)?;
        println!("{} report written to {}", format, path.display());
    }

    Ok(())
}

/// Renders stored records; without format flags every format is written.
pub(crate) fn run_render(args: RenderArgs) -> Result<(), AppError> {
    let scoring = ScoringConfig::standard();
    let records = load_records(&args.records, &scoring)?;
    let renderer = ReportRenderer::new(ReportConfig::standard(), scoring.grades().clone());
    let summary = ScoreAggregator::new(scoring).summarize(&records);

    for line in summary_lines(&summary) {
        println!("  {line}");
    }

    let mut formats = args.output.formats();
    if formats.is_empty() {
        formats = ReportFormat::ordered().to_vec();
    }

    let generated_at = Local::now().naive_local();
    for format in formats {
        let report = renderer.render(format, &summary, &records)?;
        let path = write_report(
            &args.output.out_dir,
            &report_file_name(generated_at, format),
            &report.bytes,
        )?;
        println!("{} report written to {}", format, path.display());
    }

    Ok(())
}

pub(crate) fn summary_lines(summary: &Summary) -> Vec<String> {
    let mut lines = vec![format!("Aussagen gesamt: {}", summary.total)];
    for category in Category::ordered() {
        lines.push(format!(
            "{}: {} ({} %)",
            category,
            summary.count(category),
            summary.percentage(category)
        ));
    }
    if summary.unrecognized > 0 {
        lines.push(format!(
            "Nicht zuordenbare Aussagen: {}",
            summary.unrecognized
        ));
    }
    lines.push(format!(
        "Desinfo-Score: {} ({}: {})",
        summary.score_display(),
        summary.grade,
        summary.grade_label
    ));
    lines.push(summary.grade_description.clone());
    lines
}

fn read_input(path: &Path) -> Result<String, AppError> {
    if path.as_os_str() == "-" {
        return Ok(io::read_to_string(io::stdin())?);
    }
    Ok(fs::read_to_string(path)?)
}

pub(crate) fn load_records(
    path: &Path,
    scoring: &ScoringConfig,
) -> Result<Vec<ClassifiedStatement>, AppError> {
    let reader = BufReader::new(File::open(path)?);
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let records = if is_json {
        import_json(reader, scoring.weights())?
    } else {
        import_csv(reader, scoring.weights())?
    };
    Ok(records)
}

fn write_report(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf, AppError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    fs::write(&path, bytes)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("desinfo-{name}-{}", std::process::id()));
        fs::create_dir_all(&dir).expect("scratch dir");
        dir
    }

    #[test]
    fn summary_lines_cover_every_category() {
        let records = vec![
            ClassifiedStatement::new("a", Category::Falsch, "", 5),
            ClassifiedStatement::new("b", Category::Falsch, "", 5),
            ClassifiedStatement::new("c", Category::Wahr, "", 0),
        ];
        let summary = ScoreAggregator::default().summarize(&records);

        let lines = summary_lines(&summary);
        assert_eq!(lines[0], "Aussagen gesamt: 3");
        assert_eq!(lines[1], "FALSCH: 2 (67 %)");
        assert_eq!(lines[5], "WAHR: 1 (33 %)");
        assert!(lines[6].starts_with("Desinfo-Score: 3.3 (D: "));
    }

    #[test]
    fn render_writes_every_format_by_default() {
        let dir = scratch_dir("render");
        let records_path = dir.join("records.json");
        fs::write(
            &records_path,
            r#"[{"aussage": "Der Mond ist aus Käse.", "kategorie": "FALSCH", "begründung": "widerlegt"}]"#,
        )
        .expect("records written");

        let out_dir = dir.join("out");
        run_render(RenderArgs {
            records: records_path,
            output: OutputArgs {
                out_dir: out_dir.clone(),
                ..OutputArgs::default()
            },
        })
        .expect("render succeeds");

        let mut extensions: Vec<String> = fs::read_dir(&out_dir)
            .expect("output listed")
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                entry
                    .path()
                    .extension()
                    .map(|ext| ext.to_string_lossy().into_owned())
            })
            .collect();
        extensions.sort();
        assert_eq!(extensions, vec!["docx", "html", "pdf"]);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn csv_records_are_loaded_by_default() {
        let dir = scratch_dir("load");
        let path = dir.join("records.csv");
        fs::write(
            &path,
            "aussage,kategorie,begründung\nSteuern sinken,VERZERRUNG,verkürzt\n",
        )
        .expect("records written");

        let records = load_records(&path, &ScoringConfig::standard()).expect("csv loads");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].points, 3);

        fs::remove_dir_all(&dir).ok();
    }
}
