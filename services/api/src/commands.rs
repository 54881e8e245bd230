use crate::infra::resolve_results_path;
use clap::Args;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use sus_survey::error::AppError;
use sus_survey::survey::{
    interpret, AggregateStatistics, CsvResponseRepository, QuestionStatistics, SurveyService,
};

#[derive(Args, Debug, Default)]
pub(crate) struct StatsArgs {
    /// Results file to summarise (defaults to SUS_RESULTS_PATH)
    #[arg(long)]
    pub(crate) results: Option<PathBuf>,
    /// Print the full aggregate as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ExportArgs {
    /// Results file to export (defaults to SUS_RESULTS_PATH)
    #[arg(long)]
    pub(crate) results: Option<PathBuf>,
    /// Destination file; writes to stdout when omitted
    #[arg(long)]
    pub(crate) out: Option<PathBuf>,
}

pub(crate) fn run_stats(args: StatsArgs) -> Result<(), AppError> {
    let StatsArgs { results, json } = args;
    let path = resolve_results_path(results)?;
    let service = SurveyService::new(Arc::new(CsvResponseRepository::new(&path)));
    let statistics = service.statistics()?;

    if json {
        let payload = serde_json::to_string_pretty(&statistics).map_err(std::io::Error::from)?;
        println!("{payload}");
    } else {
        println!("SUS results: {}", path.display());
        print!("{}", render_statistics(&statistics));
    }
    Ok(())
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let ExportArgs { results, out } = args;
    let path = resolve_results_path(results)?;
    let service = SurveyService::new(Arc::new(CsvResponseRepository::new(&path)));
    let bytes = service.export_csv()?;

    match out {
        Some(destination) => {
            std::fs::write(&destination, &bytes)?;
            println!("Exported results to {}", destination.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

pub(crate) fn render_statistics(statistics: &AggregateStatistics) -> String {
    let mut output = format!("Submissions: {}\n", statistics.submission_count);

    if let Some(average) = average_score(statistics) {
        let interpretation = interpret(average);
        output.push_str(&format!(
            "Average score: {:.1} ({}, grade {})\n",
            average,
            interpretation.rating.label(),
            interpretation.grade.letter()
        ));
    }

    output.push_str("\nQuestion  n    mean  std   mode         1    2    3    4    5\n");
    for question in &statistics.questions {
        output.push_str(&question_line(question));
        output.push('\n');
    }

    if let (Some(first), Some(last)) = (
        statistics.score_trend.first(),
        statistics.score_trend.last(),
    ) {
        output.push_str(&format!(
            "\nTrend: {} ({:.1}) to {} ({:.1})\n",
            first.date, first.score, last.date, last.score
        ));
    }

    output
}

fn question_line(question: &QuestionStatistics) -> String {
    let figure = |value: Option<f64>| match value {
        Some(value) => format!("{value:.2}"),
        None => "-".to_string(),
    };
    let mode = match question.mode.value {
        Some(value) => format!("{value} ({:.1}%)", question.mode.percent),
        None => "-".to_string(),
    };
    let counts: Vec<String> = question
        .frequency
        .iter()
        .map(|count| format!("{count:>4}"))
        .collect();

    format!(
        "{:<9} {:<4} {:<5} {:<5} {:<10} {}",
        question.label,
        question.responses,
        figure(question.mean),
        figure(question.std_dev),
        mode,
        counts.join(" ")
    )
}

fn average_score(statistics: &AggregateStatistics) -> Option<f64> {
    if statistics.score_trend.is_empty() {
        return None;
    }
    let total: f64 = statistics.score_trend.iter().map(|point| point.score).sum();
    Some(total / statistics.score_trend.len() as f64)
}
