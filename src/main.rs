mod cli;

use std::path::Path;

use clap::Parser;

use sigmaq_preview::config::PreviewConfig;
use sigmaq_preview::error::{PreviewError, Result};
use sigmaq_preview::model::Survey;
use sigmaq_preview::report::{self, Visibility};
use sigmaq_preview::state::AppState;
use sigmaq_preview::{loader, scoring, telemetry, tui, ui};

use crate::cli::Cli;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = PreviewConfig::load(cli.config.as_deref())?;
    config.reveal_answers |= cli.reveal;
    let _guard = telemetry::init_tracing(&config)?;

    let survey_path = loader::resolve_survey_path(&cli.survey)?;

    // --validate reports problems instead of failing on the first load.
    let (survey, issues) = loader::load_survey(&survey_path, cli.strict && !cli.validate)?;
    if cli.validate {
        if issues.is_empty() {
            println!("{}: no problems found ({} questions)", survey.title, survey.questions.len());
            return Ok(());
        }
        return Err(PreviewError::InvalidSurvey(issues));
    }

    let fingerprint = report::compute_file_hash(&survey_path)?;

    if let Some(ref answers_path) = cli.answers {
        return run_headless(
            &survey,
            &survey_path,
            &fingerprint,
            answers_path,
            cli.export.as_deref(),
            &config,
        );
    }

    let mut state = AppState::new(survey, survey_path, fingerprint, config);
    state.export_path = cli.export;
    tui::run_tui(state)
}

fn run_headless(
    survey: &Survey,
    survey_path: &Path,
    fingerprint: &str,
    answers_path: &Path,
    export: Option<&Path>,
    config: &PreviewConfig,
) -> Result<()> {
    let started_at = chrono::Utc::now().to_rfc3339();
    let store = loader::load_answers(answers_path, survey)?;

    let Some(result) = scoring::compute_score(survey, &survey.questions, &store) else {
        let (heading, detail) = ui::empty::empty_message(survey.question_source);
        println!("{}\n{}", heading, detail);
        return Ok(());
    };

    let visibility = Visibility::from_settings(&survey.scoring(), config.reveal_answers);
    print!("{}", report::format_summary(survey, &store, &result, visibility));

    if let Some(path) = export {
        let submitted_at = chrono::Utc::now().to_rfc3339();
        let report = report::session_report(
            survey,
            survey_path,
            fingerprint,
            &store,
            result,
            &started_at,
            &submitted_at,
        );
        report::export_report(&report, path)?;
        eprintln!("Result exported to {}", path.display());
    }
    Ok(())
}
