use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "sigmaq-preview",
    version,
    about = "Preview a SigmaQ survey in the terminal and score it locally"
)]
pub struct Cli {
    /// Survey file (.json, .yaml) or a directory containing survey.json [default: .]
    #[arg(default_value = ".")]
    pub survey: PathBuf,

    /// Score an answers file without starting the terminal UI
    #[arg(long, value_name = "path")]
    pub answers: Option<PathBuf>,

    /// Write the scored result to a local .json or .yaml file
    #[arg(long, value_name = "path")]
    pub export: Option<PathBuf>,

    /// Preview settings file [default: <config dir>/preview.yaml]
    #[arg(long, value_name = "path")]
    pub config: Option<PathBuf>,

    /// Refuse to preview a survey with validation problems
    #[arg(long)]
    pub strict: bool,

    /// Show correct answers and the score breakdown regardless of survey settings
    #[arg(long)]
    pub reveal: bool,

    /// Check the survey, print any problems and exit
    #[arg(long)]
    pub validate: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["sigmaq-preview"]);
        assert_eq!(cli.survey, PathBuf::from("."));
        assert!(cli.answers.is_none());
        assert!(!cli.strict && !cli.reveal && !cli.validate);
    }

    #[test]
    fn test_headless_flags() {
        let cli = Cli::parse_from([
            "sigmaq-preview",
            "quiz.json",
            "--answers",
            "answers.yaml",
            "--export",
            "out.json",
            "--reveal",
        ]);
        assert_eq!(cli.survey, PathBuf::from("quiz.json"));
        assert_eq!(cli.answers, Some(PathBuf::from("answers.yaml")));
        assert_eq!(cli.export, Some(PathBuf::from("out.json")));
        assert!(cli.reveal);
    }
}
