use clap::Parser;
use std::path::PathBuf;

/// CLI argument parsing with environment variable support.
///
/// Environment variables follow the pattern `TOKBUDGET_*` and are overridden
/// by CLI flags. Example: `TOKBUDGET_MODEL=gpt-4` is overridden by
/// `--model gpt-4o`.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "tokbudget")]
#[command(about = "Estimate how many LLM tokens a codebase would consume")]
#[command(version)]
pub struct Args {
    /// Root directory to scan
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Model name, used to select the tokenizer encoding [default: gpt-4o]
    #[arg(short, long, env = "TOKBUDGET_MODEL")]
    pub model: Option<String>,

    /// Include dotfiles and dot-directories
    #[arg(long, env = "TOKBUDGET_INCLUDE_HIDDEN")]
    pub include_hidden: bool,

    /// Config file path
    #[arg(short, long, default_value = "tokbudget.toml", env = "TOKBUDGET_CONFIG")]
    pub config: PathBuf,

    /// Increase verbosity (-v, -vv)
    #[arg(short, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log warnings and errors; no progress spinner
    #[arg(short)]
    pub quiet: bool,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["tokbudget"]).unwrap();
        assert_eq!(args.path, PathBuf::from("."));
        assert!(!args.include_hidden);
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
        assert_eq!(args.config, PathBuf::from("tokbudget.toml"));
    }

    #[test]
    fn test_all_flags() {
        let args = Args::try_parse_from([
            "tokbudget",
            "src",
            "--model",
            "gpt-4",
            "--include-hidden",
            "-vv",
            "-q",
        ])
        .unwrap();
        assert_eq!(args.path, PathBuf::from("src"));
        assert_eq!(args.model.as_deref(), Some("gpt-4"));
        assert!(args.include_hidden);
        assert_eq!(args.verbose, 2);
        assert!(args.quiet);
    }
}
