use anyhow::Result;
use console::Term;
use tokbudget::utils::error::{TokbudgetError, format_error};
use tokbudget::{cli, run};

fn main() {
    // Determine verbose mode early for error formatting
    let verbose = std::env::args().any(|arg| arg.starts_with("-v"));

    if let Err(e) = run_main() {
        display_error(&e, verbose);
        std::process::exit(1);
    }
}

/// Display an error with contextual formatting.
///
/// Tries to downcast to `TokbudgetError` for rich formatting, falls back to
/// anyhow's error chain display for other errors.
fn display_error(error: &anyhow::Error, verbose: bool) {
    if let Some(tokbudget_error) = error.downcast_ref::<TokbudgetError>() {
        eprintln!("{}", format_error(tokbudget_error, verbose));
    } else {
        eprintln!("\n\u{26a0} Error: {error}");

        let causes: Vec<_> = error.chain().skip(1).collect();
        if !causes.is_empty() {
            eprintln!("\nCaused by:");
            for (i, cause) in causes.iter().enumerate() {
                let prefix = if i == causes.len().saturating_sub(1) {
                    "\u{2514}\u{2500}"
                } else {
                    "\u{251c}\u{2500}"
                };
                eprintln!("{prefix} {cause}");
            }
        }
    }
}

fn run_main() -> Result<()> {
    let args = cli::args::parse();

    // Logging comes up before config loading so config errors are visible
    tokbudget::init_logging(args.verbose, args.quiet);

    let config = cli::config::load(&args)?;
    let merged_config = cli::config::merge_config(&args, config);

    let mut stdout = Term::stdout();
    run(&merged_config, &mut stdout)?;
    Ok(())
}
