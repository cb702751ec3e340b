use clap::Parser;
use std::io::Write;
use top_times::app::{self, presenter};
use top_times::utils::error::ErrorSeverity;
use top_times::utils::{logger, validation::Validate};
use top_times::{CliConfig, TopTimesEngine, TopTimesError, ViewState};

fn exit_code(error: &TopTimesError) -> i32 {
    match error.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn fail(error: TopTimesError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        error,
        error.category(),
        error.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", error.recovery_suggestion());
    eprintln!("❌ {}", error.user_friendly_message());
    eprintln!("💡 {}", error.recovery_suggestion());
    std::process::exit(exit_code(&error));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // Logs go to stderr; stdout carries only rendered output.
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = cli.validate() {
        fail(e);
    }
    let config = cli.resolve().unwrap_or_else(|e| fail(e));
    let format = config.output_format();

    let source = config.build_source().unwrap_or_else(|e| fail(e));
    let options = config.load_options().unwrap_or_else(|e| fail(e));
    let engine = TopTimesEngine::with_options(source, options);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if format == presenter::OutputFormat::Table {
        presenter::render(&ViewState::Loading, None, format, &mut std::io::stderr())?;
    }

    let snapshot = match engine.load().await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            let state = ViewState::from_load_error(&e);
            presenter::render(&state, None, format, &mut out)?;
            out.flush()?;
            fail(e);
        }
    };

    if cli.list {
        presenter::render_catalog(snapshot.catalog(), format, &mut out)?;
        return Ok(());
    }

    let course = cli.course().unwrap_or_else(|e| fail(e));
    let selection = snapshot.complete_selection(
        course,
        cli.event.as_deref(),
        cli.gender.as_deref(),
        cli.age_group.as_deref(),
    );

    let state = match &selection {
        Some(selection) => app::leaderboard(&snapshot, selection),
        None => {
            tracing::warn!("No usable default selection; pass --course, --event, --gender and --age-group");
            ViewState::NoResults
        }
    };

    presenter::render(&state, selection.as_ref(), format, &mut out)?;
    out.flush()?;
    if format != presenter::OutputFormat::Table {
        if let Some(message) = state.status_message() {
            eprintln!("{}", message);
        }
    }
    Ok(())
}
