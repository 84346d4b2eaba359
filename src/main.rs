//! Todo Pilot - Entry Point
//!
//! Interactive loop: read one line of natural language, ask the model for
//! a plan, run the validated directives against the `todo` CLI, and
//! render confirmation prompts for anything destructive. A one-shot mode
//! (`--prompt`) runs a single turn and exits.

use todo_pilot::core::config::AppConfig;
use todo_pilot::core::error::Result;
use todo_pilot::exec::DirectiveOutcome;
use todo_pilot::llm::{prompt, LlmClient};
use todo_pilot::session::{Session, TurnOutcome};
use todo_pilot::store::TodoCli;
use todo_pilot::weather::ForecastClient;

use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use tokio::runtime::Runtime;

/// Natural language assistant for the todo command-line task manager
#[derive(Parser, Debug)]
#[command(name = "todo-pilot")]
#[command(about = "Drive the todo CLI with natural language")]
struct Args {
    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run a single request and exit instead of starting the loop
    #[arg(long)]
    prompt: Option<String>,

    /// Print the model's raw response before processing it
    #[arg(long)]
    show_raw: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_pilot=info".into()),
        )
        .init();

    let args = Args::parse();
    let config = AppConfig::load(args.config.as_deref())?;
    let client = LlmClient::from_config(&config)?;
    let forecast = config
        .weather_api_key
        .clone()
        .map(ForecastClient::new);

    let rt = Runtime::new()?;
    let mut session = Session::new(TodoCli, config.todo_bin.clone());

    if let Some(request) = args.prompt {
        run_turn(&rt, &mut session, &client, &config, forecast.as_ref(), &request, args.show_raw);
        if session.awaiting_confirmation() {
            // One-shot mode cannot hold a pending queue; discard it.
            session.respond_to_confirmation(false);
            println!("Confirmation required; rerun interactively to approve destructive actions.");
        }
        return Ok(());
    }

    println!("todo-pilot — type a request, 'quit' to exit");
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        if input == "quit" || input == "q" {
            break;
        }

        if session.awaiting_confirmation() {
            match input {
                "y" | "yes" => {
                    let outcomes = session.respond_to_confirmation(true);
                    render_outcomes(&outcomes);
                    probe_forecasts(&rt, forecast.as_ref(), &config, &outcomes);
                }
                "n" | "no" => {
                    session.respond_to_confirmation(false);
                    println!("Discarded the pending actions.");
                }
                _ => println!("A confirmation is pending; answer y or n."),
            }
            continue;
        }

        run_turn(&rt, &mut session, &client, &config, forecast.as_ref(), input, args.show_raw);
    }

    Ok(())
}

fn run_turn(
    rt: &Runtime,
    session: &mut Session<TodoCli>,
    client: &LlmClient,
    config: &AppConfig,
    forecast: Option<&ForecastClient>,
    request: &str,
    show_raw: bool,
) {
    let listing = session.task_listing();
    let system = prompt::system_prompt();
    let user = prompt::user_prompt(request, &listing);

    let raw = match rt.block_on(client.complete(&system, &user)) {
        Ok(raw) => raw,
        Err(e) if LlmClient::is_timeout(&e) => {
            // Backend timeout is not a crash: the turn produced nothing.
            tracing::warn!(error = %e, "backend timed out");
            println!("The model did not answer in time; nothing was changed.");
            return;
        }
        Err(e) => {
            tracing::error!(error = %e, "backend request failed");
            println!("Could not reach the model; nothing was changed.");
            return;
        }
    };

    if show_raw {
        println!("--- raw response ---\n{}\n--------------------", raw);
    }

    match session.handle_response(&raw) {
        Ok(TurnOutcome::NoDirectives) => println!("Nothing to do."),
        Ok(TurnOutcome::Executed(outcomes)) => {
            render_outcomes(&outcomes);
            probe_forecasts(rt, forecast, config, &outcomes);
        }
        Ok(TurnOutcome::AwaitingConfirmation { message }) => {
            println!("{}", message);
            println!("Proceed? [y/n]");
        }
        Ok(TurnOutcome::ConfirmationPending) => {
            println!("A confirmation is pending; answer y or n first.");
        }
        Err(e) => {
            // ParseError: payload present but unusable; turn had no effect
            tracing::warn!(error = %e, "turn aborted");
            println!("The model's plan was unreadable; nothing was changed.");
        }
    }
}

fn render_outcomes(outcomes: &[DirectiveOutcome]) {
    if outcomes.is_empty() {
        println!("Nothing was executed.");
        return;
    }
    for outcome in outcomes {
        match (&outcome.command, &outcome.error) {
            (Some(command), None) => {
                println!("ran: {}", command);
                if let Some(output) = &outcome.output {
                    let trimmed = output.trim();
                    if !trimmed.is_empty() {
                        println!("{}", trimmed);
                    }
                }
            }
            (Some(command), Some(error)) => println!("failed: {} ({})", command, error),
            (None, _) => println!(
                "skipped {}: {}",
                outcome.operation,
                outcome.error.as_deref().unwrap_or("not rendered")
            ),
        }
    }
}

/// Flag possible scheduling conflicts for deadline-carrying directives
fn probe_forecasts(
    rt: &Runtime,
    forecast: Option<&ForecastClient>,
    config: &AppConfig,
    outcomes: &[DirectiveOutcome],
) {
    let (Some(client), Some(location)) = (forecast, config.home_location.as_deref()) else {
        return;
    };
    for outcome in outcomes.iter().filter(|o| o.succeeded()) {
        let Some(deadline) = outcome.deadline.as_deref() else {
            continue;
        };
        match rt.block_on(client.forecast(location, deadline)) {
            Ok(summary) => println!("{}", summary),
            // Forecast is best-effort; a miss just means no hint
            Err(e) => tracing::debug!(error = %e, deadline, "no forecast available"),
        }
    }
}
