use std::{process::ExitCode, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Confirm, InquireError, Password, PasswordDisplayMode, Text};
use weatherapp_core::{
    ActionHandle, Config, FetchOutcome, LocationResolver, WeatherObservation, WeatherSession,
    source_from_config,
};

use crate::sink::TerminalSink;

const INTERACTIVE_PROMPT: &str = "City (@here for your location, quit to exit):";
const LOCATION_HINT: &str = "Run `weatherapp location grant` to allow location lookups.";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherapp", version, about = "Current weather lookup")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and default city.
    Configure,

    /// Show current weather for a city.
    Show {
        /// City name; the configured default city if absent.
        city: Option<String>,
    },

    /// Show current weather for your approximate location.
    Here,

    /// Manage permission to read your approximate location.
    Location {
        #[command(subcommand)]
        action: LocationAction,
    },

    /// Load the default city, then look up cities as you type them.
    Interactive,
}

#[derive(Debug, Subcommand)]
pub enum LocationAction {
    /// Ask for permission to read your approximate location.
    Grant,
    /// Withdraw location permission.
    Revoke,
    /// Print whether location permission is granted.
    Status,
}

impl Cli {
    /// Runs the command. Lookups that end in a failure exit non-zero.
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        tracing::debug!(command = ?self.command, "running command");
        let mut config = Config::load()?;

        let code = match self.command {
            Command::Configure => {
                configure(&mut config)?;
                ExitCode::SUCCESS
            }
            Command::Show { city } => {
                let session = build_session(&config)?;
                let city = city.unwrap_or_else(|| config.default_city().to_string());
                exit_code(run_action(session.search(&city)).await?)
            }
            Command::Here => {
                if !ensure_location_permission(&mut config)? {
                    eprintln!("{LOCATION_HINT}");
                    return Ok(ExitCode::FAILURE);
                }
                let session = build_session(&config)?;
                exit_code(run_action(session.use_current_location()).await?)
            }
            Command::Location { action } => {
                manage_location(&mut config, action)?;
                ExitCode::SUCCESS
            }
            Command::Interactive => {
                interactive(&mut config).await?;
                ExitCode::SUCCESS
            }
        };

        Ok(code)
    }
}

fn build_session(config: &Config) -> anyhow::Result<WeatherSession> {
    let source = source_from_config(config)?;
    let resolver = LocationResolver::from_config(config)?;
    Ok(WeatherSession::new(source, resolver, Arc::new(TerminalSink)))
}

/// Wait for a launched action; `None` if nothing was launched or it was abandoned.
async fn run_action(
    action: Option<ActionHandle>,
) -> anyhow::Result<Option<FetchOutcome<WeatherObservation>>> {
    match action {
        Some(task) => Ok(task.await.context("Weather task failed")?),
        None => Ok(None),
    }
}

fn exit_code(outcome: Option<FetchOutcome<WeatherObservation>>) -> ExitCode {
    match outcome {
        Some(Ok(_)) => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}

fn configure(config: &mut Config) -> anyhow::Result<()> {
    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;

    let default_city = Text::new("Default city:")
        .with_default(config.default_city())
        .prompt()?;

    config.set_api_key(api_key.trim().to_string());
    config.default_city = Some(default_city.trim().to_string()).filter(|c| !c.is_empty());
    config.save()?;

    println!("Configuration saved to {}", Config::config_file_path()?.display());
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PermissionPrompt {
    AlreadyGranted,
    Granted,
    Denied,
}

/// Ask only when permission is missing and record the answer in `config`.
fn prompt_location_permission(
    config: &mut Config,
    ask: impl FnOnce() -> anyhow::Result<bool>,
) -> anyhow::Result<PermissionPrompt> {
    if config.location.permission_granted {
        return Ok(PermissionPrompt::AlreadyGranted);
    }

    let granted = ask()?;
    config.set_location_permission(granted);
    Ok(if granted { PermissionPrompt::Granted } else { PermissionPrompt::Denied })
}

/// Re-request location permission when it is missing. A fresh answer is saved.
fn ensure_location_permission(config: &mut Config) -> anyhow::Result<bool> {
    let answer = prompt_location_permission(config, || {
        eprintln!("Location permission is required");
        ask_location_permission()
    })?;

    if answer != PermissionPrompt::AlreadyGranted {
        config.save()?;
        report_permission(answer == PermissionPrompt::Granted);
    }
    Ok(answer != PermissionPrompt::Denied)
}

fn ask_location_permission() -> anyhow::Result<bool> {
    Ok(Confirm::new("Allow weatherapp to read your approximate location?")
        .with_default(false)
        .with_help_message("Your public IP address is sent to the location service.")
        .prompt()?)
}

fn report_permission(granted: bool) {
    if granted {
        println!("Location permission granted");
    } else {
        println!("Location permission denied. You can still search by city name.");
    }
}

fn manage_location(config: &mut Config, action: LocationAction) -> anyhow::Result<()> {
    match action {
        LocationAction::Grant => {
            let granted = ask_location_permission()?;
            config.set_location_permission(granted);
            config.save()?;
            report_permission(granted);
        }
        LocationAction::Revoke => {
            config.set_location_permission(false);
            config.save()?;
            println!("Location permission revoked");
        }
        LocationAction::Status => {
            let state = if config.location.permission_granted { "granted" } else { "not granted" };
            println!("Location permission {state}");
        }
    }
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Quit,
    Here,
    City(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    match line.trim() {
        "quit" | "exit" => Input::Quit,
        "@here" => Input::Here,
        city => Input::City(city),
    }
}

/// Each lookup is awaited before the next prompt so output never lands on a live prompt.
async fn interactive(config: &mut Config) -> anyhow::Result<()> {
    let mut session = build_session(config)?;
    run_action(session.search(config.default_city())).await?;

    loop {
        let line = tokio::task::spawn_blocking(|| Text::new(INTERACTIVE_PROMPT).prompt())
            .await
            .context("Prompt task failed")?;

        let line = match line {
            Ok(line) => line,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err.into()),
        };

        match parse_input(&line) {
            Input::Quit => break,
            Input::Here => {
                if !session.permission_granted() {
                    if !ensure_location_permission(config)? {
                        eprintln!("{LOCATION_HINT}");
                        continue;
                    }
                    session = build_session(config)?;
                }
                run_action(session.use_current_location()).await?;
            }
            Input::City(city) => {
                run_action(session.search(city)).await?;
            }
        }
    }

    session.close();
    session.finish().await;
    Ok(())
}
