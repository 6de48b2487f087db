// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! NotesExchange command-line client
//!
//! Drives the session library against a live API, keeping tokens in a JSON
//! session file between runs.

use anyhow::Context;
use clap::{Parser, Subcommand};
use notes_exchange_client::{
    models::LoginRequest,
    services::{LoggingNavigator, Navigation, TracingNotifier},
    time_utils::format_utc_rfc3339,
    validation::{AccountStep, RegisterForm, SecurityStep},
    AuthService, Config, FileStorage, SessionPhase,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "notes-exchange", version, about = "NotesExchange session client")]
struct Cli {
    /// Session file (overrides NOTES_EXCHANGE_SESSION_FILE)
    #[arg(long)]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "NOTES_EXCHANGE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Print the Google sign-in URL
    Google,
    /// Complete Google sign-in from the URL the browser was sent back to
    Callback { url: String },
    /// Show the logged-in user
    Whoami,
    /// Exchange the refresh token for a new access token
    Refresh,
    /// Forget the stored session
    Logout,
    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "NOTES_EXCHANGE_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        profile_picture: String,
    },
    /// Change the display name
    Rename { name: String },
    /// Pick up a Pro subscription after checkout
    ActivatePremium,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let cli = Cli::parse();
    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(path) = cli.session_file {
        config.session_file = path;
    }
    tracing::debug!(api = %config.api_base_url, "Starting NotesExchange client");

    let storage = FileStorage::open(&config.session_file).with_context(|| {
        format!(
            "Failed to open session file {}",
            config.session_file.display()
        )
    })?;
    let navigator = Arc::new(LoggingNavigator::default());
    let auth = AuthService::from_config(
        &config,
        Arc::new(storage),
        Arc::new(TracingNotifier),
        navigator.clone(),
    );

    match cli.command {
        Command::Login { email, password } => {
            let user = auth.login(LoginRequest::new(email, password)).await?;
            println!("Logged in as {} <{}>", user.name, user.email);
        }
        Command::Google => {
            auth.login_with_google();
            if let Some(Navigation::External(url)) = navigator.last() {
                println!("{}", url);
            }
        }
        Command::Callback { url } => {
            let phase = auth.bootstrap(&url).await;
            print_session(&auth, phase)?;
        }
        Command::Whoami => {
            let phase = auth.bootstrap("/").await;
            print_session(&auth, phase)?;
        }
        Command::Refresh => {
            auth.refresh().await?;
            print_session(&auth, auth.phase())?;
        }
        Command::Logout => {
            auth.logout();
            println!("Logged out");
        }
        Command::Register {
            name,
            email,
            password,
            profile_picture,
        } => {
            let form = RegisterForm {
                account: AccountStep { name, email },
                security: SecurityStep {
                    confirm_password: password.clone(),
                    password,
                    profile_picture,
                },
            };
            auth.register(&form).await?;
            println!("Registered; log in to continue");
        }
        Command::Rename { name } => {
            require_session(&auth).await?;
            let user = auth.update_name(&name).await?;
            println!("Name changed to {}", user.name);
        }
        Command::ActivatePremium => {
            require_session(&auth).await?;
            let user = auth.activate_premium().await?;
            match user.premium_expires_at {
                Some(expires_at) => {
                    println!("Pro active until {}", format_utc_rfc3339(expires_at))
                }
                None => println!("Pro active"),
            }
        }
    }

    Ok(())
}

/// Bootstrap from the stored session and fail unless someone is logged in.
async fn require_session(auth: &AuthService) -> anyhow::Result<()> {
    match auth.bootstrap("/").await {
        SessionPhase::Authenticated => Ok(()),
        _ => anyhow::bail!("Not logged in"),
    }
}

fn print_session(auth: &AuthService, phase: SessionPhase) -> anyhow::Result<()> {
    match auth.current_user() {
        Some(user) if phase == SessionPhase::Authenticated => {
            println!("{}", serde_json::to_string_pretty(&user)?);
            println!("Plan: {}", if auth.has_premium() { "Pro" } else { "Free" });
        }
        _ => println!("Not logged in"),
    }
    Ok(())
}

/// Initialize structured JSON logging on stderr.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("notes_exchange_client=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .init();
}
