//! Bookstore storefront - interactive session driver.
//!
//! Boots a storefront session against the configured site, then reads one
//! command per line from stdin and prints the result to stdout. Logs go to
//! stderr.
//!
//! # Commands
//!
//! - `click <href>` - click a link
//! - `back` / `forward` - move through the session history
//! - `book <id>` - open a book's detail page
//! - `add <id>` / `remove <id>` - change the cart
//! - `filter <category|all>` - filter the catalog grid
//! - `show [selector]` - print an element's content, or the whole document
//! - `cart` - print the cart as JSON
//! - `quit`

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;
use std::process::ExitCode;

use bookstore_storefront::Storefront;
use bookstore_storefront::config::{ConfigError, LogFormat, StorefrontConfig};
use bookstore_storefront::shell::{self, Command, Output};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Tracing is not set up yet when configuration fails.
#[allow(clippy::print_stderr)]
fn report_config_error(e: &ConfigError) {
    eprintln!("Failed to load configuration: {e}");
}

fn init_tracing(format: LogFormat) {
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bookstore_storefront=info".into());

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            report_config_error(&e);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(config.log_format);

    let mut storefront = match Storefront::boot(config).await {
        Ok(storefront) => storefront,
        Err(e) => {
            tracing::error!(error = %e, "Failed to boot storefront");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(location = %storefront.location(), "Storefront ready");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read command");
                return ExitCode::FAILURE;
            }
        };

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(shell::ParseCommandError::Empty) => continue,
            Err(e) => {
                tracing::warn!(error = %e, "Invalid command");
                continue;
            }
        };

        match shell::execute(&mut storefront, command).await {
            Ok(Output::Quit) => break,
            Ok(output) => {
                let mut stdout = std::io::stdout().lock();
                if let Err(e) = writeln!(stdout, "{output}") {
                    tracing::error!(error = %e, "Failed to write output");
                    return ExitCode::FAILURE;
                }
            }
            Err(e) => tracing::error!(error = %e, "Command failed"),
        }
    }

    tracing::info!("Session ended");
    ExitCode::SUCCESS
}
