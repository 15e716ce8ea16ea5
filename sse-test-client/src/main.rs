use anyhow::Result;
use clap::Parser;
use colored::*;
use std::time::{Duration, Instant};

mod output;
mod sse_client;

use output::{print_greeting, print_test_summary, TestResult};
use sse_client::{stream_url, Connection};

#[derive(Parser)]
#[command(name = "sse-test-client")]
#[command(about = "Greeting stream smoke-testing tool")]
struct Cli {
    /// Base URL of the backend (e.g., http://localhost:4000)
    #[arg(long, default_value = "http://localhost:4000")]
    base_url: String,

    /// Name to greet
    #[arg(long, default_value = "World")]
    name: String,

    /// Number of greetings to receive before disconnecting
    #[arg(long, default_value_t = 3)]
    count: usize,

    /// Milliseconds between greetings; the server default applies when omitted
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Seconds to wait for any single greeting
    #[arg(long, default_value_t = 5)]
    timeout_secs: u64,

    /// Enable verbose output
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    }

    let url = stream_url(&cli.base_url, &cli.name, cli.interval_ms);
    println!("{} Connecting to {}", "→".blue(), url);

    let start = Instant::now();
    let mut connection = Connection::establish(&url, cli.name.clone()).await?;
    let result = receive_greetings(&cli, &mut connection, start).await;

    let passed = result.passed;
    print_test_summary(&[result]);

    std::process::exit(if passed { 0 } else { 1 });
}

async fn receive_greetings(cli: &Cli, connection: &mut Connection, start: Instant) -> TestResult {
    let expected_prefix = format!("Hello {}@", cli.name);
    let timeout = Duration::from_secs(cli.timeout_secs);

    for index in 1..=cli.count {
        let failure = match connection.next_greeting(timeout).await {
            Ok(greeting) => {
                print_greeting(&connection.label, index, start, &greeting);
                if greeting.greeting.message.starts_with(&expected_prefix) {
                    continue;
                }
                format!(
                    "Greeting #{index} does not start with {expected_prefix:?}: {:?}",
                    greeting.greeting.message
                )
            }
            Err(e) => format!("Greeting #{index}: {e}"),
        };

        println!("{} {}", "✗".red(), failure);
        return TestResult {
            scenario: "greeting_stream".to_string(),
            passed: false,
            message: Some(failure),
            duration: start.elapsed(),
        };
    }

    println!("{} Received {} greetings", "✓".green(), cli.count);
    TestResult {
        scenario: "greeting_stream".to_string(),
        passed: true,
        message: None,
        duration: start.elapsed(),
    }
}
