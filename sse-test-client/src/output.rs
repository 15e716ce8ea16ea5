use colored::*;
use std::time::{Duration, Instant};

use crate::sse_client::Greeting;

#[derive(Debug)]
pub struct TestResult {
    pub scenario: String,
    pub passed: bool,
    pub message: Option<String>,
    pub duration: Duration,
}

/// Prints one greeting with the time it arrived, measured from `connected_at`.
pub fn print_greeting(label: &str, index: usize, connected_at: Instant, greeting: &Greeting) {
    let since_connect = greeting.received_at.saturating_duration_since(connected_at);
    println!(
        "[{}] #{} after {:?}: {}",
        label.bright_blue().bold(),
        index,
        since_connect,
        greeting.greeting.message.yellow()
    );
}

pub fn print_test_summary(results: &[TestResult]) {
    println!("\n{}", "=== TEST SUMMARY ===".bright_white().bold());

    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = total - passed;

    for result in results {
        let status = if result.passed {
            "PASS".green().bold()
        } else {
            "FAIL".red().bold()
        };

        println!("[{}] {} ({:?})", status, result.scenario, result.duration);

        if let Some(msg) = &result.message {
            println!("      {}", msg.dimmed());
        }
    }

    println!(
        "\n{}: {} passed, {} failed",
        "Results".bold(),
        passed.to_string().green(),
        failed.to_string().red()
    );
}
