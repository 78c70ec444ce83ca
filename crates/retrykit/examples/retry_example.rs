//! Example: Retrying an unreliable call with backoff
//!
//! This example demonstrates:
//! 1. Simple retry with exponential backoff
//! 2. Marking failures as terminal with `RetriableError`
//! 3. Jitter impact (run multiple times to see variance)
//!
//! Run with:
//! ```bash
//! cargo run -p retrykit --example retry_example
//! ```

use retrykit::prelude::*;
use std::error::Error;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

/// A simulated API that fails the first few times
struct UnreliableApi {
    attempts: Arc<AtomicU32>,
    fail_count: u32,
}

impl UnreliableApi {
    fn new(fail_count: u32) -> Self {
        Self {
            attempts: Arc::new(AtomicU32::new(0)),
            fail_count,
        }
    }

    async fn call(&self) -> Result<String, std::io::Error> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);

        if attempt < self.fail_count {
            println!(
                "  Attempt {}: FAILED (simulating transient error)",
                attempt + 1
            );
            Err(std::io::Error::other(format!(
                "Transient error on attempt {}",
                attempt + 1
            )))
        } else {
            println!("  Attempt {}: SUCCESS", attempt + 1);
            Ok("API response data".to_string())
        }
    }

    fn total_attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

/// Example 1: Simple retry with exponential backoff
async fn example_simple_retry() -> Result<(), Box<dyn Error>> {
    println!("\n=== Example 1: Simple Retry with Exponential Backoff ===\n");

    let config = BackoffConfig::builder()
        .max_retries(3)
        .base_delay(Duration::from_millis(100))
        .multiplier(2.0)
        .jitter(0.0) // No jitter for predictable output
        .build()?;

    let api = UnreliableApi::new(2); // Fail first 2 attempts

    println!("Calling unreliable API (will fail 2 times before succeeding)...");
    let start = Instant::now();

    let result = retry_with_backoff_async(config.backoff(), || api.call()).await?;

    println!("\nResult: {}", result);
    println!("Total attempts: {}", api.total_attempts());
    println!("Total time: {:?}", start.elapsed());
    println!("Expected delays: 100ms + 200ms = ~300ms");

    Ok(())
}

/// Example 2: Terminal failures stop the loop
fn example_terminal_failure() -> Result<(), Box<dyn Error>> {
    println!("\n=== Example 2: Terminal Failures (Auth Errors Not Retried) ===\n");

    let config = BackoffConfig::builder()
        .max_retries(0) // Unlimited: only a terminal error can end this loop
        .base_delay(Duration::from_millis(10))
        .build()?;

    let mut calls = 0;
    let start = Instant::now();
    let result = retry_with_backoff(config.backoff(), || {
        calls += 1;
        if calls < 3 {
            println!("  Attempt {}: network timeout (retriable)", calls);
            Err::<(), _>(RetriableError::transient("network timeout"))
        } else {
            println!("  Attempt {}: auth failed (terminal)", calls);
            Err(RetriableError::terminal(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "auth failed",
            )))
        }
    });

    let err = result.expect_err("auth failure is terminal");
    println!("\nGave up after {} attempts in {:?}", calls, start.elapsed());
    println!("Returned error: {} (retriable: {})", err, err.is_retriable());

    Ok(())
}

/// Example 3: Jitter demonstration
fn example_jitter_impact() -> Result<(), Box<dyn Error>> {
    println!("\n=== Example 3: Jitter Impact (10 Delays Each) ===\n");

    let no_jitter = BackoffConfig::builder()
        .base_delay(Duration::from_millis(100))
        .multiplier(1.0)
        .jitter(0.0)
        .build()?;
    let with_jitter = BackoffConfig::builder()
        .base_delay(Duration::from_millis(100))
        .multiplier(1.0)
        .jitter(0.3)
        .build()?;

    for (label, config) in [("Without jitter", no_jitter), ("With 30% jitter", with_jitter)] {
        let mut backoff = config.backoff();
        let delays: Vec<_> = (0..10).map(|_| backoff.next_delay()).collect();
        let avg = delays.iter().map(|d| d.as_millis() as f64).sum::<f64>() / delays.len() as f64;

        println!("{}:", label);
        for (i, delay) in delays.iter().enumerate() {
            println!("  Delay {}: {:?}", i + 1, delay);
        }
        println!("  Average: {:.1}ms\n", avg);
    }

    println!("Analysis:");
    println!("  No jitter: all delays are exactly 100ms");
    println!("  With jitter: delays vary within 70-130ms");

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    println!("==============================================");
    println!("   retrykit: Retry Strategy Examples");
    println!("==============================================");

    example_simple_retry().await?;
    example_terminal_failure()?;
    example_jitter_impact()?;

    println!("\n==============================================");
    println!("   All examples completed successfully!");
    println!("==============================================\n");

    Ok(())
}
