// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments and resolve the run settings
//    (config file, environment, prompts for anything missing)
// 2. Load the wordlist and cut out the requested slice
// 3. Probe base_url + word for every word in the slice
// 4. Print the summary and write result.json
// 5. Exit with proper code (0 = done, 1 = interrupted, 2 = error)
//
// Ctrl-C once: stop taking new words, finish the pages in flight, still write
// the results. Ctrl-C twice: quit immediately with code 1.
//
// Rust concepts:
// - #[tokio::main]: turns async main into a normal main with a runtime
// - anyhow::Context: adds a human message on top of any error
// - Streams: the interrupts are a stream of () values
// =============================================================================

mod cli;       // src/cli.rs - command-line parsing
mod config;    // src/config/ - settings resolution and prompts
mod probe;     // src/probe/ - page rendering and the worker pool
mod report;    // src/report/ - console output and result file
mod telemetry; // src/telemetry.rs - logging setup
mod wordlist;  // src/wordlist/ - wordlist loading and slicing

use anyhow::{Context, Result};
use clap::Parser;
use futures::{Stream, StreamExt};
use std::time::Instant;
use tokio_util::sync::CancellationToken;

use cli::Cli;
use probe::{ProbeRunner, RunnerConfig};
use report::ConsoleObserver;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = every word was probed
//   Ok(1) = interrupted, partial results were written
//   Err   = configuration, wordlist or output error
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    telemetry::init(cli.verbose);

    let settings = config::resolve(&cli).context("invalid configuration")?;
    tracing::debug!(?settings, "settings resolved");

    let words = {
        let all_words = wordlist::load(&settings.wordlist)?;
        wordlist::slice(&all_words, settings.first_index, settings.number_of_words)
    };
    tracing::info!(
        words = words.len(),
        first_index = settings.first_index,
        base_url = %settings.base_url,
        "wordlist loaded"
    );

    report::print_banner(words.len(), settings.concurrency, settings.engine);
    let started = Instant::now();

    let renderer = probe::build_renderer(&settings)
        .await
        .context("could not start the rendering engine")?;

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if watch_interrupts(ctrl_c_stream(), cancel).await {
                tracing::warn!("second interrupt received, exiting without waiting");
                std::process::exit(1);
            }
        }
    });

    let runner = ProbeRunner::new(renderer, RunnerConfig::from(&settings));
    let observer = ConsoleObserver::new(settings.quiet);
    let run_report = runner.run(words, &observer, cancel).await;

    report::print_summary(&run_report);
    report::persist(&settings.output, &run_report.found)?;
    println!("Done in {}", report::format_duration(started.elapsed()));

    Ok(if run_report.interrupted { 1 } else { 0 })
}

// Every Ctrl-C press as one item; ends if the handler cannot be installed
fn ctrl_c_stream() -> impl Stream<Item = ()> {
    futures::stream::unfold((), |()| async {
        tokio::signal::ctrl_c().await.ok().map(|_| ((), ()))
    })
}

// The first interrupt cancels the run. Returns true on a second interrupt,
// meaning the caller should exit right away.
async fn watch_interrupts(interrupts: impl Stream<Item = ()>, cancel: CancellationToken) -> bool {
    futures::pin_mut!(interrupts);

    if interrupts.next().await.is_none() {
        return false;
    }
    tracing::warn!("interrupt received, finishing in-flight probes (Ctrl-C again to quit now)");
    cancel.cancel();

    interrupts.next().await.is_some()
}
