// src/report/console.rs
// =============================================================================
// Everything the operator sees on stdout.
//
// - Banner with an ETA before the run (plus a note for the http engine)
// - One green line per word that worked (always shown)
// - One timing line per word (hidden in quiet mode)
// - A colored "Found N words!" summary at the end
//
// Failures are not printed here; they go through tracing as warnings.
// =============================================================================

use colored::Colorize;
use std::time::Duration;

use crate::config::Engine;
use crate::probe::{Observer, Outcome, ProbeRecord, RunReport};

// Rough per-word cost used for the ETA shown before a run
const ESTIMATED_PROBE_TIME: Duration = Duration::from_millis(100);

pub struct ConsoleObserver {
    quiet: bool,
}

impl ConsoleObserver {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Observer for ConsoleObserver {
    fn on_probe(&self, record: &ProbeRecord) {
        if let Outcome::Worked { .. } = record.outcome {
            println!("{}", format!(" {} worked! ", record.word.bold()).on_green());
        }
        if !self.quiet {
            println!(
                "{}: {} ({})",
                record.word.bold(),
                format_duration(record.elapsed),
                describe(&record.outcome)
            );
        }
        tracing::debug!(word = %record.word, url = %record.url, "probe finished");
    }
}

fn describe(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Worked { length } => format!("{} chars", length),
        Outcome::Empty => "empty".to_string(),
        Outcome::Failed(e) => e.to_string(),
    }
}

// Words are spread over the workers, so the ETA is one probe time per round
// of `concurrency` words. Saturates instead of overflowing on huge inputs.
pub fn estimate_eta(word_count: usize, concurrency: usize) -> Duration {
    let rounds = word_count.div_ceil(concurrency.max(1));
    let rounds = u32::try_from(rounds).unwrap_or(u32::MAX);
    ESTIMATED_PROBE_TIME
        .checked_mul(rounds)
        .unwrap_or(Duration::MAX)
}

pub fn print_banner(word_count: usize, concurrency: usize, engine: Engine) {
    let eta = estimate_eta(word_count, concurrency);
    println!(
        "Alright, starting probing! ETA: {}",
        format_duration(eta).bold()
    );
    if let Some(note) = engine_note(engine) {
        println!("{}", note.yellow());
    }
    println!("{}", "🚀🚀🚀🚀 PROBING WEBSITE... 👾👾👾👾".bold());
}

// The http engine never runs JavaScript, so client-rendered sites look empty
fn engine_note(engine: Engine) -> Option<&'static str> {
    match engine {
        Engine::Http => Some(
            "Note: the http engine does not run JavaScript; \
             pages built client-side will look empty (use --engine browser)",
        ),
        Engine::Browser => None,
    }
}

pub fn print_summary(report: &RunReport) {
    println!();

    if report.interrupted {
        println!(
            "{}",
            format!(
                " Interrupted after {} probes, {} words left ",
                report.probed, report.unprobed
            )
            .on_yellow()
        );
    }

    let line = summary_line(report.found.len());
    let styled = match report.found.len() {
        0 => line.bold().on_red(),
        1 => line.bold().on_bright_yellow(),
        _ => line.bold().on_bright_green(),
    };
    println!("{}", styled);
}

fn summary_line(found: usize) -> String {
    match found {
        0 => " Found 0 words! ".to_string(),
        1 => " Found 1 word! ".to_string(),
        n => format!(" Found {} words! ", n),
    }
}

// Short human-readable duration: "850ms", "12.40s", "3m 05s"
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1000 {
        format!("{}ms", millis)
    } else if millis < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {:02}s", secs / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_wording() {
        assert_eq!(summary_line(0).trim(), "Found 0 words!");
        assert_eq!(summary_line(1).trim(), "Found 1 word!");
        assert_eq!(summary_line(7).trim(), "Found 7 words!");
    }

    #[test]
    fn test_describe_outcome() {
        assert_eq!(describe(&Outcome::Worked { length: 42 }), "42 chars");
        assert_eq!(describe(&Outcome::Empty), "empty");
        assert_eq!(
            describe(&Outcome::Failed(crate::probe::ProbeError::Status(404))),
            "HTTP 404"
        );
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(850)), "850ms");
        assert_eq!(format_duration(Duration::from_millis(12_400)), "12.40s");
        assert_eq!(format_duration(Duration::from_secs(185)), "3m 05s");
    }

    #[test]
    fn test_eta_divides_words_over_workers() {
        assert_eq!(estimate_eta(0, 4), Duration::ZERO);
        assert_eq!(estimate_eta(10, 1), Duration::from_secs(1));
        assert_eq!(estimate_eta(10, 3), Duration::from_millis(400));
        // concurrency 0 is rejected by config, but must not divide by zero here
        assert_eq!(estimate_eta(5, 0), Duration::from_millis(500));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_eta_with_huge_concurrency_does_not_panic() {
        // 2^32 used to wrap to zero when cast to u32
        assert_eq!(estimate_eta(3, 4_294_967_296usize), Duration::from_millis(100));
        assert_eq!(estimate_eta(3, usize::MAX), Duration::from_millis(100));
    }

    #[test]
    fn test_eta_saturates_on_huge_wordlist() {
        let eta = estimate_eta(usize::MAX, 1);
        assert!(eta >= Duration::from_secs(u32::MAX as u64 / 10));
        // still printable
        assert!(format_duration(eta).ends_with('s'));
    }

    #[test]
    fn test_only_http_engine_gets_a_note() {
        assert!(engine_note(Engine::Http).is_some_and(|n| n.contains("JavaScript")));
        assert!(engine_note(Engine::Browser).is_none());
    }
}
