//! Parallel parsing of independent captures.
//!
//! Rule tables are immutable statics and every scan owns its context, so
//! captures can be parsed on a rayon pool without coordination. Outcomes
//! come back in input order.

use rayon::prelude::*;
use showparse_core::Value;
use tracing::debug;

use crate::engine::ScanOptions;
use crate::error::Result;
use crate::parser::ShowParser;

/// One capture to parse.
pub struct BatchJob<'p> {
    /// Caller-chosen identifier echoed in the outcome, e.g. a device name.
    pub label: String,
    pub parser: &'p dyn ShowParser,
    pub output: String,
}

impl<'p> BatchJob<'p> {
    pub fn new(label: impl Into<String>, parser: &'p dyn ShowParser, output: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            parser,
            output: output.into(),
        }
    }
}

#[derive(Debug)]
pub struct BatchOutcome {
    pub label: String,
    pub result: Result<Value>,
}

/// Parses every job, using `threads` workers or an adaptive default.
///
/// `options` overrides each parser's own scan options, typically with the
/// `scan` section of [`ParsersConfig`](crate::config::ParsersConfig). A
/// failing job does not stop the others; its error is kept in its outcome.
///
/// # Errors
///
/// Only fails if the thread pool cannot be built.
pub fn parse_batch(
    jobs: &[BatchJob<'_>],
    threads: Option<usize>,
    options: Option<ScanOptions>,
) -> std::result::Result<Vec<BatchOutcome>, rayon::ThreadPoolBuildError> {
    let threads = threads
        .filter(|threads| *threads > 0)
        .unwrap_or_else(|| default_parallel_jobs(jobs.len()));
    debug!(jobs = jobs.len(), threads, "Starting parse batch");

    let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
    let outcomes: Vec<BatchOutcome> = pool.install(|| {
        jobs.par_iter()
            .map(|job| {
                let result = job.parser.parse_with(&job.output, options);
                debug!(
                    label = %job.label,
                    parser = job.parser.name(),
                    ok = result.is_ok(),
                    "Parsed capture"
                );
                BatchOutcome {
                    label: job.label.clone(),
                    result,
                }
            })
            .collect()
    });

    let failed = outcomes.iter().filter(|outcome| outcome.result.is_err()).count();
    debug!(jobs = outcomes.len(), failed, "Finished parse batch");
    Ok(outcomes)
}

fn default_parallel_jobs(job_count: usize) -> usize {
    let cpu_count = std::thread::available_parallelism()
        .map(|parallelism| parallelism.get())
        .unwrap_or(4);
    let adaptive_cap = if job_count >= 500 { 8 } else { 12 };
    cpu_count.min(adaptive_cap).max(1).min(job_count.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;
    use crate::iosxe::dot1x::{ShowDot1x, ShowDot1xAllDetail};

    #[test]
    fn test_outcomes_keep_input_order() {
        let jobs: Vec<BatchJob<'_>> = (0..32)
            .map(|version| {
                BatchJob::new(
                    format!("switch-{version}"),
                    &ShowDot1x,
                    format!("Dot1x Protocol Version {version}"),
                )
            })
            .collect();

        let outcomes = parse_batch(&jobs, Some(4), None).unwrap();
        assert_eq!(outcomes.len(), 32);
        for (version, outcome) in outcomes.iter().enumerate() {
            assert_eq!(outcome.label, format!("switch-{version}"));
            let value = outcome.result.as_ref().unwrap();
            assert_eq!(value.get_path(&["version"]), Some(&Value::from(version as i64)));
        }
    }

    #[test]
    fn test_failing_job_does_not_stop_batch() {
        let jobs = vec![
            BatchJob::new("broken", &ShowDot1xAllDetail, "Auth SM State = HELD"),
            BatchJob::new("fine", &ShowDot1xAllDetail, "Sysauthcontrol Enabled"),
        ];
        let outcomes = parse_batch(&jobs, None, None).unwrap();
        assert!(matches!(
            outcomes[0].result,
            Err(ParseError::UndefinedContext { .. })
        ));
        assert!(outcomes[1].result.is_ok());
    }

    #[test]
    fn test_scan_options_reach_every_job() {
        let jobs = vec![BatchJob::new("tabbed", &ShowDot1x, "Sysauthcontrol\tEnabled")];

        let outcomes = parse_batch(&jobs, Some(1), None).unwrap();
        let value = outcomes[0].result.as_ref().unwrap();
        assert_eq!(value.get_path(&["system_auth_control"]), Some(&Value::from(true)));

        // With tabs expanding to nothing the keyword and value run together.
        let outcomes = parse_batch(&jobs, Some(1), Some(ScanOptions { tab_width: 0 })).unwrap();
        assert_eq!(outcomes[0].result.as_ref().unwrap(), &Value::map());
    }

    #[test]
    fn test_empty_batch() {
        assert!(parse_batch(&[], None, None).unwrap().is_empty());
    }

    #[test]
    fn test_default_parallel_jobs_is_non_zero_and_bounded_by_workload() {
        assert_eq!(default_parallel_jobs(0), 1);
        assert_eq!(default_parallel_jobs(1), 1);
        assert!(default_parallel_jobs(2000) <= 8);
        assert!(default_parallel_jobs(100) <= 12);
    }
}
