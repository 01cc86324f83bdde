//! Sequential batch driver.

use crate::config::BatchConfig;
use crate::job::{AssetJob, JobReport, JobState};
use crate::request::AssetRequestBuilder;
use crate::strategy::GenerationStrategy;
use crate::types::GenerationConfig;
use crate::writer::{write_first_image, WriteOutcome};
use std::time::Duration;

/// Runs jobs one at a time through builder, strategy and writer.
///
/// Every job is attempted exactly once, in order. A failing job is logged
/// and reported; it never stops the batch.
pub struct BatchDriver {
    strategy: Box<dyn GenerationStrategy>,
    builder: AssetRequestBuilder,
    generation: GenerationConfig,
    delay: Duration,
}

impl BatchDriver {
    /// Creates a driver using the style, generation settings and delay of
    /// `config`.
    pub fn new(strategy: Box<dyn GenerationStrategy>, config: &BatchConfig) -> Self {
        Self {
            strategy,
            builder: AssetRequestBuilder::new(config.style_instruction.clone()),
            generation: config.generation.clone(),
            delay: config.delay,
        }
    }

    /// Overrides the pause between jobs.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the strategy in use.
    pub fn strategy(&self) -> &dyn GenerationStrategy {
        self.strategy.as_ref()
    }

    /// Processes `jobs` in order, pausing between consecutive jobs.
    pub async fn run(&self, jobs: &[AssetJob]) -> Vec<JobReport> {
        tracing::info!(
            jobs = jobs.len(),
            strategy = %self.strategy.kind(),
            "starting asset generation"
        );

        let mut reports = Vec::with_capacity(jobs.len());
        for (i, job) in jobs.iter().enumerate() {
            if i > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            reports.push(self.run_job(job).await);
        }
        reports
    }

    /// Processes a single job. Never fails; the outcome is in the report.
    pub async fn run_job(&self, job: &AssetJob) -> JobReport {
        let output = job.output_path.display();
        let mut state = JobState::Pending;
        advance(&mut state, JobState::Building, job);

        tracing::info!(
            output = %output,
            references = job.reference_paths.len(),
            "generating asset"
        );
        let payload = self.builder.build(&job.prompt, &job.reference_paths).await;
        let references_sent = if self.strategy.sends_references() {
            payload.reference_count()
        } else {
            0
        };

        advance(&mut state, JobState::Requesting, job);
        let result = self.strategy.attempt_generate(&payload, &self.generation).await;

        let report = |state: JobState, bytes_written: Option<usize>, error: Option<String>| {
            JobReport {
                output_path: job.output_path.clone(),
                state,
                references_sent,
                bytes_written,
                error,
            }
        };

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(output = %output, remote = e.is_remote(), "generation failed: {e}");
                advance(&mut state, JobState::Failed, job);
                return report(state, None, Some(e.to_string()));
            }
        };

        match write_first_image(&response, &job.output_path).await {
            Ok(WriteOutcome::Written { bytes, .. }) => {
                tracing::info!(
                    output = %output,
                    bytes,
                    duration_ms = ?response.duration_ms,
                    "saved asset"
                );
                advance(&mut state, JobState::Succeeded, job);
                report(state, Some(bytes), None)
            }
            Ok(WriteOutcome::NoImage) => {
                tracing::warn!(
                    output = %output,
                    text = ?response.text(),
                    "no image data returned"
                );
                advance(&mut state, JobState::Failed, job);
                report(state, None, Some("no image data returned".into()))
            }
            Err(e) => {
                tracing::error!(output = %output, "could not write asset: {e}");
                advance(&mut state, JobState::Failed, job);
                report(state, None, Some(e.to_string()))
            }
        }
    }
}

fn advance(state: &mut JobState, next: JobState, job: &AssetJob) {
    debug_assert!(!state.is_terminal(), "job already finished");
    tracing::trace!(output = %job.output_path.display(), from = %state, to = %next, "job state");
    *state = next;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AssetGenError, Result};
    use crate::strategy::StrategyKind;
    use crate::types::{Candidate, GenerationResponse, InlineData, RequestPayload, ResponsePart};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replays canned results in order and records each payload it saw.
    struct ScriptedStrategy {
        results: Mutex<Vec<Result<GenerationResponse>>>,
        seen: Mutex<Vec<RequestPayload>>,
    }

    impl ScriptedStrategy {
        fn new(mut results: Vec<Result<GenerationResponse>>) -> Self {
            results.reverse();
            Self {
                results: Mutex::new(results),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl GenerationStrategy for ScriptedStrategy {
        async fn attempt_generate(
            &self,
            payload: &RequestPayload,
            _config: &GenerationConfig,
        ) -> Result<GenerationResponse> {
            self.seen.lock().unwrap().push(payload.clone());
            self.results
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Ok(GenerationResponse::default()))
        }

        fn kind(&self) -> StrategyKind {
            StrategyKind::Content
        }
    }

    fn image(bytes: &[u8]) -> Result<GenerationResponse> {
        Ok(GenerationResponse {
            candidates: vec![Candidate {
                parts: vec![ResponsePart {
                    inline_data: Some(InlineData {
                        mime_type: "image/png".into(),
                        data: bytes.to_vec(),
                    }),
                    text: None,
                }],
            }],
            ..Default::default()
        })
    }

    fn config() -> BatchConfig {
        BatchConfig {
            style_instruction: "S: ".into(),
            delay: Duration::ZERO,
            ..BatchConfig::preset(StrategyKind::Content)
        }
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let jobs = vec![
            AssetJob::new("one", dir.path().join("one.png")),
            AssetJob::new("two", dir.path().join("two.png")),
            AssetJob::new("three", dir.path().join("three.png")),
        ];
        let strategy = ScriptedStrategy::new(vec![
            Err(AssetGenError::Api {
                status: 500,
                message: "boom".into(),
            }),
            Ok(GenerationResponse::default()),
            image(b"THREE"),
        ]);
        let driver = BatchDriver::new(Box::new(strategy), &config());

        let reports = driver.run(&jobs).await;

        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].state, JobState::Failed);
        assert!(reports[0].error.as_deref().unwrap().contains("boom"));
        assert_eq!(reports[1].state, JobState::Failed);
        assert_eq!(reports[2].state, JobState::Succeeded);
        assert_eq!(reports[2].bytes_written, Some(5));

        assert!(!dir.path().join("one.png").exists());
        assert!(!dir.path().join("two.png").exists());
        assert_eq!(std::fs::read(dir.path().join("three.png")).unwrap(), b"THREE");
    }

    #[tokio::test]
    async fn test_payload_drops_missing_reference() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("ref1.png");
        std::fs::write(&present, b"REF").unwrap();
        let job = AssetJob::new("test", dir.path().join("out.png"))
            .with_references([present, dir.path().join("missing.png")]);

        let driver = BatchDriver::new(Box::new(ScriptedStrategy::new(vec![image(b"X")])), &config());
        let report = driver.run_job(&job).await;

        assert!(report.succeeded());
        assert_eq!(report.references_sent, 1);
    }

    #[tokio::test]
    async fn test_prompt_is_prefixed_with_style() {
        let dir = tempfile::tempdir().unwrap();
        let strategy = std::sync::Arc::new(ScriptedStrategy::new(vec![image(b"X")]));

        struct Shared(std::sync::Arc<ScriptedStrategy>);

        #[async_trait]
        impl GenerationStrategy for Shared {
            async fn attempt_generate(
                &self,
                payload: &RequestPayload,
                config: &GenerationConfig,
            ) -> Result<GenerationResponse> {
                self.0.attempt_generate(payload, config).await
            }

            fn kind(&self) -> StrategyKind {
                self.0.kind()
            }
        }

        let driver = BatchDriver::new(Box::new(Shared(strategy.clone())), &config());
        driver
            .run(&[AssetJob::new("hero", dir.path().join("hero.png"))])
            .await;

        let seen = strategy.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].prompt(), Some("S: hero"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_between_jobs_only() {
        let dir = tempfile::tempdir().unwrap();
        let jobs: Vec<_> = (0..3)
            .map(|i| AssetJob::new("p", dir.path().join(format!("{i}.png"))))
            .collect();
        let driver = BatchDriver::new(Box::new(ScriptedStrategy::new(vec![])), &config())
            .with_delay(Duration::from_secs(2));

        let start = tokio::time::Instant::now();
        let reports = driver.run(&jobs).await;

        assert_eq!(reports.len(), 3);
        assert!(reports.iter().all(|r| r.state == JobState::Failed));
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(4), "{elapsed:?}");
        assert!(elapsed < Duration::from_secs(6), "{elapsed:?}");
    }

    #[tokio::test]
    async fn test_rerun_overwrites_with_same_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let jobs = vec![AssetJob::new("p", dir.path().join("out.png"))];

        for _ in 0..2 {
            let driver =
                BatchDriver::new(Box::new(ScriptedStrategy::new(vec![image(b"SAME")])), &config());
            driver.run(&jobs).await;
        }

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(std::fs::read(dir.path().join("out.png")).unwrap(), b"SAME");
    }
}
