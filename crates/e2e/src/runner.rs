//! Main contract runner: session lifecycle and sequential case execution

use std::path::PathBuf;
use std::time::Instant;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::auth::resolve_token;
use crate::cases::IdeaCase;
use crate::config::HarnessConfig;
use crate::error::{HarnessError, HarnessResult};
use crate::fixture::FixtureState;
use crate::session::Session;

/// Result of running a single case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseResult {
    pub order: u32,
    pub name: String,
    pub success: bool,
    pub duration_ms: u64,
    pub error: Option<String>,
}

/// Result of running the suite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResult {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub duration_ms: u64,
    pub results: Vec<CaseResult>,
}

impl SuiteResult {
    pub fn success(&self) -> bool {
        self.failed == 0
    }

    pub fn case(&self, case: IdeaCase) -> Option<&CaseResult> {
        self.results.iter().find(|r| r.name == case.name())
    }
}

/// Owns the one session and the fixture state for a run
pub struct ContractRunner {
    config: HarnessConfig,

    /// Established by `setup`, released by `teardown`
    session: Option<Session>,

    /// Carried across cases for the whole run
    fixture: FixtureState,
}

impl ContractRunner {
    pub fn new(config: HarnessConfig) -> Self {
        Self {
            config,
            session: None,
            fixture: FixtureState::new(),
        }
    }

    /// One-time setup: resolve credentials, log in if needed, build the session
    pub async fn setup(&mut self) -> HarnessResult<()> {
        establish(&mut self.session, &self.config).await?;
        Ok(())
    }

    /// One-time teardown. Safe to call more than once.
    pub fn teardown(&mut self) {
        if let Some(session) = self.session.take() {
            session.close();
        }
    }

    pub fn is_established(&self) -> bool {
        self.session.is_some()
    }

    pub fn fixture(&self) -> &FixtureState {
        &self.fixture
    }

    /// Run every case in order
    pub async fn run_all(&mut self) -> HarnessResult<SuiteResult> {
        self.run_selected(&IdeaCase::ORDERED).await
    }

    /// Run a single case by name; the rest count as skipped
    pub async fn run_case(&mut self, name: &str) -> HarnessResult<SuiteResult> {
        let case = IdeaCase::from_name(name)
            .ok_or_else(|| HarnessError::CaseNotFound(name.to_string()))?;
        self.run_selected(&[case]).await
    }

    /// Run the selected cases, always in suite order.
    ///
    /// Setup errors abort before any case runs. Case failures are recorded
    /// and the run moves on to the next case.
    pub async fn run_selected(&mut self, selected: &[IdeaCase]) -> HarnessResult<SuiteResult> {
        let start = Instant::now();

        // Ensure the session exists
        let session = establish(&mut self.session, &self.config).await?;

        let mut results = Vec::new();
        let mut passed = 0;
        let mut failed = 0;
        let mut skipped = 0;

        info!("Running {} case(s)...", selected.len());

        for case in IdeaCase::ORDERED {
            if !selected.contains(&case) {
                debug!("Skipping {}", case);
                skipped += 1;
                continue;
            }

            let case_start = Instant::now();
            let outcome = case.execute(session, &mut self.fixture).await;
            let duration_ms = case_start.elapsed().as_millis() as u64;

            let error = match outcome {
                Ok(()) => {
                    passed += 1;
                    info!("✓ {}. {} ({} ms)", case.order(), case, duration_ms);
                    None
                }
                Err(e) => {
                    failed += 1;
                    error!("✗ {}. {} - {}", case.order(), case, e);
                    Some(e.to_string())
                }
            };

            results.push(CaseResult {
                order: case.order(),
                name: case.name().to_string(),
                success: error.is_none(),
                duration_ms,
                error,
            });
        }

        let duration_ms = start.elapsed().as_millis() as u64;

        info!("");
        info!("Contract Results: {} passed, {} failed, {} skipped ({} ms)",
            passed, failed, skipped, duration_ms);

        Ok(SuiteResult {
            total: IdeaCase::ORDERED.len(),
            passed,
            failed,
            skipped,
            duration_ms,
            results,
        })
    }

    /// Write suite results to JSON file
    pub fn write_results(&self, results: &SuiteResult) -> HarnessResult<PathBuf> {
        std::fs::create_dir_all(&self.config.output_dir)?;

        let path = self.config.output_dir.join("contract-results.json");
        let json = serde_json::to_string_pretty(results)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}

/// Build the session into `slot` unless one is already there.
///
/// Borrows only the session slot, never the fixture.
async fn establish<'a>(
    slot: &'a mut Option<Session>,
    config: &HarnessConfig,
) -> HarnessResult<&'a Session> {
    let session = match slot.take() {
        Some(session) => session,
        None => {
            config.validate()?;
            let credentials = config.credentials()?;
            let token = resolve_token(&config.base_url, &credentials).await?;
            Session::connect(&config.base_url, &token)?
        }
    };
    Ok(slot.insert(session))
}

impl Drop for ContractRunner {
    fn drop(&mut self) {
        self.teardown();
    }
}
