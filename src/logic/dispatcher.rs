use super::arguments::ArgumentBuilder;
use super::registry::MethodRegistry;
use super::validation::validate_observations;
use crate::error::{Et0Error, Result};
use crate::formulas::{FormulaArgs, FormulaError, FormulaLibrary};
use crate::models::{
    ComparativeReport, MethodDescriptor, MethodFailure, MethodOutcome, MethodResult, ObservationSet,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_CONFIRM_THRESHOLD: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSettings {
    pub timeout: Duration,
    /// Requests larger than this ask the caller for confirmation first.
    pub confirm_threshold: usize,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            confirm_threshold: DEFAULT_CONFIRM_THRESHOLD,
        }
    }
}

pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Drops repeated ids, keeping the first occurrence and request order.
pub fn distinct_method_ids<S: AsRef<str>>(method_ids: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut distinct = Vec::with_capacity(method_ids.len());
    for id in method_ids.iter().map(AsRef::as_ref) {
        if seen.insert(id) {
            distinct.push(id.to_string());
        } else {
            tracing::debug!("Ignoring duplicate method request '{}'", id);
        }
    }
    distinct
}

/// Runs one formula on its own OS thread. The thread is never joined, so a
/// formula that outlives its timeout cannot hold up runtime shutdown; its
/// late result is dropped with the closed channel.
async fn invoke_detached(
    library: Arc<dyn FormulaLibrary>,
    symbol: &'static str,
    args: FormulaArgs,
) -> std::result::Result<std::result::Result<f64, FormulaError>, String> {
    let (result_tx, result_rx) = oneshot::channel();
    std::thread::Builder::new()
        .name(format!("formula-{}", symbol))
        .spawn(move || {
            let _ = result_tx.send(library.invoke(symbol, &args));
        })
        .map_err(|e| format!("could not start formula worker: {}", e))?;

    // A panicking formula drops the sender without replying.
    result_rx
        .await
        .map_err(|_| "formula aborted before returning a value".to_string())
}

enum Pending {
    Done(MethodOutcome),
    Running {
        descriptor: MethodDescriptor,
        handle: JoinHandle<MethodResult>,
    },
}

/// Runs a set of ET₀ methods against one day of observations.
pub struct FormulaDispatcher {
    library: Arc<dyn FormulaLibrary>,
    registry: MethodRegistry,
    settings: DispatchSettings,
}

impl FormulaDispatcher {
    /// Probes the library once; nothing can be dispatched without it.
    pub fn connect(
        library: Arc<dyn FormulaLibrary>,
        registry: MethodRegistry,
        settings: DispatchSettings,
    ) -> Result<Self> {
        library.probe().map_err(|e| {
            Et0Error::FormulaLibraryUnavailable(format!("{}: {}", library.name(), e))
        })?;
        tracing::info!(
            "Formula library '{}' ready ({} methods catalogued)",
            library.name(),
            registry.len()
        );

        Ok(Self {
            library,
            registry,
            settings,
        })
    }

    pub fn registry(&self) -> &MethodRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &DispatchSettings {
        &self.settings
    }

    pub fn requires_confirmation(&self, method_count: usize) -> bool {
        method_count > self.settings.confirm_threshold
    }

    /// Evaluates every requested method independently. Invalid observations
    /// reject the whole request; anything else only fails its own method.
    pub async fn evaluate<S: AsRef<str>>(
        &self,
        method_ids: &[S],
        observations: &ObservationSet,
    ) -> Result<ComparativeReport> {
        let validated = validate_observations(observations)?;

        let method_ids = distinct_method_ids(method_ids);
        let mut pending = Vec::with_capacity(method_ids.len());

        for id in method_ids.iter().map(String::as_str) {
            let descriptor = match self.registry.describe(id) {
                Ok(d) => *d,
                Err(e) => {
                    tracing::debug!("{}", e);
                    pending.push(Pending::Done(MethodOutcome::unknown(id)));
                    continue;
                }
            };

            let args = match ArgumentBuilder::build(&validated, &descriptor) {
                Ok(args) => args,
                Err(Et0Error::MissingObservation { field, .. }) => {
                    tracing::debug!("{} skipped: missing observation '{}'", id, field);
                    pending.push(Pending::Done(MethodOutcome::for_method(
                        &descriptor,
                        MethodResult::failure(MethodFailure::MissingObservation { field }),
                    )));
                    continue;
                }
                Err(e) => {
                    pending.push(Pending::Done(MethodOutcome::for_method(
                        &descriptor,
                        MethodResult::failure(MethodFailure::EvaluationFailed {
                            detail: e.to_string(),
                        }),
                    )));
                    continue;
                }
            };

            let library = Arc::clone(&self.library);
            let timeout = self.settings.timeout;
            let symbol = descriptor.formula_library_name;

            // Spawned immediately so each timeout runs from dispatch, not
            // from when its result is collected.
            let handle = tokio::spawn(async move {
                let call = invoke_detached(library, symbol, args);
                match tokio::time::timeout(timeout, call).await {
                    Ok(Ok(Ok(value))) if value.is_finite() => MethodResult::success(round3(value)),
                    Ok(Ok(Ok(_))) => MethodResult::failure(MethodFailure::EvaluationFailed {
                        detail: FormulaError::NonFinite.to_string(),
                    }),
                    Ok(Ok(Err(e))) => MethodResult::failure(MethodFailure::EvaluationFailed {
                        detail: e.to_string(),
                    }),
                    Ok(Err(detail)) => {
                        MethodResult::failure(MethodFailure::EvaluationFailed { detail })
                    }
                    Err(_) => MethodResult::failure(MethodFailure::TimedOut {
                        after_ms: timeout.as_millis() as u64,
                    }),
                }
            });

            pending.push(Pending::Running { descriptor, handle });
        }

        let mut outcomes = Vec::with_capacity(pending.len());
        for item in pending {
            let outcome = match item {
                Pending::Done(outcome) => outcome,
                Pending::Running { descriptor, handle } => {
                    let result = match handle.await {
                        Ok(result) => result,
                        Err(join_err) => MethodResult::failure(MethodFailure::EvaluationFailed {
                            detail: format!("dispatch task failed: {}", join_err),
                        }),
                    };
                    MethodOutcome::for_method(&descriptor, result)
                }
            };

            match &outcome.result {
                MethodResult::Success { value } => {
                    tracing::debug!("{} = {} mm/day", outcome.method_id, value)
                }
                MethodResult::Failure { reason } => {
                    tracing::warn!("{} failed: {}", outcome.method_id, reason)
                }
            }
            outcomes.push(outcome);
        }

        let report = ComparativeReport::new(validated.into_inner(), outcomes);
        tracing::info!(
            "Evaluated {} methods: {} succeeded, {} failed",
            report.len(),
            report.successes().count(),
            report.failures().count()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formulas::BuiltinLibrary;
    use crate::logic::aggregator::summarize;
    use crate::models::{ObservationField, Statistics};

    fn full_day() -> ObservationSet {
        ObservationSet {
            t_min: Some(12.3),
            t_max: Some(21.5),
            rh_min: Some(63.0),
            rh_max: Some(84.0),
            rs: Some(22.07),
            uz: Some(2.078),
            z: Some(100.0),
            lat: Some(50.8),
            date: chrono::NaiveDate::from_ymd_opt(2024, 7, 5),
        }
    }

    fn dispatcher_with(library: Arc<dyn FormulaLibrary>, timeout_ms: u64) -> FormulaDispatcher {
        let settings = DispatchSettings {
            timeout: Duration::from_millis(timeout_ms),
            ..DispatchSettings::default()
        };
        FormulaDispatcher::connect(library, MethodRegistry::new(), settings).unwrap()
    }

    fn builtin() -> FormulaDispatcher {
        dispatcher_with(Arc::new(BuiltinLibrary::new()), DEFAULT_TIMEOUT_MS)
    }

    struct UnavailableLibrary;

    impl FormulaLibrary for UnavailableLibrary {
        fn name(&self) -> &str {
            "missing"
        }

        fn probe(&self) -> std::result::Result<(), FormulaError> {
            Err(FormulaError::Unavailable("not installed".into()))
        }

        fn invoke(&self, _: &str, _: &FormulaArgs) -> std::result::Result<f64, FormulaError> {
            unreachable!("never probed successfully")
        }
    }

    /// Fails or stalls on selected symbols, delegates the rest.
    struct FlakyLibrary;

    impl FormulaLibrary for FlakyLibrary {
        fn name(&self) -> &str {
            "flaky"
        }

        fn probe(&self) -> std::result::Result<(), FormulaError> {
            Ok(())
        }

        fn invoke(&self, symbol: &str, args: &FormulaArgs) -> std::result::Result<f64, FormulaError> {
            match symbol {
                "penman" => Err(FormulaError::InvalidArgument {
                    name: "wind",
                    reason: "rejected".into(),
                }),
                "hamon" => {
                    std::thread::sleep(Duration::from_millis(500));
                    Ok(1.0)
                }
                "oudin" => Ok(f64::NAN),
                "abtew" => panic!("library crashed"),
                _ => BuiltinLibrary::new().invoke(symbol, args),
            }
        }
    }

    #[test]
    fn unavailable_library_refuses_to_connect() {
        let result = FormulaDispatcher::connect(
            Arc::new(UnavailableLibrary),
            MethodRegistry::new(),
            DispatchSettings::default(),
        );
        assert!(matches!(
            result,
            Err(Et0Error::FormulaLibraryUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn all_methods_succeed_on_a_full_day() {
        let dispatcher = builtin();
        let ids = dispatcher.registry().ids();
        let report = dispatcher.evaluate(&ids, &full_day()).await.unwrap();

        assert_eq!(report.len(), 20);
        assert_eq!(report.successes().count(), 20);
        for (_, value) in report.successes() {
            assert_eq!(value, round3(value));
        }
    }

    #[tokio::test]
    async fn missing_observation_only_fails_its_own_method() {
        let mut obs = full_day();
        obs.rs = None;
        let report = builtin()
            .evaluate(&["pm_fao56", "hargreaves", "romanenko"], &obs)
            .await
            .unwrap();

        assert_eq!(
            report.get("pm_fao56").unwrap().result,
            MethodResult::failure(MethodFailure::MissingObservation {
                field: ObservationField::Rs
            })
        );
        assert!(report.get("hargreaves").unwrap().result.is_success());
        assert!(report.get("romanenko").unwrap().result.is_success());
    }

    #[tokio::test]
    async fn invalid_observations_reject_the_whole_request() {
        let mut obs = full_day();
        obs.t_min = Some(30.0);
        let result = builtin().evaluate(&["hargreaves"], &obs).await;
        assert!(matches!(result, Err(Et0Error::InvalidObservation(_))));
    }

    #[tokio::test]
    async fn unknown_and_duplicate_ids_are_isolated() {
        let report = builtin()
            .evaluate(&["oudin", "thornthwaite", "oudin", "hamon"], &full_day())
            .await
            .unwrap();

        let ids: Vec<&str> = report.outcomes.iter().map(|o| o.method_id.as_str()).collect();
        assert_eq!(ids, vec!["oudin", "thornthwaite", "hamon"]);
        assert_eq!(
            report.get("thornthwaite").unwrap().result,
            MethodResult::failure(MethodFailure::UnknownMethod)
        );

        let summary = summarize(&report);
        assert_eq!(summary.succeeded + summary.failed, report.len());
    }

    #[tokio::test]
    async fn library_errors_timeouts_and_panics_stay_isolated() {
        let dispatcher = dispatcher_with(Arc::new(FlakyLibrary), 100);
        let ids = ["penman", "hamon", "oudin", "abtew", "hargreaves"];
        let report = dispatcher.evaluate(&ids, &full_day()).await.unwrap();

        assert!(matches!(
            report.get("penman").unwrap().result,
            MethodResult::Failure {
                reason: MethodFailure::EvaluationFailed { .. }
            }
        ));
        assert_eq!(
            report.get("hamon").unwrap().result,
            MethodResult::failure(MethodFailure::TimedOut { after_ms: 100 })
        );
        assert!(!report.get("oudin").unwrap().result.is_success());
        assert!(!report.get("abtew").unwrap().result.is_success());
        assert!(report.get("hargreaves").unwrap().result.is_success());

        let summary = summarize(&report);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 4);
        assert!(matches!(summary.statistics, Statistics::Available { .. }));
    }

    #[tokio::test]
    async fn report_preserves_request_order() {
        let ids = ["schendel", "pm_fao56", "linacre", "makkink"];
        let report = builtin().evaluate(&ids, &full_day()).await.unwrap();
        let got: Vec<&str> = report.outcomes.iter().map(|o| o.method_id.as_str()).collect();
        assert_eq!(got, ids.to_vec());
    }

    #[tokio::test]
    async fn identical_requests_give_identical_reports() {
        let dispatcher = builtin();
        let ids = dispatcher.registry().ids();
        let first = dispatcher.evaluate(&ids, &full_day()).await.unwrap();
        let second = dispatcher.evaluate(&ids, &full_day()).await.unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn confirmation_above_threshold() {
        let dispatcher = builtin();
        assert!(!dispatcher.requires_confirmation(15));
        assert!(dispatcher.requires_confirmation(16));
    }

    #[test]
    fn round3_keeps_three_decimals() {
        assert_eq!(round3(3.87949), 3.879);
        assert_eq!(round3(2.0005), 2.001);
        assert_eq!(round3(-1.23456), -1.235);
    }

    /// Never returns within any sensible timeout.
    struct StalledLibrary;

    impl FormulaLibrary for StalledLibrary {
        fn name(&self) -> &str {
            "stalled"
        }

        fn probe(&self) -> std::result::Result<(), FormulaError> {
            Ok(())
        }

        fn invoke(&self, _: &str, _: &FormulaArgs) -> std::result::Result<f64, FormulaError> {
            std::thread::sleep(Duration::from_secs(3));
            Ok(1.0)
        }
    }

    #[test]
    fn stalled_formula_does_not_hold_up_runtime_shutdown() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .unwrap();

        let report = runtime.block_on(async {
            dispatcher_with(Arc::new(StalledLibrary), 100)
                .evaluate(&["hargreaves"], &full_day())
                .await
                .unwrap()
        });
        assert_eq!(
            report.get("hargreaves").unwrap().result,
            MethodResult::failure(MethodFailure::TimedOut { after_ms: 100 })
        );

        let started = std::time::Instant::now();
        drop(runtime);
        assert!(
            started.elapsed() < Duration::from_secs(1),
            "runtime drop took {:?}",
            started.elapsed()
        );
    }

    #[tokio::test]
    async fn mean_humidity_methods_accept_a_single_bound() {
        let mut obs = full_day();
        obs.rh_min = None;
        obs.rh_max = Some(80.0);

        let report = builtin()
            .evaluate(&["turc", "romanenko", "schendel"], &obs)
            .await
            .unwrap();
        for outcome in &report.outcomes {
            assert!(
                outcome.result.is_success(),
                "{}: {:?}",
                outcome.method_id,
                outcome.result
            );
        }

        // Methods reading the afternoon minimum still need it.
        let haude = builtin().evaluate(&["haude"], &obs).await.unwrap();
        assert_eq!(
            haude.get("haude").unwrap().result,
            MethodResult::failure(MethodFailure::MissingObservation {
                field: ObservationField::RhMin
            })
        );
    }

    #[test]
    fn distinct_ids_keep_first_occurrence_order() {
        let ids = ["pm", "hamon", "pm", "oudin", "hamon"];
        assert_eq!(distinct_method_ids(&ids), vec!["pm", "hamon", "oudin"]);
    }

    #[test]
    fn repeated_ids_do_not_count_towards_confirmation() {
        let dispatcher = builtin();
        let ids = vec!["pm"; 20];
        assert!(dispatcher.requires_confirmation(ids.len()));
        assert!(!dispatcher.requires_confirmation(distinct_method_ids(&ids).len()));
    }
}
