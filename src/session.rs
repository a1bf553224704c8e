use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::config::FillConfig;
use crate::error::{Error, Result};
use crate::fields::{self, FillMode, FillStep};
use crate::generator::{self, Record};
use crate::page::{FillOutcome, Page};
use crate::reference::ReferenceData;

/// Outcome of one fill pass, in plan order.
#[derive(Debug, Clone, Default)]
pub struct FillReport {
    pub steps: Vec<(FillStep, FillOutcome)>,
}

impl FillReport {
    pub fn applied(&self) -> usize {
        self.steps.iter().filter(|(_, outcome)| outcome.is_applied()).count()
    }

    pub fn not_found(&self) -> usize {
        self.count(FillOutcome::NotFound)
    }

    pub fn failed(&self) -> usize {
        self.count(FillOutcome::Failed)
    }

    fn count(&self, wanted: FillOutcome) -> usize {
        self.steps.iter().filter(|(_, outcome)| *outcome == wanted).count()
    }
}

/// The reference data, the current record and the settings a user works
/// against between actions.
pub struct Session {
    reference: ReferenceData,
    config: FillConfig,
    rng: StdRng,
    record: Record,
}

impl Session {
    /// Start a session and generate its first record.
    pub fn new(reference: ReferenceData, config: FillConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut session = Self {
            reference,
            config,
            rng,
            record: Record::default(),
        };
        session.regenerate();
        session
    }

    /// The record the next fill pass will use.
    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Replace the current record with a fresh draw.
    pub fn regenerate(&mut self) -> &Record {
        let today = chrono::Local::now().date_naive();
        self.record = generator::generate(&self.reference, self.config.variant, today, &mut self.rng);
        &self.record
    }

    /// Fill every mapped label on `page` from the current record.
    ///
    /// Steps run one after another; each dropdown interaction finishes
    /// before the next step starts. A step whose script fails is recorded
    /// as [`FillOutcome::Failed`] and the pass continues; a restricted page
    /// or a lost browser connection ends it.
    pub async fn fill_all(&mut self, page: &Page) -> Result<FillReport> {
        page.ensure_scriptable().await?;

        let plan = fields::fill_plan(&self.record, self.config.variant, &mut self.rng);
        info!(steps = plan.len(), variant = ?self.config.variant, "filling fields");

        let mut report = FillReport::default();
        for step in plan {
            let result = match step.mode {
                FillMode::Resolve => page.fill_field(step.label, &step.value, &self.config).await,
                FillMode::Dropdown => page.fill_dropdown(step.label, &step.value, &self.config).await,
            };
            let outcome = soften(step.label, result)?;
            report.steps.push((step, outcome));
        }

        info!(
            applied = report.applied(),
            not_found = report.not_found(),
            failed = report.failed(),
            "all fields filled"
        );
        Ok(report)
    }
}

/// Downgrade a script failure on one step to [`FillOutcome::Failed`].
fn soften(label: &str, result: Result<FillOutcome>) -> Result<FillOutcome> {
    match result {
        Err(Error::JsError(message)) => {
            warn!(label, %message, "step failed, continuing");
            Ok(FillOutcome::Failed)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DataVariant;
    use crate::fields::FieldKey;

    fn seeded(seed: u64) -> Session {
        let config = FillConfig::builder().seed(seed).build();
        Session::new(ReferenceData::bundled().unwrap(), config)
    }

    #[test]
    fn new_session_has_a_record() {
        let session = seeded(1);
        assert_eq!(session.record().len(), FieldKey::ALL.len());
    }

    #[test]
    fn same_seed_same_record() {
        assert_eq!(seeded(8).record(), seeded(8).record());
    }

    #[test]
    fn regenerate_draws_again() {
        let mut session = seeded(2);
        let before = session.record().clone();
        let after = session.regenerate().clone();
        assert_ne!(before, after);
    }

    #[test]
    fn variant_flows_into_generation() {
        let config = FillConfig::builder()
            .variant(DataVariant::Hardcoded)
            .seed(4)
            .build();
        let session = Session::new(ReferenceData::bundled().unwrap(), config);
        let email = session.record().get(FieldKey::Email).unwrap();
        assert!(!email.contains("@example.com"), "{email}");
        assert!(email.ends_with(".com"));
    }

    #[test]
    fn report_counts() {
        let step = |label| FillStep {
            label,
            value: "x".into(),
            mode: FillMode::Resolve,
        };
        let report = FillReport {
            steps: vec![
                (step("First Name"), FillOutcome::Filled { tracked: true }),
                (step("State"), FillOutcome::OptionTimedOut),
                (step("Suffix"), FillOutcome::NotFound),
                (step("Gender"), FillOutcome::Selected),
            ],
        };
        assert_eq!(report.applied(), 2);
        assert_eq!(report.not_found(), 1);
        assert_eq!(report.failed(), 0);
    }

    #[test]
    fn script_errors_do_not_end_the_pass() {
        let outcome = soften("Email", Err(Error::JsError("InvalidStateError".into()))).unwrap();
        assert_eq!(outcome, FillOutcome::Failed);

        let outcome = soften("Email", Ok(FillOutcome::Selected)).unwrap();
        assert_eq!(outcome, FillOutcome::Selected);
    }

    #[test]
    fn restricted_and_transport_errors_stay_fatal() {
        let err = soften("Email", Err(Error::RestrictedPage("chrome://version".into()))).unwrap_err();
        assert!(matches!(err, Error::RestrictedPage(_)));

        let err = soften("Email", Err(Error::NavigationError("gone".into()))).unwrap_err();
        assert!(matches!(err, Error::NavigationError(_)));
    }

    #[test]
    fn empty_record_before_generation() {
        assert!(Record::default().is_empty());
        assert!(!seeded(3).record().is_empty());
    }
}
