use std::sync::Arc;

use anyhow::Context;

use crate::metrics::Metrics;
use crate::models::LogEntry;
use crate::notify::{AlertPolicy, Notifier};
use crate::scorer::Scorer;
use crate::storage::{HealthRepository, KeyValueBackend};
use crate::types::RiskAssessment;

#[derive(Debug, Clone, PartialEq)]
pub struct CheckInOutcome {
    pub assessment: RiskAssessment,
    /// Om et risikovarsel ble sendt
    pub alerted: bool,
    /// Antall innslag i loggen etter lagring (maks 60)
    pub logs_kept: usize,
}

/// Dagens innsjekk: lagre → score → telle → varsle.
pub struct DailyCheckIn<B, N> {
    repo: HealthRepository<B>,
    scorer: Box<dyn Scorer>,
    notifier: N,
    policy: AlertPolicy,
    metrics: Option<Arc<Metrics>>,
}

impl<B: KeyValueBackend, N: Notifier> DailyCheckIn<B, N> {
    pub fn new(repo: HealthRepository<B>, scorer: Box<dyn Scorer>, notifier: N) -> Self {
        Self {
            repo,
            scorer,
            notifier,
            policy: AlertPolicy::default(),
            metrics: Metrics::global(),
        }
    }

    pub fn with_policy(mut self, policy: AlertPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn repository(&self) -> &HealthRepository<B> {
        &self.repo
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    pub fn scorer_name(&self) -> &str {
        self.scorer.name()
    }

    /// Innslaget lagres før scoring, så en feilet /score mister ingen data.
    /// Feilet scoring gir aldri varsel.
    pub fn submit(&mut self, log: LogEntry) -> anyhow::Result<CheckInOutcome> {
        let date = log.date;

        // 1️⃣ Lagre i dagsloggen
        let logs_kept = self
            .repo
            .add_log(log.clone())
            .with_context(|| format!("could not store log entry for {date}"))?;

        // 2️⃣ Score med valgt scorer
        let source = self.scorer.name().to_string();
        let assessment = match self.scorer.score(&log.entry) {
            Ok(a) => a,
            Err(e) => {
                if let Some(m) = &self.metrics {
                    m.record_score_error(&source);
                }
                return Err(anyhow::Error::new(e)
                    .context(format!("scoring {date} with '{source}' failed")));
            }
        };

        // 3️⃣ Telle
        if let Some(m) = &self.metrics {
            m.record_score(&source, assessment.risk_color);
        }

        // 4️⃣ Varsle ved terskel
        let alerted = self.policy.dispatch(&mut self.notifier, &assessment);

        log::info!(
            "check-in {}: {} ({}%) via {}{}",
            date,
            assessment.risk_color,
            assessment.confidence,
            source,
            if alerted { ", alert sent" } else { "" }
        );

        Ok(CheckInOutcome { assessment, alerted, logs_kept })
    }
}
