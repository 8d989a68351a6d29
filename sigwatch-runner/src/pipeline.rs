//! Run-once pipeline: wires session gating, signals, correlation, risk and notices.
//!
//! Per instrument, in configured order:
//! session gate → fetch → signal → correlation → risk → notify → dedup record.
//! Every step before notify can end the instrument with a skip; none of them
//! abort the run. Open positions are threaded through as a fold accumulator,
//! so the first instrument of a correlated pair wins.

use chrono::{DateTime, Utc};

use sigwatch_core::data::CandleSource;
use sigwatch_core::domain::{is_chronological, Direction, Instrument, Signal};
use sigwatch_core::signal::FilterVerdict;
use sigwatch_core::{
    CorrelationFilter, OpenPositions, RiskManager, Session, SignalEngine, TradePlan,
};

use crate::config::BotConfig;
use crate::notify::{render_execution_notice, render_status_notice, ExecutionNotice, Notifier};
use crate::state::{DedupScope, SessionDedupStore, StatsRecord};

/// Terminal state of one instrument in a run.
#[derive(Debug, Clone, PartialEq)]
pub enum InstrumentOutcome {
    /// Already alerted in this session.
    Skipped,
    /// Fetch failed, or the series was empty or malformed.
    NoData { reason: String },
    /// Series unusable, or no actionable signal after filtering.
    NoSignal { reason: String },
    /// A correlated partner already holds this direction.
    Blocked { direction: Direction, partner: String },
    /// Trade plan rendered and handed to the notifier.
    Notified { plan: TradePlan, delivered: bool },
}

impl InstrumentOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            InstrumentOutcome::Skipped => "skipped",
            InstrumentOutcome::NoData { .. } => "no_data",
            InstrumentOutcome::NoSignal { .. } => "no_signal",
            InstrumentOutcome::Blocked { .. } => "blocked",
            InstrumentOutcome::Notified { .. } => "notified",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentReport {
    pub key: String,
    pub outcome: InstrumentOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub session: Session,
    pub started_at: DateTime<Utc>,
    pub instruments: Vec<InstrumentReport>,
    /// Final open positions of the run.
    pub open_positions: OpenPositions,
}

impl RunReport {
    pub fn outcome(&self, key: &str) -> Option<&InstrumentOutcome> {
        self.instruments
            .iter()
            .find(|r| r.key == key)
            .map(|r| &r.outcome)
    }

    pub fn count(&self, label: &str) -> usize {
        self.instruments
            .iter()
            .filter(|r| r.outcome.label() == label)
            .count()
    }

    /// One-line summary for the end-of-run log.
    pub fn summary(&self) -> String {
        format!(
            "session {}: {} notified, {} blocked, {} no signal, {} no data, {} skipped",
            self.session,
            self.count("notified"),
            self.count("blocked"),
            self.count("no_signal"),
            self.count("no_data"),
            self.count("skipped"),
        )
    }
}

pub struct Pipeline<'a> {
    config: &'a BotConfig,
    source: &'a dyn CandleSource,
    notifier: &'a dyn Notifier,
    engine: SignalEngine,
    correlation: CorrelationFilter,
    risk: RiskManager,
}

impl<'a> Pipeline<'a> {
    /// `config` must already be validated.
    pub fn new(
        config: &'a BotConfig,
        source: &'a dyn CandleSource,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Self {
            config,
            source,
            notifier,
            engine: SignalEngine::new(config.signal.clone()),
            correlation: CorrelationFilter::from_instruments(&config.instruments),
            risk: RiskManager::new(config.risk.clone()),
        }
    }

    /// Evaluate every instrument once at time `now`.
    ///
    /// Dedup records are updated in memory; persisting them is the caller's job.
    pub fn run_once(
        &self,
        now: DateTime<Utc>,
        dedup: &mut SessionDedupStore,
        stats: &StatsRecord,
    ) -> RunReport {
        let session = Session::at(now);
        let scope = self.config.dedup_scope;
        tracing::info!(%session, ?scope, streak_loss = stats.streak_loss, "run started");

        let (open_positions, instruments) = self.config.instruments.iter().fold(
            (OpenPositions::new(), Vec::with_capacity(self.config.instruments.len())),
            |(mut open, mut reports), instrument| {
                let outcome =
                    self.process(instrument, session, now, scope, dedup, stats, &open);
                if let InstrumentOutcome::Notified { plan, .. } = &outcome {
                    open.insert(instrument.key.clone(), plan.direction);
                    if scope == DedupScope::PerInstrument {
                        dedup.record(scope.key_for(&instrument.key), session);
                    }
                }
                tracing::info!(instrument = %instrument.key, outcome = outcome.label(), "instrument done");
                reports.push(InstrumentReport {
                    key: instrument.key.clone(),
                    outcome,
                });
                (open, reports)
            },
        );

        // Global mode marks the session once the whole run has been through.
        if scope == DedupScope::Global {
            dedup.record(DedupScope::GLOBAL_KEY, session);
        }

        let report = RunReport {
            session,
            started_at: now,
            instruments,
            open_positions,
        };
        tracing::info!("{}", report.summary());
        report
    }

    #[allow(clippy::too_many_arguments)]
    fn process(
        &self,
        instrument: &Instrument,
        session: Session,
        now: DateTime<Utc>,
        scope: DedupScope,
        dedup: &SessionDedupStore,
        stats: &StatsRecord,
        open: &OpenPositions,
    ) -> InstrumentOutcome {
        let key = instrument.key.as_str();

        let dedup_key = scope.key_for(key);
        if dedup.already_alerted(dedup_key, session) {
            tracing::info!(instrument = key, dedup_key, %session, "already alerted this session");
            return InstrumentOutcome::Skipped;
        }

        let candles = match self.source.fetch(&instrument.ticker, &self.config.data) {
            Ok(candles) if candles.is_empty() => {
                tracing::warn!(instrument = key, ticker = %instrument.ticker, "empty candle series");
                return InstrumentOutcome::NoData {
                    reason: "empty series".into(),
                };
            }
            Ok(candles) => candles,
            Err(e) => {
                tracing::warn!(instrument = key, ticker = %instrument.ticker, error = %e, "fetch failed");
                return InstrumentOutcome::NoData {
                    reason: e.to_string(),
                };
            }
        };

        if !is_chronological(&candles) {
            tracing::warn!(instrument = key, ticker = %instrument.ticker, "candle timestamps out of order");
            return InstrumentOutcome::NoData {
                reason: "timestamps out of order".into(),
            };
        }
        if let Some(bad) = candles.iter().find(|c| !c.is_sane()) {
            tracing::warn!(instrument = key, ticker = %instrument.ticker, at = %bad.timestamp, "malformed candle");
            return InstrumentOutcome::NoData {
                reason: format!("malformed candle at {}", bad.timestamp),
            };
        }

        if self.config.notice.heartbeat {
            if let Some(last) = candles.last() {
                if let Err(e) = self.notifier.send(&render_status_notice(key, last)) {
                    tracing::error!(instrument = key, error = %e, "status notice not delivered");
                }
            }
        }

        let eval = match self.engine.evaluate(&candles, instrument.class) {
            Ok(eval) => eval,
            Err(e) => {
                tracing::warn!(instrument = key, error = %e, "series unusable");
                return InstrumentOutcome::NoSignal {
                    reason: e.to_string(),
                };
            }
        };
        tracing::debug!(
            instrument = key,
            fast = eval.fast_ewma,
            slow = eval.slow_ewma,
            base = %eval.base,
            filter = %eval.filter,
            verdict = ?eval.verdict,
            "signal evaluated"
        );

        let Some(direction) = eval.signal.direction() else {
            let reason = match (&eval.base, &eval.verdict) {
                (Signal::None, _) => "averages equal".to_string(),
                (_, FilterVerdict::BodyTooSmall { body_pct }) => {
                    format!("{} discarded: body {body_pct:.3}% too small", eval.base)
                }
                (_, FilterVerdict::WeakMomentum { ratio }) => {
                    format!("{} discarded: momentum {ratio:.1} too weak", eval.base)
                }
                (_, verdict) => format!("{} discarded: {verdict:?}", eval.base),
            };
            tracing::info!(instrument = key, %reason, "no signal");
            return InstrumentOutcome::NoSignal { reason };
        };

        if let Some(partner) = self.correlation.blocking_partner(key, direction, open) {
            tracing::info!(instrument = key, %direction, partner, "blocked by correlated position");
            return InstrumentOutcome::Blocked {
                direction,
                partner: partner.to_string(),
            };
        }

        let Some(entry) = candles.last().map(|c| c.close) else {
            return InstrumentOutcome::NoData {
                reason: "empty series".into(),
            };
        };
        let plan =
            self.risk
                .compute_trade_plan(entry, direction, instrument.risk_pct, stats.streak_loss);

        let text = render_execution_notice(&ExecutionNotice {
            instrument: key,
            session,
            strategy: &self.config.notice.strategy_label,
            plan: &plan,
            reward_multiple: self.config.risk.reward_multiple,
            timestamp: now,
        });

        let delivered = match self.notifier.send(&text) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(instrument = key, notifier = self.notifier.name(), error = %e, "execution notice not delivered");
                false
            }
        };

        InstrumentOutcome::Notified { plan, delivered }
    }
}
