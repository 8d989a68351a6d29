//! Plain-text notice rendering.

use chrono::{DateTime, Utc};

use sigwatch_core::domain::Candle;
use sigwatch_core::{Session, TradePlan};

const RULE: &str = "══════════════════════════";

/// Everything an execution notice shows.
#[derive(Debug, Clone)]
pub struct ExecutionNotice<'a> {
    pub instrument: &'a str,
    pub session: Session,
    pub strategy: &'a str,
    pub plan: &'a TradePlan,
    pub reward_multiple: f64,
    pub timestamp: DateTime<Utc>,
}

pub fn render_execution_notice(notice: &ExecutionNotice<'_>) -> String {
    let plan = notice.plan;
    format!(
        "{RULE}\n\
         EXECUTION NOTICE\n\
         {RULE}\n\
         \n\
         Instrument   : {instrument}\n\
         Session      : {session}\n\
         Strategy     : {strategy}\n\
         \n\
         Direction    : {direction}\n\
         Entry Price  : {entry:.3}\n\
         Stop Loss    : {stop:.3}\n\
         Take Profit  : {tp:.3}\n\
         \n\
         Risk per Trade : {risk:.2}%\n\
         R-Multiple     : 1 : {r}\n\
         Position Mode  : {mode}\n\
         \n\
         Timestamp (UTC): {ts}\n\
         {RULE}",
        instrument = notice.instrument,
        session = notice.session,
        strategy = notice.strategy,
        direction = plan.direction,
        entry = plan.entry,
        stop = plan.stop_loss,
        tp = plan.take_profit,
        risk = plan.risk_pct,
        r = notice.reward_multiple,
        mode = plan.mode,
        ts = notice.timestamp.format("%Y-%m-%d %H:%M:%S"),
    )
}

/// Heartbeat notice with the last candle of a fetched series.
pub fn render_status_notice(instrument: &str, last: &Candle) -> String {
    format!(
        "{RULE}\n\
         BOT STATUS ALERT\n\
         {RULE}\n\
         \n\
         Instrument   : {instrument}\n\
         Last Candle  : {ts} (UTC)\n\
         Open         : {open:.3}\n\
         High         : {high:.3}\n\
         Low          : {low:.3}\n\
         Close        : {close:.3}\n\
         \n\
         Bot Status   : ACTIVE\n\
         {RULE}",
        ts = last.timestamp.format("%Y-%m-%d %H:%M:%S"),
        open = last.open,
        high = last.high,
        low = last.low,
        close = last.close,
    )
}
