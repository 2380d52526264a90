use crate::state::AppState;
use time::OffsetDateTime;
use tracing::{info, warn};

/// Periodically drops sessions nobody has touched for a while.
///
/// Fetches still running for a dropped session are not cancelled; their
/// results land in state nobody can reach anymore.
pub async fn start_session_reaper(state: AppState) {
    let idle = match time::Duration::try_from(state.config.session_idle) {
        Ok(idle) => idle,
        Err(e) => {
            warn!("🧹 Session reaper disabled, idle timeout out of range: {}", e);
            return;
        }
    };

    if state.config.session_sweep.is_zero() {
        warn!("🧹 Session reaper disabled, sweep interval is zero");
        return;
    }

    let mut ticker = tokio::time::interval(state.config.session_sweep);
    info!(
        "🧹 Session reaper running every {:?}, idle limit {:?}",
        state.config.session_sweep, state.config.session_idle
    );

    loop {
        ticker.tick().await;
        let removed = state.sessions.sweep(idle, OffsetDateTime::now_utc()).await;
        if removed > 0 {
            info!(
                "🧹 Reaped {} idle sessions, {} still active",
                removed,
                state.sessions.len().await
            );
        }
    }
}
