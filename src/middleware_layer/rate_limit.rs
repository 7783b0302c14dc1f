use axum::Router;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor,
};

use crate::state::AppState;

/// Seconds it takes to earn back one contact submission.
const CONTACT_REPLENISH_SECS: u64 = 12;
/// Submissions a single client may send back to back.
const CONTACT_BURST: u32 = 5;

/// Rate limits the public contact form per client IP.
///
/// The client IP comes from `X-Forwarded-For`/`X-Real-IP`/`Forwarded` when a
/// proxy sets them, else from the peer address.
///
/// # Arguments
///
/// * `routes` - The routes to limit.
///
/// # Returns
///
/// A `Result` containing the limited routes.
pub fn limit_contact(routes: Router<AppState>) -> anyhow::Result<Router<AppState>> {
    let config = GovernorConfigBuilder::default()
        .key_extractor(SmartIpKeyExtractor)
        .per_second(CONTACT_REPLENISH_SECS)
        .burst_size(CONTACT_BURST)
        .use_headers()
        .finish()
        .ok_or_else(|| anyhow::anyhow!("Invalid contact rate limit configuration"))?;

    tracing::debug!(
        "🛡️ Contact form limited to a burst of {} per client",
        CONTACT_BURST
    );

    Ok(routes.layer(GovernorLayer::new(Arc::new(config))))
}
