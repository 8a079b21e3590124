mod healthcheck;
mod preference;

use salvo::Router;

// Re-export route constants from core
pub use meridian_core::constants::{
    CURRENT_ROUTE_COMPONENT, CURRENT_ROUTE_PREFIX, SET_ROUTE_COMPONENT, SET_ROUTE_PREFIX,
    TZ_ROUTE_COMPONENT, TZ_ROUTE_PREFIX,
};

/// ## Summary
/// Constructs the main router: liveness probe plus the timezone
/// preference endpoints.
#[must_use]
pub fn routes() -> Router {
    Router::new()
        .push(healthcheck::routes())
        .push(preference::routes())
}
