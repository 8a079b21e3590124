//! Depot plumbing for the shared active-timezone store.
//!
//! The store is created once at startup from validated configuration and
//! injected into every request's depot, in the same way the configuration
//! itself is; downstream handlers read the request's context token and the
//! store back out through the typed helpers here.

use std::sync::Arc;

use chrono_tz::Tz;
use salvo::async_trait;

use meridian_core::error::CoreError;
use meridian_core::tz::context::{ActiveZones, ContextId};

use crate::error::{AppError, AppResult};

pub mod depot_keys {
    pub const REQUEST_CONTEXT: &str = "__request_context";
}

/// Injects the shared [`ActiveZones`] store into the depot.
pub struct ActiveZonesHandler {
    pub zones: Arc<ActiveZones>,
}

#[async_trait]
impl salvo::Handler for ActiveZonesHandler {
    #[tracing::instrument(skip(self, _req, depot, _res, _ctrl))]
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        depot.inject(Arc::clone(&self.zones));
    }
}

/// ## Summary
/// Retrieves the shared active-timezone store from the depot.
///
/// ## Errors
/// Returns an error if the store is not found in the depot.
pub fn get_zones_from_depot(depot: &salvo::Depot) -> AppResult<Arc<ActiveZones>> {
    depot.obtain::<Arc<ActiveZones>>().cloned().map_err(|_err| {
        AppError::CoreError(CoreError::InvariantViolation(
            "Active-timezone store not found in depot",
        ))
    })
}

/// ## Summary
/// Returns this request's context token, placed in the depot by the
/// timezone middleware.
///
/// ## Errors
/// Returns an error when the middleware did not run for this route.
pub fn request_context(depot: &salvo::Depot) -> AppResult<ContextId> {
    depot
        .get::<ContextId>(depot_keys::REQUEST_CONTEXT)
        .copied()
        .map_err(|_err| {
            AppError::CoreError(CoreError::InvariantViolation(
                "Request context token not found in depot",
            ))
        })
}

/// ## Summary
/// The timezone in effect for this request: the activated entry, or the
/// site default when derivation found nothing.
///
/// ## Errors
/// Returns an error when the store or context token is missing from the
/// depot.
pub fn current_timezone(depot: &salvo::Depot) -> AppResult<Tz> {
    let zones = get_zones_from_depot(depot)?;
    let ctx = request_context(depot)?;
    Ok(zones.current(ctx))
}
