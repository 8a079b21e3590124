//! Middleware deriving the active timezone for one request.
//!
//! ## Summary
//! Allocates a context token for the request, derives a timezone
//! preference from request state in priority order (session value, cookie,
//! `Accept-Language` guess), activates it in the shared store for the
//! duration of the request, and deactivates it when the rest of the chain
//! has finished; including on error responses, so a reused worker never
//! observes a previous request's entry.

use salvo::Depot;
use salvo::http::header;
use salvo::session::SessionDepotExt;
use tracing::{debug, error};

use meridian_core::config::Settings;
use meridian_core::tz::context::ContextId;
use meridian_core::tz::language::guess_from_accept_language;
use meridian_core::tz::resolve::resolve;
use meridian_form::field::timezone::TimeZoneSelect;

use crate::config::get_config_from_depot;
use crate::tz_handler::{depot_keys, get_zones_from_depot};

/// Middleware handler for timezone derivation.
/// Hoop this after the session and state handlers and before any route
/// that reads the active timezone.
pub struct TimezoneMiddleware;

#[salvo::async_trait]
impl salvo::Handler for TimezoneMiddleware {
    #[tracing::instrument(skip(self, req, depot, res, ctrl), fields(
        method = %req.method(),
        path = %req.uri().path()
    ))]
    async fn handle(
        &self,
        req: &mut salvo::Request,
        depot: &mut Depot,
        res: &mut salvo::Response,
        ctrl: &mut salvo::FlowCtrl,
    ) {
        let config = match get_config_from_depot(depot) {
            Ok(cfg) => cfg,
            Err(e) => {
                error!(error = ?e, "Failed to get config from depot");
                res.status_code(salvo::http::StatusCode::INTERNAL_SERVER_ERROR);
                ctrl.skip_rest();
                return;
            }
        };

        let zones = match get_zones_from_depot(depot) {
            Ok(z) => z,
            Err(e) => {
                error!(error = ?e, "Failed to get active-timezone store from depot");
                res.status_code(salvo::http::StatusCode::INTERNAL_SERVER_ERROR);
                ctrl.skip_rest();
                return;
            }
        };

        let ctx = ContextId::new();
        depot.insert(depot_keys::REQUEST_CONTEXT, ctx);

        if let Some(tz) = derive_timezone(req, depot, &config) {
            debug!(timezone = %tz.name(), "Derived request timezone");
            // Guard so the entry is removed on every exit path.
            let _guard = zones.activate_guard(ctx, tz);
            ctrl.call_next(req, depot, res).await;
        } else {
            ctrl.call_next(req, depot, res).await;
        }
    }
}

/// Derives a timezone preference from request state: session, then cookie,
/// then `Accept-Language`. Invalid stored values are skipped, not errors.
fn derive_timezone(req: &salvo::Request, depot: &Depot, config: &Settings) -> Option<chrono_tz::Tz> {
    if let Some(session) = depot.session() {
        if let Some(stored) = session.get::<String>(&config.timezone.session_key) {
            match resolve(&stored) {
                Ok(tz) => return Some(tz),
                Err(e) => debug!(error = %e, "Ignoring invalid session timezone"),
            }
        }
    }

    if let Some(cookie) = req.cookie(&config.timezone.cookie_name) {
        match TimeZoneSelect::new().clean(Some(cookie.value())) {
            Ok(Some(tz)) => return Some(tz),
            Ok(None) | Err(_) => {
                debug!(value = %cookie.value(), "Ignoring invalid timezone cookie");
            }
        }
    }

    let header = req
        .headers()
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())?;
    guess_from_accept_language(header)
}
