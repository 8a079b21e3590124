//! Timezone preference endpoints.

use salvo::http::cookie::Cookie;
use salvo::http::{StatusCode, header};
use salvo::session::SessionDepotExt;
use salvo::writing::{Json, Redirect};
use salvo::{Depot, Request, Response, Router, handler};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use meridian_core::constants::{CURRENT_ROUTE_COMPONENT, SET_ROUTE_COMPONENT, TZ_ROUTE_COMPONENT};
use meridian_core::tz::resolve::canonical_name;
use meridian_form::field::timezone::TimeZoneSelect;

use crate::config::get_config_from_depot;
use crate::tz_handler::current_timezone;

/// ## Summary
/// Preference submission payload
#[derive(Debug, Default, Deserialize)]
pub struct SetTimezoneForm {
    pub timezone: Option<String>,
    pub next: Option<String>,
}

/// ## Summary
/// Active timezone response payload
#[derive(Debug, Serialize)]
pub struct CurrentTimezoneResponse {
    pub timezone: String,
}

/// ## Summary
/// Error response payload
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// ## Summary
/// POST /tz/set - Stores the submitted timezone preference and redirects.
///
/// The redirect target is the `next` query or form parameter, the
/// `Referer` header, or `/`, in that order. A valid selection is written
/// to the session when one is available, else carried in a cookie. An
/// invalid selection is ignored: the response still redirects, matching a
/// preference form that simply leaves the old value in place.
///
/// ## Side Effects
/// Writes the session value or sets a cookie on the response.
#[handler]
async fn set_timezone(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let config = match get_config_from_depot(depot) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(error = ?e, "Failed to get config from depot");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            res.render(Json(ErrorResponse {
                error: "Internal server error".to_string(),
            }));
            return;
        }
    };

    let query_next: Option<String> = req.query("next");
    let referer = req
        .headers()
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string);

    let form: SetTimezoneForm = match req.parse_form().await {
        Ok(f) => f,
        Err(e) => {
            debug!(error = ?e, "Failed to parse preference form");
            SetTimezoneForm::default()
        }
    };

    let next = query_next
        .filter(|n| !n.is_empty())
        .or_else(|| form.next.clone().filter(|n| !n.is_empty()))
        .or_else(|| referer.filter(|n| !n.is_empty()))
        .unwrap_or_else(|| "/".to_string());

    match TimeZoneSelect::new().clean(form.timezone.as_deref()) {
        Ok(Some(tz)) => {
            let name = canonical_name(tz);
            if let Some(session) = depot.session_mut() {
                if let Err(e) = session.insert(&config.timezone.session_key, name) {
                    error!(error = ?e, "Failed to write timezone to session");
                }
            } else {
                res.add_cookie(
                    Cookie::build((config.timezone.cookie_name.clone(), name))
                        .path("/")
                        .build(),
                );
            }
            debug!(timezone = %name, "Stored timezone preference");
        }
        Ok(None) | Err(_) => {
            debug!(submitted = ?form.timezone, "Ignoring invalid timezone submission");
        }
    }

    res.render(Redirect::other(next));
}

/// ## Summary
/// GET /tz/current - Reports the timezone in effect for this request.
///
/// ## Errors
/// Returns HTTP 500 when the timezone middleware did not run.
#[handler]
async fn current(depot: &mut Depot, res: &mut Response) {
    match current_timezone(depot) {
        Ok(tz) => {
            res.render(Json(CurrentTimezoneResponse {
                timezone: canonical_name(tz).to_string(),
            }));
        }
        Err(e) => {
            error!(error = ?e, "Failed to read active timezone");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            res.render(Json(ErrorResponse {
                error: "Internal server error".to_string(),
            }));
        }
    }
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(TZ_ROUTE_COMPONENT)
        .push(Router::with_path(SET_ROUTE_COMPONENT).post(set_timezone))
        .push(Router::with_path(CURRENT_ROUTE_COMPONENT).get(current))
}
