//! Request-scoped active-timezone storage.
//!
//! ## Summary
//! `ActiveZones` maps one [`ContextId`] per unit of work (a request) to the
//! timezone currently in effect for it. The request layer activates an
//! entry when handling starts and deactivates it when handling ends;
//! everything in between reads through [`ActiveZones::current`], which
//! falls back to a default validated at configuration time and therefore
//! never fails.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use chrono::DateTime;
use chrono_tz::Tz;

use crate::error::CoreResult;
use crate::tz::adjust::{Timestamp, ZoneRef, adjust};

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(0);

thread_local! {
    static THREAD_CONTEXT_ID: ContextId = ContextId::new();
}

/// Identity token for one concurrently-handled unit of work.
///
/// Tokens are never reused within a process, so a context that forgot to
/// deactivate can at worst leak a map entry, never leak its timezone into
/// an unrelated unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(u64);

impl ContextId {
    /// Allocates a fresh token. One per request.
    #[expect(clippy::new_without_default, reason = "allocation is not a default")]
    #[must_use]
    pub fn new() -> Self {
        Self(NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Token tied to the calling thread, for callers that cannot thread an
    /// explicit token through (one unit of work per thread).
    #[must_use]
    pub fn current_thread() -> Self {
        THREAD_CONTEXT_ID.with(|id| *id)
    }
}

/// Keyed store of active timezones, one entry per live unit of work.
#[derive(Debug)]
pub struct ActiveZones {
    entries: RwLock<HashMap<ContextId, Tz>>,
    default: Tz,
}

impl ActiveZones {
    /// ## Summary
    /// Creates a store with the site default timezone.
    ///
    /// The default must come from validated configuration
    /// ([`crate::config::TimezoneConfig::resolve_default`]) so that
    /// [`Self::current`] cannot fail.
    #[must_use]
    pub fn new(default: Tz) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            default,
        }
    }

    /// The site default timezone.
    #[must_use]
    pub fn default_tz(&self) -> Tz {
        self.default
    }

    /// ## Summary
    /// Marks `tz` active for `ctx`. Last write wins; there is no stacking.
    pub fn activate(&self, ctx: ContextId, tz: Tz) {
        tracing::trace!(context = ?ctx, timezone = %tz.name(), "Activating timezone");
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(ctx, tz);
    }

    /// ## Summary
    /// Removes the entry for `ctx`. A no-op when none exists, so callers
    /// can deactivate unconditionally on every exit path.
    pub fn deactivate(&self, ctx: ContextId) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&ctx);
    }

    /// ## Summary
    /// Activates `tz` for `ctx` and returns a guard that deactivates on
    /// drop, so an early return or panic cannot leak the entry into a
    /// reused context.
    #[must_use]
    pub fn activate_guard(&self, ctx: ContextId, tz: Tz) -> ActiveGuard<'_> {
        self.activate(ctx, tz);
        ActiveGuard { zones: self, ctx }
    }

    /// Number of live entries. A quiesced store holds zero; anything else
    /// means some unit of work skipped its deactivation.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// ## Summary
    /// The timezone in effect for `ctx`: its active entry, or the site
    /// default when the context never activated one.
    #[must_use]
    pub fn current(&self, ctx: ContextId) -> Tz {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&ctx)
            .copied()
            .unwrap_or(self.default)
    }

    /// ## Summary
    /// Converts a timestamp to the zone in effect for `ctx`, interpreting
    /// naive input in `from`.
    ///
    /// ## Errors
    /// Returns `UnknownTimezone` if `from` fails to resolve.
    pub fn to_active<'a>(
        &self,
        ctx: ContextId,
        value: Timestamp,
        from: impl Into<ZoneRef<'a>>,
    ) -> CoreResult<DateTime<Tz>> {
        adjust(value, from, self.current(ctx))
    }

    /// ## Summary
    /// Converts a timestamp to the site default zone, interpreting naive
    /// input in `from`. This is the "omitted target zone" form of
    /// [`adjust`].
    ///
    /// ## Errors
    /// Returns `UnknownTimezone` if `from` fails to resolve.
    pub fn adjust_to_default<'a>(
        &self,
        value: Timestamp,
        from: impl Into<ZoneRef<'a>>,
    ) -> CoreResult<DateTime<Tz>> {
        adjust(value, from, self.default)
    }
}

/// Deactivates its context's entry on drop.
#[must_use]
pub struct ActiveGuard<'a> {
    zones: &'a ActiveZones,
    ctx: ContextId,
}

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.zones.deactivate(self.ctx);
    }
}
