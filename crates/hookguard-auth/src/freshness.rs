//! Timestamp freshness validation.
//!
//! Bounds replay exposure: an event is only accepted if its declared issue
//! time lies within `[now - window, now]`. Both ends are inclusive.

use chrono::{DateTime, TimeDelta, Utc};

use crate::error::RejectReason;

/// Default freshness window.
pub const DEFAULT_TOLERANCE: TimeDelta = TimeDelta::minutes(5);

/// Check that an event issued at `ts` (Unix seconds) is neither in the future
/// nor older than `window` relative to `now`.
///
/// # Errors
///
/// - [`RejectReason::InvalidTimestamp`] if `ts` is not a representable instant.
/// - [`RejectReason::TimestampInFuture`] if the event time is after `now`.
/// - [`RejectReason::TimestampTooOld`] if the event time is before `now - window`.
///
/// # Examples
///
/// ```
/// use chrono::DateTime;
/// use hookguard_auth::freshness::{DEFAULT_TOLERANCE, check_freshness};
///
/// let now = DateTime::from_timestamp(1_700_000_300, 0).unwrap();
/// assert!(check_freshness(1_700_000_000, now, DEFAULT_TOLERANCE).is_ok());
/// assert!(check_freshness(1_699_999_999, now, DEFAULT_TOLERANCE).is_err());
/// ```
pub fn check_freshness(ts: i64, now: DateTime<Utc>, window: TimeDelta) -> Result<(), RejectReason> {
    let event_time = DateTime::from_timestamp(ts, 0).ok_or(RejectReason::InvalidTimestamp)?;

    if event_time > now {
        return Err(RejectReason::TimestampInFuture);
    }

    // A window reaching past the representable range accepts every past event.
    if let Some(oldest) = now.checked_sub_signed(window) {
        if event_time < oldest {
            return Err(RejectReason::TimestampTooOld);
        }
    }

    Ok(())
}
