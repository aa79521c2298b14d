//! Payment record model — the per-cycle, read-only view of store records.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Payment lifecycle status as stored in the collection.
///
/// Only `Paid` records are resubmission candidates. Any status value this
/// crate does not know about lands in `Other` and is never dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    #[serde(other)]
    Other,
}

/// A payment record fetched from the store.
///
/// Read-only on this side: clearing `next_submit_date` after a successful
/// resubmission is the endpoint's job, not ours.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentRecord {
    pub id: String,
    pub status: PaymentStatus,
    /// Backoff flag deferring resubmission until `next_submit_date`.
    #[serde(default)]
    pub distancing: bool,
    #[serde(
        default,
        rename = "nextSubmitDate",
        deserialize_with = "pb_datetime::deserialize_opt"
    )]
    pub next_submit_date: Option<DateTime<Utc>>,
    /// Processing order is ascending on this field.
    #[serde(deserialize_with = "pb_datetime::deserialize")]
    pub created: DateTime<Utc>,
}

impl PaymentRecord {
    /// Whether this record may be dispatched right now.
    ///
    /// A distancing record with a stored resubmission time waits until that
    /// time has passed; everything else that is paid is due immediately.
    pub fn is_dispatchable(&self, now: DateTime<Utc>) -> bool {
        if self.status != PaymentStatus::Paid {
            return false;
        }
        match (self.distancing, self.next_submit_date) {
            (true, Some(next)) => now >= next,
            _ => true,
        }
    }
}

/// Store datetime fields: unset values arrive as an empty string, set ones
/// as either RFC 3339 or the store's `YYYY-MM-DD HH:MM:SS.mmmZ` format.
pub(crate) mod pb_datetime {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer};

    const SPACE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.fZ";

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, SPACE_FORMAT)
            .ok()
            .map(|naive| naive.and_utc())
    }

    pub fn deserialize<'de, D>(de: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(de)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("unrecognized datetime: {raw}")))
    }

    pub fn deserialize_opt<'de, D>(de: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(de)?.as_deref() {
            None | Some("") => Ok(None),
            Some(raw) => parse(raw)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("unrecognized datetime: {raw}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(status: PaymentStatus, distancing: bool, next: Option<DateTime<Utc>>) -> PaymentRecord {
        PaymentRecord {
            id: "rec1".into(),
            status,
            distancing,
            next_submit_date: next,
            created: Utc::now(),
        }
    }

    #[test]
    fn paid_without_distancing_is_dispatchable() {
        let now = Utc::now();
        assert!(record(PaymentStatus::Paid, false, None).is_dispatchable(now));
        // The stored date is ignored while the flag is off.
        assert!(record(PaymentStatus::Paid, false, Some(now + Duration::hours(1))).is_dispatchable(now));
    }

    #[test]
    fn distancing_defers_until_the_stored_time() {
        let now = Utc::now();
        let future = record(PaymentStatus::Paid, true, Some(now + Duration::hours(1)));
        assert!(!future.is_dispatchable(now));
        assert!(future.is_dispatchable(now + Duration::hours(2)));
        // Boundary: due exactly at the stored time.
        assert!(future.is_dispatchable(now + Duration::hours(1)));
        // Distancing with no stored time is due immediately.
        assert!(record(PaymentStatus::Paid, true, None).is_dispatchable(now));
    }

    #[test]
    fn non_paid_is_never_dispatchable() {
        let now = Utc::now();
        assert!(!record(PaymentStatus::Other, false, None).is_dispatchable(now));
    }

    #[test]
    fn deserializes_store_record_shape() {
        let record: PaymentRecord = serde_json::from_str(
            r#"{
                "id": "abc123",
                "status": "paid",
                "distancing": true,
                "nextSubmitDate": "2026-08-05 10:15:00.000Z",
                "created": "2026-08-01 09:00:00.000Z"
            }"#,
        )
        .unwrap();
        assert_eq!(record.id, "abc123");
        assert_eq!(record.status, PaymentStatus::Paid);
        assert!(record.distancing);
        let next = record.next_submit_date.unwrap();
        assert_eq!(next.to_rfc3339(), "2026-08-05T10:15:00+00:00");
    }

    #[test]
    fn empty_datetime_means_unset() {
        let record: PaymentRecord = serde_json::from_str(
            r#"{"id": "a", "status": "paid", "nextSubmitDate": "", "created": "2026-08-01T09:00:00Z"}"#,
        )
        .unwrap();
        assert!(record.next_submit_date.is_none());
        assert!(!record.distancing);
    }

    #[test]
    fn unknown_status_lands_in_catch_all() {
        let record: PaymentRecord = serde_json::from_str(
            r#"{"id": "a", "status": "refunded", "created": "2026-08-01T09:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(record.status, PaymentStatus::Other);
    }
}
