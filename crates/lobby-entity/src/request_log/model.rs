//! Request log entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One HTTP exchange as persisted in `request_logs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RequestLog {
    /// Row identifier.
    pub id: i64,
    /// When the request arrived.
    pub request_time: DateTime<Utc>,
    /// When the response was produced.
    pub response_time: DateTime<Utc>,
    /// Authenticated caller, if the route required one.
    pub user_id: Option<Uuid>,
    /// Handling time in seconds.
    pub duration: f64,
    /// HTTP method.
    pub method: String,
    /// Request path without the query string.
    pub path: String,
    /// Request headers, one `name: value` per line.
    pub headers: String,
    /// Request body, empty when it was not captured.
    pub body: String,
    /// Response body, empty when it was not captured.
    pub response: String,
}

/// Data required to insert a request log row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRequestLog {
    /// When the request arrived.
    pub request_time: DateTime<Utc>,
    /// When the response was produced.
    pub response_time: DateTime<Utc>,
    /// Authenticated caller.
    pub user_id: Option<Uuid>,
    /// HTTP method.
    pub method: String,
    /// Request path.
    pub path: String,
    /// Rendered request headers.
    pub headers: String,
    /// Captured request body.
    pub body: String,
    /// Captured response body.
    pub response: String,
}

impl NewRequestLog {
    /// Seconds between request and response, never negative.
    pub fn duration_seconds(&self) -> f64 {
        let elapsed = self.response_time - self.request_time;
        elapsed
            .to_std()
            .map(|d| d.as_secs_f64())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn entry(elapsed: Duration) -> NewRequestLog {
        let request_time = Utc::now();
        NewRequestLog {
            request_time,
            response_time: request_time + elapsed,
            user_id: None,
            method: "GET".to_string(),
            path: "/health".to_string(),
            headers: String::new(),
            body: String::new(),
            response: String::new(),
        }
    }

    #[test]
    fn test_duration_seconds() {
        assert_eq!(entry(Duration::milliseconds(1500)).duration_seconds(), 1.5);
        assert_eq!(entry(Duration::zero()).duration_seconds(), 0.0);
    }

    #[test]
    fn test_clock_skew_yields_zero_duration() {
        assert_eq!(entry(Duration::milliseconds(-20)).duration_seconds(), 0.0);
    }

    #[test]
    fn test_row_serializes_with_camel_case_names() {
        let now = Utc::now();
        let row = RequestLog {
            id: 7,
            request_time: now,
            response_time: now,
            user_id: Some(Uuid::new_v4()),
            duration: 0.25,
            method: "GET".to_string(),
            path: "/api/users/me".to_string(),
            headers: String::new(),
            body: String::new(),
            response: String::new(),
        };
        let value = serde_json::to_value(row).unwrap();
        assert!(value.get("requestTime").is_some());
        assert!(value.get("userId").is_some());
        assert_eq!(value["duration"], 0.25);
    }
}
