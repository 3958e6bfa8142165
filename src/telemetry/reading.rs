//! # Readings
//!
//! The stored sample type and the validated ingestion request.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{TelemetryError, TelemetryResult};

/// One ingested telemetry sample.
///
/// Readings are only ever constructed by the [`StateStore`](super::StateStore),
/// which assigns `ts` at ingestion time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Sensor identifier (e.g. "temp1")
    pub sensor: String,
    /// Scalar value reported by the device
    pub value: f64,
    /// Ingestion time in milliseconds since the Unix epoch
    pub ts: i64,
}

/// A validated `{sensor, value}` payload, ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestRequest {
    pub sensor: String,
    pub value: f64,
}

impl IngestRequest {
    /// Create a request from already-typed parts
    pub fn new(sensor: impl Into<String>, value: f64) -> TelemetryResult<Self> {
        let sensor = sensor.into();
        if sensor.is_empty() {
            return Err(TelemetryError::validation("sensor must not be empty"));
        }
        Ok(Self { sensor, value })
    }

    /// Validate a raw JSON body.
    ///
    /// `sensor` must be a JSON string and `value` a JSON number. Missing
    /// fields, other types and non-object bodies are all rejected.
    pub fn from_json(body: &Value) -> TelemetryResult<Self> {
        let sensor = match body.get("sensor") {
            Some(Value::String(s)) => s.clone(),
            _ => return Err(shape_error()),
        };
        let value = match body.get("value") {
            Some(Value::Number(n)) => n.as_f64().ok_or_else(shape_error)?,
            _ => return Err(shape_error()),
        };
        Self::new(sensor, value)
    }

    /// Validate raw request bytes. Bodies that are not JSON at all are
    /// treated like an empty payload.
    pub fn from_slice(bytes: &[u8]) -> TelemetryResult<Self> {
        let body: Value = serde_json::from_slice(bytes).unwrap_or(Value::Null);
        Self::from_json(&body)
    }
}

fn shape_error() -> TelemetryError {
    TelemetryError::validation("sensor (string) and value (number) are required")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_payload() {
        let req = IngestRequest::from_json(&json!({"sensor": "temp1", "value": 23.5})).unwrap();
        assert_eq!(req.sensor, "temp1");
        assert_eq!(req.value, 23.5);
    }

    #[test]
    fn test_integer_value_accepted() {
        let req = IngestRequest::from_json(&json!({"sensor": "door", "value": 1})).unwrap();
        assert_eq!(req.value, 1.0);
    }

    #[test]
    fn test_extra_fields_ignored() {
        let req =
            IngestRequest::from_json(&json!({"sensor": "t", "value": -4, "unit": "C"})).unwrap();
        assert_eq!(req.value, -4.0);
    }

    #[test]
    fn test_wrong_types_rejected() {
        let cases = [
            json!({"sensor": 7, "value": 1.0}),
            json!({"sensor": "t", "value": "1.0"}),
            json!({"sensor": null, "value": 1.0}),
            json!({"sensor": "t", "value": true}),
            json!({"sensor": "t"}),
            json!({"value": 2}),
            json!([]),
            json!("temp1"),
            Value::Null,
        ];
        for body in cases {
            let err = IngestRequest::from_json(&body).unwrap_err();
            assert!(matches!(err, TelemetryError::Validation(_)), "accepted {}", body);
        }
    }

    #[test]
    fn test_empty_sensor_rejected() {
        let err = IngestRequest::from_json(&json!({"sensor": "", "value": 1})).unwrap_err();
        assert_eq!(err, TelemetryError::validation("sensor must not be empty"));
    }

    #[test]
    fn test_malformed_bytes_rejected() {
        assert!(IngestRequest::from_slice(b"{not json").is_err());
        assert!(IngestRequest::from_slice(b"").is_err());
        assert!(IngestRequest::from_slice(br#"{"sensor":"a","value":3}"#).is_ok());
    }

    #[test]
    fn test_reading_json_shape() {
        let reading = Reading {
            sensor: "temp1".to_string(),
            value: 23.5,
            ts: 1_700_000_000_000,
        };
        let json = serde_json::to_value(&reading).unwrap();
        assert_eq!(
            json,
            json!({"sensor": "temp1", "value": 23.5, "ts": 1_700_000_000_000i64})
        );
    }
}
