//! Metric values returned to the host.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricValue {
    /// Serialized JSON (discovery and health documents).
    Text(String),
    Integer(i64),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Text(text) => f.write_str(text),
            MetricValue::Integer(n) => write!(f, "{}", n),
        }
    }
}

impl From<i64> for MetricValue {
    fn from(n: i64) -> Self {
        MetricValue::Integer(n)
    }
}

impl From<String> for MetricValue {
    fn from(text: String) -> Self {
        MetricValue::Text(text)
    }
}
