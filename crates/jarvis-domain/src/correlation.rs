//! Correlation identifiers for per-request log correlation

use std::fmt;

/// Opaque token threaded through a single request's processing
///
/// Correlation ids are passed explicitly as a parameter through every call
/// in the chain. They are never stored in shared or thread-local state, so
/// concurrent requests cannot see each other's ids.
///
/// Ids supplied by a caller are kept verbatim; generated ids are UUIDv4.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Generate a fresh UUIDv4-based correlation id
    ///
    /// # Examples
    ///
    /// ```
    /// use jarvis_domain::CorrelationId;
    ///
    /// let id = CorrelationId::new();
    /// assert_eq!(id.as_str().len(), 36);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Use a caller-supplied id, falling back to a fresh one when it is blank
    ///
    /// # Examples
    ///
    /// ```
    /// use jarvis_domain::CorrelationId;
    ///
    /// let id = CorrelationId::from_header(Some("req-42"));
    /// assert_eq!(id.as_str(), "req-42");
    ///
    /// let generated = CorrelationId::from_header(None);
    /// assert!(!generated.as_str().is_empty());
    /// ```
    pub fn from_header(value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.trim().is_empty() => Self(v.to_string()),
            _ => Self::new(),
        }
    }

    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
