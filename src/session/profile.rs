//! Submodule defining execution profiles: per-statement settings passed to the session.

use core::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// Number of replicas that must acknowledge a request.
pub enum Consistency {
    /// `ANY`
    Any,
    /// `ONE`
    One,
    /// `TWO`
    Two,
    /// `THREE`
    Three,
    /// `QUORUM`
    Quorum,
    /// `ALL`
    All,
    /// `LOCAL_QUORUM`
    LocalQuorum,
    /// `EACH_QUORUM`
    EachQuorum,
    /// `LOCAL_ONE`
    LocalOne,
}

impl Consistency {
    /// Returns the protocol code of the level.
    #[must_use]
    pub fn code(self) -> u16 {
        match self {
            Consistency::Any => 0x0000,
            Consistency::One => 0x0001,
            Consistency::Two => 0x0002,
            Consistency::Three => 0x0003,
            Consistency::Quorum => 0x0004,
            Consistency::All => 0x0005,
            Consistency::LocalQuorum => 0x0006,
            Consistency::EachQuorum => 0x0007,
            Consistency::LocalOne => 0x000A,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// Consistency of the Paxos phase of lightweight transactions.
pub enum SerialConsistency {
    /// `SERIAL`
    Serial,
    /// `LOCAL_SERIAL`
    LocalSerial,
}

impl SerialConsistency {
    /// Returns the protocol code of the level.
    #[must_use]
    pub fn code(self) -> u16 {
        match self {
            SerialConsistency::Serial => 0x0008,
            SerialConsistency::LocalSerial => 0x0009,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
/// Per-statement execution settings.
///
/// Every setting is optional: the session uses its own default for unset
/// ones. The profile is handed to the session as is, so it can also be
/// loaded from configuration files with `serde`.
pub struct ExecutionProfile {
    /// Consistency level.
    pub consistency: Option<Consistency>,
    /// Serial consistency level for conditional writes.
    pub serial_consistency: Option<SerialConsistency>,
    /// Client-side request timeout.
    pub request_timeout: Option<Duration>,
    /// Default write timestamp, in microseconds.
    pub timestamp: Option<i64>,
    /// Whether the statement can be retried safely.
    pub is_idempotent: Option<bool>,
    /// Whether to request server-side tracing.
    pub tracing: Option<bool>,
    /// Rows per page for paged reads.
    pub page_size: Option<i32>,
}

impl ExecutionProfile {
    /// Sets the consistency level.
    #[must_use]
    pub fn with_consistency(mut self, consistency: Consistency) -> Self {
        self.consistency = Some(consistency);
        self
    }

    /// Sets the serial consistency level.
    #[must_use]
    pub fn with_serial_consistency(mut self, serial_consistency: SerialConsistency) -> Self {
        self.serial_consistency = Some(serial_consistency);
        self
    }

    /// Sets the client-side request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets the default write timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, micros: i64) -> Self {
        self.timestamp = Some(micros);
        self
    }

    /// Marks the statement as idempotent or not.
    #[must_use]
    pub fn with_idempotent(mut self, is_idempotent: bool) -> Self {
        self.is_idempotent = Some(is_idempotent);
        self
    }

    /// Requests server-side tracing.
    #[must_use]
    pub fn with_tracing(mut self, tracing: bool) -> Self {
        self.tracing = Some(tracing);
        self
    }

    /// Sets the number of rows per page.
    #[must_use]
    pub fn with_page_size(mut self, page_size: i32) -> Self {
        self.page_size = Some(page_size);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_setters() {
        let profile = ExecutionProfile::default()
            .with_consistency(Consistency::LocalQuorum)
            .with_page_size(100)
            .with_idempotent(true);
        assert_eq!(profile.consistency, Some(Consistency::LocalQuorum));
        assert_eq!(profile.page_size, Some(100));
        assert_eq!(profile.is_idempotent, Some(true));
        assert_eq!(profile.tracing, None);
    }

    #[test]
    fn test_deserialize_partial_profile() {
        use crate::encoding::{Value, from_value};

        let config = Value::map([
            (Value::from("consistency"), Value::from("LOCAL_QUORUM")),
            (Value::from("page_size"), Value::Int(50)),
        ]);
        let profile: ExecutionProfile = from_value(config).unwrap();
        assert_eq!(
            profile,
            ExecutionProfile::default()
                .with_consistency(Consistency::LocalQuorum)
                .with_page_size(50)
        );
    }

    #[test]
    fn test_protocol_codes() {
        assert_eq!(Consistency::LocalOne.code(), 0x000A);
        assert_eq!(SerialConsistency::LocalSerial.code(), 0x0009);
    }
}
