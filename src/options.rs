use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Consistency level of a read or write.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Consistency {
    Any,
    One,
    Two,
    Three,
    Quorum,
    All,
    #[default]
    LocalQuorum,
    EachQuorum,
    LocalOne,
}

impl Consistency {
    /// Protocol code of the level.
    pub fn code(self) -> u16 {
        match self {
            Self::Any => 0x0000,
            Self::One => 0x0001,
            Self::Two => 0x0002,
            Self::Three => 0x0003,
            Self::Quorum => 0x0004,
            Self::All => 0x0005,
            Self::LocalQuorum => 0x0006,
            Self::EachQuorum => 0x0007,
            Self::LocalOne => 0x000A,
        }
    }
}

/// Consistency level for the Paxos phase of conditional updates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SerialConsistency {
    #[default]
    Serial,
    LocalSerial,
}

impl SerialConsistency {
    pub fn code(self) -> u16 {
        match self {
            Self::Serial => 0x0008,
            Self::LocalSerial => 0x0009,
        }
    }
}

/// Options attached to a statement when it is built.
///
/// `None` fields fall back to the session defaults at execution time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatementOptions {
    pub consistency: Option<Consistency>,
    pub serial_consistency: Option<SerialConsistency>,
    pub page_size: Option<i32>,
    pub paging_state: Option<Bytes>,
    /// Client-side timestamp in microseconds.
    pub timestamp: Option<i64>,
    pub tracing: bool,
    pub idempotent: Option<bool>,
}

/// Per-query options carried by a [`Cql`](crate::Cql).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryOptions {
    consistency: Option<Consistency>,
    serial_consistency: Option<SerialConsistency>,
    page_size: Option<i32>,
    paging_state: Option<Bytes>,
    timestamp: Option<i64>,
    tracing: bool,
    idempotent: Option<bool>,
    no_prepare: bool,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_consistency(mut self, consistency: Consistency) -> Self {
        self.consistency = Some(consistency);
        self
    }

    pub fn set_serial_consistency(mut self, consistency: SerialConsistency) -> Self {
        self.serial_consistency = Some(consistency);
        self
    }

    pub fn set_page_size(mut self, page_size: i32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn set_paging_state(mut self, paging_state: impl Into<Bytes>) -> Self {
        self.paging_state = Some(paging_state.into());
        self
    }

    pub fn set_timestamp(mut self, micros: i64) -> Self {
        self.timestamp = Some(micros);
        self
    }

    pub fn enable_tracing(mut self) -> Self {
        self.tracing = true;
        self
    }

    pub fn set_idempotent(mut self, idempotent: bool) -> Self {
        self.idempotent = Some(idempotent);
        self
    }

    /// Sends the query as plain text instead of preparing it first.
    pub fn do_not_prepare(mut self) -> Self {
        self.no_prepare = true;
        self
    }

    pub fn no_prepare(&self) -> bool {
        self.no_prepare
    }

    /// Copies every option that was set onto `target`, leaving the rest untouched.
    pub fn copy_to(&self, target: &mut StatementOptions) {
        if let Some(consistency) = self.consistency {
            target.consistency = Some(consistency);
        }
        if let Some(serial_consistency) = self.serial_consistency {
            target.serial_consistency = Some(serial_consistency);
        }
        if let Some(page_size) = self.page_size {
            target.page_size = Some(page_size);
        }
        if let Some(paging_state) = &self.paging_state {
            target.paging_state = Some(paging_state.clone());
        }
        if let Some(timestamp) = self.timestamp {
            target.timestamp = Some(timestamp);
        }
        if self.tracing {
            target.tracing = true;
        }
        if let Some(idempotent) = self.idempotent {
            target.idempotent = Some(idempotent);
        }
    }

    pub(crate) fn to_statement_options(&self) -> StatementOptions {
        let mut options = StatementOptions::default();
        self.copy_to(&mut options);
        options
    }
}

/// Configures the prepared statement cache.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheOptions {
    /// Cache size above which every resolution emits an advisory.
    pub max_prepared_statements_threshold: usize,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            max_prepared_statements_threshold: 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{CacheOptions, Consistency, QueryOptions, SerialConsistency, StatementOptions};

    #[test]
    fn copy_to_only_overwrites_set_values() {
        let mut target = StatementOptions {
            consistency: Some(Consistency::One),
            page_size: Some(10),
            ..StatementOptions::default()
        };

        QueryOptions::new()
            .set_page_size(500)
            .set_serial_consistency(SerialConsistency::LocalSerial)
            .enable_tracing()
            .copy_to(&mut target);

        assert_eq!(target.consistency, Some(Consistency::One));
        assert_eq!(target.page_size, Some(500));
        assert_eq!(target.serial_consistency, Some(SerialConsistency::LocalSerial));
        assert!(target.tracing);
        assert_eq!(target.timestamp, None);
    }

    #[test]
    fn no_prepare_is_not_a_statement_option() {
        let options = QueryOptions::new().do_not_prepare();
        assert!(options.no_prepare());
        assert_eq!(options.to_statement_options(), StatementOptions::default());
    }

    #[test]
    fn protocol_codes() {
        assert_eq!(Consistency::LocalOne.code(), 0x000A);
        assert_eq!(Consistency::Quorum.code(), 0x0004);
        assert_eq!(SerialConsistency::LocalSerial.code(), 0x0009);
    }

    #[test]
    fn cache_options_default_threshold() {
        assert_eq!(CacheOptions::default().max_prepared_statements_threshold, 500);
    }
}
