use chrono::{DateTime, Utc};

use crate::domain::quote::QuotationId;
use crate::errors::ApplicationError;

/// Largest id a record may carry. Keeps ids exact when read back as JSON numbers.
pub const MAX_RECORD_ID: i64 = (1 << 53) - 1;

/// Hands out millisecond-timestamp ids that never repeat: when the clock has not moved past
/// the last id, the last id plus one is used instead.
#[derive(Clone, Debug, Default)]
pub struct RecordIdGenerator {
    last: Option<i64>,
}

impl RecordIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_after(latest: Option<QuotationId>) -> Self {
        Self { last: latest.map(|id| id.0) }
    }

    pub fn next(&mut self, now: DateTime<Utc>) -> Result<QuotationId, ApplicationError> {
        let candidate = now.timestamp_millis();
        let id = match self.last {
            Some(last) if candidate <= last => last
                .checked_add(1)
                .filter(|id| *id <= MAX_RECORD_ID)
                .ok_or(ApplicationError::IdsExhausted(QuotationId(last)))?,
            _ => candidate,
        };
        self.last = Some(id);
        Ok(QuotationId(id))
    }
}
