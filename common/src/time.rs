// Unix timestamp in milliseconds.
// Assigned by the caller; the aggregation runtime only ever compares them.
pub type Timestamp = i64;
