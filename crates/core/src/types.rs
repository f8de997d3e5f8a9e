/// Order and item identifiers are server-generated UUIDv4 strings.
pub type OrderId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
