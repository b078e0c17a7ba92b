/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar days carry no time zone; a post date is a local venue date.
pub type Date = chrono::NaiveDate;

/// Natural key of a calendar slot: `(post_date, slot_index)`.
pub type SlotKey = (Date, i32);
