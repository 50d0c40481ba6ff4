use crate::model::Ms;

/// Earliest accepted timestamp (the Unix epoch).
pub const MIN_VALID_TIMESTAMP_MS: Ms = 0;
/// Latest accepted timestamp (9999-12-31T23:59:59.999Z).
pub const MAX_VALID_TIMESTAMP_MS: Ms = 253_402_300_799_999;
/// One year.
pub const MAX_SPAN_DURATION_MS: Ms = 366 * 24 * 3_600_000;

pub const MAX_LANES: usize = 10_000;
pub const MAX_ITEMS_PER_LANE: usize = 100_000;
pub const MAX_IMPORT_SIZE: usize = 1_000_000;

pub const MAX_TITLE_LEN: usize = 256;
pub const MAX_LOCATION_LEN: usize = 256;
pub const MAX_DESCRIPTION_LEN: usize = 4096;
pub const MAX_COLOR_LEN: usize = 64;
