mod time;
pub use time::{format_timestamp, normalize_timestamp, now_timestamp, parse_timestamp};
