/// Widest per-day bar, in characters.
pub const BAR_WIDTH: usize = 40;
/// Access table rows shown before eliding the rest.
pub const MAX_ACCESS_ROWS: usize = 20;
pub const PROMPT: &str = "shortdash> ";
pub const ACCESS_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";
