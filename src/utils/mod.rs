pub mod date;
pub mod formatting;
pub mod path;
pub mod time;

pub use formatting::format_elapsed;
pub use time::generate_intervals;
