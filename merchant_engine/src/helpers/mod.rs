mod display_date;

pub use display_date::{format_display_date, ordinal_suffix};
