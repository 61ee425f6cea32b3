pub mod chart;
pub mod summary;

pub use chart::{print_chart, render_candles};
pub use summary::{format_profile, print_profile};
