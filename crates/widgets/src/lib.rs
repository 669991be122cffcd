pub mod chart;
pub mod readout;

pub use chart::{ChartWidget, Scale};
pub use readout::ReadoutWidget;
