//! Charts module - Dashboard widget rendering

mod plotter;

pub use plotter::ChartPlotter;
