//! Terminal dashboard reporter

mod terminal;

pub use terminal::{format_age, format_change, format_currency, DashboardConfig, MatchedToken, TerminalDashboard};
