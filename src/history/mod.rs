//! The income and expense history chart: its data, axis labels, and animated tooltip.

mod api;
mod chart;
mod count_up;
mod data;
mod record;
mod tooltip;

pub use api::{get_history_data_endpoint, get_history_periods_endpoint};
pub use chart::{history_chart_script, history_chart_view};
pub use count_up::{COUNT_UP_DURATION, CountUp};
pub use data::{HistoryPeriod, HistoryQuery, get_history_data, get_history_periods};
pub use record::{HistoryRecord, Timeframe, axis_label, axis_labels, calendar_date};
pub use tooltip::{HistoryTooltip, TooltipState, tooltip_view};
