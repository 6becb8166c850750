//! The income and expense bar chart of the dashboard.
//!
//! The chart is rendered by ECharts in the browser. Its options are built
//! here with charming, and the tooltip of every bucket is rendered on the
//! server so that amounts are formatted the same way as the rest of the page.
//! A small script then counts the tooltip values from the bucket hovered
//! last to the one under the pointer, with the same easing as `CountUp`.

use charming::{
    Chart,
    component::{Axis, Grid},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, ItemStyle, JsFunction, LineStyle,
        LineStyleType, SplitLine, Tooltip, Trigger,
    },
    series::Bar,
};
use maud::{Markup, PreEscaped, html};

use crate::{
    Error,
    currency::CurrencyFormatter,
    history::{
        COUNT_UP_DURATION, HistoryRecord, Timeframe, TooltipState, axis_labels, tooltip_view,
    },
    html::HeadElement,
};

/// The ID of the element the chart is drawn in.
pub const HISTORY_CHART_ID: &str = "history-chart";

const INCOME_COLOUR: &str = "#10b981";
const EXPENSE_COLOUR: &str = "#ef4444";

/// The ECharts options for a bar chart of `records`.
pub fn history_chart(
    records: &[HistoryRecord],
    timeframe: Timeframe,
    formatter: &CurrencyFormatter,
) -> Chart {
    let labels = axis_labels(records, timeframe);
    let income: Vec<f64> = records.iter().map(|record| record.income).collect();
    let expense: Vec<f64> = records.iter().map(|record| record.expense).collect();

    Chart::new()
        .tooltip(history_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(axis_currency_formatter(formatter)))
                .split_line(
                    SplitLine::new().line_style(LineStyle::new().type_(LineStyleType::Dashed)),
                ),
        )
        .series(
            Bar::new()
                .name("Income")
                .item_style(ItemStyle::new().color(INCOME_COLOUR))
                .data(income),
        )
        .series(
            Bar::new()
                .name("Expense")
                .item_style(ItemStyle::new().color(EXPENSE_COLOUR))
                .data(expense),
        )
}

/// The settled tooltip markup of each record, in the same order as `records`.
pub fn history_tooltips(records: &[HistoryRecord], formatter: &CurrencyFormatter) -> Vec<String> {
    records
        .iter()
        .map(|record| {
            tooltip_view(TooltipState::new(true, std::slice::from_ref(record)), formatter)
                .into_string()
        })
        .collect()
}

// Abbreviated amounts for the y-axis, the tooltip shows the exact values.
fn axis_currency_formatter(formatter: &CurrencyFormatter) -> JsFunction {
    JsFunction::new_with_args(
        "number",
        &format!(
            "const currencyFormatter = new Intl.NumberFormat('en-US', {{
                style: 'currency',
                currency: '{}',
                notation: 'compact',
                maximumFractionDigits: 1
            }});
            return currencyFormatter.format(number);",
            formatter.currency().code()
        ),
    )
}

fn history_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
        .formatter(JsFunction::new_with_args(
            "params",
            "const index = Array.isArray(params) ? params[0].dataIndex : params.dataIndex;
            return window.renderHistoryTooltip ? window.renderHistoryTooltip(index) : '';",
        ))
}

// Counts the `data-target` values of the tooltip rows up from the values shown
// last. Values are rounded half away from zero like `CountUp::displayed`.
fn tooltip_count_up_script(formatter: &CurrencyFormatter) -> String {
    let currency = formatter.currency().code();
    let duration = COUNT_UP_DURATION.as_millis();

    format!(
        r#"const countUpFormatter = new Intl.NumberFormat('en-US', {{
                style: 'currency',
                currency: '{currency}'
            }});
            const countUp = {{ from: [0, 0, 0], to: [0, 0, 0], start: null, index: null }};
            const easeOutExpo = (progress) =>
                progress >= 1 ? 1 : (1 - Math.pow(2, -10 * progress)) * 1024 / 1023;
            const roundHalfAwayFromZero = (value) =>
                Math.sign(value) * Math.round(Math.abs(value)) || 0;
            const countUpValue = (row, now) => {{
                const progress = countUp.start === null ? 1 : (now - countUp.start) / {duration};
                const from = countUp.from[row];
                return from + (countUp.to[row] - from) * easeOutExpo(progress);
            }};
            const writeCountUp = (root, now) => {{
                root.querySelectorAll('span[data-target]').forEach((span, row) => {{
                    span.textContent = countUpFormatter.format(
                        roundHalfAwayFromZero(countUpValue(row, now))
                    );
                }});
            }};
            const tickCountUp = (now) => {{
                document.querySelectorAll('.echarts-tooltip').forEach((tooltip) => {{
                    writeCountUp(tooltip, now);
                }});
                if (countUp.start !== null && now - countUp.start < {duration}) {{
                    requestAnimationFrame(tickCountUp);
                }}
            }};
            window.renderHistoryTooltip = (index) => {{
                const template = document.createElement('template');
                template.innerHTML = window.historyTooltips[index] || '';
                const now = performance.now();
                if (index !== countUp.index) {{
                    const spans = template.content.querySelectorAll('span[data-target]');
                    countUp.from = countUp.to.map((_, row) => countUpValue(row, now));
                    countUp.to = Array.from(spans, (span) => Number(span.dataset.target));
                    countUp.start = now;
                    countUp.index = index;
                    requestAnimationFrame(tickCountUp);
                }}
                writeCountUp(template.content, now);
                return template.innerHTML;
            }};"#
    )
}

/// The element the chart is drawn in.
pub fn history_chart_view() -> Markup {
    html!(
        section id="charts" class="w-full mx-auto mb-4"
        {
            div
                id=(HISTORY_CHART_ID)
                class="min-h-[380px] rounded dark:bg-gray-100"
            {}
        }
    )
}

/// The script that draws the chart once the page has loaded.
///
/// # Errors
///
/// Returns [Error::JSONSerializationError] if the tooltips could not be
/// written as JSON.
pub fn history_chart_script(
    records: &[HistoryRecord],
    timeframe: Timeframe,
    formatter: &CurrencyFormatter,
) -> Result<HeadElement, Error> {
    let options = history_chart(records, timeframe, formatter).to_string();
    let tooltips = serde_json::to_string(&history_tooltips(records, formatter))
        .map_err(|error| Error::JSONSerializationError(error.to_string()))?;
    let count_up = tooltip_count_up_script(formatter);

    let script = format!(
        r#"document.addEventListener('DOMContentLoaded', function() {{
            window.historyTooltips = {tooltips};
            {count_up}

            const chartDom = document.getElementById("{HISTORY_CHART_ID}");
            const chart = echarts.init(chartDom);
            const option = {options};
            option.tooltip.className = "echarts-tooltip";
            chart.setOption(option);

            window.addEventListener('resize', chart.resize);

            const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
            const updateTheme = () => {{
                chart.setTheme(darkModeMediaQuery.matches ? 'dark' : 'default');
            }};
            darkModeMediaQuery.addEventListener('change', updateTheme);
            updateTheme();
        }});"#
    );

    Ok(HeadElement::ScriptSource(PreEscaped(script)))
}
