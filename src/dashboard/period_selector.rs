use maud::{Markup, html};
use time::Month;

use crate::{
    endpoints,
    history::{HistoryPeriod, Timeframe},
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
};

const SELECTOR_BUTTON_STYLE: &str = "px-4 py-2.5 bg-blue-500 dark:bg-blue-600 \
    disabled:bg-blue-700 hover:enabled:bg-blue-600 hover:enabled:dark:bg-blue-700 \
    text-white rounded";

/// A GET form for choosing which period the history chart shows.
///
/// `years` are the years that can be picked, the selected period's year is
/// added if it is missing.
pub(super) fn period_selector(period: &HistoryPeriod, years: &[i32]) -> Markup {
    let mut years = years.to_vec();
    if !years.contains(&period.year) {
        years.push(period.year);
        years.sort_unstable();
    }

    let months = (0..12).filter_map(|index| {
        let month = Month::try_from(u8::try_from(index + 1).ok()?).ok()?;
        Some((index, month))
    });

    html! {
        form
            method="get"
            action=(endpoints::DASHBOARD_VIEW)
            class="w-full flex flex-wrap items-end gap-4 mb-4"
        {
            div
            {
                label for="timeframe" class=(FORM_LABEL_STYLE) { "Timeframe" }

                select id="timeframe" name="timeframe" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for (timeframe, label) in [(Timeframe::Month, "Month"), (Timeframe::Year, "Year")] {
                        option
                            value=(timeframe.as_str())
                            selected[timeframe == period.timeframe]
                        {
                            (label)
                        }
                    }
                }
            }

            div
            {
                label for="year" class=(FORM_LABEL_STYLE) { "Year" }

                select id="year" name="year" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for year in &years {
                        option value=(year) selected[*year == period.year] { (year) }
                    }
                }
            }

            div
            {
                label for="month" class=(FORM_LABEL_STYLE) { "Month" }

                select id="month" name="month" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for (index, month) in months {
                        option value=(index) selected[index == period.month] { (month) }
                    }
                }
            }

            button type="submit" class=(SELECTOR_BUTTON_STYLE) { "Show" }
        }
    }
}
