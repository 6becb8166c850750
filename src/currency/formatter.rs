use numfmt::{Formatter, Precision};

use crate::{Error, currency::Currency};

/// Formats amounts of money in one currency, e.g. `-$1,234.50`.
///
/// Holds no state between calls, so one formatter can be shared by every
/// value on a page.
pub struct CurrencyFormatter {
    currency: Currency,
    grouping: Formatter,
}

impl CurrencyFormatter {
    /// Create a formatter for `currency`.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidCurrency] if numfmt does not accept the currency symbol.
    pub fn new(currency: Currency) -> Result<Self, Error> {
        let grouping = Formatter::currency(currency.symbol())
            .map_err(|error| {
                tracing::error!("Could not create formatter for {currency}: {error:?}");
                Error::InvalidCurrency(currency.code().to_owned())
            })?
            .precision(Precision::Decimals(0));

        Ok(Self { currency, grouping })
    }

    /// The currency amounts are formatted in.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Format `value` with the currency symbol, thousands separators and the
    /// currency's number of decimal places.
    ///
    /// The sign goes before the symbol. Values that round to zero never get a sign.
    pub fn format(&self, value: f64) -> String {
        if !value.is_finite() {
            return value.to_string();
        }

        let decimals = self.currency.decimals();
        let scale = 10_u64.pow(u32::from(decimals));
        let scaled = value.abs() * scale as f64;
        // Beyond this the minor units no longer fit in a u64.
        if scaled >= u64::MAX as f64 {
            return value.to_string();
        }
        let minor_units = scaled.round() as u64;
        let whole = minor_units / scale;
        let fraction = minor_units % scale;

        let sign = if value < 0.0 && minor_units > 0 { "-" } else { "" };
        let whole = if whole == 0 {
            // numfmt writes zero as a bare "0" without the prefix.
            format!("{}0", self.currency.symbol())
        } else {
            let grouped = self.grouping.fmt_string(whole as f64);
            // numfmt can leave a ".0" on whole numbers.
            match grouped.split_once('.') {
                Some((whole, _)) => whole.to_owned(),
                None => grouped,
            }
        };

        if decimals == 0 {
            format!("{sign}{whole}")
        } else {
            format!("{sign}{whole}.{fraction:0width$}", width = usize::from(decimals))
        }
    }
}
