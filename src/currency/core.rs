use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// A currency that amounts can be shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    /// US dollar.
    #[default]
    USD,
    /// Euro.
    EUR,
    /// Japanese yen.
    JPY,
    /// British pound.
    GBP,
}

impl Currency {
    /// Every supported currency, in the order they are listed to the user.
    pub const ALL: [Currency; 4] = [Currency::USD, Currency::EUR, Currency::JPY, Currency::GBP];

    /// The ISO 4217 code, e.g. "USD".
    pub fn code(self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::JPY => "JPY",
            Currency::GBP => "GBP",
        }
    }

    /// The sign written before amounts, e.g. "$".
    pub fn symbol(self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::JPY => "¥",
            Currency::GBP => "£",
        }
    }

    /// The name shown in the currency picker, e.g. "$ Dollar".
    pub fn label(self) -> &'static str {
        match self {
            Currency::USD => "$ Dollar",
            Currency::EUR => "€ Euro",
            Currency::JPY => "¥ Yen",
            Currency::GBP => "£ Pound",
        }
    }

    /// The number of digits after the decimal point, e.g. cents.
    pub fn decimals(self) -> u8 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }
}

impl FromStr for Currency {
    type Err = Error;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        Currency::ALL
            .into_iter()
            .find(|currency| currency.code().eq_ignore_ascii_case(code.trim()))
            .ok_or_else(|| Error::InvalidCurrency(code.to_owned()))
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::Currency;

    #[test]
    fn parses_codes() {
        assert_eq!("USD".parse(), Ok(Currency::USD));
        assert_eq!("eur".parse(), Ok(Currency::EUR));
        assert_eq!(" JPY ".parse(), Ok(Currency::JPY));
        assert_eq!("GBP".parse(), Ok(Currency::GBP));
    }

    #[test]
    fn rejects_unknown_codes() {
        assert_eq!(
            "NZD".parse::<Currency>(),
            Err(Error::InvalidCurrency("NZD".to_owned()))
        );
        assert_eq!(
            "".parse::<Currency>(),
            Err(Error::InvalidCurrency(String::new()))
        );
    }

    #[test]
    fn display_round_trips_through_code() {
        for currency in Currency::ALL {
            assert_eq!(currency.to_string().parse(), Ok(currency));
        }
    }

    #[test]
    fn labels_match_picker() {
        let labels: Vec<_> = Currency::ALL.into_iter().map(Currency::label).collect();

        assert_eq!(labels, ["$ Dollar", "€ Euro", "¥ Yen", "£ Pound"]);
    }
}
