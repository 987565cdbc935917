//! Payment-currency filter applied to both tables before any analysis

use crate::repository::TableView;
use serde::Serialize;
use std::collections::BTreeSet;
use thiserror::Error;

/// Requested currencies that never occur as a payment currency.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("unknown currencies: {}", .0.join(", "))]
pub struct UnknownCurrencies(pub Vec<String>);

/// The set of payment currencies an analyst chose to include.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrencySelection {
    currencies: BTreeSet<String>,
}

impl CurrencySelection {
    pub fn new<I, S>(currencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            currencies: currencies.into_iter().map(Into::into).collect(),
        }
    }

    /// Empty selection; filters every row out.
    pub fn none() -> Self {
        Self {
            currencies: BTreeSet::new(),
        }
    }

    pub fn contains(&self, currency: &str) -> bool {
        self.currencies.contains(currency)
    }

    pub fn is_empty(&self) -> bool {
        self.currencies.is_empty()
    }

    pub fn len(&self) -> usize {
        self.currencies.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.currencies.iter().map(String::as_str)
    }

    /// Selection from analyst input checked against `options`.
    /// An empty request selects every option.
    pub fn resolve(requested: Vec<String>, options: &[String]) -> Result<Self, UnknownCurrencies> {
        if requested.is_empty() {
            return Ok(Self::new(options.iter().cloned()));
        }

        let selection = Self::new(requested);
        let unknown: Vec<String> = selection.unknown(options).map(str::to_string).collect();
        if !unknown.is_empty() {
            return Err(UnknownCurrencies(unknown));
        }
        Ok(selection)
    }

    /// Currencies in this selection that are not among `options`.
    pub fn unknown<'a>(&'a self, options: &'a [String]) -> impl Iterator<Item = &'a str> + 'a {
        self.iter().filter(move |c| !options.iter().any(|o| o == c))
    }

    /// Rows whose payment currency is selected.
    pub fn apply<'a>(&self, view: &TableView<'a>) -> TableView<'a> {
        view.filter(|r| self.contains(&r.payment_currency))
    }
}
