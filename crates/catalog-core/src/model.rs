use crate::error::{CoreError, Result};
use crate::genre::Genre;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_TITLE_LEN: usize = 100;
pub const MAX_ISBN_LEN: usize = 13;

/// Prices carry at most five digits, two of them after the decimal point.
const PRICE_SCALE: u32 = 2;
const PRICE_MAX_DIGITS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Primary key; `0` means "not yet assigned".
    pub id: u64,
    pub name: String,
}

impl Author {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_len("name", &self.name, MAX_NAME_LEN)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: u64,
    pub title: String,
    pub author_id: u64,
    pub genre: Genre,
    #[serde(with = "crate::date::iso")]
    pub publication_date: Date,
    pub isbn: String,
    pub price: Decimal,
}

impl Book {
    pub fn new(
        title: impl Into<String>,
        author_id: u64,
        genre: Genre,
        publication_date: Date,
        isbn: impl Into<String>,
        price: Decimal,
    ) -> Self {
        let mut book = Self {
            id: 0,
            title: title.into(),
            author_id,
            genre,
            publication_date,
            isbn: isbn.into(),
            price,
        };
        book.normalize_price();
        book
    }

    #[must_use]
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    /// Pad the price to two decimal places so it renders as `12.50`.
    pub fn normalize_price(&mut self) {
        if self.price.scale() < PRICE_SCALE {
            self.price.rescale(PRICE_SCALE);
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_len("title", &self.title, MAX_TITLE_LEN)?;
        check_len("isbn", &self.isbn, MAX_ISBN_LEN)?;
        if self.price.scale() > PRICE_SCALE {
            return Err(CoreError::invalid_field(
                "price",
                format!("at most {PRICE_SCALE} decimal places allowed"),
            ));
        }
        let limit = Decimal::from(10u64.pow(PRICE_MAX_DIGITS - PRICE_SCALE));
        if self.price.abs() >= limit {
            return Err(CoreError::invalid_field(
                "price",
                format!("at most {PRICE_MAX_DIGITS} digits allowed"),
            ));
        }
        Ok(())
    }
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CoreError::invalid_field(field, "must not be blank"));
    }
    if value.chars().count() > max {
        return Err(CoreError::invalid_field(
            field,
            format!("at most {max} characters"),
        ));
    }
    Ok(())
}
