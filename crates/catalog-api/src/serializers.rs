//! JSON shapes returned by the REST API.

use catalog_core::{Author, Book, Genre, format_date};
use catalog_storage::{AuthorRecord, BookRecord};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookOut {
    pub id: u64,
    pub title: String,
    /// Author name, not id.
    pub author: String,
    pub genre: Genre,
    pub publication_date: String,
    pub isbn: String,
    /// Fixed two decimal places, e.g. `"12.50"`.
    pub price: String,
}

impl BookOut {
    pub fn new(book: &Book, author: &Author) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            author: author.name.clone(),
            genre: book.genre,
            publication_date: format_date(book.publication_date),
            isbn: book.isbn.clone(),
            price: format_price(book.price),
        }
    }
}

impl From<&BookRecord> for BookOut {
    fn from(record: &BookRecord) -> Self {
        Self::new(&record.book, &record.author)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthorOut {
    pub id: u64,
    pub name: String,
    pub published_books: Vec<BookOut>,
}

impl From<&AuthorRecord> for AuthorOut {
    fn from(record: &AuthorRecord) -> Self {
        Self {
            id: record.author.id,
            name: record.author.name.clone(),
            published_books: record
                .published_books
                .iter()
                .map(|book| BookOut::new(book, &record.author))
                .collect(),
        }
    }
}

pub fn format_price(price: Decimal) -> String {
    let mut price = price.round_dp(2);
    price.rescale(2);
    price.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn record() -> AuthorRecord {
        let author = Author::new("Mary Shelley").with_id(4);
        let book = Book::new(
            "Frankenstein",
            4,
            Genre::Horror,
            date!(1818 - 01 - 01),
            "9780486282114",
            Decimal::new(45, 1),
        )
        .with_id(9);
        AuthorRecord::new(author, vec![book])
    }

    #[test]
    fn book_out_uses_author_name_and_fixed_price() {
        let record = record();
        let out = BookOut::new(&record.published_books[0], &record.author);
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 9,
                "title": "Frankenstein",
                "author": "Mary Shelley",
                "genre": "hor",
                "publication_date": "1818-01-01",
                "isbn": "9780486282114",
                "price": "4.50"
            })
        );
    }

    #[test]
    fn author_out_nests_books() {
        let out = AuthorOut::from(&record());
        assert_eq!(out.published_books.len(), 1);
        assert_eq!(out.published_books[0].author, "Mary Shelley");
    }

    #[test]
    fn prices_round_to_cents() {
        assert_eq!(format_price(Decimal::new(12346, 3)), "12.35");
        assert_eq!(format_price(Decimal::from(7)), "7.00");
    }
}
