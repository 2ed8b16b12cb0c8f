//! Listing types handed out by storage backends.

use catalog_core::{Author, Book};
use catalog_search::{Record, Value};
use serde::Serialize;

/// A book joined with its author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookRecord {
    pub book: Book,
    pub author: Author,
}

impl BookRecord {
    pub fn new(book: Book, author: Author) -> Self {
        Self { book, author }
    }

    pub fn id(&self) -> u64 {
        self.book.id
    }
}

/// Values of the book's own columns. `author` resolves to the foreign key.
fn book_column(book: &Book, column: &str) -> Option<Value> {
    let value = match column {
        "id" | "pk" => Value::from(book.id),
        "title" => Value::text(&book.title),
        "genre" => Value::text(book.genre.code()),
        "publication_date" => Value::Date(book.publication_date),
        "isbn" => Value::text(&book.isbn),
        "price" => Value::Decimal(book.price),
        "author" | "author_id" => Value::from(book.author_id),
        _ => return None,
    };
    Some(value)
}

fn author_column(author: &Author, column: &str) -> Option<Value> {
    match column {
        "id" | "pk" => Some(Value::from(author.id)),
        "name" => Some(Value::text(&author.name)),
        _ => None,
    }
}

impl Record for BookRecord {
    fn values(&self, path: &[&str]) -> Vec<Value> {
        match path {
            [column] => book_column(&self.book, column).into_iter().collect(),
            ["author", column] => author_column(&self.author, column).into_iter().collect(),
            _ => Vec::new(),
        }
    }
}

/// One published book seen from its author.
struct PublishedBook<'a>(&'a Book);

impl Record for PublishedBook<'_> {
    fn values(&self, path: &[&str]) -> Vec<Value> {
        match path {
            [column] => book_column(self.0, column).into_iter().collect(),
            _ => Vec::new(),
        }
    }
}

/// An author with every book they published, ordered by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorRecord {
    pub author: Author,
    pub published_books: Vec<Book>,
}

impl AuthorRecord {
    pub fn new(author: Author, published_books: Vec<Book>) -> Self {
        Self {
            author,
            published_books,
        }
    }

    pub fn id(&self) -> u64 {
        self.author.id
    }
}

impl Record for AuthorRecord {
    /// `published_books` is a reverse relation: `published_books__title`
    /// yields one value per book, and `published_books` alone yields the
    /// book ids.
    fn values(&self, path: &[&str]) -> Vec<Value> {
        match path {
            ["published_books"] => self
                .published_books
                .iter()
                .map(|b| Value::from(b.id))
                .collect(),
            [column] => author_column(&self.author, column).into_iter().collect(),
            ["published_books", column] => self
                .published_books
                .iter()
                .filter_map(|b| book_column(b, column))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn related(&self, relation: &str) -> Option<Vec<Box<dyn Record + '_>>> {
        match relation {
            "published_books" => Some(
                self.published_books
                    .iter()
                    .map(|b| Box::new(PublishedBook(b)) as Box<dyn Record + '_>)
                    .collect(),
            ),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::Genre;
    use catalog_search::{FilterExpression, Lookup};
    use rust_decimal::Decimal;
    use time::macros::date;

    fn le_guin() -> Author {
        Author::new("Ursula K. Le Guin").with_id(1)
    }

    fn book(id: u64, title: &str, genre: Genre) -> Book {
        Book::new(title, 1, genre, date!(1969 - 03 - 01), "9780441478125", Decimal::new(999, 2))
            .with_id(id)
    }

    #[test]
    fn book_record_resolves_author_relation() {
        let record = BookRecord::new(book(2, "The Left Hand of Darkness", Genre::ScienceFiction), le_guin());
        let by_author = FilterExpression::predicate("author__name", Lookup::IContains, "le guin");
        assert!(by_author.matches(&record));
        let by_genre = FilterExpression::predicate("genre", Lookup::Exact, "sci");
        assert!(by_genre.matches(&record));
        let by_year = FilterExpression::predicate("publication_date", Lookup::Year, 1969i64);
        assert!(by_year.matches(&record));
        assert_eq!(record.values(&["author", "id"]), vec![Value::Integer(1)]);
        assert!(record.values(&["publisher"]).is_empty());
    }

    #[test]
    fn author_record_matches_any_published_book() {
        let record = AuthorRecord::new(
            le_guin(),
            vec![
                book(1, "A Wizard of Earthsea", Genre::Fantasy),
                book(2, "The Left Hand of Darkness", Genre::ScienceFiction),
            ],
        );
        let fantasy = FilterExpression::predicate("published_books__genre", Lookup::Exact, "fan");
        assert!(fantasy.matches(&record));
        let horror = FilterExpression::predicate("published_books__genre", Lookup::Exact, "hor");
        assert!(!horror.matches(&record));
        assert_eq!(record.values(&["published_books"]).len(), 2);
    }

    #[test]
    fn author_without_books_has_null_relation() {
        let record = AuthorRecord::new(le_guin(), Vec::new());
        let none = FilterExpression::predicate("published_books", Lookup::IsNull, true);
        assert!(none.matches(&record));
    }

    #[test]
    fn conjoined_book_conditions_must_match_the_same_book() {
        let record = AuthorRecord::new(
            le_guin(),
            vec![
                book(1, "A Wizard of Earthsea", Genre::Fantasy),
                book(2, "The Left Hand of Darkness", Genre::ScienceFiction),
            ],
        );
        let wizard_sci = FilterExpression::predicate("published_books__title", Lookup::IContains, "wizard")
            .and(FilterExpression::predicate("published_books__genre", Lookup::Exact, "sci"));
        assert!(!wizard_sci.matches(&record));

        let wizard_fan = FilterExpression::predicate("published_books__title", Lookup::IContains, "wizard")
            .and(FilterExpression::predicate("published_books__genre", Lookup::Exact, "fan"))
            .and(FilterExpression::predicate("name", Lookup::IContains, "guin"));
        assert!(wizard_fan.matches(&record));
    }
}
