//! Filter sets for the public list pages and the REST API.

use catalog_core::Genre;
use catalog_search::{Coercion, FilterSet, FormError, Lookup, SearchField, SearchForm};

/// `name__icontains`.
pub fn author_filter() -> Result<FilterSet, FormError> {
    let form = SearchForm::new(vec![
        SearchField::new("name__icontains", Coercion::Text).label("Name contains"),
    ])?;
    Ok(FilterSet::new("AuthorFilter", form))
}

/// Book filters: declared lookups on the model's own columns plus the
/// `author`, `min_price` and `max_price` shortcuts.
pub fn book_filter() -> Result<FilterSet, FormError> {
    let form = SearchForm::new(vec![
        SearchField::new("title__icontains", Coercion::Text).label("Title contains"),
        SearchField::new("genre", Coercion::choices(Genre::choices())).label("Genre"),
        SearchField::new("publication_date__year", Coercion::Integer)
            .label("Publication date (year)"),
        SearchField::new(
            "publication_date__range",
            Coercion::range_of(Coercion::Date),
        )
        .label("Publication date between"),
        SearchField::new("isbn__iexact", Coercion::Text).label("ISBN"),
        SearchField::new("price", Coercion::Decimal).label("Price"),
        SearchField::new("author", Coercion::Text)
            .column("author__name")
            .lookup(Lookup::IContains)
            .label("Author"),
        SearchField::new("min_price", Coercion::Decimal)
            .column("price")
            .lookup(Lookup::Gte),
        SearchField::new("max_price", Coercion::Decimal)
            .column("price")
            .lookup(Lookup::Lte),
    ])?;
    Ok(FilterSet::new("BookFilter", form))
}

/// Filter sets built once at startup.
#[derive(Debug, Clone)]
pub struct Filters {
    pub authors: FilterSet,
    pub books: FilterSet,
}

impl Filters {
    pub fn new() -> Result<Self, FormError> {
        Ok(Self {
            authors: author_filter()?,
            books: book_filter()?,
        })
    }
}
