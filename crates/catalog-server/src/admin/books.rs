//! Change lists for the `books` app.

use catalog_api::serializers::format_price;
use catalog_core::{Genre, format_date};
use catalog_search::{
    ActiveFields, Coercion, FilterExpression, FormError, Lookup, SearchField, SearchForm,
    SearchRequest, Value,
};
use catalog_storage::{AuthorRecord, BookRecord};
use time::{Date, Month};

use super::{ListFilter, ModelAdmin};

pub fn book_admin(list_per_page: usize) -> Result<ModelAdmin, FormError> {
    let search_form = SearchForm::new(vec![
        SearchField::new("title", Coercion::Text).lookup(Lookup::IContains),
        SearchField::new("author", Coercion::Text)
            .column("author__name")
            .lookup(Lookup::IContains),
        SearchField::new("genre", Coercion::choices(Genre::choices())),
        SearchField::new("published_after", Coercion::Date)
            .column("publication_date")
            .lookup(Lookup::Gte),
        SearchField::new("published_before", Coercion::Date)
            .column("publication_date")
            .lookup(Lookup::Lte),
        SearchField::new("min_price", Coercion::Decimal)
            .column("price")
            .lookup(Lookup::Gte),
        SearchField::new("max_price", Coercion::Decimal)
            .column("price")
            .lookup(Lookup::Lte),
        SearchField::new("decade", Coercion::Integer)
            .label("Published in decade")
            .with_override(search_decade),
    ])?;

    Ok(ModelAdmin {
        app_label: "books",
        model_name: "book",
        verbose_name_plural: "books",
        list_display: vec![
            "ID",
            "Title",
            "Author",
            "Genre",
            "Publication date",
            "ISBN",
            "Price",
        ],
        search_form: Some(search_form),
        list_filter: vec![ListFilter::new(
            "genre",
            "Genre",
            Coercion::choices(Genre::choices()),
        )],
        search_fields: vec!["title", "author__name", "isbn"],
        list_per_page,
    })
}

pub fn author_admin(list_per_page: usize) -> Result<ModelAdmin, FormError> {
    let search_form = SearchForm::new(vec![
        SearchField::new("name", Coercion::Text).lookup(Lookup::IContains),
        SearchField::new("book_title", Coercion::Text)
            .column("published_books__title")
            .lookup(Lookup::IContains)
            .label("Wrote a book titled"),
        SearchField::new("book_genre", Coercion::choices(Genre::choices()))
            .column("published_books__genre")
            .label("Wrote in genre"),
    ])?;

    Ok(ModelAdmin {
        app_label: "books",
        model_name: "author",
        verbose_name_plural: "authors",
        list_display: vec!["ID", "Name", "Books"],
        search_form: Some(search_form),
        list_filter: Vec::new(),
        search_fields: vec!["name"],
        list_per_page,
    })
}

/// `decade=1960` matches books published from 1960-01-01 to 1969-12-31.
/// Any year inside the decade is accepted; input that is not a year, or a
/// decade outside the calendar's range, matches everything.
fn search_decade(request: &SearchRequest, raw: &str, _active: &ActiveFields) -> FilterExpression {
    let request_id = request.request_id.as_deref().unwrap_or("-");
    let Ok(year) = raw.trim().parse::<i32>() else {
        tracing::debug!(value = raw, request_id, "ignoring invalid decade");
        return FilterExpression::All;
    };
    let bounds = year
        .checked_sub(year.rem_euclid(10))
        .and_then(|start| Some((start, start.checked_add(9)?)))
        .and_then(|(start, end)| {
            Some((
                Date::from_calendar_date(start, Month::January, 1).ok()?,
                Date::from_calendar_date(end, Month::December, 31).ok()?,
            ))
        });
    match bounds {
        Some((first, last)) => FilterExpression::predicate(
            "publication_date",
            Lookup::Range,
            Value::List(vec![Value::Date(first), Value::Date(last)]),
        ),
        None => {
            tracing::debug!(value = raw, request_id, "decade out of range");
            FilterExpression::All
        }
    }
}

pub fn book_row(record: &BookRecord) -> Vec<String> {
    let book = &record.book;
    vec![
        book.id.to_string(),
        book.title.clone(),
        record.author.name.clone(),
        book.genre.label().to_string(),
        format_date(book.publication_date),
        book.isbn.clone(),
        format_price(book.price),
    ]
}

pub fn author_row(record: &AuthorRecord) -> Vec<String> {
    vec![
        record.author.id.to_string(),
        record.author.name.clone(),
        record.published_books.len().to_string(),
    ]
}
