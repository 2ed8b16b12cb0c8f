use crate::coercion::{Choice, Coercion};
use crate::expression::FilterExpression;
use crate::filterset::FilterErrors;
use crate::lookup::Lookup;
use crate::params::{RequestParameters, SearchRequest};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Custom predicate replacing the generic column/lookup logic for one field.
///
/// Called with the request context, the field's raw value and every active
/// field of the form.
pub type SearchOverride =
    Arc<dyn Fn(&SearchRequest, &str, &ActiveFields) -> FilterExpression + Send + Sync>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Duplicate search field: {0}")]
    DuplicateField(String),
    #[error("Search field names must not be empty")]
    EmptyName,
}

/// A declared search input.
#[derive(Clone)]
pub struct SearchField {
    name: String,
    label: Option<String>,
    coercion: Coercion,
    column: Option<String>,
    lookup: Option<Lookup>,
    override_fn: Option<SearchOverride>,
}

impl SearchField {
    pub fn new(name: impl Into<String>, coercion: Coercion) -> Self {
        Self {
            name: name.into(),
            label: None,
            coercion,
            column: None,
            lookup: None,
            override_fn: None,
        }
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Target column, when it differs from the field name.
    #[must_use]
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    #[must_use]
    pub fn lookup(mut self, lookup: Lookup) -> Self {
        self.lookup = Some(lookup);
        self
    }

    #[must_use]
    pub fn with_override<F>(mut self, f: F) -> Self
    where
        F: Fn(&SearchRequest, &str, &ActiveFields) -> FilterExpression + Send + Sync + 'static,
    {
        self.override_fn = Some(Arc::new(f));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn coercion(&self) -> &Coercion {
        &self.coercion
    }

    pub fn override_fn(&self) -> Option<&SearchOverride> {
        self.override_fn.as_ref()
    }

    /// Column and lookup the generic predicate targets.
    ///
    /// Without an explicit lookup, a trailing lookup in the column path is
    /// honoured (`price__gte`); otherwise the match is exact.
    pub fn target(&self) -> (&str, Lookup) {
        let column = self.column.as_deref().unwrap_or(&self.name);
        match self.lookup {
            Some(lookup) => (column, lookup),
            None => Lookup::split_path(column),
        }
    }

    /// Label for rendering: explicit label, or the name humanised
    /// (`min_price` → `Min price`).
    pub fn display_label(&self) -> String {
        if let Some(label) = &self.label {
            return label.clone();
        }
        let spaced = self.name.replace("__", " ").replace('_', " ");
        let mut chars = spaced.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Debug for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchField")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("coercion", &self.coercion)
            .field("column", &self.column)
            .field("lookup", &self.lookup)
            .field("override", &self.override_fn.is_some())
            .finish()
    }
}

/// Non-empty raw values of declared fields, in schema order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ActiveFields(IndexMap<String, String>);

impl ActiveFields {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A field ready for rendering with its current value and errors.
#[derive(Debug, Clone, Serialize)]
pub struct BoundField {
    pub name: String,
    pub label: String,
    pub widget: &'static str,
    pub value: String,
    pub choices: Vec<Choice>,
    pub errors: Vec<String>,
}

/// Ordered, name-unique collection of search fields.
#[derive(Debug, Clone, Default)]
pub struct SearchForm {
    fields: Vec<SearchField>,
}

impl SearchForm {
    pub fn new(fields: Vec<SearchField>) -> Result<Self, FormError> {
        let mut seen: Vec<&str> = Vec::with_capacity(fields.len());
        for field in &fields {
            if field.name.is_empty() {
                return Err(FormError::EmptyName);
            }
            if seen.contains(&field.name.as_str()) {
                return Err(FormError::DuplicateField(field.name.clone()));
            }
            seen.push(&field.name);
        }
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[SearchField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&SearchField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Declared fields whose parameter is present and not blank.
    ///
    /// Keys that are not declared fields are never inspected.
    pub fn active_fields(&self, params: &RequestParameters) -> ActiveFields {
        let mut active = IndexMap::new();
        for field in &self.fields {
            if let Some(raw) = params.get(&field.name)
                && !raw.trim().is_empty()
            {
                active.insert(field.name.clone(), raw.to_string());
            }
        }
        ActiveFields(active)
    }

    /// Lenient query for `request`; see [`crate::advanced::build_query`].
    pub fn build_query(&self, request: &SearchRequest) -> FilterExpression {
        crate::advanced::build_query(self, request)
    }

    pub fn bind(&self, params: &RequestParameters, errors: Option<&FilterErrors>) -> Vec<BoundField> {
        self.fields
            .iter()
            .map(|field| BoundField {
                name: field.name.clone(),
                label: field.display_label(),
                widget: field.coercion.widget(),
                value: params.get(&field.name).unwrap_or_default().to_string(),
                choices: field.coercion.options(),
                errors: errors
                    .and_then(|e| e.get(&field.name))
                    .map(<[String]>::to_vec)
                    .unwrap_or_default(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> SearchForm {
        SearchForm::new(vec![
            SearchField::new("title", Coercion::Text).lookup(Lookup::IContains),
            SearchField::new("min_price", Coercion::Decimal)
                .column("price")
                .lookup(Lookup::Gte),
            SearchField::new("author", Coercion::Text).column("author__name__icontains"),
        ])
        .unwrap()
    }

    #[test]
    fn duplicate_and_empty_names_are_rejected() {
        let dup = SearchForm::new(vec![
            SearchField::new("genre", Coercion::Text),
            SearchField::new("genre", Coercion::Integer),
        ]);
        assert_eq!(dup.unwrap_err(), FormError::DuplicateField("genre".into()));
        let empty = SearchForm::new(vec![SearchField::new("", Coercion::Text)]);
        assert_eq!(empty.unwrap_err(), FormError::EmptyName);
    }

    #[test]
    fn active_fields_skip_absent_empty_and_unknown() {
        let params = RequestParameters::parse("title=&min_price=5&unknown=1&author=le");
        let active = form().active_fields(&params);
        assert_eq!(active.len(), 2);
        assert_eq!(active.get("min_price"), Some("5"));
        assert!(!active.contains("title"));
        assert!(!active.contains("unknown"));
        let names: Vec<&str> = active.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["min_price", "author"]);
    }

    #[test]
    fn blank_values_count_as_absent() {
        let params = RequestParameters::parse("title=%20%20&author=%09&min_price=+5+");
        let active = form().active_fields(&params);
        assert_eq!(active.len(), 1);
        assert_eq!(active.get("min_price"), Some(" 5 "));
        assert!(build_query_is_all(&form(), "title=%20&author=+"));
    }

    fn build_query_is_all(form: &SearchForm, query: &str) -> bool {
        let request = SearchRequest::new("/", RequestParameters::parse(query));
        form.build_query(&request).is_all()
    }

    #[test]
    fn target_resolution() {
        let form = form();
        assert_eq!(form.field("title").unwrap().target(), ("title", Lookup::IContains));
        assert_eq!(form.field("min_price").unwrap().target(), ("price", Lookup::Gte));
        assert_eq!(
            form.field("author").unwrap().target(),
            ("author__name", Lookup::IContains)
        );
    }

    #[test]
    fn bind_carries_values_labels_and_widgets() {
        let params = RequestParameters::parse("min_price=7");
        let bound = form().bind(&params, None);
        assert_eq!(bound.len(), 3);
        assert_eq!(bound[1].label, "Min price");
        assert_eq!(bound[1].value, "7");
        assert_eq!(bound[1].widget, "number");
        assert_eq!(bound[0].value, "");
    }
}
