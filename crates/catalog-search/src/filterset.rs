use crate::advanced::field_predicate;
use crate::expression::FilterExpression;
use crate::form::SearchForm;
use crate::params::{RequestParameters, SearchRequest};
use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

/// Validation messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[serde(transparent)]
#[error("invalid filter parameters: {}", self.summary())]
pub struct FilterErrors(IndexMap<String, Vec<String>>);

impl FilterErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    fn summary(&self) -> String {
        self.0
            .iter()
            .map(|(field, messages)| format!("{field}: {}", messages.join(" ")))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Strict, named filter over one model's listing.
///
/// Unlike advanced search, a value that cannot be coerced is an error for
/// its field and the whole filter fails.
#[derive(Debug, Clone)]
pub struct FilterSet {
    name: &'static str,
    form: SearchForm,
}

impl FilterSet {
    pub fn new(name: &'static str, form: SearchForm) -> Self {
        Self { name, form }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn form(&self) -> &SearchForm {
        &self.form
    }

    pub fn filter(&self, params: &RequestParameters) -> Result<FilterExpression, FilterErrors> {
        self.filter_request(&SearchRequest::new("", params.clone()))
    }

    pub fn filter_request(&self, request: &SearchRequest) -> Result<FilterExpression, FilterErrors> {
        let active = self.form.active_fields(&request.params);
        let mut query = FilterExpression::All;
        let mut errors = FilterErrors::new();

        for field in self.form.fields() {
            let Some(raw) = active.get(field.name()) else {
                continue;
            };
            if let Some(custom) = field.override_fn() {
                query = query.and(custom(request, raw, &active));
                continue;
            }
            match field_predicate(field, raw) {
                Ok(predicate) => query = query.and(predicate),
                Err(error) => errors.add(field.name(), error.to_string()),
            }
        }

        if errors.is_empty() {
            Ok(query)
        } else {
            tracing::debug!(filter = self.name, errors = %errors, "rejected filter parameters");
            Err(errors)
        }
    }
}
