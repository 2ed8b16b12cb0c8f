//! Admin change lists with advanced search.
//!
//! Each [`ModelAdmin`] declares the advanced search form, sidebar list
//! filters and keyword search fields for one model. A change-list request
//! combines all three:
//!
//! ```text
//! advanced search  AND  list filters  AND  keyword search
//! ```
//!
//! Parameters that belong to none of them (other than `q` and `p`) are
//! rejected.

pub mod books;
mod changelist;

pub use changelist::{ChangeList, FilterChoice, HiddenField, Page, RenderedListFilter};

use catalog_api::ApiError;
use catalog_search::{
    ActiveFields, Coercion, CoercionError, FilterExpression, FormError, Lookup, SearchForm,
    SearchRequest, lookup::LOOKUP_SEP, query_from_active,
};
use thiserror::Error;

/// Keyword search parameter.
pub const SEARCH_VAR: &str = "q";
/// 1-based page number parameter.
pub const PAGE_VAR: &str = "p";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdminError {
    #[error("Filtering by {0} not allowed")]
    DisallowedLookup(String),
    #[error("Invalid value for {lookup}: {message}")]
    InvalidFilterValue { lookup: String, message: String },
}

impl From<AdminError> for ApiError {
    fn from(err: AdminError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

/// Sidebar filter on one column.
#[derive(Debug, Clone)]
pub struct ListFilter {
    pub field: &'static str,
    pub title: &'static str,
    pub coercion: Coercion,
}

impl ListFilter {
    pub fn new(field: &'static str, title: &'static str, coercion: Coercion) -> Self {
        Self {
            field,
            title,
            coercion,
        }
    }

    /// `genre` and `genre__<lookup>` are accepted for a filter on `genre`.
    pub fn accepts(&self, lookup: &str) -> bool {
        if lookup == self.field {
            return true;
        }
        lookup
            .strip_prefix(self.field)
            .and_then(|rest| rest.strip_prefix(LOOKUP_SEP))
            .is_some_and(|suffix| Lookup::parse(suffix).is_some())
    }

    fn predicate(&self, lookup: &str, raw: &str) -> Result<FilterExpression, CoercionError> {
        let (column, op) = Lookup::split_path(lookup);
        let value = match op {
            Lookup::In | Lookup::Range => Coercion::list_of(self.coercion.clone()).coerce(raw)?,
            Lookup::IsNull => Coercion::Boolean.coerce(raw)?,
            _ => self.coercion.coerce(raw)?,
        };
        Ok(FilterExpression::predicate(column, op, value))
    }
}

/// Parsed change-list request.
#[derive(Debug, Clone)]
pub struct ChangeListQuery {
    pub filter: FilterExpression,
    pub active: ActiveFields,
    pub search_term: String,
    pub page: usize,
}

#[derive(Debug, Clone)]
pub struct ModelAdmin {
    pub app_label: &'static str,
    pub model_name: &'static str,
    pub verbose_name_plural: &'static str,
    /// Column headers, in the order rows are produced.
    pub list_display: Vec<&'static str>,
    pub search_form: Option<SearchForm>,
    pub list_filter: Vec<ListFilter>,
    pub search_fields: Vec<&'static str>,
    pub list_per_page: usize,
}

impl ModelAdmin {
    pub fn path(&self) -> String {
        format!("/admin/{}/{}/", self.app_label, self.model_name)
    }

    /// Whether `lookup` may appear in a change-list query string.
    pub fn lookup_allowed(&self, lookup: &str) -> bool {
        if let Some(form) = &self.search_form
            && form.contains(lookup)
        {
            return true;
        }
        self.list_filter.iter().any(|f| f.accepts(lookup))
    }

    pub fn changelist_query(&self, request: &SearchRequest) -> Result<ChangeListQuery, AdminError> {
        let params = &request.params;

        for key in params.keys() {
            if key == SEARCH_VAR || key == PAGE_VAR {
                continue;
            }
            if !self.lookup_allowed(key) {
                return Err(AdminError::DisallowedLookup(key.to_string()));
            }
        }

        let (advanced, active) = match &self.search_form {
            Some(form) => {
                let active = form.active_fields(params);
                (query_from_active(form, request, &active), active)
            }
            None => (FilterExpression::All, ActiveFields::default()),
        };

        let mut list_filters = FilterExpression::All;
        for key in params.keys() {
            if key == SEARCH_VAR
                || key == PAGE_VAR
                || self.search_form.as_ref().is_some_and(|f| f.contains(key))
            {
                continue;
            }
            let raw = params.get(key).unwrap_or_default();
            if raw.trim().is_empty() {
                continue;
            }
            if let Some(list_filter) = self.list_filter.iter().find(|f| f.accepts(key)) {
                let predicate =
                    list_filter
                        .predicate(key, raw)
                        .map_err(|e| AdminError::InvalidFilterValue {
                            lookup: key.to_string(),
                            message: e.to_string(),
                        })?;
                list_filters = list_filters.and(predicate);
            }
        }

        let search_term = params.get(SEARCH_VAR).unwrap_or_default().trim().to_string();
        let keyword = self.keyword_query(&search_term);

        let page = params
            .get(PAGE_VAR)
            .and_then(|p| p.trim().parse::<usize>().ok())
            .unwrap_or(1)
            .max(1);

        Ok(ChangeListQuery {
            filter: advanced.and(list_filters).and(keyword),
            active,
            search_term,
            page,
        })
    }

    /// Each whitespace-separated term must match at least one search field.
    pub fn keyword_query(&self, term: &str) -> FilterExpression {
        if self.search_fields.is_empty() {
            return FilterExpression::All;
        }
        FilterExpression::all_of(term.split_whitespace().map(|word| {
            FilterExpression::any_of(self.search_fields.iter().map(|field| {
                FilterExpression::predicate(*field, Lookup::IContains, word)
            }))
        }))
    }
}

/// Every registered change list.
#[derive(Debug, Clone)]
pub struct AdminSite {
    pub books: ModelAdmin,
    pub authors: ModelAdmin,
}

impl AdminSite {
    pub fn new(list_per_page: usize) -> Result<Self, FormError> {
        Ok(Self {
            books: books::book_admin(list_per_page)?,
            authors: books::author_admin(list_per_page)?,
        })
    }
}
