//! Lenient query building for admin advanced search.

use crate::coercion::CoercionError;
use crate::expression::FilterExpression;
use crate::form::{ActiveFields, SearchField, SearchForm};
use crate::params::SearchRequest;
use tracing::debug;

/// Build the conjunction of every active field's predicate.
///
/// Fields absent from the request, or present with an empty value, add
/// nothing. A value that fails coercion drops its field's constraint and is
/// logged at `debug`. Unknown parameters are ignored.
pub fn build_query(form: &SearchForm, request: &SearchRequest) -> FilterExpression {
    let active = form.active_fields(&request.params);
    query_from_active(form, request, &active)
}

/// Same as [`build_query`] with the active fields already computed.
pub fn query_from_active(
    form: &SearchForm,
    request: &SearchRequest,
    active: &ActiveFields,
) -> FilterExpression {
    let mut query = FilterExpression::All;

    for field in form.fields() {
        let Some(raw) = active.get(field.name()) else {
            continue;
        };

        if let Some(custom) = field.override_fn() {
            query = query.and(custom(request, raw, active));
            continue;
        }

        match field_predicate(field, raw) {
            Ok(predicate) => query = query.and(predicate),
            Err(error) => {
                debug!(
                    field = field.name(),
                    value = raw,
                    error = %error,
                    request_id = request.request_id.as_deref().unwrap_or("-"),
                    "skipping advanced search field with invalid value"
                );
            }
        }
    }

    query
}

/// Generic predicate for one field: coerce `raw`, then compare the target
/// column through the field's lookup.
pub fn field_predicate(field: &SearchField, raw: &str) -> Result<FilterExpression, CoercionError> {
    let value = field.coercion().coerce(raw)?;
    let (column, lookup) = field.target();
    Ok(FilterExpression::predicate(column, lookup, value))
}
