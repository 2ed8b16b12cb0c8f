//! Query building for catalog listings.
//!
//! A [`SearchForm`] is a statically declared list of [`SearchField`]
//! descriptors. Request parameters are matched against the form and turned
//! into a [`FilterExpression`], which storage backends evaluate against
//! records through the [`Record`] trait.
//!
//! Two policies share the same descriptors:
//!
//! - [`advanced::build_query`] is lenient: a value that cannot be coerced
//!   drops that field's constraint.
//! - [`FilterSet::filter`] is strict: invalid values are reported per field.
//!
//! ```ignore
//! use catalog_search::{Coercion, Lookup, RequestParameters, SearchField, SearchForm, SearchRequest};
//!
//! let form = SearchForm::new(vec![
//!     SearchField::new("genre", Coercion::Text),
//!     SearchField::new("min_price", Coercion::Decimal).column("price").lookup(Lookup::Gte),
//! ])?;
//! let request = SearchRequest::new("/admin/books/book/", RequestParameters::parse("genre=fan&min_price=5"));
//! let query = form.build_query(&request);
//! ```

pub mod advanced;
pub mod coercion;
pub mod expression;
pub mod filterset;
pub mod form;
pub mod lookup;
pub mod params;
pub mod value;

pub use advanced::{build_query, query_from_active};
pub use coercion::{Choice, Coercion, CoercionError};
pub use expression::{FilterExpression, Predicate, Record};
pub use filterset::{FilterErrors, FilterSet};
pub use form::{ActiveFields, BoundField, FormError, SearchField, SearchForm, SearchOverride};
pub use lookup::Lookup;
pub use params::{RequestParameters, SearchRequest};
pub use value::Value;
