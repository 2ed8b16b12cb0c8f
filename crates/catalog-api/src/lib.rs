//! API types for the catalog server: the error type mapped onto HTTP
//! responses and the JSON shapes of authors and books.

mod error;
pub mod serializers;

pub use error::{ApiError, ErrorBody};
pub use serializers::{AuthorOut, BookOut};
