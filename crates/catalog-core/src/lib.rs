pub mod date;
pub mod error;
pub mod genre;
pub mod model;

pub use date::{format_date, parse_date};
pub use error::{CoreError, Result};
pub use genre::Genre;
pub use model::{Author, Book, MAX_ISBN_LEN, MAX_NAME_LEN, MAX_TITLE_LEN};
