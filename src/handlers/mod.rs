pub mod authors;
pub mod books;
pub mod query;
pub mod tags;
pub mod user_books;
