use std::sync::Arc;

use crate::database::authors::AuthorStore;
use crate::database::books::BookStore;
use crate::database::tags::TagStore;
use crate::database::user_books::UserBookStore;
use crate::database::HealthProbe;
use crate::enrich::AuthorDirectory;
use crate::openlibrary::OpenLibraryClient;
use crate::session::SessionStore;

/// Shared handles for one running service instance.
///
/// Every external collaborator sits behind a trait object injected here, so
/// tests can run the full router against in-memory fakes.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<dyn SessionStore>,
    pub authors: Arc<dyn AuthorStore>,
    pub books: Arc<dyn BookStore>,
    pub tags: Arc<dyn TagStore>,
    pub user_books: Arc<dyn UserBookStore>,
    pub health: Arc<dyn HealthProbe>,
    pub author_directory: Arc<dyn AuthorDirectory>,
    pub openlibrary: Arc<OpenLibraryClient>,
}
