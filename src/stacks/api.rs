//! Facade for UI clients.
//!
//! A thin layer over the catalog: no business logic, no I/O. Its one real
//! job is normalizing user-facing book selectors to ids. A selector is
//! whatever the user typed to name a book:
//!
//! - a 1-based list position (`2`),
//! - a full book id,
//! - or a unique prefix of one (`3f2a`).

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::catalog::{Applied, Catalog, CatalogStats};
use crate::error::{Result, StacksError};
use crate::model::{Book, BookDraft, BookPatch};
use crate::store::KeyValueStore;

pub struct StacksApi<S: KeyValueStore> {
    catalog: Catalog<S>,
}

impl<S: KeyValueStore> StacksApi<S> {
    pub fn load(store: S) -> Result<Self> {
        Ok(Self {
            catalog: Catalog::load(store)?,
        })
    }

    pub fn books(&self) -> &[Book] {
        self.catalog.books()
    }

    pub fn stats(&self) -> CatalogStats {
        self.catalog.stats()
    }

    pub fn search(&self, query: &str) -> Vec<&Book> {
        self.catalog.search_books(query)
    }

    pub fn add_book(&mut self, draft: BookDraft) -> Result<Applied> {
        self.catalog.add_book(draft)
    }

    pub fn update_book(&mut self, selector: &str, patch: &BookPatch) -> Result<Applied> {
        let id = self.resolve(selector)?;
        self.catalog.update_book(id, patch)
    }

    pub fn delete_book(&mut self, selector: &str) -> Result<Applied> {
        let id = self.resolve(selector)?;
        self.catalog.delete_book(id)
    }

    pub fn issue_book(&mut self, selector: &str, issued_to: &str) -> Result<Applied> {
        let id = self.resolve(selector)?;
        self.catalog.issue_book(id, issued_to)
    }

    pub fn return_book(&mut self, selector: &str) -> Result<Applied> {
        let id = self.resolve(selector)?;
        self.catalog.return_book(id)
    }

    pub fn flag_overdue(&mut self, now: DateTime<Utc>) -> Result<Vec<Uuid>> {
        self.catalog.flag_overdue(now)
    }

    pub fn merge_books(&mut self, incoming: Vec<Book>) -> Result<usize> {
        self.catalog.merge_books(incoming)
    }

    /// Normalize a selector to a book id against the current listing.
    pub fn resolve(&self, selector: &str) -> Result<Uuid> {
        let selector = selector.trim();
        if selector.is_empty() {
            return Err(StacksError::Api("Empty book selector".to_string()));
        }

        if let Ok(position) = selector.parse::<usize>() {
            return position
                .checked_sub(1)
                .and_then(|i| self.books().get(i))
                .map(|book| book.id)
                .ok_or_else(|| {
                    StacksError::Api(format!("No book at position {}", position))
                });
        }

        if let Ok(id) = Uuid::parse_str(selector) {
            return Ok(id);
        }

        let needle = selector.to_lowercase();
        let mut matches = self
            .books()
            .iter()
            .filter(|book| book.id.to_string().starts_with(&needle));
        match (matches.next(), matches.next()) {
            (Some(book), None) => Ok(book.id),
            (Some(_), Some(_)) => Err(StacksError::Api(format!(
                "Book selector '{}' is ambiguous",
                selector
            ))),
            (None, _) => Err(StacksError::Api(format!(
                "No book matches '{}'",
                selector
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Lending};
    use crate::store::memory::InMemoryStore;

    fn api_with(titles: &[&str]) -> StacksApi<InMemoryStore> {
        let mut api = StacksApi::load(InMemoryStore::new()).unwrap();
        for title in titles {
            api.add_book(BookDraft {
                title: title.to_string(),
                author: "Someone".into(),
                isbn: "1".into(),
                category: Some(Category::Fiction),
                published_year: 2000,
            })
            .unwrap();
        }
        api
    }

    #[test]
    fn resolves_one_based_positions() {
        let api = api_with(&["A", "B"]);
        assert_eq!(api.resolve("1").unwrap(), api.books()[0].id);
        assert_eq!(api.resolve("2").unwrap(), api.books()[1].id);
        assert!(api.resolve("0").is_err());
        assert!(api.resolve("3").is_err());
    }

    #[test]
    fn resolves_full_ids_and_unique_prefixes() {
        let api = api_with(&["A", "B"]);
        let id = api.books()[0].id;
        assert_eq!(api.resolve(&id.to_string()).unwrap(), id);

        let prefix = &id.to_string()[..8];
        // Prefixes of two random v4 ids virtually never collide at 8 chars.
        assert_eq!(api.resolve(prefix).unwrap(), id);
    }

    #[test]
    fn ambiguous_prefix_is_an_error() {
        let mut api = api_with(&[]);
        let twin = |suffix: &str| {
            let mut book = Book::new(
                "Twin".into(),
                "Someone".into(),
                "1".into(),
                Category::Fiction,
                2000,
            );
            book.id = Uuid::parse_str(&format!("aaaaaaaa-0000-4000-8000-00000000000{}", suffix))
                .unwrap();
            book.lending = Lending::Available;
            book
        };
        api.merge_books(vec![twin("1"), twin("2")]).unwrap();

        assert!(matches!(
            api.resolve("aaaa"),
            Err(StacksError::Api(msg)) if msg.contains("ambiguous")
        ));
        assert!(api.resolve("aaaaaaaa-0000-4000-8000-000000000001").is_ok());
    }

    #[test]
    fn unknown_selector_is_an_error() {
        let api = api_with(&["A"]);
        assert!(api.resolve("zzz").is_err());
        assert!(api.resolve("").is_err());
    }

    #[test]
    fn operations_accept_selectors() {
        let mut api = api_with(&["A", "B"]);
        api.issue_book("2", "Alice").unwrap();
        assert_eq!(api.books()[1].loan().unwrap().issued_to, "Alice");

        api.return_book("2").unwrap();
        assert!(api.books()[1].loan().is_none());

        api.delete_book("1").unwrap();
        assert_eq!(api.books().len(), 1);
        assert_eq!(api.books()[0].title, "B");
    }
}
