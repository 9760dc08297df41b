//! The catalog owns the book collection.
//!
//! All mutations go through here: the collection is held in memory in
//! insertion order, and every mutating operation writes the whole updated
//! collection through the storage port before the in-memory list is
//! replaced. A failed write therefore leaves both sides as they were.
//!
//! Each mutation also produces a [`Notice`] describing what happened; the
//! presentation layer decides how to surface it (toast, terminal line, ...).

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{Result, StacksError};
use crate::model::{Book, BookDraft, BookPatch, BookStatus, Lending, Loan};
use crate::search;
use crate::store::KeyValueStore;

/// Storage key for the whole collection.
pub const BOOKS_KEY: &str = "library-books";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Default,
    Destructive,
}

/// Human-readable event emitted once per mutating operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notice {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Default,
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            severity: Severity::Destructive,
            ..Self::new(title, description)
        }
    }
}

/// Outcome of a mutating operation: the book it touched and the notice.
/// For deletions the book is the removed record.
#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    pub book: Book,
    pub notice: Notice,
}

/// Aggregate counters over the unfiltered collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogStats {
    pub total: usize,
    pub available: usize,
    pub issued: usize,
    pub overdue: usize,
}

pub struct Catalog<S: KeyValueStore> {
    store: S,
    books: Vec<Book>,
}

impl<S: KeyValueStore> Catalog<S> {
    /// Load the collection from the store. An absent key is an empty catalog.
    pub fn load(store: S) -> Result<Self> {
        let books = match store.read(BOOKS_KEY)? {
            Some(value) => serde_json::from_value(value)?,
            None => Vec::new(),
        };
        Ok(Self { store, books })
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn get(&self, id: Uuid) -> Option<&Book> {
        self.books.iter().find(|book| book.id == id)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Append a new book built from the draft. The draft is not form-validated
    /// here (that is the caller's job before submitting), but a book cannot
    /// exist without a category, so an unset one is rejected rather than stored.
    pub fn add_book(&mut self, draft: BookDraft) -> Result<Applied> {
        let category = draft
            .category
            .ok_or_else(|| StacksError::Api("Cannot add a book without a category".to_string()))?;
        let book = Book::new(
            draft.title,
            draft.author,
            draft.isbn,
            category,
            draft.published_year,
        );

        let mut books = self.books.clone();
        books.push(book.clone());
        self.commit(books)?;

        let notice = Notice::new(
            "Book Added",
            format!("\"{}\" has been added to the library.", book.title),
        );
        Ok(Applied { book, notice })
    }

    /// Merge the set fields of the patch into the book. Lending state is
    /// untouched, whatever the patch says about the rest.
    pub fn update_book(&mut self, id: Uuid, patch: &BookPatch) -> Result<Applied> {
        let pos = self.position(id)?;
        let mut books = self.books.clone();
        books[pos].apply(patch);
        let book = books[pos].clone();
        self.commit(books)?;

        let notice = Notice::new("Book Updated", "Book details have been updated successfully.");
        Ok(Applied { book, notice })
    }

    pub fn delete_book(&mut self, id: Uuid) -> Result<Applied> {
        let pos = self.position(id)?;
        let mut books = self.books.clone();
        let book = books.remove(pos);
        self.commit(books)?;

        let notice = Notice::destructive(
            "Book Deleted",
            format!("\"{}\" has been removed from the library.", book.title),
        );
        Ok(Applied { book, notice })
    }

    pub fn issue_book(&mut self, id: Uuid, issued_to: &str) -> Result<Applied> {
        self.issue_book_at(id, issued_to, Utc::now())
    }

    /// Issue with an explicit clock. Issuing a book that is already out
    /// replaces the existing loan; availability is not checked.
    pub fn issue_book_at(
        &mut self,
        id: Uuid,
        issued_to: &str,
        now: DateTime<Utc>,
    ) -> Result<Applied> {
        let pos = self.position(id)?;
        let mut books = self.books.clone();
        books[pos].lending = Lending::Issued(Loan::starting(issued_to, now));
        let book = books[pos].clone();
        self.commit(books)?;

        let notice = Notice::new(
            "Book Issued",
            format!("\"{}\" has been issued to {}.", book.title, issued_to),
        );
        Ok(Applied { book, notice })
    }

    pub fn return_book(&mut self, id: Uuid) -> Result<Applied> {
        let pos = self.position(id)?;
        let mut books = self.books.clone();
        books[pos].lending = Lending::Available;
        let book = books[pos].clone();
        self.commit(books)?;

        let notice = Notice::new(
            "Book Returned",
            format!("\"{}\" has been returned successfully.", book.title),
        );
        Ok(Applied { book, notice })
    }

    /// Flip every issued book whose due date has passed to overdue, keeping
    /// its loan. Persists only when something changed. This is the only way
    /// a book becomes overdue; nothing runs it implicitly.
    pub fn flag_overdue(&mut self, now: DateTime<Utc>) -> Result<Vec<Uuid>> {
        let mut books = self.books.clone();
        let mut flipped = Vec::new();
        for book in &mut books {
            if let Lending::Issued(loan) = &book.lending {
                if loan.is_past_due(now) {
                    book.lending = Lending::Overdue(loan.clone());
                    flipped.push(book.id);
                }
            }
        }
        if !flipped.is_empty() {
            self.commit(books)?;
        }
        Ok(flipped)
    }

    /// Append books whose id is not already in the collection. Used by
    /// backup restore; returns how many were appended.
    pub fn merge_books(&mut self, incoming: Vec<Book>) -> Result<usize> {
        let mut books = self.books.clone();
        let mut appended = 0;
        for book in incoming {
            if books.iter().all(|existing| existing.id != book.id) {
                books.push(book);
                appended += 1;
            }
        }
        if appended > 0 {
            self.commit(books)?;
        }
        Ok(appended)
    }

    pub fn search_books(&self, query: &str) -> Vec<&Book> {
        search::filter(&self.books, query)
    }

    /// One pass over the current collection; recomputed per call.
    pub fn stats(&self) -> CatalogStats {
        let mut stats = CatalogStats {
            total: self.books.len(),
            ..CatalogStats::default()
        };
        for book in &self.books {
            match book.status() {
                BookStatus::Available => stats.available += 1,
                BookStatus::Issued => stats.issued += 1,
                BookStatus::Overdue => stats.overdue += 1,
            }
        }
        stats
    }

    fn position(&self, id: Uuid) -> Result<usize> {
        self.books
            .iter()
            .position(|book| book.id == id)
            .ok_or(StacksError::BookNotFound(id))
    }

    // The store accepts the new collection before the in-memory list is
    // replaced; on error both keep their previous contents.
    fn commit(&mut self, books: Vec<Book>) -> Result<()> {
        let value = serde_json::to_value(&books)?;
        self.store.write(BOOKS_KEY, &value)?;
        self.books = books;
        Ok(())
    }
}
