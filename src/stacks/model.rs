use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::StacksError;

/// Days between issue date and due date.
pub const LOAN_PERIOD_DAYS: i64 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookStatus {
    Available,
    Issued,
    Overdue,
}

impl BookStatus {
    pub fn label(&self) -> &'static str {
        match self {
            BookStatus::Available => "Available",
            BookStatus::Issued => "Issued",
            BookStatus::Overdue => "Overdue",
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The fixed category shelf. Labels are the persisted spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Fiction,
    #[serde(rename = "Non-Fiction")]
    NonFiction,
    Science,
    Technology,
    History,
    Biography,
    #[serde(rename = "Self-Help")]
    SelfHelp,
    Business,
    Art,
    Literature,
    Philosophy,
    Education,
}

impl Category {
    pub const ALL: [Category; 12] = [
        Category::Fiction,
        Category::NonFiction,
        Category::Science,
        Category::Technology,
        Category::History,
        Category::Biography,
        Category::SelfHelp,
        Category::Business,
        Category::Art,
        Category::Literature,
        Category::Philosophy,
        Category::Education,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Fiction => "Fiction",
            Category::NonFiction => "Non-Fiction",
            Category::Science => "Science",
            Category::Technology => "Technology",
            Category::History => "History",
            Category::Biography => "Biography",
            Category::SelfHelp => "Self-Help",
            Category::Business => "Business",
            Category::Art => "Art",
            Category::Literature => "Literature",
            Category::Philosophy => "Philosophy",
            Category::Education => "Education",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = StacksError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.label().to_lowercase() == wanted)
            .ok_or_else(|| StacksError::Api(format!("Unknown category: {}", s)))
    }
}

/// An active loan. Present exactly while a book is issued or overdue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub issued_to: String,
    pub issued_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
}

impl Loan {
    /// Start a loan at `now`, due `LOAN_PERIOD_DAYS` later.
    pub fn starting(issued_to: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            issued_to: issued_to.into(),
            issued_date: now,
            due_date: now + Duration::days(LOAN_PERIOD_DAYS),
        }
    }

    pub fn is_past_due(&self, now: DateTime<Utc>) -> bool {
        self.due_date < now
    }
}

/// Lending state. Loan data exists only in the states that need it, so a
/// book can never be "available" with a leftover due date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lending {
    Available,
    Issued(Loan),
    Overdue(Loan),
}

impl Lending {
    pub fn status(&self) -> BookStatus {
        match self {
            Lending::Available => BookStatus::Available,
            Lending::Issued(_) => BookStatus::Issued,
            Lending::Overdue(_) => BookStatus::Overdue,
        }
    }

    pub fn loan(&self) -> Option<&Loan> {
        match self {
            Lending::Available => None,
            Lending::Issued(loan) | Lending::Overdue(loan) => Some(loan),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "BookRecord", try_from = "BookRecord")]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub category: Category,
    pub published_year: i32,
    pub lending: Lending,
    pub created_at: DateTime<Utc>,
}

impl Book {
    pub fn new(
        title: String,
        author: String,
        isbn: String,
        category: Category,
        published_year: i32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            author,
            isbn,
            category,
            published_year,
            lending: Lending::Available,
            created_at: Utc::now(),
        }
    }

    pub fn status(&self) -> BookStatus {
        self.lending.status()
    }

    pub fn loan(&self) -> Option<&Loan> {
        self.lending.loan()
    }

    /// Merge the set fields of a patch. Lending state is never touched here.
    pub fn apply(&mut self, patch: &BookPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(author) = &patch.author {
            self.author = author.clone();
        }
        if let Some(isbn) = &patch.isbn {
            self.isbn = isbn.clone();
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(year) = patch.published_year {
            self.published_year = year;
        }
    }
}

/// Form input for a new book. `category` starts unset, like the empty
/// select in a fresh form; the validator reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub category: Option<Category>,
    pub published_year: i32,
}

/// Partial edit of a book's descriptive fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_year: Option<i32>,
}

impl BookPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.isbn.is_none()
            && self.category.is_none()
            && self.published_year.is_none()
    }
}

/// Flat persisted shape: one JSON object per book, camelCase keys, loan
/// fields only present while the book is out.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BookRecord {
    id: Uuid,
    title: String,
    author: String,
    isbn: String,
    category: Category,
    published_year: i32,
    status: BookStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    issued_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    issued_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    due_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<Book> for BookRecord {
    fn from(book: Book) -> Self {
        let status = book.status();
        let loan = book.lending.loan().cloned();
        let (issued_to, issued_date, due_date) = match loan {
            Some(loan) => (
                Some(loan.issued_to),
                Some(loan.issued_date),
                Some(loan.due_date),
            ),
            None => (None, None, None),
        };
        Self {
            id: book.id,
            title: book.title,
            author: book.author,
            isbn: book.isbn,
            category: book.category,
            published_year: book.published_year,
            status,
            issued_to,
            issued_date,
            due_date,
            created_at: book.created_at,
        }
    }
}

impl TryFrom<BookRecord> for Book {
    type Error = StacksError;

    fn try_from(record: BookRecord) -> Result<Self, Self::Error> {
        let loan = match (record.issued_to, record.issued_date, record.due_date) {
            (Some(issued_to), Some(issued_date), Some(due_date)) => Some(Loan {
                issued_to,
                issued_date,
                due_date,
            }),
            (None, None, None) => None,
            _ => {
                return Err(StacksError::InvalidRecord(format!(
                    "book {}: partial loan fields",
                    record.id
                )))
            }
        };

        let lending = match (record.status, loan) {
            (BookStatus::Available, None) => Lending::Available,
            (BookStatus::Issued, Some(loan)) => Lending::Issued(loan),
            (BookStatus::Overdue, Some(loan)) => Lending::Overdue(loan),
            (status, _) => {
                return Err(StacksError::InvalidRecord(format!(
                    "book {}: status {} disagrees with loan fields",
                    record.id, status
                )))
            }
        };

        Ok(Self {
            id: record.id,
            title: record.title,
            author: record.author,
            isbn: record.isbn,
            category: record.category,
            published_year: record.published_year,
            lending,
            created_at: record.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_book() -> Book {
        Book::new(
            "Dune".into(),
            "Frank Herbert".into(),
            "111".into(),
            Category::Fiction,
            1965,
        )
    }

    #[test]
    fn new_book_is_available_with_no_loan() {
        let book = sample_book();
        assert_eq!(book.status(), BookStatus::Available);
        assert!(book.loan().is_none());
    }

    #[test]
    fn loan_is_due_exactly_fourteen_days_later() {
        let now = Utc.with_ymd_and_hms(2026, 2, 20, 12, 0, 0).unwrap();
        let loan = Loan::starting("Alice", now);
        assert_eq!(loan.due_date - loan.issued_date, Duration::days(14));
        // Crosses into March: Feb 2026 has 28 days.
        assert_eq!(
            loan.due_date,
            Utc.with_ymd_and_hms(2026, 3, 6, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn issued_book_serializes_flat_with_camel_case_loan_fields() {
        let mut book = sample_book();
        let now = Utc.with_ymd_and_hms(2026, 1, 10, 9, 30, 0).unwrap();
        book.lending = Lending::Issued(Loan::starting("Alice", now));

        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(json["status"], "issued");
        assert_eq!(json["issuedTo"], "Alice");
        assert!(json.get("issuedDate").is_some());
        assert!(json.get("dueDate").is_some());
        assert_eq!(json["category"], "Fiction");

        let back: Book = serde_json::from_value(json).unwrap();
        assert_eq!(back, book);
    }

    #[test]
    fn available_book_omits_loan_fields() {
        let json = serde_json::to_value(sample_book()).unwrap();
        assert_eq!(json["status"], "available");
        assert!(json.get("issuedTo").is_none());
        assert!(json.get("issuedDate").is_none());
        assert!(json.get("dueDate").is_none());
    }

    #[test]
    fn record_with_status_loan_mismatch_is_rejected() {
        let json = serde_json::json!({
            "id": Uuid::new_v4(),
            "title": "Dune",
            "author": "Frank Herbert",
            "isbn": "111",
            "category": "Fiction",
            "publishedYear": 1965,
            "status": "issued",
            "createdAt": "2026-01-10T09:30:00Z",
        });
        let result: Result<Book, _> = serde_json::from_value(json);
        assert!(result.is_err());
    }

    #[test]
    fn record_with_partial_loan_fields_is_rejected() {
        let json = serde_json::json!({
            "id": Uuid::new_v4(),
            "title": "Dune",
            "author": "Frank Herbert",
            "isbn": "111",
            "category": "Fiction",
            "publishedYear": 1965,
            "status": "issued",
            "issuedTo": "Alice",
            "createdAt": "2026-01-10T09:30:00Z",
        });
        let result: Result<Book, _> = serde_json::from_value(json);
        assert!(result.is_err());
    }

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("fiction".parse::<Category>().unwrap(), Category::Fiction);
        assert_eq!(
            "non-fiction".parse::<Category>().unwrap(),
            Category::NonFiction
        );
        assert_eq!("Self-Help".parse::<Category>().unwrap(), Category::SelfHelp);
        assert!("Cooking".parse::<Category>().is_err());
    }

    #[test]
    fn patch_merges_only_set_fields() {
        let mut book = sample_book();
        book.apply(&BookPatch {
            author: Some("F. Herbert".into()),
            published_year: Some(1966),
            ..BookPatch::default()
        });
        assert_eq!(book.title, "Dune");
        assert_eq!(book.author, "F. Herbert");
        assert_eq!(book.published_year, 1966);
        assert_eq!(book.status(), BookStatus::Available);
    }
}
