//! Free-text catalog filter. Stateless; usable on any book slice.

use crate::model::Book;

/// Filter books whose title, author, or category label contains the query
/// as a case-insensitive substring. An empty or whitespace query returns
/// the whole slice; relative order is always preserved.
pub fn filter<'a>(books: &'a [Book], query: &str) -> Vec<&'a Book> {
    if query.trim().is_empty() {
        return books.iter().collect();
    }
    // Only emptiness is decided on the trimmed query; matching keeps the
    // query as typed.
    let term = query.to_lowercase();

    books
        .iter()
        .filter(|book| {
            book.title.to_lowercase().contains(&term)
                || book.author.to_lowercase().contains(&term)
                || book.category.label().to_lowercase().contains(&term)
        })
        .collect()
}
