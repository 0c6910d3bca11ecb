use crate::api::Book;
use crate::app::AppState;

/// Case-insensitive match on title, author or ISBN. An empty query matches everything.
pub fn book_matches(book: &Book, query: &str) -> bool {
    let q = query.trim().to_lowercase();
    q.is_empty()
        || book.title.to_lowercase().contains(&q)
        || book.author.to_lowercase().contains(&q)
        || book.isbn.to_lowercase().contains(&q)
}

/// Rebuild the visible books list from `books_all` using the current query.
pub fn apply_search(app: &mut AppState) {
    let q = app.search_query.clone();
    app.books = app
        .books_all
        .iter()
        .filter(|b| book_matches(b, &q))
        .cloned()
        .collect();
    app.selected_book_index = 0;
}
