//! Set-like rules for a user's favorites list.
//!
//! The list is stored as a `Vec` to match the service schema, but it never
//! holds the same movie id twice.

/// What a favorites update did to a movie
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteChange {
    Added,
    Removed,
    Unchanged,
}

impl FavoriteChange {
    pub fn message(self) -> &'static str {
        match self {
            FavoriteChange::Added => "Movie added to favorites",
            FavoriteChange::Removed => "Movie removed from favorites",
            FavoriteChange::Unchanged => "Favorites already up to date",
        }
    }
}

/// Candidate list with `movie_id` added when absent or removed when present
pub fn toggled(favorites: &[String], movie_id: &str) -> (Vec<String>, FavoriteChange) {
    if favorites.iter().any(|id| id == movie_id) {
        removed(favorites, movie_id)
    } else {
        added(favorites, movie_id)
    }
}

/// Candidate list with `movie_id` present
pub fn added(favorites: &[String], movie_id: &str) -> (Vec<String>, FavoriteChange) {
    let mut next = normalized(favorites);
    if next.iter().any(|id| id == movie_id) {
        return (next, FavoriteChange::Unchanged);
    }
    next.push(movie_id.to_string());
    (next, FavoriteChange::Added)
}

/// Candidate list with every occurrence of `movie_id` gone
pub fn removed(favorites: &[String], movie_id: &str) -> (Vec<String>, FavoriteChange) {
    let mut next = normalized(favorites);
    let before = next.len();
    next.retain(|id| id != movie_id);
    let change = if next.len() == before {
        FavoriteChange::Unchanged
    } else {
        FavoriteChange::Removed
    };
    (next, change)
}

/// Copy of `favorites` without repeated ids, keeping first occurrences
pub fn normalized(favorites: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(favorites.len());
    for id in favorites {
        if !out.contains(id) {
            out.push(id.clone());
        }
    }
    out
}
