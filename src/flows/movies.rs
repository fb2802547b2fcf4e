//! Movie catalog and the logged-in user's favorites.
//!
//! Favorite updates are confirm-then-apply: the candidate list is computed
//! from the session user, sent to the service, and written back to the session
//! only once the service accepted it. A failed request leaves the session
//! exactly as it was.

use serde_json::Value;
use tracing::{info, warn};

use crate::flows::favorites::{self, FavoriteChange};
use crate::flows::{FlowContext, FlowError, decode};
use crate::models::{Director, FavoritesPayload, Genre, Movie, User, UserUpdate};

pub struct MovieList {
    ctx: FlowContext,
    movies: Vec<Movie>,
}

impl MovieList {
    pub fn new(ctx: FlowContext) -> Self {
        Self { ctx, movies: Vec::new() }
    }

    /// Fetch the catalog, keeping the order the service returned
    pub async fn activate(&mut self) -> Result<&[Movie], FlowError> {
        match self.fetch_movies().await {
            Ok(movies) => {
                info!("Loaded {} movies", movies.len());
                self.movies = movies;
                Ok(&self.movies)
            }
            Err(e) => {
                self.ctx.failure(format!("Could not load movies: {}", e));
                Err(e)
            }
        }
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Whether the session user has marked `movie_id`
    pub fn is_favorite(&self, movie_id: &str) -> Result<bool, FlowError> {
        Ok(self.ctx.session.require_user()?.has_favorite(movie_id))
    }

    /// Add `movie_id` to the favorites when absent, remove it when present.
    /// The full new list is sent through the edit-user endpoint.
    pub async fn toggle_favorite(&self, movie_id: &str) -> Result<FavoriteChange, FlowError> {
        let result = self.try_toggle(movie_id).await;
        self.report(movie_id, result)
    }

    /// Add `movie_id` through the dedicated favorites endpoint
    pub async fn add_favorite(&self, movie_id: &str) -> Result<FavoriteChange, FlowError> {
        let result = self.try_add(movie_id).await;
        self.report(movie_id, result)
    }

    /// Remove `movie_id` through the dedicated favorites endpoint
    pub async fn remove_favorite(&self, movie_id: &str) -> Result<FavoriteChange, FlowError> {
        let result = self.try_remove(movie_id).await;
        self.report(movie_id, result)
    }

    pub async fn movie(&self, title: &str) -> Result<Movie, FlowError> {
        let body = self.ctx.api.get_movie(title).await?;
        decode(body)
    }

    pub async fn director(&self, name: &str) -> Result<Director, FlowError> {
        let body = self.ctx.api.get_director(name).await?;
        decode(body)
    }

    pub async fn genre(&self, name: &str) -> Result<Genre, FlowError> {
        let body = self.ctx.api.get_genre(name).await?;
        decode(body)
    }

    async fn fetch_movies(&self) -> Result<Vec<Movie>, FlowError> {
        let body = self.ctx.api.list_movies().await?;
        decode(body)
    }

    async fn try_toggle(&self, movie_id: &str) -> Result<FavoriteChange, FlowError> {
        let mut user = self.ctx.session.require_user()?;
        let (candidate, change) = favorites::toggled(&user.favorite_movies, movie_id);

        self.ctx
            .api
            .edit_user(&user.username, &UserUpdate::favorites(candidate.clone()))
            .await?;

        user.favorite_movies = candidate;
        self.ctx.session.save_user(&user)?;
        Ok(change)
    }

    async fn try_add(&self, movie_id: &str) -> Result<FavoriteChange, FlowError> {
        let user = self.ctx.session.require_user()?;
        let (candidate, change) = favorites::added(&user.favorite_movies, movie_id);
        let payload = FavoritesPayload {
            favorite_movies: vec![movie_id.to_string()],
        };

        let body = self.ctx.api.add_favorite(&user.username, &payload).await?;
        self.apply_confirmed(user, candidate, body)?;
        Ok(change)
    }

    async fn try_remove(&self, movie_id: &str) -> Result<FavoriteChange, FlowError> {
        let user = self.ctx.session.require_user()?;
        let (candidate, change) = favorites::removed(&user.favorite_movies, movie_id);

        let body = self.ctx.api.remove_favorite(&user.username, movie_id).await?;
        self.apply_confirmed(user, candidate, body)?;
        Ok(change)
    }

    /// Persist the user after the service accepted a favorites change. When
    /// the service answers with the updated user record, that record wins.
    fn apply_confirmed(&self, user: User, candidate: Vec<String>, body: Value) -> Result<(), FlowError> {
        let updated = match serde_json::from_value::<User>(body) {
            Ok(returned) if returned.username == user.username => User {
                favorite_movies: favorites::normalized(&returned.favorite_movies),
                ..returned
            },
            _ => User {
                favorite_movies: candidate,
                ..user
            },
        };
        self.ctx.session.save_user(&updated)?;
        Ok(())
    }

    fn report(&self, movie_id: &str, result: Result<FavoriteChange, FlowError>) -> Result<FavoriteChange, FlowError> {
        match result {
            Ok(change) => {
                info!("Favorite {}: {:?}", movie_id, change);
                self.ctx.success(change.message());
                Ok(change)
            }
            Err(e) => {
                warn!("Favorite update for {} failed: {}", movie_id, e);
                self.ctx.failure(format!("Could not update favorites: {}", e));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock_server::MockService;
    use crate::api::{ApiClient, FailureKind};
    use crate::flows::notify::Outcome;
    use crate::flows::testing::{RecordingNotifier, StubApi, context, user};
    use crate::session::{SessionError, SessionStore};
    use serde_json::json;
    use std::collections::BTreeSet;
    use std::sync::Arc;

    fn catalog() -> Value {
        json!([
            {
                "_id": "m1",
                "Title": "A",
                "Genre": { "Name": "Drama" },
                "Director": { "Name": "Ann" }
            },
            {
                "_id": "m2",
                "Title": "B",
                "Genre": { "Name": "Comedy" },
                "Director": { "Name": "Bo" }
            }
        ])
    }

    fn favorites_of(ctx: &FlowContext) -> BTreeSet<String> {
        ctx.session
            .require_user()
            .unwrap()
            .favorite_movies
            .into_iter()
            .collect()
    }

    fn set(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn catalog_keeps_service_order_and_checks_favorites() {
        let (ctx, _api, _notifier) = context(StubApi::default().ok("list_movies", catalog()));
        ctx.session.start(&user("rob", &["m1"]), "t").unwrap();
        let mut list = MovieList::new(ctx.clone());

        let titles: Vec<_> = list.activate().await.unwrap().iter().map(|m| m.title.clone()).collect();

        assert_eq!(titles, vec!["A", "B"]);
        assert!(list.is_favorite("m1").unwrap());
        assert!(!list.is_favorite("m2").unwrap());
    }

    #[tokio::test]
    async fn toggle_sequence_from_the_catalog_example() {
        let (ctx, api, notifier) = context(StubApi::default().ok("list_movies", catalog()));
        ctx.session.start(&user("rob", &["m1"]), "t").unwrap();
        let mut list = MovieList::new(ctx.clone());
        list.activate().await.unwrap();

        assert_eq!(list.toggle_favorite("m2").await.unwrap(), FavoriteChange::Added);
        assert_eq!(favorites_of(&ctx), set(&["m1", "m2"]));
        assert_eq!(notifier.last().unwrap().message, "Movie added to favorites");

        assert_eq!(list.toggle_favorite("m1").await.unwrap(), FavoriteChange::Removed);
        assert_eq!(favorites_of(&ctx), set(&["m2"]));
        assert_eq!(notifier.last().unwrap().message, "Movie removed from favorites");

        let edits: Vec<_> = api.calls().into_iter().filter(|c| c.op == "edit_user").collect();
        assert_eq!(edits.len(), 2);
        assert_eq!(edits[0].args, vec!["rob"]);
        assert_eq!(edits[0].body, Some(json!({ "FavoriteMovies": ["m1", "m2"] })));
        assert_eq!(edits[1].body, Some(json!({ "FavoriteMovies": ["m2"] })));
    }

    #[tokio::test]
    async fn failed_edit_leaves_session_favorites_untouched() {
        let (ctx, _api, notifier) = context(StubApi::default().fail("edit_user", FailureKind::Transient));
        let before = user("rob", &["m1", "m3"]);
        ctx.session.start(&before, "t").unwrap();
        let list = MovieList::new(ctx.clone());

        let err = list.toggle_favorite("m2").await.unwrap_err();

        assert!(matches!(err, FlowError::Api(_)));
        assert_eq!(ctx.session.require_user().unwrap(), before);
        let note = notifier.last().unwrap();
        assert_eq!(note.outcome, Outcome::Failure);
        assert!(note.message.starts_with("Could not update favorites: "));
    }

    #[tokio::test]
    async fn html_page_with_success_status_does_not_confirm_a_toggle() {
        let mock = MockService::start().await;
        mock.respond("PUT", "/api/users/rob", 200, "<html>proxy error</html>");
        let session = SessionStore::in_memory();
        let before = user("rob", &["m1"]);
        session.start(&before, "t").unwrap();
        let api = ApiClient::new(mock.base_url(), None, session.clone()).unwrap();
        let ctx = FlowContext::new(Arc::new(api), session, Arc::new(RecordingNotifier::default()));

        let err = MovieList::new(ctx.clone()).toggle_favorite("m2").await.unwrap_err();

        assert!(matches!(err, FlowError::Api(_)));
        assert_eq!(ctx.session.require_user().unwrap(), before);
    }

    #[tokio::test]
    async fn toggling_without_a_session_is_an_explicit_error() {
        let (ctx, api, notifier) = context(StubApi::default());
        let list = MovieList::new(ctx);

        let err = list.toggle_favorite("m1").await.unwrap_err();

        assert!(matches!(err, FlowError::Session(SessionError::NoSession)));
        assert!(matches!(list.is_favorite("m1"), Err(FlowError::Session(SessionError::NoSession))));
        assert!(api.calls().is_empty());
        assert_eq!(notifier.last().unwrap().outcome, Outcome::Failure);
    }

    #[tokio::test]
    async fn catalog_failure_is_notified() {
        let (ctx, _api, notifier) = context(StubApi::default().fail("list_movies", FailureKind::Unauthorized));
        let mut list = MovieList::new(ctx);

        assert!(list.activate().await.is_err());
        assert!(list.movies().is_empty());
        assert!(notifier.last().unwrap().message.starts_with("Could not load movies: "));
    }

    #[tokio::test]
    async fn add_favorite_prefers_the_returned_user_record() {
        let api = StubApi::default().ok(
            "add_favorite",
            json!({ "_id": "id-rob", "Username": "rob", "Email": "new@example.com", "FavoriteMovies": ["m1", "m4", "m4"] }),
        );
        let (ctx, api, _notifier) = context(api);
        ctx.session.start(&user("rob", &["m1"]), "t").unwrap();
        let list = MovieList::new(ctx.clone());

        assert_eq!(list.add_favorite("m4").await.unwrap(), FavoriteChange::Added);

        let stored = ctx.session.require_user().unwrap();
        assert_eq!(stored.favorite_movies, vec!["m1", "m4"]);
        assert_eq!(stored.email, "new@example.com");
        assert_eq!(api.calls()[0].body, Some(json!({ "FavoriteMovies": ["m4"] })));
    }

    #[tokio::test]
    async fn remove_favorite_falls_back_to_the_local_candidate() {
        let (ctx, api, _notifier) = context(StubApi::default().ok("remove_favorite", json!("m1 removed")));
        ctx.session.start(&user("rob", &["m1", "m2"]), "t").unwrap();
        let list = MovieList::new(ctx.clone());

        assert_eq!(list.remove_favorite("m1").await.unwrap(), FavoriteChange::Removed);

        assert_eq!(favorites_of(&ctx), set(&["m2"]));
        assert_eq!(api.calls()[0].args, vec!["rob", "m1"]);
    }

    #[tokio::test]
    async fn detail_lookups_decode_records() {
        let api = StubApi::default()
            .ok("get_director", json!({ "Name": "Ann", "Bio": "Director", "Birth": "1960" }))
            .ok("get_genre", json!({ "Name": "Drama", "Description": "Serious" }))
            .ok("get_movie", json!({}));
        let (ctx, api, _notifier) = context(api);
        let list = MovieList::new(ctx);

        assert_eq!(list.director("Ann").await.unwrap().bio, "Director");
        assert_eq!(list.genre("Drama").await.unwrap().description, "Serious");
        assert!(matches!(list.movie("Missing").await, Err(FlowError::UnexpectedResponse(_))));
        assert_eq!(api.calls()[2].args, vec!["Missing"]);
    }
}
