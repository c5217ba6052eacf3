use crate::error::{RecommendError, Result};
use crate::models::{Movie, Rating, User};
use crate::services::aggregation;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

/// Persistence collaborator for the engines.
///
/// The engines own no I/O: everything they can't compute from the entity
/// graphs handed to them goes through this trait, one lookup at a time.
/// Lookups are always issued sequentially, never fanned out.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Existence/value lookup for one (user, movie) pair.
    async fn find_rating(&self, user_id: i64, movie_id: i64) -> Result<Option<Rating>>;

    /// One movie with its full rating relations loaded.
    async fn movie_with_ratings(&self, movie_id: i64) -> Result<Movie>;

    /// Movies by id, preserving the requested order. Missing ids are
    /// skipped, not errors.
    async fn movies_by_ids(&self, ids: &[i64]) -> Result<Vec<Movie>>;

    /// Mean rating over everything this user has rated.
    async fn user_mean_rating(&self, user_id: i64) -> Result<f64>;

    /// Movies belonging to any of the given categories, grouped by movie
    /// id, capped at `limit`. Backs the cold-start path.
    async fn movies_in_categories(&self, category_ids: &[i64], limit: usize) -> Result<Vec<Movie>>;
}

/// HashMap-backed reference store, used by the demo binary and tests.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    users: HashMap<i64, User>,
    movies: HashMap<i64, Movie>,
}

impl InMemoryCatalog {
    pub fn new(users: Vec<User>, movies: Vec<Movie>) -> Self {
        Self {
            users: users.into_iter().map(|u| (u.id, u)).collect(),
            movies: movies.into_iter().map(|m| (m.id, m)).collect(),
        }
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn find_rating(&self, user_id: i64, movie_id: i64) -> Result<Option<Rating>> {
        let Some(user) = self.users.get(&user_id) else {
            return Ok(None);
        };
        Ok(user
            .ratings
            .iter()
            .find(|r| r.movie_id == movie_id)
            .cloned())
    }

    async fn movie_with_ratings(&self, movie_id: i64) -> Result<Movie> {
        self.movies
            .get(&movie_id)
            .cloned()
            .ok_or_else(|| RecommendError::not_found("movie", movie_id))
    }

    async fn movies_by_ids(&self, ids: &[i64]) -> Result<Vec<Movie>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.movies.get(id).cloned())
            .collect())
    }

    async fn user_mean_rating(&self, user_id: i64) -> Result<f64> {
        let user = self
            .users
            .get(&user_id)
            .ok_or_else(|| RecommendError::not_found("user", user_id))?;
        Ok(aggregation::average_rating(&user.ratings))
    }

    async fn movies_in_categories(&self, category_ids: &[i64], limit: usize) -> Result<Vec<Movie>> {
        let wanted: HashSet<i64> = category_ids.iter().copied().collect();
        let mut matched: Vec<&Movie> = self
            .movies
            .values()
            .filter(|m| m.categories.iter().any(|c| wanted.contains(&c.id)))
            .collect();
        // Stable output for an otherwise unordered map scan.
        matched.sort_by_key(|m| m.id);
        Ok(matched
            .into_iter()
            .take(limit)
            .map(|m| m.without_ratings())
            .collect())
    }
}
