//! User-user collaborative filtering.
//!
//! Mirror of the item engine keyed on movie-id overlap, with
//! mean-centered cosine as the default metric. Predictions are centered
//! on each neighbour's own average and re-based on the target user's
//! average.

use crate::error::Result;
use crate::models::{Movie, MoviePrediction, Rating, SimilarUser, User};
use crate::services::{aggregation, similarity};
use crate::store::CatalogStore;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::info;

/// Similar users consulted per prediction.
const SIMILAR_USERS_PER_PREDICTION: usize = 10;
/// Entries returned by the best-rated listing.
const BEST_RATED_LIMIT: usize = 10;

pub struct UserCfEngine {
    store: Arc<dyn CatalogStore>,
}

impl UserCfEngine {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Rank `pool` against `target` by mean-centered cosine similarity.
    ///
    /// Truncated strictly to `limit`. Unlike the item engine, no floor
    /// gate is applied before truncation; callers get up to `limit`
    /// entries even when some sit at the floor. Historical asymmetry,
    /// kept as-is.
    pub fn rank_similar_users(&self, target: &User, pool: &[User], limit: usize) -> Vec<SimilarUser> {
        let target_mean = aggregation::average_rating(&target.ratings);

        let mut scored: Vec<SimilarUser> = pool
            .iter()
            .filter(|user| user.id != target.id)
            .map(|user| {
                let other_mean = aggregation::average_rating(&user.ratings);
                let pairs = movie_overlap(target, user);
                SimilarUser {
                    similarity: similarity::centered_cosine(&pairs, target_mean, other_mean),
                    user: user.clone(),
                }
            })
            .collect();

        scored.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(limit);
        scored
    }

    /// Predict ratings for every movie some similar user rated and the
    /// target hasn't.
    pub async fn predict_ratings(
        &self,
        target: &User,
        pool: &[User],
        limit: usize,
    ) -> Result<Vec<MoviePrediction>> {
        let similar = self.rank_similar_users(target, pool, limit);
        let target_mean = aggregation::average_rating(&target.ratings);

        let not_seen = not_seen_movie_ids(target, &similar);
        if not_seen.is_empty() {
            return Ok(Vec::new());
        }

        let movies = self.store.movies_by_ids(&not_seen).await?;
        let mut result = Vec::with_capacity(movies.len());

        for movie in movies {
            let mut up = 0.0;
            let mut down = 0.0;

            for neighbour in &similar {
                // One sequential lookup per (movie, neighbour) pair.
                let Some(rating) = self.store.find_rating(neighbour.user.id, movie.id).await?
                else {
                    continue;
                };
                let neighbour_mean = aggregation::average_rating(&neighbour.user.ratings);
                up += neighbour.similarity * (rating.value - neighbour_mean);
                down += neighbour.similarity.abs();
            }

            // No neighbour signal at all: the target's own average is the
            // only baseline available here.
            let predicted_rating = if down == 0.0 {
                target_mean
            } else {
                up / down + target_mean
            };

            result.push(MoviePrediction {
                movie: movie.without_ratings(),
                predicted_rating,
            });
        }

        info!(
            user_id = target.id,
            neighbours = similar.len(),
            predicted = result.len(),
            "User-CF batch prediction complete"
        );

        Ok(result)
    }

    /// Batch prediction filtered to movies predicted at or above the
    /// target's own baseline.
    pub async fn recommend_based_on_predicted(
        &self,
        target: &User,
        pool: &[User],
    ) -> Result<Vec<MoviePrediction>> {
        let target_mean = aggregation::average_rating(&target.ratings);
        let predictions = self
            .predict_ratings(target, pool, SIMILAR_USERS_PER_PREDICTION)
            .await?;

        Ok(predictions
            .into_iter()
            .filter(|p| p.predicted_rating >= target_mean)
            .collect())
    }

    /// Movies rated by any similar user and never by the target, without
    /// any prediction step.
    pub async fn recommend_not_seen_movies(
        &self,
        target: &User,
        pool: &[User],
    ) -> Result<Vec<Movie>> {
        let similar = self.rank_similar_users(target, pool, SIMILAR_USERS_PER_PREDICTION);
        let not_seen = not_seen_movie_ids(target, &similar);

        let movies = self.store.movies_by_ids(&not_seen).await?;
        Ok(movies.into_iter().map(|m| m.without_ratings()).collect())
    }

    /// Each similar user's favourites: movies they rated strictly above
    /// their own average that the target has never rated. Deduplicated by
    /// movie id, flat list in neighbour iteration order.
    pub async fn similar_users_favs(
        &self,
        target: &User,
        pool: &[User],
        limit: usize,
    ) -> Result<Vec<Movie>> {
        let similar = self.rank_similar_users(target, pool, limit);
        let seen: HashSet<i64> = target.ratings.iter().map(|r| r.movie_id).collect();

        let mut fav_ids: Vec<i64> = Vec::new();
        let mut collected: HashSet<i64> = HashSet::new();
        for neighbour in &similar {
            let neighbour_mean = aggregation::average_rating(&neighbour.user.ratings);
            for rating in &neighbour.user.ratings {
                if rating.value > neighbour_mean
                    && !seen.contains(&rating.movie_id)
                    && collected.insert(rating.movie_id)
                {
                    fav_ids.push(rating.movie_id);
                }
            }
        }

        let movies = self.store.movies_by_ids(&fav_ids).await?;
        Ok(movies.into_iter().map(|m| m.without_ratings()).collect())
    }

    /// Cold-start fallback for users with no rating history: delegate to
    /// a category-preference query. The engine only selects the filter
    /// predicate.
    pub async fn cold_start_recommendations(&self, target: &User, limit: usize) -> Result<Vec<Movie>> {
        let category_ids: Vec<i64> = target
            .preferred_categories
            .iter()
            .map(|c| c.id)
            .collect();

        info!(
            user_id = target.id,
            categories = category_ids.len(),
            "Cold-start recommendation from category preferences"
        );

        self.store.movies_in_categories(&category_ids, limit).await
    }

    /// The target's own ratings, best first.
    pub fn best_rated_by_user(&self, target: &User) -> Vec<Rating> {
        let mut ratings = target.ratings.clone();
        ratings.sort_by(|a, b| {
            b.value
                .partial_cmp(&a.value)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ratings.truncate(BEST_RATED_LIMIT);
        ratings
    }

    pub async fn check_if_rated(&self, user: &User, movie: &Movie) -> Result<bool> {
        Ok(self.store.find_rating(user.id, movie.id).await?.is_some())
    }
}

/// Movie ids rated by any of the similar users but not by the target,
/// deduplicated, in neighbour iteration order.
fn not_seen_movie_ids(target: &User, similar: &[SimilarUser]) -> Vec<i64> {
    let seen: HashSet<i64> = target.ratings.iter().map(|r| r.movie_id).collect();

    let mut ids: Vec<i64> = Vec::new();
    let mut collected: HashSet<i64> = HashSet::new();
    for neighbour in similar {
        for rating in &neighbour.user.ratings {
            if !seen.contains(&rating.movie_id) && collected.insert(rating.movie_id) {
                ids.push(rating.movie_id);
            }
        }
    }
    ids
}

/// Value pairs for every movie both users rated.
fn movie_overlap(a: &User, b: &User) -> Vec<(f64, f64)> {
    let b_by_movie: HashMap<i64, f64> = b.ratings.iter().map(|r| (r.movie_id, r.value)).collect();
    a.ratings
        .iter()
        .filter_map(|r| b_by_movie.get(&r.movie_id).map(|&v| (r.value, v)))
        .collect()
}
