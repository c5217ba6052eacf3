//! Item-item collaborative filtering.
//!
//! Algorithm:
//! 1. Score every candidate movie against the target on user-id overlap
//!    (Pearson correlation is the default item-item metric)
//! 2. Sort descending and keep only matches above the similarity floor
//! 3. Predict a user's rating as the similarity-weighted average of their
//!    ratings of the most similar movies

use crate::error::Result;
use crate::models::{Movie, MoviePrediction, SimilarMovie, User};
use crate::services::{aggregation, similarity};
use crate::store::CatalogStore;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Similar movies consulted per prediction.
const SIMILAR_MOVIES_PER_PREDICTION: usize = 10;
/// Unseen movies scored per batch request. Bounds the O(n^2) similarity
/// work a single request can trigger.
const MAX_UNSEEN_MOVIES: usize = 20;

pub struct ItemCfEngine {
    store: Arc<dyn CatalogStore>,
}

impl ItemCfEngine {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Rank `pool` against `target` by Pearson similarity.
    ///
    /// Entries at or below the similarity floor are placeholders for
    /// "no usable overlap", so the result is truncated to however many
    /// candidates genuinely clear the bar, never padded up to `limit`.
    pub fn rank_similar_movies(
        &self,
        target: &Movie,
        pool: &[Movie],
        limit: usize,
    ) -> Vec<SimilarMovie> {
        let mut scored: Vec<SimilarMovie> = pool
            .iter()
            .filter(|movie| movie.id != target.id)
            .map(|movie| {
                let pairs = user_overlap(target, movie);
                let ratings_by_user: HashMap<i64, f64> = movie
                    .ratings
                    .iter()
                    .map(|r| (r.user_id, r.value))
                    .collect();
                SimilarMovie {
                    similarity: similarity::pearson(&pairs),
                    movie: movie.clone(),
                    ratings_by_user,
                }
            })
            .collect();

        scored.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let genuine = scored
            .iter()
            .filter(|s| s.similarity > similarity::SIMILARITY_FLOOR)
            .count();
        scored.truncate(limit.min(genuine));
        scored
    }

    /// Historical item-item cosine: each co-rating is centered by its
    /// rater's mean, fetched through the store one rater at a time.
    ///
    /// Kept off the primary prediction path (Pearson is the default
    /// there); see the toolkit note on the centering inconsistency.
    pub async fn cosine_similarity(&self, a: &Movie, b: &Movie) -> Result<f64> {
        let mut triples = Vec::new();
        for rating_a in &a.ratings {
            for rating_b in &b.ratings {
                if rating_a.user_id == rating_b.user_id {
                    let rater_mean = self.store.user_mean_rating(rating_a.user_id).await?;
                    triples.push((rating_a.value, rating_b.value, rater_mean));
                }
            }
        }
        Ok(similarity::centered_cosine_by_rater(&triples))
    }

    /// Predict `user`'s rating of `movie` from the movies they already
    /// rated.
    pub async fn predict_rating(&self, user: &User, movie: &Movie, pool: &[Movie]) -> Result<f64> {
        // Candidate set: only movies the user actually rated, refetched
        // with their full rating relations.
        let mut rated_pool = Vec::new();
        for candidate in pool {
            if user.ratings.iter().any(|r| r.movie_id == candidate.id) {
                rated_pool.push(self.store.movie_with_ratings(candidate.id).await?);
            }
        }

        let similar = self.rank_similar_movies(movie, &rated_pool, SIMILAR_MOVIES_PER_PREDICTION);

        let mut up = 0.0;
        let mut down = 0.0;
        for entry in &similar {
            if let Some(&value) = entry.ratings_by_user.get(&user.id) {
                up += entry.similarity * value;
                down += entry.similarity.abs();
            }
        }

        let predicted = up / down;
        if down == 0.0 || predicted.is_nan() {
            // No usable neighbours: fall back to the movie's raw average.
            return Ok(aggregation::average_rating(&movie.ratings));
        }
        Ok(predicted)
    }

    /// Batch prediction for movies the user hasn't rated yet.
    pub async fn predict_ratings(
        &self,
        user: &User,
        all_movies: &[Movie],
    ) -> Result<Vec<MoviePrediction>> {
        let mut rated: Vec<Movie> = Vec::new();
        let mut unseen: Vec<Movie> = Vec::new();

        for movie in all_movies {
            // Sequential existence lookups; later lookups are never
            // reordered relative to earlier ones.
            if self.store.find_rating(user.id, movie.id).await?.is_some() {
                rated.push(movie.clone());
            } else if unseen.len() < MAX_UNSEEN_MOVIES {
                unseen.push(movie.clone());
            }
        }

        let mut predictions = Vec::with_capacity(unseen.len());
        for movie in &unseen {
            let predicted_rating = self.predict_rating(user, movie, &rated).await?;
            predictions.push(MoviePrediction {
                movie: movie.without_ratings(),
                predicted_rating,
            });
        }

        info!(
            user_id = user.id,
            rated = rated.len(),
            predicted = predictions.len(),
            "Item-CF batch prediction complete"
        );

        Ok(predictions)
    }
}

/// Value pairs for every rater both movies share. Ratings with no
/// counterpart on the other side are skipped.
fn user_overlap(a: &Movie, b: &Movie) -> Vec<(f64, f64)> {
    let b_by_user: HashMap<i64, f64> = b.ratings.iter().map(|r| (r.user_id, r.value)).collect();
    a.ratings
        .iter()
        .filter_map(|r| b_by_user.get(&r.user_id).map(|&v| (r.value, v)))
        .collect()
}
