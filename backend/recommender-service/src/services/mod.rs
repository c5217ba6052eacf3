pub mod aggregation;
pub mod item_cf;
pub mod similarity;
pub mod user_cf;

use crate::config::Config;
use crate::error::Result;
use crate::models::{Movie, MoviePrediction, User};
use crate::store::CatalogStore;
use std::sync::Arc;
use tracing::info;

pub use item_cf::ItemCfEngine;
pub use user_cf::UserCfEngine;

/// Facade bundling both similarity axes and the unpersonalized charts.
///
/// Routes a user to the cold-start path when they have no rating history,
/// and to user-user prediction otherwise.
pub struct Recommender {
    item_cf: ItemCfEngine,
    user_cf: UserCfEngine,
    config: Config,
}

impl Recommender {
    pub fn new(store: Arc<dyn CatalogStore>, config: Config) -> Self {
        Self {
            item_cf: ItemCfEngine::new(store.clone()),
            user_cf: UserCfEngine::new(store),
            config,
        }
    }

    pub fn item_cf(&self) -> &ItemCfEngine {
        &self.item_cf
    }

    pub fn user_cf(&self) -> &UserCfEngine {
        &self.user_cf
    }

    /// Personalized recommendations, or category-based cold start for a
    /// user without ratings.
    pub async fn recommendations_for(&self, user: &User, pool: &[User]) -> Result<Vec<Movie>> {
        if user.ratings.is_empty() {
            info!(user_id = user.id, "No rating history, using cold start");
            return self
                .user_cf
                .cold_start_recommendations(user, self.config.engine.cold_start_limit)
                .await;
        }

        let recommended = self.user_cf.recommend_based_on_predicted(user, pool).await?;
        Ok(recommended.into_iter().map(|p| p.movie).collect())
    }

    /// Item-item predictions for movies the user hasn't rated.
    pub async fn predicted_ratings_by_item(
        &self,
        user: &User,
        all_movies: &[Movie],
    ) -> Result<Vec<MoviePrediction>> {
        self.item_cf.predict_ratings(user, all_movies).await
    }

    /// User-user predictions for movies the user hasn't rated.
    pub async fn predicted_ratings_by_user(
        &self,
        user: &User,
        pool: &[User],
    ) -> Result<Vec<MoviePrediction>> {
        self.user_cf
            .predict_ratings(user, pool, self.config.engine.similar_user_limit)
            .await
    }

    /// Popularity-adjusted chart of the best rated movies.
    pub fn best_movies(&self, all_movies: &[Movie]) -> Vec<Movie> {
        aggregation::best_movies(
            all_movies,
            self.config.charts.chart_limit,
            self.config.charts.minimum_votes,
            self.config.charts.mean_vote,
        )
    }

    /// Chart of the most rated movies.
    pub fn popular_movies(&self, all_movies: &[Movie]) -> Vec<Movie> {
        aggregation::popular_movies(all_movies, self.config.charts.chart_limit)
    }
}
