use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single (user, movie, value) observation. Values come in 0.5 steps,
/// typically 0.5 to 5.0. The engines never mutate ratings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub id: i64,
    pub user_id: i64,
    pub movie_id: i64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Movie with its rating history. Every rating must carry a resolved
/// `user_id`; the engines only traverse what the caller hands in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub categories: Vec<Category>,
    pub ratings: Vec<Rating>,
}

impl Movie {
    /// Projection for output: same movie, ratings dropped so callers
    /// don't re-serialize the whole rating graph.
    pub fn without_ratings(&self) -> Movie {
        Movie {
            id: self.id,
            title: self.title.clone(),
            categories: self.categories.clone(),
            ratings: Vec::new(),
        }
    }
}

/// User with their rating history. Every rating must carry a resolved
/// `movie_id` before being passed into a similarity computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub preferred_categories: Vec<Category>,
    pub ratings: Vec<Rating>,
}

impl User {
    pub fn without_ratings(&self) -> User {
        User {
            id: self.id,
            name: self.name.clone(),
            preferred_categories: self.preferred_categories.clone(),
            ratings: Vec::new(),
        }
    }
}

/// A ranked item-item match. `ratings_by_user` keys the candidate's own
/// ratings by user id so prediction doesn't rescan the rating list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarMovie {
    pub similarity: f64,
    pub movie: Movie,
    pub ratings_by_user: HashMap<i64, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarUser {
    pub similarity: f64,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoviePrediction {
    pub movie: Movie,
    pub predicted_rating: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightedMovie {
    pub movie: Movie,
    pub rating: f64,
}
