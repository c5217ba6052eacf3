use recommender_service::models::{Category, Movie, Rating, User};
use recommender_service::{Config, InMemoryCatalog, Recommender};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Demo entry point: seeds a small in-memory catalog and runs every
/// recommendation path once. The HTTP layer consuming this crate lives
/// elsewhere.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env().expect("Failed to load config");
    let (users, movies) = seed_catalog();
    let store = Arc::new(InMemoryCatalog::new(users.clone(), movies.clone()));
    let recommender = Recommender::new(store, config);

    let best = recommender.best_movies(&movies);
    info!(count = best.len(), "Best movies chart");

    for user in &users {
        let recommended = recommender.recommendations_for(user, &users).await?;
        let titles = serde_json::to_string(
            &recommended.iter().map(|m| m.title.as_str()).collect::<Vec<_>>(),
        )?;
        info!(
            user_id = user.id,
            user = %user.name,
            recommendations = %titles,
            "Recommendations"
        );

        if !user.ratings.is_empty() {
            let predictions = recommender
                .predicted_ratings_by_item(user, &movies)
                .await?;
            for prediction in &predictions {
                info!(
                    user_id = user.id,
                    movie = %prediction.movie.title,
                    predicted = prediction.predicted_rating,
                    "Item-CF prediction"
                );
            }
        }
    }

    Ok(())
}

fn seed_catalog() -> (Vec<User>, Vec<Movie>) {
    let drama = Category {
        id: 1,
        name: "drama".to_string(),
    };
    let sci_fi = Category {
        id: 2,
        name: "sci-fi".to_string(),
    };

    let ratings = vec![
        Rating { id: 1, user_id: 1, movie_id: 1, value: 4.5 },
        Rating { id: 2, user_id: 1, movie_id: 2, value: 3.0 },
        Rating { id: 3, user_id: 2, movie_id: 1, value: 5.0 },
        Rating { id: 4, user_id: 2, movie_id: 2, value: 3.5 },
        Rating { id: 5, user_id: 2, movie_id: 3, value: 4.0 },
        Rating { id: 6, user_id: 3, movie_id: 1, value: 2.0 },
        Rating { id: 7, user_id: 3, movie_id: 3, value: 4.5 },
    ];

    let by_user = |id: i64| -> Vec<Rating> {
        ratings.iter().filter(|r| r.user_id == id).cloned().collect()
    };
    let by_movie = |id: i64| -> Vec<Rating> {
        ratings.iter().filter(|r| r.movie_id == id).cloned().collect()
    };

    let users = vec![
        User {
            id: 1,
            name: "alice".to_string(),
            preferred_categories: vec![drama.clone()],
            ratings: by_user(1),
        },
        User {
            id: 2,
            name: "bob".to_string(),
            preferred_categories: vec![],
            ratings: by_user(2),
        },
        User {
            id: 3,
            name: "carol".to_string(),
            preferred_categories: vec![],
            ratings: by_user(3),
        },
        // No history: exercises the cold-start path.
        User {
            id: 4,
            name: "dave".to_string(),
            preferred_categories: vec![sci_fi.clone()],
            ratings: vec![],
        },
    ];

    let movies = vec![
        Movie {
            id: 1,
            title: "Solar Drift".to_string(),
            categories: vec![sci_fi.clone()],
            ratings: by_movie(1),
        },
        Movie {
            id: 2,
            title: "Quiet Harbor".to_string(),
            categories: vec![drama.clone()],
            ratings: by_movie(2),
        },
        Movie {
            id: 3,
            title: "Red Meridian".to_string(),
            categories: vec![drama, sci_fi],
            ratings: by_movie(3),
        },
    ];

    (users, movies)
}
