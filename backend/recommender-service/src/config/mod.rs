use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub engine: EngineConfig,
    pub charts: ChartsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    pub similar_user_limit: usize,
    pub cold_start_limit: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartsConfig {
    pub chart_limit: usize,
    pub minimum_votes: u32,
    pub mean_vote: f64,
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenv::dotenv().ok();

        Ok(Config {
            engine: EngineConfig {
                similar_user_limit: env::var("SIMILAR_USER_LIMIT")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .expect("SIMILAR_USER_LIMIT must be a valid usize"),
                cold_start_limit: env::var("COLD_START_LIMIT")
                    .unwrap_or_else(|_| "20".to_string())
                    .parse()
                    .expect("COLD_START_LIMIT must be a valid usize"),
            },
            charts: ChartsConfig {
                chart_limit: env::var("CHART_LIMIT")
                    .unwrap_or_else(|_| "20".to_string())
                    .parse()
                    .expect("CHART_LIMIT must be a valid usize"),
                minimum_votes: env::var("CHART_MINIMUM_VOTES")
                    .unwrap_or_else(|_| "50".to_string())
                    .parse()
                    .expect("CHART_MINIMUM_VOTES must be a valid u32"),
                mean_vote: env::var("CHART_MEAN_VOTE")
                    .unwrap_or_else(|_| "3.0".to_string())
                    .parse()
                    .expect("CHART_MEAN_VOTE must be a valid f64"),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_env().expect("config should load from defaults");

        assert_eq!(config.engine.similar_user_limit, 10);
        assert_eq!(config.charts.minimum_votes, 50);
        assert!((config.charts.mean_vote - 3.0).abs() < f64::EPSILON);
    }
}
