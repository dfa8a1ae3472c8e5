use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the move-prediction service.
    pub backend_url: String,
    pub predict_timeout_secs: u64,
    /// Width in pixels handed to the board renderer.
    pub board_width: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:5000".to_string(),
            predict_timeout_secs: 30,
            board_width: 500,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            backend_url: env::var("BACKEND_URL").unwrap_or(defaults.backend_url),
            predict_timeout_secs: env::var("PREDICT_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.predict_timeout_secs),
            board_width: env::var("BOARD_WIDTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.board_width),
        }
    }

    pub fn predict_url(&self) -> String {
        format!("{}/predict", self.backend_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predict_url_joins_without_double_slash() {
        let config = Config {
            backend_url: "http://engine:5000/".to_string(),
            ..Config::default()
        };
        assert_eq!(config.predict_url(), "http://engine:5000/predict");
        assert_eq!(Config::default().predict_url(), "http://localhost:5000/predict");
    }
}
