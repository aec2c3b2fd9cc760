use crate::errors::AppError;
use dotenv::dotenv;

/// Reads a single value from the process environment, loading `.env`
/// first so local overrides apply.
pub fn get_env_value_by_key(key: &str) -> Result<String, AppError> {
    dotenv().ok();

    std::env::var(key).map_err(|_| AppError::NotFound(format!("{} in env", key)))
}

pub fn is_valid_url(url: &str) -> bool {
    url::Url::parse(url).is_ok()
}
