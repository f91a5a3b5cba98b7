use super::ApiError;
use crate::domain::{EpisodeId, SeriesId, UserId};

pub fn validate_user_id(id: UserId) -> Result<UserId, ApiError> {
    if !id.is_valid() {
        return Err(ApiError::validation(format!(
            "Invalid user ID: {id}. ID must be a positive integer"
        )));
    }
    Ok(id)
}

pub fn validate_series_id(id: SeriesId) -> Result<SeriesId, ApiError> {
    if !id.is_valid() {
        return Err(ApiError::validation(format!(
            "Invalid series ID: {id}. ID must be a positive integer"
        )));
    }
    Ok(id)
}

pub fn validate_episode_id(id: EpisodeId) -> Result<EpisodeId, ApiError> {
    if !id.is_valid() {
        return Err(ApiError::validation(format!(
            "Invalid episode ID: {id}. ID must be a positive integer"
        )));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_ids() {
        assert!(validate_user_id(UserId::new(1)).is_ok());
        assert!(validate_user_id(UserId::new(0)).is_err());
        assert!(validate_series_id(SeriesId::new(12345)).is_ok());
        assert!(validate_series_id(SeriesId::new(-1)).is_err());
        assert!(validate_episode_id(EpisodeId::new(0)).is_err());
    }
}
