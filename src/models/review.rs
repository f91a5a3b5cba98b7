use crate::entities::reviews;

#[derive(Debug, Clone)]
pub struct ReviewInput {
    pub rating: i32,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub id: i32,
    pub user_id: i32,
    pub series_id: i32,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: String,
}

impl From<reviews::Model> for Review {
    fn from(m: reviews::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            series_id: m.series_id,
            rating: m.rating,
            comment: m.comment,
            created_at: m.created_at,
        }
    }
}
