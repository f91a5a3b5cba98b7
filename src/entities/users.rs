use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub username: String,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::episode_progress::Entity")]
    EpisodeProgress,
    #[sea_orm(has_many = "super::watching_states::Entity")]
    WatchingStates,
    #[sea_orm(has_many = "super::reviews::Entity")]
    Reviews,
}

impl Related<super::episode_progress::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EpisodeProgress.def()
    }
}

impl Related<super::watching_states::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WatchingStates.def()
    }
}

impl Related<super::reviews::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
