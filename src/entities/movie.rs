use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "movie")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub imdb_url: String,
    pub genre: String,
    pub release_year: i32,
    pub poster: Option<Vec<u8>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::actor_movie::Entity")]
    ActorMovie,
}

impl Related<super::actor_movie::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ActorMovie.def()
    }
}

impl Related<super::actor::Entity> for Entity {
    fn to() -> RelationDef {
        super::actor_movie::Relation::Actor.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::actor_movie::Relation::Movie.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
