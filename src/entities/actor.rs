use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "actor")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub gender: String,
    pub age: i32,
    pub imdb_url: String,
    pub photo: Option<Vec<u8>>,
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

impl Related<super::movie::Entity> for Entity {
    fn to() -> RelationDef {
        super::actor_movie::Relation::Movie.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::actor_movie::Relation::Actor.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
