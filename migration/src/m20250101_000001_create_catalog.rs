use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Actor::Table)
                    .if_not_exists()
                    .col(pk_auto(Actor::Id))
                    .col(string_len(Actor::Name, 100))
                    .col(string_len(Actor::Gender, 20))
                    .col(integer(Actor::Age))
                    .col(string(Actor::ImdbUrl))
                    .col(ColumnDef::new(Actor::Photo).binary().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Movie::Table)
                    .if_not_exists()
                    .col(pk_auto(Movie::Id))
                    .col(string_len(Movie::Title, 100))
                    .col(string(Movie::ImdbUrl))
                    .col(string_len(Movie::Genre, 50))
                    .col(integer(Movie::ReleaseYear))
                    .col(ColumnDef::new(Movie::Poster).binary().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ActorMovie::Table)
                    .if_not_exists()
                    .col(pk_auto(ActorMovie::Id))
                    .col(integer(ActorMovie::ActorId))
                    .col(integer(ActorMovie::MovieId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_actor_movie_actor")
                            .from(ActorMovie::Table, ActorMovie::ActorId)
                            .to(Actor::Table, Actor::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_actor_movie_movie")
                            .from(ActorMovie::Table, ActorMovie::MovieId)
                            .to(Movie::Table, Movie::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        // one row per (actor, movie); the application-level check is only a fast path
        manager
            .create_index(
                Index::create()
                    .name("idx_actor_movie_pair")
                    .table(ActorMovie::Table)
                    .col(ActorMovie::ActorId)
                    .col(ActorMovie::MovieId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_actor_movie_movie")
                    .table(ActorMovie::Table)
                    .col(ActorMovie::MovieId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ActorMovie::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Movie::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Actor::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Actor {
    Table,
    Id,
    Name,
    Gender,
    Age,
    ImdbUrl,
    Photo,
}

#[derive(DeriveIden)]
enum Movie {
    Table,
    Id,
    Title,
    ImdbUrl,
    Genre,
    ReleaseYear,
    Poster,
}

#[derive(DeriveIden)]
enum ActorMovie {
    Table,
    Id,
    ActorId,
    MovieId,
}
