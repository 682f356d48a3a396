use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    LoaderTrait, ModelTrait, NotSet, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    SqlErr, TransactionTrait,
};
use tracing::{debug, info};

use crate::{
    entities::{actor, actor_movie, movie},
    error::{AppError, AppResult},
    models::{
        ActorFields, ActorWithMovies, LinkDetail, MovieFields, MovieWithActors, SelectOption,
    },
};

/// Why a link insert or update was refused by the store.
#[derive(Debug, thiserror::Error)]
pub enum LinkWriteError {
    #[error("relationship already exists")]
    Duplicate,
    #[error("actor or movie does not exist")]
    MissingReferent,
    #[error(transparent)]
    Db(DbErr),
}

impl From<DbErr> for LinkWriteError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::Duplicate,
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => Self::MissingReferent,
            _ => Self::Db(err),
        }
    }
}

#[derive(Clone)]
pub struct Catalog {
    db: DatabaseConnection,
}

impl Catalog {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn actors_with_movies(&self) -> AppResult<Vec<ActorWithMovies>> {
        let actors =
            actor::Entity::find().order_by_asc(actor::Column::Name).all(&self.db).await?;
        let movies =
            actors.load_many_to_many(movie::Entity, actor_movie::Entity, &self.db).await?;

        Ok(actors
            .into_iter()
            .zip(movies)
            .map(|(actor, movies)| ActorWithMovies { actor, movies })
            .collect())
    }

    pub async fn find_actor(&self, id: i32) -> AppResult<Option<actor::Model>> {
        Ok(actor::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn actor_exists(&self, id: i32) -> AppResult<bool> {
        Ok(actor::Entity::find_by_id(id).count(&self.db).await? > 0)
    }

    pub async fn actor_with_movies(&self, id: i32) -> AppResult<Option<ActorWithMovies>> {
        let Some(actor) = self.find_actor(id).await? else {
            return Ok(None);
        };
        let movies = actor
            .find_related(movie::Entity)
            .order_by_asc(movie::Column::Title)
            .all(&self.db)
            .await?;
        Ok(Some(ActorWithMovies { actor, movies }))
    }

    pub async fn create_actor(
        &self,
        fields: ActorFields,
        photo: Option<Vec<u8>>,
    ) -> AppResult<actor::Model> {
        let model = actor::ActiveModel {
            id: NotSet,
            name: Set(fields.name),
            gender: Set(fields.gender),
            age: Set(fields.age),
            imdb_url: Set(fields.imdb_url),
            photo: Set(photo),
        };
        let actor = model.insert(&self.db).await?;
        info!(actor_id = actor.id, name = %actor.name, "actor created");
        Ok(actor)
    }

    /// Overwrites the scalar fields of an actor. The stored photo is replaced
    /// only when `photo` is `Some`; `None` leaves it untouched.
    ///
    /// Returns `Ok(None)` when the actor does not exist, including when it
    /// disappears between the load and the write.
    pub async fn update_actor(
        &self,
        id: i32,
        fields: ActorFields,
        photo: Option<Vec<u8>>,
    ) -> AppResult<Option<actor::Model>> {
        let Some(existing) = self.find_actor(id).await? else {
            return Ok(None);
        };

        let mut model = existing.into_active_model();
        model.name = Set(fields.name);
        model.gender = Set(fields.gender);
        model.age = Set(fields.age);
        model.imdb_url = Set(fields.imdb_url);
        if let Some(bytes) = photo {
            model.photo = Set(Some(bytes));
        }

        match model.update(&self.db).await {
            Ok(actor) => {
                info!(actor_id = actor.id, "actor updated");
                Ok(Some(actor))
            },
            Err(DbErr::RecordNotUpdated) => {
                if self.find_actor(id).await?.is_none() {
                    debug!(actor_id = id, "actor vanished during update");
                    Ok(None)
                } else {
                    Err(AppError::Internal(anyhow::anyhow!(
                        "actor {id} was not updated although it still exists"
                    )))
                }
            },
            Err(err) => Err(err.into()),
        }
    }

    /// Removes an actor and every link that references it in one transaction.
    /// Returns `false` if there was no such actor.
    pub async fn delete_actor(&self, id: i32) -> AppResult<bool> {
        let txn = self.db.begin().await?;

        if actor::Entity::find_by_id(id).one(&txn).await?.is_none() {
            txn.rollback().await?;
            return Ok(false);
        }

        let links = actor_movie::Entity::delete_many()
            .filter(actor_movie::Column::ActorId.eq(id))
            .exec(&txn)
            .await?;
        actor::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        info!(actor_id = id, links_removed = links.rows_affected, "actor deleted");
        Ok(true)
    }

    pub async fn actor_photo(&self, id: i32) -> AppResult<Option<Vec<u8>>> {
        let photo: Option<Option<Vec<u8>>> = actor::Entity::find_by_id(id)
            .select_only()
            .column(actor::Column::Photo)
            .into_tuple()
            .one(&self.db)
            .await?;
        Ok(photo.flatten())
    }

    pub async fn actor_options(&self) -> AppResult<Vec<SelectOption>> {
        let rows: Vec<(i32, String)> = actor::Entity::find()
            .select_only()
            .column(actor::Column::Id)
            .column(actor::Column::Name)
            .order_by_asc(actor::Column::Name)
            .into_tuple()
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|(value, label)| SelectOption { value, label }).collect())
    }

    pub async fn movies_with_actors(&self) -> AppResult<Vec<MovieWithActors>> {
        let movies =
            movie::Entity::find().order_by_asc(movie::Column::Title).all(&self.db).await?;
        let actors =
            movies.load_many_to_many(actor::Entity, actor_movie::Entity, &self.db).await?;

        Ok(movies
            .into_iter()
            .zip(actors)
            .map(|(movie, actors)| MovieWithActors { movie, actors })
            .collect())
    }

    pub async fn find_movie(&self, id: i32) -> AppResult<Option<movie::Model>> {
        Ok(movie::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn movie_exists(&self, id: i32) -> AppResult<bool> {
        Ok(movie::Entity::find_by_id(id).count(&self.db).await? > 0)
    }

    pub async fn movie_with_actors(&self, id: i32) -> AppResult<Option<MovieWithActors>> {
        let Some(movie) = self.find_movie(id).await? else {
            return Ok(None);
        };
        let actors = movie
            .find_related(actor::Entity)
            .order_by_asc(actor::Column::Name)
            .all(&self.db)
            .await?;
        Ok(Some(MovieWithActors { movie, actors }))
    }

    pub async fn create_movie(
        &self,
        fields: MovieFields,
        poster: Option<Vec<u8>>,
    ) -> AppResult<movie::Model> {
        let model = movie::ActiveModel {
            id: NotSet,
            title: Set(fields.title),
            imdb_url: Set(fields.imdb_url),
            genre: Set(fields.genre),
            release_year: Set(fields.release_year),
            poster: Set(poster),
        };
        let movie = model.insert(&self.db).await?;
        info!(movie_id = movie.id, title = %movie.title, "movie created");
        Ok(movie)
    }

    /// Movie counterpart of [`Catalog::update_actor`].
    pub async fn update_movie(
        &self,
        id: i32,
        fields: MovieFields,
        poster: Option<Vec<u8>>,
    ) -> AppResult<Option<movie::Model>> {
        let Some(existing) = self.find_movie(id).await? else {
            return Ok(None);
        };

        let mut model = existing.into_active_model();
        model.title = Set(fields.title);
        model.imdb_url = Set(fields.imdb_url);
        model.genre = Set(fields.genre);
        model.release_year = Set(fields.release_year);
        if let Some(bytes) = poster {
            model.poster = Set(Some(bytes));
        }

        match model.update(&self.db).await {
            Ok(movie) => {
                info!(movie_id = movie.id, "movie updated");
                Ok(Some(movie))
            },
            Err(DbErr::RecordNotUpdated) => {
                if self.find_movie(id).await?.is_none() {
                    debug!(movie_id = id, "movie vanished during update");
                    Ok(None)
                } else {
                    Err(AppError::Internal(anyhow::anyhow!(
                        "movie {id} was not updated although it still exists"
                    )))
                }
            },
            Err(err) => Err(err.into()),
        }
    }

    pub async fn delete_movie(&self, id: i32) -> AppResult<bool> {
        let txn = self.db.begin().await?;

        if movie::Entity::find_by_id(id).one(&txn).await?.is_none() {
            txn.rollback().await?;
            return Ok(false);
        }

        let links = actor_movie::Entity::delete_many()
            .filter(actor_movie::Column::MovieId.eq(id))
            .exec(&txn)
            .await?;
        movie::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        info!(movie_id = id, links_removed = links.rows_affected, "movie deleted");
        Ok(true)
    }

    pub async fn movie_poster(&self, id: i32) -> AppResult<Option<Vec<u8>>> {
        let poster: Option<Option<Vec<u8>>> = movie::Entity::find_by_id(id)
            .select_only()
            .column(movie::Column::Poster)
            .into_tuple()
            .one(&self.db)
            .await?;
        Ok(poster.flatten())
    }

    pub async fn movie_options(&self) -> AppResult<Vec<SelectOption>> {
        let rows: Vec<(i32, String)> = movie::Entity::find()
            .select_only()
            .column(movie::Column::Id)
            .column(movie::Column::Title)
            .order_by_asc(movie::Column::Title)
            .into_tuple()
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|(value, label)| SelectOption { value, label }).collect())
    }

    pub async fn links(&self) -> AppResult<Vec<LinkDetail>> {
        let links = actor_movie::Entity::find()
            .order_by_asc(actor_movie::Column::Id)
            .all(&self.db)
            .await?;
        let actors = links.load_one(actor::Entity, &self.db).await?;
        let movies = links.load_one(movie::Entity, &self.db).await?;

        Ok(links
            .into_iter()
            .zip(actors)
            .zip(movies)
            .filter_map(|((link, actor), movie)| {
                Some(LinkDetail { link, actor: actor?, movie: movie? })
            })
            .collect())
    }

    pub async fn find_link(&self, id: i32) -> AppResult<Option<actor_movie::Model>> {
        Ok(actor_movie::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn link_detail(&self, id: i32) -> AppResult<Option<LinkDetail>> {
        let Some(link) = self.find_link(id).await? else {
            return Ok(None);
        };
        let actor = link.find_related(actor::Entity).one(&self.db).await?;
        let movie = link.find_related(movie::Entity).one(&self.db).await?;
        Ok(match (actor, movie) {
            (Some(actor), Some(movie)) => Some(LinkDetail { link, actor, movie }),
            _ => None,
        })
    }

    /// Whether a link for the pair exists, ignoring the row `excluding`.
    pub async fn pair_exists(
        &self,
        actor_id: i32,
        movie_id: i32,
        excluding: Option<i32>,
    ) -> AppResult<bool> {
        let mut query = actor_movie::Entity::find()
            .filter(actor_movie::Column::ActorId.eq(actor_id))
            .filter(actor_movie::Column::MovieId.eq(movie_id));
        if let Some(id) = excluding {
            query = query.filter(actor_movie::Column::Id.ne(id));
        }
        Ok(query.count(&self.db).await? > 0)
    }

    pub async fn create_link(
        &self,
        actor_id: i32,
        movie_id: i32,
    ) -> Result<actor_movie::Model, LinkWriteError> {
        let model =
            actor_movie::ActiveModel { id: NotSet, actor_id: Set(actor_id), movie_id: Set(movie_id) };
        let link = model.insert(&self.db).await?;
        info!(link_id = link.id, actor_id, movie_id, "relationship created");
        Ok(link)
    }

    /// Reassigns both sides of a link. `Ok(None)` means the link is gone.
    pub async fn update_link(
        &self,
        id: i32,
        actor_id: i32,
        movie_id: i32,
    ) -> Result<Option<actor_movie::Model>, LinkWriteError> {
        let Some(existing) = actor_movie::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut model = existing.into_active_model();
        model.actor_id = Set(actor_id);
        model.movie_id = Set(movie_id);

        match model.update(&self.db).await {
            Ok(link) => {
                info!(link_id = id, actor_id, movie_id, "relationship updated");
                Ok(Some(link))
            },
            Err(DbErr::RecordNotUpdated) => {
                if actor_movie::Entity::find_by_id(id).one(&self.db).await?.is_none() {
                    debug!(link_id = id, "relationship vanished during update");
                    Ok(None)
                } else {
                    Err(LinkWriteError::Db(DbErr::RecordNotUpdated))
                }
            },
            Err(err) => Err(err.into()),
        }
    }

    pub async fn delete_link(&self, id: i32) -> AppResult<bool> {
        let result = actor_movie::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected > 0 {
            info!(link_id = id, "relationship deleted");
        }
        Ok(result.rows_affected > 0)
    }
}
