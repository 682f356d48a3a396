use crate::entities::{actor, actor_movie, movie};

/// Validated scalar fields of an actor, ready to be written.
#[derive(Clone, Debug, PartialEq)]
pub struct ActorFields {
    pub name: String,
    pub gender: String,
    pub age: i32,
    pub imdb_url: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MovieFields {
    pub title: String,
    pub imdb_url: String,
    pub genre: String,
    pub release_year: i32,
}

/// A piece of generated text paired with its compound sentiment score.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredText {
    pub text: String,
    pub sentiment: f64,
}

pub type GeneratedReview = ScoredText;
pub type GeneratedTweet = ScoredText;

#[derive(Clone, Debug)]
pub struct ActorWithMovies {
    pub actor: actor::Model,
    pub movies: Vec<movie::Model>,
}

#[derive(Clone, Debug)]
pub struct MovieWithActors {
    pub movie: movie::Model,
    pub actors: Vec<actor::Model>,
}

#[derive(Clone, Debug)]
pub struct LinkDetail {
    pub link: actor_movie::Model,
    pub actor: actor::Model,
    pub movie: movie::Model,
}

#[derive(Clone, Debug)]
pub struct ActorDetail {
    pub actor: ActorWithMovies,
    pub tweets: Vec<GeneratedTweet>,
    pub overall_sentiment: f64,
}

#[derive(Clone, Debug)]
pub struct MovieDetail {
    pub movie: MovieWithActors,
    pub reviews: Vec<GeneratedReview>,
    pub average_sentiment: f64,
}

/// An entry in an actor or movie drop-down.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectOption {
    pub value: i32,
    pub label: String,
}
