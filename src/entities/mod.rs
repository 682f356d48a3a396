pub mod actor;
pub mod actor_movie;
pub mod movie;
