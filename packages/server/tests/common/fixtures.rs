//! Test fixtures for creating test data.
//!
//! These fixtures use the model methods directly to create test data.

use anyhow::Result;
use chrono::NaiveDate;
use movielab_core::common::{ActorId, Role};
use movielab_core::domains::actors::{Actor, NewActor, Sex};
use movielab_core::domains::movies::{Movie, NewMovie};
use sqlx::PgPool;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// Users are provisioned out of band, so tests insert them directly
pub async fn create_user(pool: &PgPool, username: &str, password: &str, role: Role) -> Result<()> {
    sqlx::query("INSERT INTO users (username, password, role) VALUES ($1, $2, $3)")
        .bind(username)
        .bind(password)
        .bind(role)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn create_actor(pool: &PgPool, name: &str) -> Result<Actor> {
    let actor = Actor::create(
        NewActor {
            name: name.to_string(),
            sex: Sex::Male,
            birth_date: date(1964, 9, 2),
        },
        pool,
    )
    .await?;
    Ok(actor)
}

pub async fn create_movie(pool: &PgPool, title: &str, actor_ids: &[ActorId]) -> Result<Movie> {
    let movie = Movie::create(
        NewMovie {
            title: title.to_string(),
            description: Some(format!("About {title}")),
            release_date: date(1999, 3, 31),
            rating: 8,
            actor_ids: actor_ids.to_vec(),
        },
        pool,
    )
    .await?;
    Ok(movie)
}

/// Number of join rows pointing at a movie
pub async fn count_links_for_movie(pool: &PgPool, movie_id: i32) -> Result<i64> {
    let count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM movie_actors WHERE movie_id = $1")
            .bind(movie_id)
            .fetch_one(pool)
            .await?;
    Ok(count)
}
