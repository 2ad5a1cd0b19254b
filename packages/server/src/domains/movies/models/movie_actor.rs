use sqlx::PgConnection;

use crate::common::{ActorId, MovieId, StoreError};

/// Join-table rows linking movies and actors.
///
/// Both foreign keys cascade, so deleting either side drops its links.
pub struct MovieActor;

impl MovieActor {
    /// Link `actor_ids` to a movie. Ids must already be deduplicated.
    pub async fn insert_for_movie(
        movie_id: MovieId,
        actor_ids: &[ActorId],
        conn: &mut PgConnection,
    ) -> Result<(), StoreError> {
        if actor_ids.is_empty() {
            return Ok(());
        }

        sqlx::query(
            r#"
            INSERT INTO movie_actors (movie_id, actor_id)
            SELECT $1, UNNEST($2::int4[])
            "#,
        )
        .bind(movie_id)
        .bind(actor_ids)
        .execute(&mut *conn)
        .await
        .map_err(link_error("movie_actors.insert"))?;

        Ok(())
    }

    /// Swap the movie's whole actor set for `actor_ids`
    pub async fn replace_for_movie(
        movie_id: MovieId,
        actor_ids: &[ActorId],
        conn: &mut PgConnection,
    ) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM movie_actors WHERE movie_id = $1")
            .bind(movie_id)
            .execute(&mut *conn)
            .await
            .map_err(StoreError::storage("movie_actors.clear"))?;

        Self::insert_for_movie(movie_id, actor_ids, conn).await
    }
}

/// A dangling actor id surfaces as a client error rather than a storage fault
fn link_error(op: &'static str) -> impl FnOnce(sqlx::Error) -> StoreError {
    move |err| {
        let dangling = matches!(
            &err,
            sqlx::Error::Database(db) if db.is_foreign_key_violation()
        );
        if dangling {
            StoreError::invalid("unknown actor id")
        } else {
            StoreError::Storage { op, source: err }
        }
    }
}
