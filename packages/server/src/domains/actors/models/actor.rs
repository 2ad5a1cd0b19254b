use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgExecutor;
use sqlx::PgPool;

use crate::common::{ActorId, ListQuery, MovieId, Sort, SortColumn, StoreError};

pub const NAME_MAX_CHARS: usize = 100;

const ACTOR_SELECT: &str = r#"
    SELECT a.id, a.name, a.sex, a.birth_date,
           COALESCE(
               array_agg(ma.movie_id ORDER BY ma.movie_id) FILTER (WHERE ma.movie_id IS NOT NULL),
               '{}'
           ) AS movie_ids
    FROM actors a
    LEFT JOIN movie_actors ma ON ma.actor_id = a.id
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "actor_sex", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

/// Actor with the ids of every movie they appear in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Actor {
    pub id: ActorId,
    pub name: String,
    pub sex: Sex,
    pub birth_date: NaiveDate,
    /// Read-only; links are managed from the movie side
    pub movie_ids: Vec<MovieId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewActor {
    pub name: String,
    pub sex: Sex,
    pub birth_date: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ActorPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sex: Option<Sex>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorSortColumn {
    Id,
    Name,
    Sex,
    BirthDate,
}

impl SortColumn for ActorSortColumn {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "id" => Some(ActorSortColumn::Id),
            "name" => Some(ActorSortColumn::Name),
            "sex" => Some(ActorSortColumn::Sex),
            "birth_date" => Some(ActorSortColumn::BirthDate),
            _ => None,
        }
    }

    fn as_sql(&self) -> &'static str {
        match self {
            ActorSortColumn::Id => "a.id",
            ActorSortColumn::Name => "a.name",
            ActorSortColumn::Sex => "a.sex",
            ActorSortColumn::BirthDate => "a.birth_date",
        }
    }
}

impl ActorSortColumn {
    pub fn default_sort() -> Sort<Self> {
        Sort::desc(ActorSortColumn::Name)
    }
}

fn validate_name(name: &str) -> Result<(), StoreError> {
    let len = name.trim().chars().count();
    if len == 0 || len > NAME_MAX_CHARS {
        return Err(StoreError::invalid(format!(
            "name must be between 1 and {NAME_MAX_CHARS} characters"
        )));
    }
    Ok(())
}

impl NewActor {
    pub fn validate(&self) -> Result<(), StoreError> {
        validate_name(&self.name)
    }
}

impl ActorPatch {
    pub fn validate(&self) -> Result<(), StoreError> {
        match &self.name {
            Some(name) => validate_name(name),
            None => Ok(()),
        }
    }

    pub fn apply_to(self, actor: Actor) -> Actor {
        Actor {
            id: actor.id,
            name: self.name.unwrap_or(actor.name),
            sex: self.sex.unwrap_or(actor.sex),
            birth_date: self.birth_date.unwrap_or(actor.birth_date),
            movie_ids: actor.movie_ids,
        }
    }
}

impl Actor {
    pub async fn find_by_id<'e, E>(id: ActorId, executor: E) -> Result<Self, StoreError>
    where
        E: PgExecutor<'e>,
    {
        let sql = format!("{ACTOR_SELECT} WHERE a.id = $1 GROUP BY a.id");
        sqlx::query_as::<_, Self>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await
            .map_err(StoreError::storage("actors.find_by_id"))?
            .ok_or(StoreError::NotFound("Actor"))
    }

    pub async fn find_paginated(
        query: &ListQuery<ActorSortColumn>,
        pool: &PgPool,
    ) -> Result<Vec<Self>, StoreError> {
        let sql = format!(
            "{ACTOR_SELECT} GROUP BY a.id ORDER BY {} LIMIT $1 OFFSET $2",
            query.sort.order_by_sql("a.id")
        );
        sqlx::query_as::<_, Self>(&sql)
            .bind(query.page.limit)
            .bind(query.page.offset)
            .fetch_all(pool)
            .await
            .map_err(StoreError::storage("actors.find_paginated"))
    }

    /// A new actor has no movies yet
    pub async fn create(input: NewActor, pool: &PgPool) -> Result<Self, StoreError> {
        input.validate()?;

        let id = sqlx::query_scalar::<_, ActorId>(
            r#"
            INSERT INTO actors (name, sex, birth_date)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(input.name.trim())
        .bind(input.sex)
        .bind(input.birth_date)
        .fetch_one(pool)
        .await
        .map_err(StoreError::storage("actors.create"))?;

        Ok(Actor {
            id,
            name: input.name.trim().to_string(),
            sex: input.sex,
            birth_date: input.birth_date,
            movie_ids: Vec::new(),
        })
    }

    pub async fn update(id: ActorId, patch: ActorPatch, pool: &PgPool) -> Result<Self, StoreError> {
        patch.validate()?;

        let mut tx = pool
            .begin()
            .await
            .map_err(StoreError::storage("actors.update"))?;

        let updated = sqlx::query_scalar::<_, ActorId>(
            r#"
            UPDATE actors SET
                name = COALESCE($2, name),
                sex = COALESCE($3, sex),
                birth_date = COALESCE($4, birth_date)
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(patch.name.as_deref().map(str::trim))
        .bind(patch.sex)
        .bind(patch.birth_date)
        .fetch_optional(&mut *tx)
        .await
        .map_err(StoreError::storage("actors.update"))?;

        if updated.is_none() {
            return Err(StoreError::NotFound("Actor"));
        }

        let actor = Self::find_by_id(id, &mut *tx).await?;

        tx.commit()
            .await
            .map_err(StoreError::storage("actors.update"))?;

        Ok(actor)
    }

    /// Delete an actor; they drop out of every movie's cast
    pub async fn delete(id: ActorId, pool: &PgPool) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM actors WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(StoreError::storage("actors.delete"))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("Actor"));
        }
        Ok(())
    }
}
