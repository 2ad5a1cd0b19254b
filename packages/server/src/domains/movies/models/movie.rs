use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgExecutor;
use sqlx::PgPool;

use super::movie_actor::MovieActor;
use crate::common::{ActorId, ListQuery, MovieId, Page, Sort, SortColumn, StoreError};

pub const TITLE_MAX_CHARS: usize = 150;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;
pub const RATING_RANGE: std::ops::RangeInclusive<i32> = 0..=10;

/// Base movie columns plus the aggregated actor id set.
///
/// Callers append `WHERE`, then `GROUP BY m.id`, then ordering.
const MOVIE_SELECT: &str = r#"
    SELECT m.id, m.title, m.description, m.release_date, m.rating,
           COALESCE(
               array_agg(ma.actor_id ORDER BY ma.actor_id) FILTER (WHERE ma.actor_id IS NOT NULL),
               '{}'
           ) AS actor_ids
    FROM movies m
    LEFT JOIN movie_actors ma ON ma.movie_id = m.id
"#;

/// Movie with its associated actor ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub release_date: NaiveDate,
    pub rating: i32,
    /// Ascending, derived from `movie_actors`
    pub actor_ids: Vec<ActorId>,
}

/// Client-supplied data for a new movie
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewMovie {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub release_date: NaiveDate,
    pub rating: i32,
    #[serde(default)]
    pub actor_ids: Vec<ActorId>,
}

/// Partial update: absent fields keep their stored values.
///
/// `actor_ids`, when present, replaces the whole association set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MoviePatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub actor_ids: Option<Vec<ActorId>>,
}

/// Columns a movie listing may be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieSortColumn {
    Id,
    Title,
    ReleaseDate,
    Rating,
}

impl SortColumn for MovieSortColumn {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "id" => Some(MovieSortColumn::Id),
            "title" => Some(MovieSortColumn::Title),
            "release_date" => Some(MovieSortColumn::ReleaseDate),
            "rating" => Some(MovieSortColumn::Rating),
            _ => None,
        }
    }

    fn as_sql(&self) -> &'static str {
        match self {
            MovieSortColumn::Id => "m.id",
            MovieSortColumn::Title => "m.title",
            MovieSortColumn::ReleaseDate => "m.release_date",
            MovieSortColumn::Rating => "m.rating",
        }
    }
}

impl MovieSortColumn {
    /// Listing order when the client sends no `sort`
    pub fn default_sort() -> Sort<Self> {
        Sort::desc(MovieSortColumn::Title)
    }
}

/// Substring search over titles and actor names.
///
/// Blank terms are normalized to `None`, meaning "no filter on that field".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieSearch {
    pub title: Option<String>,
    pub actor: Option<String>,
    pub page: Page,
}

impl MovieSearch {
    pub fn new(title: Option<&str>, actor: Option<&str>, page: Page) -> Self {
        Self {
            title: search_term(title),
            actor: search_term(actor),
            page,
        }
    }

    /// `ILIKE` pattern for the title filter
    pub fn title_pattern(&self) -> Option<String> {
        self.title.as_deref().map(contains_pattern)
    }

    /// `ILIKE` pattern for the actor-name filter
    pub fn actor_pattern(&self) -> Option<String> {
        self.actor.as_deref().map(contains_pattern)
    }
}

fn search_term(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_string)
}

/// Escape `LIKE` metacharacters so the term matches literally
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn contains_pattern(term: &str) -> String {
    format!("%{}%", escape_like(term))
}

// ============================================================================
// Validation
// ============================================================================

fn validate_title(title: &str) -> Result<(), StoreError> {
    let len = title.trim().chars().count();
    if len == 0 || len > TITLE_MAX_CHARS {
        return Err(StoreError::invalid(format!(
            "title must be between 1 and {TITLE_MAX_CHARS} characters"
        )));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), StoreError> {
    if description.chars().count() > DESCRIPTION_MAX_CHARS {
        return Err(StoreError::invalid(format!(
            "description must be at most {DESCRIPTION_MAX_CHARS} characters"
        )));
    }
    Ok(())
}

fn validate_rating(rating: i32) -> Result<(), StoreError> {
    if !RATING_RANGE.contains(&rating) {
        return Err(StoreError::invalid(format!(
            "rating must be between {} and {}",
            RATING_RANGE.start(),
            RATING_RANGE.end()
        )));
    }
    Ok(())
}

/// Sorted, duplicate-free actor ids
pub fn normalize_actor_ids(ids: &[ActorId]) -> Vec<ActorId> {
    let mut ids = ids.to_vec();
    ids.sort();
    ids.dedup();
    ids
}

impl NewMovie {
    pub fn validate(&self) -> Result<(), StoreError> {
        validate_title(&self.title)?;
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        validate_rating(self.rating)
    }
}

impl MoviePatch {
    pub fn validate(&self) -> Result<(), StoreError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        if let Some(rating) = self.rating {
            validate_rating(rating)?;
        }
        Ok(())
    }

    /// Merge the present fields over an existing movie
    pub fn apply_to(self, movie: Movie) -> Movie {
        Movie {
            id: movie.id,
            title: self.title.unwrap_or(movie.title),
            description: self.description.or(movie.description),
            release_date: self.release_date.unwrap_or(movie.release_date),
            rating: self.rating.unwrap_or(movie.rating),
            actor_ids: match self.actor_ids {
                Some(ids) => normalize_actor_ids(&ids),
                None => movie.actor_ids,
            },
        }
    }
}

// ============================================================================
// Queries
// ============================================================================

impl Movie {
    /// Find a movie by ID, with its actor ids, in one round trip
    pub async fn find_by_id<'e, E>(id: MovieId, executor: E) -> Result<Self, StoreError>
    where
        E: PgExecutor<'e>,
    {
        let sql = format!("{MOVIE_SELECT} WHERE m.id = $1 GROUP BY m.id");
        sqlx::query_as::<_, Self>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await
            .map_err(StoreError::storage("movies.find_by_id"))?
            .ok_or(StoreError::NotFound("Movie"))
    }

    /// List movies ordered by an allow-listed column
    pub async fn find_paginated(
        query: &ListQuery<MovieSortColumn>,
        pool: &PgPool,
    ) -> Result<Vec<Self>, StoreError> {
        let sql = format!(
            "{MOVIE_SELECT} GROUP BY m.id ORDER BY {} LIMIT $1 OFFSET $2",
            query.sort.order_by_sql("m.id")
        );
        sqlx::query_as::<_, Self>(&sql)
            .bind(query.page.limit)
            .bind(query.page.offset)
            .fetch_all(pool)
            .await
            .map_err(StoreError::storage("movies.find_paginated"))
    }

    /// Movies whose title matches AND that have at least one matching actor
    pub async fn search(search: &MovieSearch, pool: &PgPool) -> Result<Vec<Self>, StoreError> {
        let sql = format!(
            r#"{MOVIE_SELECT}
            WHERE ($1::text IS NULL OR m.title ILIKE $1)
              AND ($2::text IS NULL OR EXISTS (
                    SELECT 1
                    FROM movie_actors sma
                    INNER JOIN actors sa ON sa.id = sma.actor_id
                    WHERE sma.movie_id = m.id AND sa.name ILIKE $2
                  ))
            GROUP BY m.id
            ORDER BY m.title ASC, m.id ASC
            LIMIT $3 OFFSET $4"#
        );
        sqlx::query_as::<_, Self>(&sql)
            .bind(search.title_pattern())
            .bind(search.actor_pattern())
            .bind(search.page.limit)
            .bind(search.page.offset)
            .fetch_all(pool)
            .await
            .map_err(StoreError::storage("movies.search"))
    }

    /// Insert a movie and its actor links atomically
    pub async fn create(input: NewMovie, pool: &PgPool) -> Result<Self, StoreError> {
        input.validate()?;
        let actor_ids = normalize_actor_ids(&input.actor_ids);

        let mut tx = pool
            .begin()
            .await
            .map_err(StoreError::storage("movies.create"))?;

        let id = sqlx::query_scalar::<_, MovieId>(
            r#"
            INSERT INTO movies (title, description, release_date, rating)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(input.title.trim())
        .bind(&input.description)
        .bind(input.release_date)
        .bind(input.rating)
        .fetch_one(&mut *tx)
        .await
        .map_err(StoreError::storage("movies.create"))?;

        MovieActor::insert_for_movie(id, &actor_ids, &mut tx).await?;

        let movie = Self::find_by_id(id, &mut *tx).await?;

        tx.commit()
            .await
            .map_err(StoreError::storage("movies.create"))?;

        Ok(movie)
    }

    /// Apply a partial update; replaces the actor set when one is supplied
    pub async fn update(id: MovieId, patch: MoviePatch, pool: &PgPool) -> Result<Self, StoreError> {
        patch.validate()?;

        let mut tx = pool
            .begin()
            .await
            .map_err(StoreError::storage("movies.update"))?;

        // Row lock taken here serializes concurrent patches of the same movie.
        let updated = sqlx::query_scalar::<_, MovieId>(
            r#"
            UPDATE movies SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                release_date = COALESCE($4, release_date),
                rating = COALESCE($5, rating)
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(patch.title.as_deref().map(str::trim))
        .bind(&patch.description)
        .bind(patch.release_date)
        .bind(patch.rating)
        .fetch_optional(&mut *tx)
        .await
        .map_err(StoreError::storage("movies.update"))?;

        if updated.is_none() {
            return Err(StoreError::NotFound("Movie"));
        }

        if let Some(actor_ids) = &patch.actor_ids {
            MovieActor::replace_for_movie(id, &normalize_actor_ids(actor_ids), &mut tx).await?;
        }

        let movie = Self::find_by_id(id, &mut *tx).await?;

        tx.commit()
            .await
            .map_err(StoreError::storage("movies.update"))?;

        Ok(movie)
    }

    /// Delete a movie; its actor links go with it (ON DELETE CASCADE)
    pub async fn delete(id: MovieId, pool: &PgPool) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(StoreError::storage("movies.delete"))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("Movie"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie() -> Movie {
        Movie {
            id: MovieId::new(1),
            title: "The Matrix".to_string(),
            description: Some("Red pill".to_string()),
            release_date: NaiveDate::from_ymd_opt(1999, 3, 31).unwrap(),
            rating: 9,
            actor_ids: vec![ActorId::new(1), ActorId::new(2)],
        }
    }

    #[test]
    fn patch_keeps_absent_fields() {
        let patch = MoviePatch {
            rating: Some(7),
            ..Default::default()
        };
        let patched = patch.apply_to(movie());

        assert_eq!(patched.rating, 7);
        assert_eq!(patched.title, "The Matrix");
        assert_eq!(patched.description.as_deref(), Some("Red pill"));
        assert_eq!(patched.actor_ids, vec![ActorId::new(1), ActorId::new(2)]);
    }

    #[test]
    fn patch_replaces_whole_actor_set() {
        let patch = MoviePatch {
            actor_ids: Some(vec![ActorId::new(3)]),
            ..Default::default()
        };
        assert_eq!(patch.apply_to(movie()).actor_ids, vec![ActorId::new(3)]);
    }

    #[test]
    fn patch_from_partial_json() {
        let patch: MoviePatch = serde_json::from_str(r#"{"title": "Reloaded"}"#).unwrap();
        assert_eq!(patch.title.as_deref(), Some("Reloaded"));
        assert!(patch.rating.is_none());
        assert!(patch.actor_ids.is_none());
    }

    #[test]
    fn new_movie_validation() {
        let mut input = NewMovie {
            title: "Heat".to_string(),
            description: None,
            release_date: NaiveDate::from_ymd_opt(1995, 12, 15).unwrap(),
            rating: 8,
            actor_ids: vec![],
        };
        assert!(input.validate().is_ok());

        input.rating = 11;
        assert!(input.validate().is_err());

        input.rating = 8;
        input.title = "   ".to_string();
        assert!(input.validate().is_err());

        input.title = "x".repeat(TITLE_MAX_CHARS + 1);
        assert!(input.validate().is_err());
    }

    #[test]
    fn actor_ids_are_sorted_and_deduplicated() {
        let ids = [ActorId::new(3), ActorId::new(1), ActorId::new(3)];
        assert_eq!(
            normalize_actor_ids(&ids),
            vec![ActorId::new(1), ActorId::new(3)]
        );
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b\\c"), "a\\_b\\\\c");
        assert_eq!(escape_like("Matrix"), "Matrix");
    }

    #[test]
    fn blank_search_terms_mean_no_filter() {
        let search = MovieSearch::new(Some("  "), Some(""), Page::default());
        assert!(search.title.is_none());
        assert!(search.actor.is_none());
        assert!(search.title_pattern().is_none());

        let search = MovieSearch::new(Some(" Matrix "), None, Page::default());
        assert_eq!(search.title_pattern().as_deref(), Some("%Matrix%"));
        assert!(search.actor_pattern().is_none());
    }

    #[test]
    fn sort_columns_are_allow_listed() {
        assert_eq!(
            MovieSortColumn::from_name("release_date"),
            Some(MovieSortColumn::ReleaseDate)
        );
        assert_eq!(MovieSortColumn::from_name("description"), None);
        assert_eq!(MovieSortColumn::from_name("title; --"), None);
    }
}
