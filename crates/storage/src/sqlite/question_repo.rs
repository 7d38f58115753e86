use chrono::{DateTime, Utc};
use quiz_core::model::QuestionDraft;
use sqlx::Row;
use tracing::debug;

use super::SqliteRepository;
use super::mapping::{draft_id_to_i64, map_question_row, question_id_to_i64, ser};
use crate::repository::{QuestionQuery, QuestionRepository, StorageError};

const SELECT_COLUMNS: &str = r"
    SELECT id, summary, rating, context, image_url, article_url, title, published_at, tags
    FROM questions
    WHERE 1 = 1
";

fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for c in needle.to_lowercase().chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[async_trait::async_trait]
impl QuestionRepository for SqliteRepository {
    async fn query_questions(
        &self,
        query: &QuestionQuery,
    ) -> Result<Vec<QuestionDraft>, StorageError> {
        let mut sql = String::from(SELECT_COLUMNS);
        let mut bound = 0;
        let mut placeholder = || {
            bound += 1;
            format!("?{bound}")
        };

        let pattern = query.tag.as_str().map(like_pattern);
        if pattern.is_some() {
            sql.push_str(&format!("  AND LOWER(tags) LIKE {} ESCAPE '\\'\n", placeholder()));
        }
        if query.since.is_some() {
            sql.push_str(&format!("  AND published_at >= {}\n", placeholder()));
        }
        if !query.exclude.is_empty() {
            let list: Vec<String> = query.exclude.iter().map(|_| placeholder()).collect();
            sql.push_str(&format!("  AND id NOT IN ({})\n", list.join(", ")));
        }
        sql.push_str("ORDER BY published_at IS NULL, published_at DESC, id DESC\n");

        let mut q = sqlx::query(&sql);
        if let Some(pattern) = pattern {
            q = q.bind(pattern);
        }
        if let Some(since) = query.since {
            q = q.bind(since);
        }
        for id in &query.exclude {
            q = q.bind(question_id_to_i64(*id)?);
        }

        let rows = q
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_question_row(&row)?);
        }
        debug!(
            target: "storage.sqlite",
            rows = out.len(),
            excluded = query.exclude.len(),
            "queried questions"
        );
        Ok(out)
    }

    async fn list_tag_fields(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<String>, StorageError> {
        let rows = match since {
            Some(since) => {
                sqlx::query("SELECT tags FROM questions WHERE published_at >= ?1")
                    .bind(since)
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                sqlx::query("SELECT tags FROM questions")
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        rows.iter()
            .map(|row| row.try_get::<String, _>("tags").map_err(ser))
            .collect()
    }

    async fn upsert_questions(&self, drafts: &[QuestionDraft]) -> Result<usize, StorageError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        for draft in drafts {
            sqlx::query(
                r"
                INSERT INTO questions (
                    id, summary, rating, context, image_url, article_url, title, published_at, tags
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                ON CONFLICT(title) DO UPDATE SET
                    summary = excluded.summary,
                    rating = excluded.rating,
                    context = excluded.context,
                    image_url = excluded.image_url,
                    article_url = excluded.article_url,
                    published_at = excluded.published_at,
                    tags = excluded.tags
                ",
            )
            .bind(draft_id_to_i64(draft.id)?)
            .bind(draft.summary.as_str())
            .bind(draft.rating.as_str())
            .bind(draft.context.as_str())
            .bind(draft.image_url.as_deref())
            .bind(draft.article_url.as_deref())
            .bind(draft.title.as_str())
            .bind(draft.published_at)
            .bind(draft.tags.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(drafts.len())
    }
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("Politics"), "%politics%");
        assert_eq!(like_pattern("100%_sure"), "%100\\%\\_sure%");
    }
}
