//! Bulk import of scraped fact checks from a JSON array.
//!
//! Rows use the dataset's column names (`Summary`, `Rating`, `Title`, ...)
//! and are upserted on title.

use quiz_core::model::QuestionDraft;
use thiserror::Error;
use tracing::{info, warn};

use crate::remote::rows::QuestionRow;
use crate::repository::{QuestionRepository, StorageError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ImportError {
    #[error("invalid seed file: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
}

/// Parse a seed file. Rows without a title or summary are dropped and counted.
///
/// # Errors
///
/// Returns `ImportError::Json` if the text is not a JSON array of objects.
pub fn parse_seed(json: &str) -> Result<(Vec<QuestionDraft>, usize), ImportError> {
    let rows: Vec<QuestionRow> = serde_json::from_str(json)?;
    let total = rows.len();
    let drafts: Vec<QuestionDraft> = rows
        .into_iter()
        .map(QuestionRow::into_draft)
        .filter(|d| !d.title.trim().is_empty() && !d.summary.trim().is_empty())
        .collect();
    let skipped = total - drafts.len();
    Ok((drafts, skipped))
}

/// Parse `json` and upsert every usable row into `repo`.
///
/// # Errors
///
/// Returns `ImportError` if parsing or the upsert fails.
pub async fn import_questions(
    repo: &dyn QuestionRepository,
    json: &str,
) -> Result<ImportReport, ImportError> {
    let (drafts, skipped) = parse_seed(json)?;
    if skipped > 0 {
        warn!(target: "storage.import", skipped, "dropped rows without title or summary");
    }
    let imported = repo.upsert_questions(&drafts).await?;
    info!(target: "storage.import", imported, skipped, "seed imported");
    Ok(ImportReport { imported, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryRepository, QuestionQuery};

    const SEED: &str = r#"[
        {"Summary": "A shark swam on a highway.", "Rating": "Fake", "Title": "Highway Shark",
         "Date": "2024-09-01", "Tags": "['Weather']", "URL": "https://example.org/shark"},
        {"Summary": "", "Rating": "True", "Title": "Blank"},
        {"Summary": "No title here.", "Rating": "True"},
        {"Summary": "Bees can recognise faces.", "Rating": "True", "Title": "Bee Faces",
         "Context": "Lab study.", "Image": null}
    ]"#;

    #[test]
    fn parse_seed_skips_incomplete_rows() {
        let (drafts, skipped) = parse_seed(SEED).unwrap();
        assert_eq!(drafts.len(), 2);
        assert_eq!(skipped, 2);
        assert_eq!(drafts[0].title, "Highway Shark");
        assert_eq!(
            drafts[0].article_url.as_deref(),
            Some("https://example.org/shark")
        );
    }

    #[test]
    fn parse_seed_rejects_non_arrays() {
        assert!(matches!(parse_seed("{}"), Err(ImportError::Json(_))));
    }

    #[tokio::test]
    async fn import_is_idempotent_on_title() {
        let repo = InMemoryRepository::new();
        let first = import_questions(&repo, SEED).await.unwrap();
        let second = import_questions(&repo, SEED).await.unwrap();
        assert_eq!(first, ImportReport { imported: 2, skipped: 2 });
        assert_eq!(second.imported, 2);

        let stored = repo
            .query_questions(&QuestionQuery::default())
            .await
            .unwrap();
        assert_eq!(stored.len(), 2);
    }
}
