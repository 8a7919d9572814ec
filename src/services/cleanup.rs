//! Reconciliation for the non-transactional news/comment cascade.

use std::collections::HashSet;

use tracing::warn;
use uuid::Uuid;

use crate::app::AppState;
use crate::store::{Filter, StoreError};

/// Remove comments whose news post no longer exists. Runs at startup so a
/// cascade that failed mid-flight is eventually cleaned up.
pub async fn sweep_orphan_comments(state: &AppState) -> Result<u64, StoreError> {
    let news_ids: HashSet<Uuid> = state
        .news()
        .find(&Filter::new())
        .await?
        .into_iter()
        .map(|n| n.id)
        .collect();

    let comments = state.comments();
    let mut removed = 0;
    for comment in comments.find(&Filter::new()).await? {
        if !news_ids.contains(&comment.news_id) && comments.delete(comment.id).await? {
            removed += 1;
        }
    }

    if removed > 0 {
        warn!("orphan sweep removed {} comments", removed);
    }
    Ok(removed)
}
