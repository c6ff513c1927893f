//! "In the wild" fan-out.
//!
//! All sources are queried concurrently and joined once every request has
//! settled. A source that fails or misses its deadline contributes an empty
//! list; the others are kept. Failures are logged here and nowhere else.

use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::collaborators::{CollaboratorError, MentionSource};
use crate::types::InTheWild;

/// Query every source for `term`, each bounded by `deadline`, and merge the
/// results.
pub async fn gather(
    sources: &[Arc<dyn MentionSource>],
    term: &str,
    deadline: Duration,
) -> InTheWild {
    let lookups = sources.iter().map(|source| {
        let source = Arc::clone(source);
        async move {
            let kind = source.kind();
            let result = tokio::time::timeout(deadline, source.lookup(term))
                .await
                .unwrap_or_else(|_| {
                    Err(CollaboratorError::Unavailable(format!(
                        "no answer within {}ms",
                        deadline.as_millis()
                    )))
                });
            (kind, result)
        }
    });

    let mut merged = InTheWild::default();
    for (kind, result) in join_all(lookups).await {
        match result {
            Ok(mentions) => {
                debug!(source = kind.as_str(), count = mentions.len(), "Mentions fetched");
                merged.slot_mut(kind).extend(mentions);
            }
            Err(e) => {
                warn!(
                    source = kind.as_str(),
                    term,
                    error = %e,
                    "Mention lookup failed, using empty list"
                );
            }
        }
    }
    merged
}


#[cfg(test)]
mod tests {
    use super::fakes::FixedSource;
    use super::*;
    use crate::types::MentionKind;

    const DEADLINE: Duration = Duration::from_secs(1);

    #[tokio::test]
    async fn test_gather_merges_all_sources() {
        let sources: Vec<Arc<dyn MentionSource>> = vec![
            FixedSource::ok(MentionKind::Tweet),
            FixedSource::ok(MentionKind::ShortVideo),
            FixedSource::ok(MentionKind::ForumPost),
        ];
        let merged = gather(&sources, "Rizz", DEADLINE).await;
        assert_eq!(merged.tweets.len(), 1);
        assert_eq!(merged.short_videos.len(), 1);
        assert_eq!(merged.forum_posts.len(), 1);
        assert_eq!(merged.tweets[0].text, "saw Rizz today");
    }

    #[tokio::test]
    async fn test_failed_source_degrades_to_empty() {
        let sources: Vec<Arc<dyn MentionSource>> = vec![
            FixedSource::ok(MentionKind::Tweet),
            FixedSource::failing(MentionKind::ShortVideo),
            FixedSource::ok(MentionKind::ForumPost),
        ];
        let merged = gather(&sources, "Rizz", DEADLINE).await;
        assert_eq!(merged.tweets.len(), 1);
        assert!(merged.short_videos.is_empty());
        assert_eq!(merged.forum_posts.len(), 1);
        assert_eq!(merged.total(), 2);
    }

    #[tokio::test]
    async fn test_all_sources_failing_yields_empty() {
        let sources: Vec<Arc<dyn MentionSource>> = vec![
            FixedSource::failing(MentionKind::Tweet),
            FixedSource::failing(MentionKind::ShortVideo),
        ];
        assert!(gather(&sources, "Rizz", DEADLINE).await.is_empty());
    }

    #[tokio::test]
    async fn test_slow_source_is_cut_off_at_deadline() {
        let slow = FixedSource::slow(MentionKind::ShortVideo, Duration::from_secs(5));
        let sources: Vec<Arc<dyn MentionSource>> = vec![
            FixedSource::ok(MentionKind::Tweet),
            slow.clone(),
            FixedSource::ok(MentionKind::ForumPost),
        ];

        let started = std::time::Instant::now();
        let merged = gather(&sources, "Rizz", Duration::from_millis(50)).await;

        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(slow.calls.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert_eq!(merged.tweets.len(), 1);
        assert!(merged.short_videos.is_empty());
        assert_eq!(merged.forum_posts.len(), 1);
    }
}
