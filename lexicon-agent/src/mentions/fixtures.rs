//! Offline mention sources with canned content.
//!
//! Used when no mention endpoint is configured.

use async_trait::async_trait;
use lexicon::{CollaboratorError, Mention, MentionKind, MentionSource};

pub struct StaticMentionSource {
    kind: MentionKind,
}

impl StaticMentionSource {
    pub fn new(kind: MentionKind) -> Self {
        Self { kind }
    }

    /// One source per kind.
    pub fn all() -> Vec<Self> {
        vec![
            Self::new(MentionKind::Tweet),
            Self::new(MentionKind::ShortVideo),
            Self::new(MentionKind::ForumPost),
        ]
    }
}

fn mention(author: &str, text: String, url: &str, title: Option<&str>) -> Mention {
    Mention {
        author: author.to_string(),
        text,
        url: url.to_string(),
        title: title.map(String::from),
    }
}

fn tweets(term: &str) -> Vec<Mention> {
    vec![
        mention(
            "MillennialMike",
            format!("Just learned what \"{}\" means lol, feeling old.", term),
            "https://twitter.com/MillennialMike/status/12345",
            None,
        ),
        mention(
            "SlangWatcher",
            format!("Is it just me or is \"{}\" already kinda overused? #genzslang", term),
            "https://twitter.com/SlangWatcher/status/67890",
            None,
        ),
    ]
}

fn short_videos() -> Vec<Mention> {
    vec![
        mention(
            "@example",
            "Using the new slang!".to_string(),
            "https://www.tiktok.com/@example/video1",
            None,
        ),
        mention(
            "@another",
            "Is this slang dead?".to_string(),
            "https://www.tiktok.com/@another/video2",
            None,
        ),
    ]
}

fn forum_posts() -> Vec<Mention> {
    vec![
        mention(
            "confusedUser",
            "I saw someone use this slang, and I am so confused.".to_string(),
            "https://www.reddit.com/r/example/post1",
            Some("What does this slang mean?"),
        ),
        mention(
            "opinionatedUser",
            "I think this slang is cringe. What do you think?".to_string(),
            "https://www.reddit.com/r/example/post2",
            Some("Is this slang cringe?"),
        ),
    ]
}

#[async_trait]
impl MentionSource for StaticMentionSource {
    fn kind(&self) -> MentionKind {
        self.kind
    }

    async fn lookup(&self, term: &str) -> Result<Vec<Mention>, CollaboratorError> {
        Ok(match self.kind {
            MentionKind::Tweet => tweets(term),
            MentionKind::ShortVideo => short_videos(),
            MentionKind::ForumPost => forum_posts(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_sources_cover_every_kind() {
        let sources = StaticMentionSource::all();
        assert_eq!(sources.len(), 3);

        let tweets = sources[0].lookup("Rizz").await.unwrap();
        assert!(tweets.iter().all(|t| t.text.contains("\"Rizz\"")));

        let posts = sources[2].lookup("Rizz").await.unwrap();
        assert_eq!(posts[0].title.as_deref(), Some("What does this slang mean?"));
    }
}
