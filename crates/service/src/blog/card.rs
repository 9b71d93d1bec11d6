use models::Post;
use serde::Serialize;

pub const EXCERPT_CHARS: usize = 150;
pub const WORDS_PER_MINUTE: usize = 200;
pub const DEFAULT_AUTHOR: &str = "Admin";
pub const DATE_FORMAT: &str = "%b %d, %Y";

/// One post as the listing grid shows it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PostCard {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub excerpt: String,
    pub category: String,
    pub author: String,
    pub date: Option<String>,
    pub reading_time: String,
    pub view_count: u64,
    pub tags: Vec<String>,
    pub featured_image: Option<String>,
}

impl PostCard {
    pub fn new(post: &Post) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            url: format!("/blog/{}", post.slug),
            excerpt: excerpt(post),
            category: post.category.clone(),
            author: match post.author.trim() {
                "" => DEFAULT_AUTHOR.to_string(),
                a => a.to_string(),
            },
            date: post.created_at.map(|d| d.format(DATE_FORMAT).to_string()),
            reading_time: format!("{} min read", reading_minutes(post)),
            view_count: post.view_count,
            tags: post.tags.to_vec(),
            featured_image: post.featured_image.clone().filter(|s| !s.trim().is_empty()),
        }
    }
}

/// The stored excerpt, or the start of the content.
pub fn excerpt(post: &Post) -> String {
    if !post.excerpt.trim().is_empty() {
        return post.excerpt.trim().to_string();
    }
    let flat = post.content.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= EXCERPT_CHARS {
        return flat;
    }
    let cut: String = flat.chars().take(EXCERPT_CHARS).collect();
    format!("{}...", cut.trim_end())
}

/// Stored reading time, else an estimate from the word count. Never below 1.
pub fn reading_minutes(post: &Post) -> u32 {
    match post.reading_time {
        Some(n) if n > 0 => n,
        _ => {
            let words = post.content.split_whitespace().count();
            u32::try_from(words.div_ceil(WORDS_PER_MINUTE)).unwrap_or(u32::MAX).max(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use models::Tags;

    #[test]
    fn card_fills_defaults() {
        let post = Post {
            id: 3,
            title: "Hello".into(),
            slug: "hello".into(),
            content: "word ".repeat(450),
            created_at: Some(Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap()),
            tags: Tags::new(["rust"]),
            featured_image: Some(" ".into()),
            ..Default::default()
        };
        let card = PostCard::new(&post);
        assert_eq!(card.url, "/blog/hello");
        assert_eq!(card.author, "Admin");
        assert_eq!(card.date.as_deref(), Some("Mar 05, 2024"));
        assert_eq!(card.reading_time, "3 min read");
        assert!(card.excerpt.ends_with("..."));
        assert!(card.excerpt.chars().count() <= EXCERPT_CHARS + 3);
        assert_eq!(card.featured_image, None);
    }

    #[test]
    fn stored_values_win() {
        let post = Post {
            excerpt: "Short intro".into(),
            content: "long body".into(),
            author: "Dana".into(),
            reading_time: Some(7),
            ..Default::default()
        };
        let card = PostCard::new(&post);
        assert_eq!(card.excerpt, "Short intro");
        assert_eq!(card.author, "Dana");
        assert_eq!(card.reading_time, "7 min read");
    }

    #[test]
    fn empty_post_reads_in_one_minute() {
        assert_eq!(reading_minutes(&Post::default()), 1);
        assert_eq!(excerpt(&Post::default()), "");
    }
}
