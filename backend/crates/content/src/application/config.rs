//! Application Configuration
//!
//! Defaults used when formatting blog posts for the public site.

/// Content application configuration
#[derive(Debug, Clone)]
pub struct ContentConfig {
    /// Card image for posts without one
    pub post_image_placeholder: String,
    /// Hero image on the single-post page
    pub post_hero_placeholder: String,
    pub author_image_placeholder: String,
    pub author_title: String,
    pub author_bio: String,
    /// Lower bound of the "N min read" estimate
    pub min_read_minutes: usize,
    /// Characters read per minute
    pub chars_per_minute: usize,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            post_image_placeholder: "/placeholder.svg?height=200&width=400".to_string(),
            post_hero_placeholder: "/placeholder.svg?height=600&width=1200".to_string(),
            author_image_placeholder: "/placeholder.svg?height=100&width=100".to_string(),
            author_title: "Content Writer".to_string(),
            author_bio: "A passionate writer about technology and AI advancements.".to_string(),
            min_read_minutes: 3,
            chars_per_minute: 1000,
        }
    }
}

impl ContentConfig {
    /// "N min read" for a body of `content`
    pub fn read_time(&self, content: Option<&str>) -> String {
        let chars = content.map(|c| c.chars().count()).unwrap_or(0);
        let minutes = chars
            .div_ceil(self.chars_per_minute.max(1))
            .max(self.min_read_minutes);
        format!("{minutes} min read")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_time() {
        let config = ContentConfig::default();
        assert_eq!(config.read_time(None), "3 min read");
        assert_eq!(config.read_time(Some(&"a".repeat(2500))), "3 min read");
        assert_eq!(config.read_time(Some(&"a".repeat(3001))), "4 min read");
    }
}
