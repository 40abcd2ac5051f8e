//! Crawler detection
//!
//! Link-preview bots are recognised by user-agent sniffing. This is a
//! heuristic: a client can claim to be anything.

/// Signatures of the social / messaging preview fetchers handled by default
pub const DEFAULT_CRAWLER_PATTERNS: &[&str] = &[
    "facebookexternalhit",
    "Twitterbot",
    "WhatsApp",
    "TelegramBot",
    "Pinterest",
    "LinkedInBot",
];

/// Decides whether a request comes from a preview crawler
pub trait CrawlerDetect: Send + Sync {
    fn is_crawler(&self, user_agent: &str) -> bool;
}

/// Case-insensitive substring match against a fixed pattern list
#[derive(Debug, Clone)]
pub struct PatternCrawlerDetector {
    // 预先转成小写，匹配时只处理 UA
    patterns: Vec<String>,
}

impl PatternCrawlerDetector {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| p.as_ref().trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        Self { patterns }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

impl Default for PatternCrawlerDetector {
    fn default() -> Self {
        Self::new(DEFAULT_CRAWLER_PATTERNS)
    }
}

impl CrawlerDetect for PatternCrawlerDetector {
    fn is_crawler(&self, user_agent: &str) -> bool {
        if user_agent.is_empty() {
            return false;
        }
        let ua = user_agent.to_lowercase();
        self.patterns.iter().any(|p| ua.contains(p.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_crawlers() {
        let detector = PatternCrawlerDetector::default();
        for ua in [
            "facebookexternalhit/1.1 (+http://www.facebook.com/externalhit_uatext.php)",
            "Twitterbot/1.0",
            "WhatsApp/2.23.20.0 A",
            "TelegramBot (like TwitterBot)",
            "Pinterest/0.2 (+https://www.pinterest.com/bot.html)",
            "LinkedInBot/1.0 (compatible; Mozilla/5.0; Apache-HttpClient +http://www.linkedin.com)",
        ] {
            assert!(detector.is_crawler(ua), "expected crawler: {}", ua);
        }
    }

    #[test]
    fn test_case_insensitive() {
        let detector = PatternCrawlerDetector::default();
        assert!(detector.is_crawler("FACEBOOKEXTERNALHIT/1.1"));
        assert!(detector.is_crawler("whatsapp/2.0"));
    }

    #[test]
    fn test_browsers_are_not_crawlers() {
        let detector = PatternCrawlerDetector::default();
        assert!(!detector.is_crawler(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36"
        ));
        assert!(!detector.is_crawler("curl/8.4.0"));
        assert!(!detector.is_crawler(""));
    }

    #[test]
    fn test_custom_patterns() {
        let detector = PatternCrawlerDetector::new(["Slackbot", "  ", "Discordbot"]);
        assert_eq!(detector.patterns().len(), 2);
        assert!(detector.is_crawler("Slackbot-LinkExpanding 1.0"));
        assert!(detector.is_crawler("Mozilla/5.0 (compatible; Discordbot/2.0)"));
        assert!(!detector.is_crawler("Twitterbot/1.0"));
    }
}
