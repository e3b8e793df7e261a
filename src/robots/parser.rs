//! Robots.txt rules
//!
//! Matching is delegated to the robotstxt crate, so `*` and `$` wildcards,
//! `Allow:` overrides and grouped user agents follow the usual robots.txt
//! semantics. The survey only obeys the wildcard group.

use robotstxt::DefaultMatcher;

/// Agent token the survey is matched as
pub const WILDCARD_AGENT: &str = "*";

/// Robots.txt content for one site
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RobotsRules {
    /// Raw robots.txt content (empty string means allow all)
    content: String,
}

impl RobotsRules {
    /// Wraps raw robots.txt content
    ///
    /// # Arguments
    ///
    /// * `content` - The raw robots.txt file content
    ///
    /// # Returns
    ///
    /// Rules that can be asked whether a URL may be fetched
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }

    /// Rules that allow everything
    ///
    /// Used when robots.txt is missing or cannot be fetched.
    pub fn allow_all() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Checks whether the wildcard group allows `url`
    ///
    /// # Arguments
    ///
    /// * `url` - An absolute URL; its path and query are matched
    ///
    /// # Returns
    ///
    /// * `true` - If the URL is allowed
    /// * `false` - If the URL is disallowed
    pub fn is_allowed(&self, url: &str) -> bool {
        if self.is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, WILDCARD_AGENT, url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SITE: &str = "https://example.com";

    fn allowed(rules: &RobotsRules, path: &str) -> bool {
        rules.is_allowed(&format!("{}{}", SITE, path))
    }

    #[test]
    fn test_wildcard_group_disallows() {
        let rules = RobotsRules::from_content("User-agent: *\nDisallow: /private\nDisallow: /tmp/\n");

        assert!(!allowed(&rules, "/private"));
        assert!(!allowed(&rules, "/private/page"));
        assert!(!allowed(&rules, "/tmp/file"));
        assert!(allowed(&rules, "/public/page"));
        assert!(allowed(&rules, "/tmp"));
    }

    #[test]
    fn test_other_agents_are_ignored() {
        let content = r#"
User-agent: Googlebot
Disallow: /no-google

User-agent: *
Disallow: /admin
"#;
        let rules = RobotsRules::from_content(content);

        assert!(allowed(&rules, "/no-google"));
        assert!(!allowed(&rules, "/admin/users"));
    }

    #[test]
    fn test_grouped_agents_share_rules() {
        let rules = RobotsRules::from_content("User-agent: Bingbot\nUser-agent: *\nDisallow: /shared\n");

        assert!(!allowed(&rules, "/shared/doc"));
    }

    #[test]
    fn test_new_group_after_rules() {
        let content = r#"
User-agent: *
Disallow: /a
User-agent: OtherBot
Disallow: /b
"#;
        let rules = RobotsRules::from_content(content);

        assert!(!allowed(&rules, "/a"));
        assert!(allowed(&rules, "/b"));
    }

    #[test]
    fn test_empty_disallow_and_comments() {
        let content = "# comment\nUser-agent: * # everyone\nDisallow:\nDisallow: /x # trailing\n";
        let rules = RobotsRules::from_content(content);

        assert!(!allowed(&rules, "/x"));
        assert!(allowed(&rules, "/y"));
    }

    #[test]
    fn test_directives_case_insensitive_paths_case_sensitive() {
        let rules = RobotsRules::from_content("USER-AGENT: *\nDISALLOW: /Upper\n");

        assert!(!allowed(&rules, "/Upper/page"));
        assert!(allowed(&rules, "/upper/page"));
    }

    #[test]
    fn test_wildcard_inside_path() {
        let rules = RobotsRules::from_content("User-agent: *\nDisallow: /*/private\n");

        assert!(!allowed(&rules, "/en/private/x"));
        assert!(!allowed(&rules, "/de/shop/private"));
        assert!(allowed(&rules, "/en/public/x"));
    }

    #[test]
    fn test_end_anchor() {
        let rules = RobotsRules::from_content("User-agent: *\nDisallow: /*.php$\n");

        assert!(!allowed(&rules, "/index.php"));
        assert!(!allowed(&rules, "/forum/view.php"));
        assert!(allowed(&rules, "/index.phpx"));
        assert!(allowed(&rules, "/docs/page.html"));
    }

    #[test]
    fn test_query_string_rule() {
        let rules = RobotsRules::from_content("User-agent: *\nDisallow: /search?q=\n");

        assert!(!allowed(&rules, "/search?q=compost"));
        assert!(allowed(&rules, "/search"));
        assert!(allowed(&rules, "/search/tips"));
    }

    #[test]
    fn test_allow_overrides_longer_match() {
        let rules = RobotsRules::from_content("User-agent: *\nDisallow: /shop\nAllow: /shop/public\n");

        assert!(allowed(&rules, "/shop/public/item"));
        assert!(!allowed(&rules, "/shop/cart"));
    }

    #[test]
    fn test_empty_content_allows_everything() {
        assert!(RobotsRules::from_content("").is_empty());
        assert!(RobotsRules::allow_all().is_allowed("https://example.com/anything"));
        assert!(!RobotsRules::from_content("User-agent: *\nDisallow: /\n").is_empty());
    }
}
