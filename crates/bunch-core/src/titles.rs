//! Commit title templates and parsing of switch titles.

use regex::Regex;

/// Placeholder replaced by the switch target suffix.
pub const TARGET_PLACEHOLDER: &str = "{target}";

/// Placeholder replaced by ` <ext>` or nothing in cleanup titles.
pub const EXT_PLACEHOLDER: &str = "{ext}";

pub const SWITCH_TITLE: &str = "~~~~ switch {target} ~~~~";
pub const BACKUP_TITLE: &str = "~~~~ backup files ~~~~";
pub const RESTORE_CLEANUP_TITLE: &str = "~~~~ restore cleanup ~~~~";
pub const REDUCE_TITLE: &str = "~~~~ reduce ~~~~";
pub const CLEANUP_TITLE: &str = "~~~~ cleanup{ext} ~~~~";

/// Prefix of the branch restore creates to keep the pre-restore history.
pub const BACKUP_BRANCH_PREFIX: &str = "bunches_backup_branch_for_";

/// Fill `{target}` in a switch title template.
pub fn switch_title(template: &str, target: &str) -> String {
    template.replace(TARGET_PLACEHOLDER, target)
}

/// Fill `{ext}` in a cleanup title template.
pub fn cleanup_title(template: &str, extension: Option<&str>) -> String {
    let value = extension.map(|e| format!(" {e}")).unwrap_or_default();
    template.replace(EXT_PLACEHOLDER, &value)
}

/// Matcher for titles produced from a switch template.
#[derive(Debug, Clone)]
pub struct SwitchTitlePattern {
    regex: Option<Regex>,
}

impl SwitchTitlePattern {
    /// Build a matcher where `{target}` stands for one word. A template
    /// without the placeholder matches only itself.
    pub fn new(template: &str) -> Self {
        let pattern = template
            .split(TARGET_PLACEHOLDER)
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(r"(\w+)");
        let regex = Regex::new(&format!("^{pattern}$")).ok();
        Self { regex }
    }

    pub fn matches(&self, title: &str) -> bool {
        self.regex
            .as_ref()
            .is_some_and(|regex| regex.is_match(title.trim()))
    }

    /// The `{target}` captured from `title`, if it matches.
    pub fn target<'t>(&self, title: &'t str) -> Option<&'t str> {
        self.regex
            .as_ref()?
            .captures(title.trim())
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
    }
}

/// Extract the `{target}` from a switch commit title.
pub fn parse_switch_target<'t>(title: &'t str, template: &str) -> Option<&'t str> {
    SwitchTitlePattern::new(template).target(title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("~~~~ switch 192 ~~~~", Some("192"))]
    #[case("~~~~ switch as32 ~~~~", Some("as32"))]
    #[case("~~~~ switch ~~~~", None)]
    #[case("~~~~ switch a b ~~~~", None)]
    #[case("switch 192", None)]
    fn test_parse_switch_target(#[case] title: &str, #[case] expected: Option<&str>) {
        assert_eq!(parse_switch_target(title, SWITCH_TITLE), expected);
    }

    #[test]
    fn test_custom_template_is_escaped() {
        let pattern = SwitchTitlePattern::new("[bunch] -> {target} (auto)");
        assert_eq!(pattern.target("[bunch] -> 201 (auto)"), Some("201"));
        assert!(!pattern.matches("bunch -> 201 auto"));
    }

    #[test]
    fn test_cleanup_title() {
        assert_eq!(cleanup_title(CLEANUP_TITLE, Some("192")), "~~~~ cleanup 192 ~~~~");
        assert_eq!(cleanup_title(CLEANUP_TITLE, None), "~~~~ cleanup ~~~~");
    }
}
