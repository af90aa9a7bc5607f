//! Extension chains and the `.bunch` rule file.
//!
//! The rule file names the suffix the working tree currently represents on
//! its first non-blank line. Every later line is a `_`-joined rule such as
//! `as32_192`, read as "as32 falls back to 192, which falls back to the
//! current suffix".

use bunch_fs::{BunchPath, NormalizedPath};

use crate::{Error, Result};

/// Ordered suffix priorities for a switch.
///
/// Element 0 is the origin suffix that receives backups; the rest are donors
/// in ascending priority, so the last element wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionChain {
    suffixes: Vec<String>,
}

impl ExtensionChain {
    /// Build a chain from suffixes already in origin-first order.
    pub fn new<I, S>(suffixes: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let suffixes: Vec<String> = suffixes.into_iter().map(Into::into).collect();
        if suffixes.is_empty() || suffixes.iter().any(|s| s.is_empty()) {
            return Err(Error::InvalidChain {
                chain: suffixes.join("_"),
            });
        }
        Ok(Self { suffixes })
    }

    /// Parse an explicit `a_b_c` chain, origin first.
    pub fn parse(explicit: &str) -> Result<Self> {
        Self::new(explicit.trim().split('_'))
    }

    /// The suffix receiving backups of base files.
    pub fn origin(&self) -> &str {
        &self.suffixes[0]
    }

    /// Donor suffixes in ascending priority.
    pub fn donors(&self) -> &[String] {
        &self.suffixes[1..]
    }

    /// The highest-priority suffix, i.e. the suffix the tree ends up in.
    pub fn target(&self) -> &str {
        &self.suffixes[self.suffixes.len() - 1]
    }

    /// A one-element chain: switching would change nothing.
    pub fn is_noop(&self) -> bool {
        self.suffixes.len() < 2
    }

    pub fn as_slice(&self) -> &[String] {
        &self.suffixes
    }
}

impl std::fmt::Display for ExtensionChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.suffixes.join("_"))
    }
}

/// Parsed contents of `.bunch`.
#[derive(Debug, Clone)]
pub struct RuleFile {
    path: NormalizedPath,
    current: String,
    rules: Vec<String>,
}

impl RuleFile {
    /// Read `.bunch` from the repository root.
    pub fn load(root: &NormalizedPath) -> Result<Self> {
        let path = root.join(BunchPath::RuleFile.as_str());
        if !path.is_file() {
            return Err(Error::MissingRuleFile {
                path: path.to_native(),
            });
        }
        let text = bunch_fs::io::read_text(&path)?;
        Self::parse(path, &text)
    }

    /// Parse rule file text; `path` is only used in error messages.
    pub fn parse(path: NormalizedPath, text: &str) -> Result<Self> {
        let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
        let Some(current) = lines.next() else {
            return Err(Error::EmptyBaseLine {
                path: path.to_native(),
            });
        };
        let current = current.to_string();
        let rules = lines.map(str::to_string).collect();
        Ok(Self {
            path,
            current,
            rules,
        })
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    /// The suffix the working tree currently represents.
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Rule lines after the first, trimmed and non-blank.
    pub fn rules(&self) -> &[String] {
        &self.rules
    }

    /// Every known extension: the first `_`-token of each line, current first.
    pub fn extensions(&self) -> Result<Vec<String>> {
        let mut extensions: Vec<String> = Vec::new();
        for line in std::iter::once(&self.current).chain(self.rules.iter()) {
            if let Some(first) = line.split('_').next().filter(|s| !s.is_empty()) {
                if !extensions.iter().any(|e| e == first) {
                    extensions.push(first.to_string());
                }
            }
        }
        if extensions.is_empty() {
            return Err(Error::NoExtensions {
                path: self.path.to_native(),
            });
        }
        Ok(extensions)
    }

    /// Every rule line composed into an origin-first chain.
    pub fn chains(&self) -> Result<Vec<ExtensionChain>> {
        self.rules.iter().map(|rule| self.compose(rule)).collect()
    }

    /// Resolve a short target token to its chain.
    ///
    /// The current suffix resolves to a one-element chain; otherwise the first
    /// rule equal to `target` or starting with `target_` is composed with
    /// the current suffix.
    pub fn resolve(&self, target: &str) -> Result<ExtensionChain> {
        let target = target.trim();
        if target == self.current {
            return ExtensionChain::new([self.current.clone()]);
        }

        let prefix = format!("{target}_");
        let rule = self
            .rules
            .iter()
            .find(|rule| rule.as_str() == target || rule.starts_with(&prefix))
            .ok_or_else(|| Error::NoMatchingRule {
                target: target.to_string(),
                path: self.path.to_native(),
            })?;

        self.compose(rule)
    }

    fn compose(&self, rule: &str) -> Result<ExtensionChain> {
        let mut suffixes: Vec<&str> = rule.split('_').collect();
        suffixes.push(&self.current);
        suffixes.reverse();
        ExtensionChain::new(suffixes)
    }
}

/// Resolve a switch argument: an explicit `a_b_c` chain is used as is, a
/// short token is looked up in the rule file under `root`.
pub fn resolve_chain(root: &NormalizedPath, target: &str) -> Result<ExtensionChain> {
    if target.contains('_') {
        return ExtensionChain::parse(target);
    }
    let chain = RuleFile::load(root)?.resolve(target)?;
    tracing::debug!(target, chain = %chain, "Resolved chain");
    Ok(chain)
}

/// Extensions declared by the rule file under `root`.
pub fn read_extensions(root: &NormalizedPath) -> Result<Vec<String>> {
    RuleFile::load(root)?.extensions()
}
