//! Tombstone-aware reads of bunch files.

use crate::{NormalizedPath, Result};

/// What a bunch file says about its base file.
///
/// A file whose trimmed content is empty is a tombstone: the variant
/// intentionally has no base file. This differs from the bunch file being
/// absent, which means the variant inherits whatever comes before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantContent {
    /// The variant provides this exact text for the base file
    Content(String),
    /// The variant removes the base file
    Tombstone,
}

impl VariantContent {
    /// Classify raw file text.
    pub fn from_text(text: String) -> Self {
        if text.trim().is_empty() {
            Self::Tombstone
        } else {
            Self::Content(text)
        }
    }

    pub fn is_tombstone(&self) -> bool {
        matches!(self, Self::Tombstone)
    }

    /// Text with every whitespace character removed; empty for a tombstone.
    pub fn normalized(&self) -> String {
        match self {
            Self::Content(text) => normalize_whitespace(text),
            Self::Tombstone => String::new(),
        }
    }
}

/// Read a bunch file and classify it.
///
/// Non-UTF-8 bytes are replaced rather than rejected: the decision only
/// needs to know whether anything but whitespace is present.
pub fn read_variant(path: &NormalizedPath) -> Result<VariantContent> {
    let native = path.to_native();
    let bytes = std::fs::read(&native).map_err(|e| crate::Error::io(&native, e))?;
    Ok(VariantContent::from_text(
        String::from_utf8_lossy(&bytes).into_owned(),
    ))
}

/// Read a bunch file if it exists.
pub fn read_variant_opt(path: &NormalizedPath) -> Result<Option<VariantContent>> {
    if !path.is_file() {
        return Ok(None);
    }
    read_variant(path).map(Some)
}

/// Strip all whitespace, the comparison form used to detect redundant variants.
pub fn normalize_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Whether the file at `path` exists and is a tombstone.
pub fn is_tombstone(path: &NormalizedPath) -> Result<bool> {
    Ok(matches!(read_variant_opt(path)?, Some(VariantContent::Tombstone)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", true)]
    #[case("   \n\t\n", true)]
    #[case("x", false)]
    #[case("\n x \n", false)]
    fn test_tombstone_classification(#[case] text: &str, #[case] tombstone: bool) {
        assert_eq!(
            VariantContent::from_text(text.to_string()).is_tombstone(),
            tombstone
        );
    }

    #[test]
    fn test_normalize_whitespace_strips_everything() {
        assert_eq!(normalize_whitespace("hi\n \n"), "hi");
        assert_eq!(normalize_whitespace("a b\tc\r\nd"), "abcd");
    }

    #[test]
    fn test_content_keeps_original_text() {
        let content = VariantContent::from_text(" X\n".to_string());
        assert_eq!(content, VariantContent::Content(" X\n".to_string()));
        assert_eq!(content.normalized(), "X");
    }
}
