//! the set of subreddits whose stylesheets are requested
use std::ops::Deref;

use serde::{de::IgnoredAny, Deserialize, Deserializer, Serialize};

use crate::STYLESHEET_PATH_TEMPLATE;

/// Ordered list of subreddit names; duplicates are kept and requested once per occurrence
///
/// the set is fixed once built, there is no way to add or remove a subreddit afterwards
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SourceSet(Vec<String>);

impl SourceSet {
    /// build a set from anything that yields subreddit names
    pub fn new<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(sources.into_iter().map(Into::into).collect())
    }

    /// same-origin path of the stylesheet for `source`
    ///
    /// `fffffffuuuuuuuuuuuu` -> `/r/fffffffuuuuuuuuuuuu/stylesheet.css`
    pub fn stylesheet_path(source: &str) -> String {
        STYLESHEET_PATH_TEMPLATE.replacen("{}", source, 1)
    }
}

impl Deref for SourceSet {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<String>> for SourceSet {
    fn from(sources: Vec<String>) -> Self {
        Self(sources)
    }
}

/// Either a list of subreddit names or whatever else happened to be in the config file
#[derive(Deserialize)]
#[serde(untagged)]
enum MaybeSources {
    /// well formed list
    List(Vec<String>),

    /// anything that isn't a list of strings
    Other(IgnoredAny),
}

/// a `sources` value that isn't a list of strings yields an empty set instead of a
/// configuration error
impl<'de> Deserialize<'de> for SourceSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match MaybeSources::deserialize(deserializer)? {
            MaybeSources::List(sources) => Ok(Self(sources)),
            MaybeSources::Other(_) => {
                log::warn!("sources is not a list of subreddit names; no stylesheets will be requested");
                Ok(Self::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Wrapper {
        sources: SourceSet,
    }

    #[test]
    /// the template is filled in with the subreddit name
    fn stylesheet_path_uses_template() {
        assert_eq!(
            SourceSet::stylesheet_path("fffffffuuuuuuuuuuuu"),
            "/r/fffffffuuuuuuuuuuuu/stylesheet.css"
        );
    }

    #[test]
    /// order and duplicates are preserved
    fn new_keeps_order_and_duplicates() {
        let sources = SourceSet::new(["b", "a", "b"]);
        assert_eq!(sources.len(), 3);
        assert_eq!(&sources[..], &["b", "a", "b"]);
    }

    #[test]
    /// a list deserializes normally
    fn deserialize_list() {
        let wrapper: Wrapper = toml::from_str(r#"sources = ["mylittlepony", "mylittleonions"]"#).unwrap();
        assert_eq!(wrapper.sources, SourceSet::new(["mylittlepony", "mylittleonions"]));
    }

    #[test]
    /// anything else deserializes to an empty set
    fn deserialize_non_list_is_empty() {
        let wrapper: Wrapper = toml::from_str(r#"sources = "mylittlepony""#).unwrap();
        assert!(wrapper.sources.is_empty());

        let wrapper: Wrapper = toml::from_str("sources = 42").unwrap();
        assert!(wrapper.sources.is_empty());

        let wrapper: Wrapper = toml::from_str("sources = { name = \"pics\" }").unwrap();
        assert!(wrapper.sources.is_empty());
    }

    #[test]
    /// serializes back into a plain list
    fn serialize_as_list() {
        let json = serde_json::to_string(&SourceSet::new(["pics"])).unwrap();
        assert_eq!(json, r#"["pics"]"#);
    }
}
