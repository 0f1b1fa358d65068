//! Request parameter snapshots
//!
//! Parameters are captured when a crumb is built. Names matching any drop
//! pattern (a regular expression against the whole name) never make it into
//! the snapshot.

use regex::Regex;
use std::collections::BTreeMap;

use crate::error::TrailError;
use crate::Result;

/// Parameter name to ordered values
pub type ParamSnapshot = BTreeMap<String, Vec<String>>;

/// Request parameters as the host hands them over
#[derive(Debug, Clone)]
pub enum ParameterSource {
    /// Already decoded multi-valued parameters
    Map(ParamSnapshot),
    /// Raw `application/x-www-form-urlencoded` string (query or form body)
    Query(String),
    /// A representation this crate cannot interpret
    Opaque { kind: String },
}

impl ParameterSource {
    pub fn empty() -> Self {
        ParameterSource::Map(ParamSnapshot::new())
    }

    /// Build from name/value pairs, grouping repeated names in order.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut map = ParamSnapshot::new();
        for (name, value) in pairs {
            map.entry(name.into()).or_default().push(value.into());
        }
        ParameterSource::Map(map)
    }

    /// Copy every parameter not matched by `drops`.
    pub fn snapshot(&self, drops: &DropPatterns) -> Result<ParamSnapshot> {
        match self {
            ParameterSource::Map(map) => Ok(map
                .iter()
                .filter(|(name, _)| !drops.matches(name))
                .map(|(name, values)| (name.clone(), values.clone()))
                .collect()),
            ParameterSource::Query(raw) => {
                let mut map = ParamSnapshot::new();
                let raw = raw.strip_prefix('?').unwrap_or(raw);
                for (name, value) in url::form_urlencoded::parse(raw.as_bytes()) {
                    if drops.matches(&name) {
                        continue;
                    }
                    map.entry(name.into_owned())
                        .or_default()
                        .push(value.into_owned());
                }
                Ok(map)
            }
            ParameterSource::Opaque { kind } => Err(TrailError::UnsupportedParameterSource {
                kind: kind.clone(),
            }),
        }
    }
}

impl Default for ParameterSource {
    fn default() -> Self {
        Self::empty()
    }
}

/// Compiled set of parameter-name exclusions
#[derive(Debug, Clone, Default)]
pub struct DropPatterns {
    patterns: Vec<Regex>,
}

impl DropPatterns {
    /// Compile patterns. Each must match the entire parameter name.
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                Regex::new(&format!("^(?:{})$", pattern)).map_err(|source| {
                    TrailError::InvalidDropPattern {
                        pattern: pattern.to_string(),
                        source,
                    }
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn matches(&self, name: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(name))
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_patterns_match_whole_name() {
        let drops = DropPatterns::new(["token", "csrf_.*"]).unwrap();
        assert!(drops.matches("token"));
        assert!(drops.matches("csrf_nonce"));
        // Partial matches do not count
        assert!(!drops.matches("token_hint"));
        assert!(!drops.matches("my_csrf_nonce"));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = DropPatterns::new(["(unclosed"]).unwrap_err();
        assert!(matches!(err, TrailError::InvalidDropPattern { .. }));
    }

    #[test]
    fn test_map_snapshot_drops() {
        let source = ParameterSource::from_pairs([
            ("token", "secret"),
            ("id", "7"),
            ("tag", "a"),
            ("tag", "b"),
        ]);
        let drops = DropPatterns::new(["token"]).unwrap();

        let snapshot = source.snapshot(&drops).unwrap();
        assert!(!snapshot.contains_key("token"));
        assert_eq!(snapshot["id"], vec!["7"]);
        assert_eq!(snapshot["tag"], vec!["a", "b"]);
    }

    #[test]
    fn test_query_snapshot() {
        let source = ParameterSource::Query("?item=3&item=4&token=x&q=hello%20world".to_string());
        let drops = DropPatterns::new(["tok.n"]).unwrap();

        let snapshot = source.snapshot(&drops).unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot["item"], vec!["3", "4"]);
        assert_eq!(snapshot["q"], vec!["hello world"]);
    }

    #[test]
    fn test_opaque_source_unsupported() {
        let source = ParameterSource::Opaque {
            kind: "multipart-stream".to_string(),
        };
        let err = source.snapshot(&DropPatterns::none()).unwrap_err();
        assert!(matches!(err, TrailError::UnsupportedParameterSource { .. }));
    }
}
