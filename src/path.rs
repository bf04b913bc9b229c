use std::collections::BTreeMap;
use std::fmt;

use crate::error::RegistryError;

/// Route parameters bound by a match, keyed by name without the leading `:`.
pub type PathParams = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Shape {
    Segments(Vec<Segment>),
    CatchAll,
}

/// PathPattern
///
/// A parsed route pattern: `/`, static segments, `:name` parameter segments, or
/// the bare catch-all `*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    shape: Shape,
}

impl PathPattern {
    pub const CATCH_ALL: &'static str = "*";

    pub fn parse(raw: &str) -> Result<Self, RegistryError> {
        let invalid = |reason: &str| RegistryError::InvalidPattern {
            pattern: raw.to_string(),
            reason: reason.to_string(),
        };

        if raw == Self::CATCH_ALL {
            return Ok(Self {
                raw: raw.to_string(),
                shape: Shape::CatchAll,
            });
        }

        let rest = raw
            .strip_prefix('/')
            .ok_or_else(|| invalid("must start with `/`"))?;

        let mut segments = Vec::new();
        if !rest.is_empty() {
            for part in rest.split('/') {
                if part.is_empty() {
                    return Err(invalid("empty segment"));
                }
                if part.contains('*') {
                    return Err(invalid("`*` is only valid as the whole pattern"));
                }
                match part.strip_prefix(':') {
                    Some(name) => {
                        if name.is_empty()
                            || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
                        {
                            return Err(invalid("parameter names must be alphanumeric"));
                        }
                        let duplicate = segments
                            .iter()
                            .any(|s| matches!(s, Segment::Param(existing) if existing == name));
                        if duplicate {
                            return Err(invalid("duplicate parameter name"));
                        }
                        segments.push(Segment::Param(name.to_string()));
                    }
                    None => segments.push(Segment::Static(part.to_string())),
                }
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            shape: Shape::Segments(segments),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_catch_all(&self) -> bool {
        self.shape == Shape::CatchAll
    }

    /// Number of static segments; higher wins when several patterns match.
    /// `None` for the catch-all, which only applies when nothing else does.
    pub fn specificity(&self) -> Option<usize> {
        match &self.shape {
            Shape::CatchAll => None,
            Shape::Segments(segments) => Some(
                segments
                    .iter()
                    .filter(|s| matches!(s, Segment::Static(_)))
                    .count(),
            ),
        }
    }

    /// Matches a requested path, returning the bound parameters on success.
    pub fn matches(&self, path: &str) -> Option<PathParams> {
        let segments = match &self.shape {
            Shape::CatchAll => return Some(PathParams::new()),
            Shape::Segments(segments) => segments,
        };

        let requested: Vec<&str> = request_segments(path).collect();
        if requested.len() != segments.len() {
            return None;
        }

        let mut params = PathParams::new();
        for (pattern, actual) in segments.iter().zip(requested) {
            match pattern {
                Segment::Static(expected) => {
                    if !expected.eq_ignore_ascii_case(actual) {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    params.insert(name.clone(), actual.to_string());
                }
            }
        }
        Some(params)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn request_segments(path: &str) -> impl Iterator<Item = &str> {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    path[..end].split('/').filter(|s| !s.is_empty())
}

/// normalize_path
///
/// Canonical form of a requested path: query and fragment dropped, empty
/// segments and trailing slashes collapsed, always rooted at `/`.
pub fn normalize_path(path: &str) -> String {
    let joined = request_segments(path).collect::<Vec<_>>().join("/");
    format!("/{}", joined)
}
