//! Parsing for PEP 508-style dependency strings.
use std::{fmt, sync::LazyLock};

use regex::Regex;

use crate::error::ChangekitError;

static SPEC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-zA-Z0-9_.-]+)(==|>=|<=|>|<|!=|~=)(.+)$").unwrap()
});

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_.-]+$").unwrap());

/// Version comparison operators recognized in dependency specs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Exact,
    AtLeast,
    AtMost,
    Greater,
    Less,
    NotEqual,
    Compatible,
}

impl Operator {
    fn parse(op: &str) -> Option<Self> {
        match op {
            "==" => Some(Self::Exact),
            ">=" => Some(Self::AtLeast),
            "<=" => Some(Self::AtMost),
            ">" => Some(Self::Greater),
            "<" => Some(Self::Less),
            "!=" => Some(Self::NotEqual),
            "~=" => Some(Self::Compatible),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "==",
            Self::AtLeast => ">=",
            Self::AtMost => "<=",
            Self::Greater => ">",
            Self::Less => "<",
            Self::NotEqual => "!=",
            Self::Compatible => "~=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single parsed dependency requirement.
#[derive(Debug, Clone)]
pub struct DependencySpec {
    /// Normalized package name: lowercase, `_` and `.` folded to `-`.
    pub name: String,
    pub operator: Option<Operator>,
    pub version: Option<String>,
    /// Environment marker following `;`, if any.
    pub marker: Option<String>,
    /// The original spec string, kept verbatim for output.
    pub original: String,
}

impl DependencySpec {
    /// Parse a dependency string like `requests==2.5` or
    /// `uvicorn>=0.23; sys_platform != "win32"`.
    pub fn parse(dep: &str) -> Result<Self, ChangekitError> {
        let original = dep.trim().to_string();

        let (dep_part, marker) = match dep.split_once(';') {
            Some((spec, marker)) => {
                (spec.trim().to_string(), Some(marker.trim().to_string()))
            }
            None => (dep.trim().to_string(), None),
        };

        if let Some(caps) = SPEC_RE.captures(&dep_part) {
            return Ok(Self {
                name: normalize_name(&caps[1]),
                operator: Operator::parse(&caps[2]),
                version: Some(caps[3].trim().to_string()),
                marker,
                original,
            });
        }

        if NAME_RE.is_match(&dep_part) {
            return Ok(Self {
                name: normalize_name(&dep_part),
                operator: None,
                version: None,
                marker,
                original,
            });
        }

        Err(ChangekitError::MalformedDependency(dep.to_string()))
    }

    /// Whether this spec pins one exact version.
    pub fn is_exact_pin(&self) -> bool {
        matches!(self.operator, Some(Operator::Exact))
            && self.version.is_some()
    }
}

fn normalize_name(name: &str) -> String {
    name.to_lowercase().replace(['_', '.'], "-")
}
