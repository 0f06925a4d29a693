//! Runtime versions: the image lines each language is published for, and the
//! ranges manifests declare against them.
//!
//! Pin files (`.nvmrc`, `.python-version`) name one version and are taken as is.
//! Manifest fields such as `engines.node`, `requires-python` or the `go`
//! directive are ranges; [`VersionLines::resolve`] maps them onto a published
//! line, keeping the default whenever it already satisfies the range.

use std::cmp::Ordering;

/// Image lines published for one language, newest first
#[derive(Debug, Clone, Copy)]
pub struct VersionLines {
    pub language: &'static str,
    pub lines: &'static [&'static str],
    pub default: &'static str,
}

pub const NODE_LINES: VersionLines = VersionLines {
    language: "node",
    lines: &["24", "22", "20", "18"],
    default: "22",
};

pub const PYTHON_LINES: VersionLines = VersionLines {
    language: "python",
    lines: &["3.13", "3.12", "3.11", "3.10", "3.9"],
    default: "3.12",
};

pub const GO_LINES: VersionLines = VersionLines {
    language: "go",
    lines: &["1.24", "1.23", "1.22", "1.21"],
    default: "1.23",
};

/// Dotted numeric components, or `None` when anything else is present.
pub fn numeric_parts(version: &str) -> Option<Vec<u32>> {
    let parts: Option<Vec<u32>> = version.split('.').map(|p| p.parse().ok()).collect();
    parts.filter(|p| !p.is_empty() && p.len() <= 3)
}

impl VersionLines {
    fn depth(&self) -> usize {
        self.default.split('.').count()
    }

    /// Whether an exact version (`20`, `3.12.4`, `1.22.3`) sits on a published line.
    pub fn supports(&self, version: &str) -> bool {
        let depth = self.depth();
        match numeric_parts(version) {
            Some(parts) if parts.len() >= depth => self
                .lines
                .iter()
                .any(|line| numeric_parts(line).as_deref() == Some(&parts[..depth])),
            _ => false,
        }
    }

    /// Runtime version for a declared range.
    ///
    /// `None` when the range cannot be read or the default line satisfies it,
    /// else the newest line that does. A range no published line satisfies is
    /// returned verbatim so image selection rejects it.
    pub fn resolve(&self, range: &str) -> Option<String> {
        let constraint = VersionConstraint::parse(range)?;
        let allows = |line: &str| {
            numeric_parts(line)
                .map(|parts| constraint.allows_line(&parts))
                .unwrap_or(false)
        };

        if allows(self.default) {
            return None;
        }
        match self.lines.iter().find(|line| allows(**line)) {
            Some(line) => Some(line.to_string()),
            None => Some(range.trim().to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    /// `^1.2`: same leading component
    Caret,
    /// `~1.2`: same major and minor
    Tilde,
    /// `~=3.10`: all but the last given component fixed
    Compatible,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Comparator {
    op: Op,
    version: Vec<u32>,
}

impl Comparator {
    fn parse(token: &str) -> Option<Self> {
        let rest = token.trim_start_matches(|c: char| "<>=!~^".contains(c));
        let op = match &token[..token.len() - rest.len()] {
            "" | "=" | "==" | "===" => Op::Eq,
            "!=" => Op::Ne,
            ">" => Op::Gt,
            ">=" => Op::Ge,
            "<" => Op::Lt,
            "<=" => Op::Le,
            "^" => Op::Caret,
            "~" => Op::Tilde,
            "~=" => Op::Compatible,
            _ => return None,
        };
        Some(Comparator {
            op,
            version: partial_version(rest)?,
        })
    }

    /// Whether some version on `line` (a prefix such as `[20]` or `[3, 12]`)
    /// satisfies this comparator.
    fn allows_line(&self, line: &[u32]) -> bool {
        let v = &self.version;
        let shared = v.len().min(line.len());
        let head = line[..shared].cmp(&v[..shared]);
        let at_least = head != Ordering::Less;
        let same_prefix = |n: usize| {
            let n = n.min(shared);
            line[..n] == v[..n]
        };

        match self.op {
            Op::Eq => head == Ordering::Equal,
            Op::Ne => true,
            Op::Ge => at_least,
            Op::Gt => {
                head == Ordering::Greater
                    || (head == Ordering::Equal
                        && line.get(v.len()..).map_or(true, |rest| rest.iter().any(|&x| x > 0)))
            }
            Op::Le => {
                head == Ordering::Less
                    || (head == Ordering::Equal
                        && line.get(v.len()..).map_or(true, |rest| rest.iter().all(|&x| x == 0)))
            }
            Op::Lt => {
                head == Ordering::Less
                    || (head == Ordering::Equal
                        && v.get(line.len()..).map_or(false, |rest| rest.iter().any(|&x| x > 0)))
            }
            Op::Caret => at_least && same_prefix(1),
            Op::Tilde => at_least && same_prefix(v.len().clamp(1, 2)),
            Op::Compatible => at_least && same_prefix(v.len().saturating_sub(1).max(1)),
        }
    }
}

/// Leading numeric components of `18`, `v20.11.0`, `3.11.*`, `20.x`, `3.13.0rc1`.
/// A bare wildcard yields no components and matches everything.
fn partial_version(raw: &str) -> Option<Vec<u32>> {
    let raw = raw.trim_start_matches('v');
    let mut parts = Vec::new();
    for part in raw.split('.') {
        if matches!(part, "*" | "x" | "X") {
            break;
        }
        let digits_len = part.len() - part.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        if digits_len == 0 {
            return None;
        }
        parts.push(part[..digits_len].parse().ok()?);
        if digits_len < part.len() {
            break;
        }
    }
    Some(parts)
}

/// A version range in npm, PEP 440 or Poetry notation: `||` separates
/// alternatives, commas or whitespace separate the comparators of one alternative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionConstraint {
    alternatives: Vec<Vec<Comparator>>,
}

impl VersionConstraint {
    pub fn parse(raw: &str) -> Option<Self> {
        let alternatives = raw
            .split("||")
            .map(parse_comparator_set)
            .collect::<Option<Vec<_>>>()?;
        Some(VersionConstraint { alternatives })
    }

    /// Whether any version on `line` satisfies the range
    pub fn allows_line(&self, line: &[u32]) -> bool {
        self.alternatives
            .iter()
            .any(|set| set.iter().all(|c| c.allows_line(line)))
    }
}

fn parse_comparator_set(raw: &str) -> Option<Vec<Comparator>> {
    let mut comparators: Vec<Comparator> = Vec::new();
    let mut pending_op = String::new();
    let mut hyphen = false;

    let tokens = raw
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty());
    for token in tokens {
        // `18 - 20` hyphen range
        if token == "-" {
            let lower = comparators.last_mut()?;
            if lower.op != Op::Eq {
                return None;
            }
            lower.op = Op::Ge;
            hyphen = true;
            continue;
        }
        // `>= 18` written with a space
        if token.chars().all(|c| "<>=!~^".contains(c)) {
            pending_op.push_str(token);
            continue;
        }

        let mut comparator = Comparator::parse(&format!("{}{}", pending_op, token))?;
        pending_op.clear();
        if hyphen {
            comparator.op = match comparator.op {
                Op::Eq => Op::Le,
                _ => return None,
            };
            hyphen = false;
        }
        comparators.push(comparator);
    }

    if !pending_op.is_empty() || hyphen || comparators.is_empty() {
        return None;
    }
    Some(comparators)
}
