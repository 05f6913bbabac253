//! Version constraints (PEP 440 specifier sets)
//!
//! Handles clauses like:
//! - Comparison: `>=1.2.3`, `>1.2.3`, `<=1.2.3`, `<1.2.3`
//! - Exact and exclusion: `==1.2.3`, `!=1.2.3`, with `.*` prefix matching
//! - Compatible release: `~=1.2.3`
//! - Arbitrary equality: `===1.2.3`
//! - Sets: `>=1.0,<2.0`

use super::Version;
use crate::error::ConstraintError;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static CLAUSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(===|~=|==|!=|<=|>=|<|>)\s*(\S+)$").unwrap());

/// Comparison operator of a single clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `<`
    Less,
    /// `<=`
    LessOrEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterOrEqual,
    /// `~=`
    Compatible,
    /// `===`
    Arbitrary,
}

impl Operator {
    fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "==" => Some(Operator::Equal),
            "!=" => Some(Operator::NotEqual),
            "<" => Some(Operator::Less),
            "<=" => Some(Operator::LessOrEqual),
            ">" => Some(Operator::Greater),
            ">=" => Some(Operator::GreaterOrEqual),
            "~=" => Some(Operator::Compatible),
            "===" => Some(Operator::Arbitrary),
            _ => None,
        }
    }

    /// The operator as written in a requirement
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::Less => "<",
            Operator::LessOrEqual => "<=",
            Operator::Greater => ">",
            Operator::GreaterOrEqual => ">=",
            Operator::Compatible => "~=",
            Operator::Arbitrary => "===",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// One `<operator><version>` clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    /// Comparison operator
    pub operator: Operator,
    /// Version operand as written (without a trailing `.*`)
    pub raw_version: String,
    /// Parsed operand; `None` only for `===` with a non-PEP 440 operand
    pub version: Option<Version>,
    /// Whether the operand ended in `.*`
    pub wildcard: bool,
}

impl Clause {
    /// Parse a single clause such as `>=1.0` or `==2.*`
    pub fn parse(text: &str) -> Result<Self, ConstraintError> {
        let clause = text.trim();
        let caps = CLAUSE_RE
            .captures(clause)
            .ok_or_else(|| ConstraintError::InvalidClause {
                clause: clause.to_string(),
            })?;

        let operator = caps
            .get(1)
            .and_then(|m| Operator::from_symbol(m.as_str()))
            .ok_or_else(|| ConstraintError::InvalidClause {
                clause: clause.to_string(),
            })?;
        let operand = caps.get(2).map(|m| m.as_str()).unwrap_or_default();

        if operator == Operator::Arbitrary {
            return Ok(Self {
                operator,
                raw_version: operand.to_string(),
                version: Version::parse(operand),
                wildcard: false,
            });
        }

        let (raw_version, wildcard) = match operand.strip_suffix(".*") {
            Some(prefix) => (prefix, true),
            None => (operand, false),
        };

        if wildcard && !matches!(operator, Operator::Equal | Operator::NotEqual) {
            return Err(ConstraintError::InvalidWildcard {
                clause: clause.to_string(),
            });
        }

        let version: Version =
            raw_version
                .parse()
                .map_err(|_| ConstraintError::InvalidVersion {
                    clause: clause.to_string(),
                    version: operand.to_string(),
                })?;

        if wildcard && (version.is_prerelease() || version.is_postrelease() || version.has_local())
        {
            return Err(ConstraintError::InvalidWildcard {
                clause: clause.to_string(),
            });
        }

        if operator == Operator::Compatible && version.release().len() < 2 {
            return Err(ConstraintError::InvalidCompatibleRelease {
                clause: clause.to_string(),
            });
        }

        Ok(Self {
            operator,
            raw_version: raw_version.to_string(),
            version: Some(version),
            wildcard,
        })
    }

    /// Returns true if `candidate` satisfies this clause
    pub fn contains(&self, candidate: &Version) -> bool {
        let Some(spec) = &self.version else {
            // Only reachable for `===` with an arbitrary string operand
            return candidate.to_string().eq_ignore_ascii_case(&self.raw_version);
        };

        match self.operator {
            Operator::Equal => self.matches_equal(spec, candidate),
            Operator::NotEqual => !self.matches_equal(spec, candidate),
            Operator::LessOrEqual => candidate.public() <= *spec,
            Operator::GreaterOrEqual => candidate.public() >= *spec,
            Operator::Less => {
                let candidate = candidate.public();
                if candidate >= *spec {
                    return false;
                }
                // `<1.0` must not admit `1.0rc1`
                !(!spec.is_prerelease()
                    && candidate.is_prerelease()
                    && candidate.base_version() == spec.base_version())
            }
            Operator::Greater => {
                if candidate.public() <= *spec {
                    return false;
                }
                let same_base = candidate.base_version() == spec.base_version();
                // `>1.0` must not admit `1.0.post1` or `1.0+local`
                if !spec.is_postrelease() && candidate.is_postrelease() && same_base {
                    return false;
                }
                !(candidate.has_local() && same_base)
            }
            Operator::Compatible => {
                let release = spec.release();
                let prefix = &release[..release.len() - 1];
                candidate.public() >= *spec
                    && prefix_matches(spec.epoch(), prefix, candidate)
            }
            Operator::Arbitrary => candidate.to_string().eq_ignore_ascii_case(&self.raw_version),
        }
    }

    fn matches_equal(&self, spec: &Version, candidate: &Version) -> bool {
        if self.wildcard {
            return prefix_matches(spec.epoch(), spec.release(), candidate);
        }
        if spec.has_local() {
            candidate == spec
        } else {
            candidate.public() == *spec
        }
    }
}

/// Returns true if `candidate`'s release, zero-padded, starts with `prefix`
fn prefix_matches(epoch: u64, prefix: &[u64], candidate: &Version) -> bool {
    if candidate.epoch() != epoch {
        return false;
    }
    let release = candidate.release();
    prefix
        .iter()
        .enumerate()
        .all(|(i, segment)| release.get(i).copied().unwrap_or(0) == *segment)
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator, self.raw_version)?;
        if self.wildcard {
            write!(f, ".*")?;
        }
        Ok(())
    }
}

/// An ordered set of clauses, all of which must hold
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Constraint {
    clauses: Vec<Clause>,
}

impl Constraint {
    /// Parse a comma-separated clause list; an empty string is unconstrained
    pub fn parse(text: &str) -> Result<Self, ConstraintError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Self::default());
        }

        let clauses = text
            .split(',')
            .map(Clause::parse)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { clauses })
    }

    /// The clauses in declaration order
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Returns true when no clauses are declared
    pub fn is_unconstrained(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Returns true if `candidate` satisfies every clause
    pub fn contains(&self, candidate: &Version) -> bool {
        self.clauses.iter().all(|clause| clause.contains(candidate))
    }

    /// Operand of the first `>=` clause
    pub fn lower_bound(&self) -> Option<&Version> {
        self.clauses
            .iter()
            .find(|clause| clause.operator == Operator::GreaterOrEqual)
            .and_then(|clause| clause.version.as_ref())
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let clauses: Vec<String> = self.clauses.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", clauses.join(","))
    }
}
