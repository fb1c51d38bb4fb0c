use regex::Regex;
use std::{collections::BTreeSet, fmt::Display, sync::LazyLock};
use strum_macros::Display;

/// Catalog number field of the first data line, columns 3-7 (alpha-5 compatible).
static LINE1_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^1 ([ 0-9A-Z][ 0-9]{4})[ A-Z]").unwrap());

/// Catalog number field of the second data line, columns 3-7.
static LINE2_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^2 ([ 0-9A-Z][ 0-9]{4}) ").unwrap());

/// Errors raised while turning raw element text into an [`OrbitalElementSet`]
/// or while preparing its propagation capability.
#[derive(Debug, Display, Clone, PartialEq)]
pub enum ParseError {
    /// The record does not consist of a name line and two data lines.
    MalformedRecord { lines: usize },
    /// A data line does not start with its line number or is too short.
    BadLine { line: u8, content: String },
    /// The catalog numbers of the two data lines do not match.
    CatalogMismatch { line1: String, line2: String },
    /// The record parsed, but no propagation capability could be built.
    /// The object is still ingested in a degraded, position-less state.
    NoPropagation { name: String, reason: String },
}

impl std::error::Error for ParseError {}

/// Identity of a physical object: catalog number and name together.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub struct ElementKey {
    catalog_number: String,
    name: String,
}

impl ElementKey {
    pub fn new(catalog_number: &str, name: &str) -> Self {
        Self { catalog_number: catalog_number.to_string(), name: name.to_string() }
    }

    pub fn catalog_number(&self) -> &str { &self.catalog_number }
    pub fn name(&self) -> &str { &self.name }
}

impl Display for ElementKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.catalog_number)
    }
}

/// A parsed two-line element record plus the tags it was ingested with.
///
/// Tags only ever grow: merging a duplicate record unions its tags into
/// the existing set.
#[derive(Debug, Clone)]
pub struct OrbitalElementSet {
    /// Catalog number and name.
    key: ElementKey,
    /// First data line, trimmed.
    line1: String,
    /// Second data line, trimmed.
    line2: String,
    /// Tags this object carries.
    tags: BTreeSet<String>,
}

impl OrbitalElementSet {
    /// Parses one element record consisting of a name line and two data lines.
    ///
    /// # Arguments
    /// * `text` – The three record lines, separated by `\n` or `\r\n`.
    /// * `tags` – Tags attached to the new set.
    ///
    /// # Returns
    /// The parsed set, or a [`ParseError`] describing the malformed part.
    pub fn parse<S: AsRef<str>>(text: &str, tags: &[S]) -> Result<Self, ParseError> {
        let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        let [name_line, line1, line2] = lines.as_slice() else {
            return Err(ParseError::MalformedRecord { lines: lines.len() });
        };
        let line1_catalog = Self::parse_catalog_number(&LINE1_REGEX, line1, 1)?;
        let line2_catalog = Self::parse_catalog_number(&LINE2_REGEX, line2, 2)?;
        if line1_catalog != line2_catalog {
            return Err(ParseError::CatalogMismatch { line1: line1_catalog, line2: line2_catalog });
        }
        let name = name_line.strip_prefix("0 ").unwrap_or(*name_line).trim();

        Ok(Self {
            key: ElementKey::new(&line1_catalog, name),
            line1: (*line1).to_string(),
            line2: (*line2).to_string(),
            tags: tags.iter().map(|t| t.as_ref().to_string()).collect(),
        })
    }

    fn parse_catalog_number(regex: &Regex, line: &str, line_nr: u8) -> Result<String, ParseError> {
        regex
            .captures(line)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| ParseError::BadLine { line: line_nr, content: line.to_string() })
    }

    pub fn key(&self) -> &ElementKey { &self.key }
    pub fn name(&self) -> &str { self.key.name() }
    pub fn catalog_number(&self) -> &str { self.key.catalog_number() }
    pub fn line1(&self) -> &str { &self.line1 }
    pub fn line2(&self) -> &str { &self.line2 }
    pub fn tags(&self) -> &BTreeSet<String> { &self.tags }

    pub fn has_tag(&self, tag: &str) -> bool { self.tags.contains(tag) }

    /// Raw record text as it would appear in a source file.
    pub fn raw_text(&self) -> String { format!("{}\n{}\n{}", self.key.name(), self.line1, self.line2) }

    /// Unions `tags` into this set.
    ///
    /// # Returns
    /// `true` if at least one tag was not present before.
    pub fn add_tags<'a, I>(&mut self, tags: I) -> bool
    where I: IntoIterator<Item = &'a String> {
        let mut changed = false;
        for tag in tags {
            changed |= self.tags.insert(tag.clone());
        }
        changed
    }
}

/// Splits a source body into three-line records.
///
/// Blank lines are skipped, a trailing partial group is ignored.
pub fn split_records(body: &str) -> Vec<String> {
    let lines: Vec<&str> = body.lines().map(str::trim_end).filter(|l| !l.trim().is_empty()).collect();
    lines.chunks_exact(3).map(|chunk| chunk.join("\n")).collect()
}
