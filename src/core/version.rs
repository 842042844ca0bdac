//! Version resolution from the CMake build description.
//!
//! The library's version lives in `CMakeLists.txt` as three independent
//! definitions, typically:
//!
//! ```cmake
//! set(SFC_VERSION_MAJOR 1)
//! set(SFC_VERSION_MINOR 4)
//! set(SFC_VERSION_PATCH 0)
//! ```
//!
//! Each component is found by a small line-oriented tokenizer: an identifier
//! ending in the component label, followed by whitespace and a run of digits.
//! CMake comments are skipped. A component defined twice with different values
//! is rejected instead of silently taking the first definition.

use std::fmt;

use serde::Serialize;

use crate::core::errors::ConfigurationError;

/// One of the three labeled version fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionComponent {
    Major,
    Minor,
    Patch,
}

impl VersionComponent {
    /// All components, in version order.
    pub const ALL: [VersionComponent; 3] = [
        VersionComponent::Major,
        VersionComponent::Minor,
        VersionComponent::Patch,
    ];

    /// The label searched for in the build description.
    pub fn label(self) -> &'static str {
        match self {
            VersionComponent::Major => "VERSION_MAJOR",
            VersionComponent::Minor => "VERSION_MINOR",
            VersionComponent::Patch => "VERSION_PATCH",
        }
    }

    fn index(self) -> usize {
        match self {
            VersionComponent::Major => 0,
            VersionComponent::Minor => 1,
            VersionComponent::Patch => 2,
        }
    }
}

impl fmt::Display for VersionComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A `major.minor.patch` version resolved from the build description.
///
/// The components are kept both as numbers and as the digits written in the
/// build description. The version string is built from the digits, so
/// `02.010.00` stays `02.010.00`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ResolvedVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    #[serde(skip)]
    literal: String,
}

impl ResolvedVersion {
    /// Create a version from its components.
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        ResolvedVersion {
            major,
            minor,
            patch,
            literal: format!("{}.{}.{}", major, minor, patch),
        }
    }

    /// Resolve the version from the text of a build description.
    pub fn resolve(text: &str) -> Result<Self, ConfigurationError> {
        let found = scan(text)?;

        let component = |c: VersionComponent| {
            found[c.index()]
                .as_ref()
                .ok_or(ConfigurationError::MissingVersionComponent { component: c })
        };

        let major = component(VersionComponent::Major)?;
        let minor = component(VersionComponent::Minor)?;
        let patch = component(VersionComponent::Patch)?;

        Ok(ResolvedVersion {
            major: major.value,
            minor: minor.value,
            patch: patch.value,
            literal: format!("{}.{}.{}", major.digits, minor.digits, patch.digits),
        })
    }

    /// The version as written in the build description.
    pub fn as_str(&self) -> &str {
        &self.literal
    }

    /// Convert to a `semver::Version`. Leading zeros are normalized away.
    pub fn to_semver(&self) -> semver::Version {
        semver::Version::new(self.major, self.minor, self.patch)
    }
}

impl fmt::Display for ResolvedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.literal)
    }
}

#[derive(Debug, Clone)]
struct Definition {
    value: u64,
    digits: String,
    line: usize,
}

#[derive(Debug, PartialEq, Eq)]
enum Token<'a> {
    Word(&'a str),
    Punct(char),
}

fn scan(text: &str) -> Result<[Option<Definition>; 3], ConfigurationError> {
    let mut found: [Option<Definition>; 3] = [None, None, None];
    let mut block_close: Option<String> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = strip_comments(raw, &mut block_close);
        let tokens = tokenize(&line);

        for pair in tokens.windows(2) {
            let (name, digits) = match pair {
                [Token::Word(name), Token::Word(digits)]
                    if digits.bytes().all(|b| b.is_ascii_digit()) =>
                {
                    (*name, *digits)
                }
                _ => continue,
            };

            for component in VersionComponent::ALL {
                if !name.ends_with(component.label()) {
                    continue;
                }

                let value = digits.parse::<u64>().map_err(|_| {
                    ConfigurationError::InvalidVersionComponent {
                        component,
                        value: digits.to_string(),
                        line: line_no,
                    }
                })?;

                let slot = &mut found[component.index()];
                match slot {
                    None => {
                        *slot = Some(Definition {
                            value,
                            digits: digits.to_string(),
                            line: line_no,
                        })
                    }
                    Some(first) if first.value == value => {
                        tracing::debug!(
                            "{} defined again with the same value on line {}",
                            component,
                            line_no
                        );
                    }
                    Some(first) => {
                        return Err(ConfigurationError::AmbiguousVersionComponent {
                            component,
                            first: first.value,
                            first_line: first.line,
                            second: value,
                            second_line: line_no,
                        });
                    }
                }
            }
        }
    }

    Ok(found)
}

/// Remove `# line` and `#[[ bracket ]]` comments, tracking bracket comments
/// that span lines. Bracket comments may carry `=` signs (`#[==[ ... ]==]`);
/// only the closer with the same count ends them.
fn strip_comments(line: &str, block_close: &mut Option<String>) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;
    let mut in_string = false;

    loop {
        if let Some(close) = block_close.as_deref() {
            match rest.find(close) {
                Some(end) => {
                    rest = &rest[end + close.len()..];
                    *block_close = None;
                }
                None => return out,
            }
        }

        let mut chars = rest.char_indices();
        let mut cut = None;
        while let Some((i, c)) = chars.next() {
            match c {
                '"' => in_string = !in_string,
                '\\' if in_string => {
                    chars.next();
                }
                '#' if !in_string => {
                    cut = Some(i);
                    break;
                }
                _ => {}
            }
        }

        match cut {
            None => {
                out.push_str(rest);
                return out;
            }
            Some(i) => {
                out.push_str(&rest[..i]);
                match bracket_open(&rest[i + 1..]) {
                    Some((len, equals)) => {
                        *block_close = Some(format!("]{}]", "=".repeat(equals)));
                        rest = &rest[i + 1 + len..];
                    }
                    None => return out,
                }
            }
        }
    }
}

/// Match a bracket opener `[`, `=`*n, `[` at the start of `text`, returning
/// its length and `n`.
fn bracket_open(text: &str) -> Option<(usize, usize)> {
    let after = text.strip_prefix('[')?;
    let equals = after.bytes().take_while(|&b| b == b'=').count();
    if after[equals..].starts_with('[') {
        Some((equals + 2, equals))
    } else {
        None
    }
}

fn tokenize(line: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;

    for (i, c) in line.char_indices() {
        let is_word = c.is_ascii_alphanumeric() || c == '_';
        match (is_word, start) {
            (true, None) => start = Some(i),
            (true, Some(_)) => {}
            (false, Some(s)) => {
                tokens.push(Token::Word(&line[s..i]));
                start = None;
            }
            (false, None) => {}
        }
        if !is_word && !c.is_whitespace() {
            tokens.push(Token::Punct(c));
        }
    }

    if let Some(s) = start {
        tokens.push(Token::Word(&line[s..]));
    }

    tokens
}
