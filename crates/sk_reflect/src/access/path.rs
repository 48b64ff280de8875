//! Provide the root-to-leaf key sequence.

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Write};
use core::str::FromStr;

use super::StructuralKey;

/// An interface for representing path parsing error information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Position in `path`.
    pub offset: usize,
    /// The path that the error occurred in.
    pub path: String,
    /// The underlying error.
    pub error: Cow<'static, str>,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Encountered an error at offset {} while parsing `{}`: {}",
            self.offset, self.path, self.error,
        )
    }
}

impl core::error::Error for ParseError {}

/// An ordered sequence of [`StructuralKey`], root to leaf.
///
/// The order of keys is the identity of a field location.
/// An empty path addresses the root value itself.
///
/// # Syntax
///
/// `Display` and `FromStr` share one syntax:
///
/// - Named: `.Name`, e.g. `.city`
/// - Quoted: `."Name"` for empty names and names containing `.`, `[`, `]`, `"`
///   or `\`. Inside quotes, `\` escapes the next character.
/// - Indexed: `[Number]`, e.g. `[0]`
///
/// The root is the empty string.
///
/// # Examples
///
/// ```
/// use sk_reflect::access::StructuralPath;
///
/// let path = StructuralPath::root()
///     .child("tags")
///     .child(0usize);
///
/// assert_eq!(path.to_string(), ".tags[0]");
/// assert_eq!(path.to_strings(), ["tags", "0"]);
/// assert_eq!(".tags[0]".parse::<StructuralPath>().unwrap(), path);
///
/// let odd = StructuralPath::root().child("a.b").child("");
/// assert_eq!(odd.to_string(), r#"."a.b"."""#);
/// assert_eq!(odd.to_string().parse::<StructuralPath>().unwrap(), odd);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StructuralPath(Vec<StructuralKey>);

impl StructuralPath {
    /// The empty path.
    #[inline]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Returns a new path extended by `key`.
    pub fn child(&self, key: impl Into<StructuralKey>) -> Self {
        let mut keys = Vec::with_capacity(self.0.len() + 1);
        keys.extend_from_slice(&self.0);
        keys.push(key.into());
        Self(keys)
    }

    #[inline]
    pub fn push(&mut self, key: impl Into<StructuralKey>) {
        self.0.push(key.into());
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn keys(&self) -> &[StructuralKey] {
        &self.0
    }

    #[inline]
    pub fn last(&self) -> Option<&StructuralKey> {
        self.0.last()
    }

    /// Returns the string form of every key, root first.
    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(|key| key.string_value().into_owned()).collect()
    }

    /// Returns `true` if `self` starts with every key of `prefix`.
    #[inline]
    pub fn starts_with(&self, prefix: &StructuralPath) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

#[inline]
fn needs_quotes(name: &str) -> bool {
    name.is_empty() || name.contains(['.', '[', ']', '"', '\\'])
}

fn write_quoted(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    f.write_str(".\"")?;
    for c in name.chars() {
        if matches!(c, '"' | '\\') {
            f.write_char('\\')?;
        }
        f.write_char(c)?;
    }
    f.write_char('"')
}

/// Reads a quoted name starting at the opening quote.
///
/// Returns the name and the offset after the closing quote.
fn read_quoted(path: &str, quote: usize) -> Option<(String, usize)> {
    let start = quote + 1;
    let mut name = String::new();
    let mut chars = path[start..].char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Some((name, start + i + 1)),
            '\\' => name.push(chars.next()?.1),
            c => name.push(c),
        }
    }
    None
}

impl fmt::Display for StructuralPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for key in &self.0 {
            match key {
                StructuralKey::Named(name) if needs_quotes(name) => write_quoted(f, name)?,
                StructuralKey::Named(name) => write!(f, ".{name}")?,
                StructuralKey::Indexed(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl From<Vec<StructuralKey>> for StructuralPath {
    #[inline]
    fn from(value: Vec<StructuralKey>) -> Self {
        Self(value)
    }
}

impl<K: Into<StructuralKey>> FromIterator<K> for StructuralPath {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a StructuralPath {
    type Item = &'a StructuralKey;
    type IntoIter = core::slice::Iter<'a, StructuralKey>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromStr for StructuralPath {
    type Err = ParseError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let error = |offset: usize, error: &'static str| ParseError {
            offset,
            path: String::from(path),
            error: Cow::Borrowed(error),
        };

        let bytes = path.as_bytes();
        let mut keys = Vec::new();
        let mut offset = 0;

        while offset < bytes.len() {
            match bytes[offset] {
                b'.' if bytes.get(offset + 1) == Some(&b'"') => {
                    let Some((name, end)) = read_quoted(path, offset + 1) else {
                        return Err(error(offset + 1, "unclosed `\"`"));
                    };
                    keys.push(StructuralKey::Named(name));
                    offset = end;
                }
                b'.' => {
                    let start = offset + 1;
                    let end = bytes[start..]
                        .iter()
                        .position(|&b| b == b'.' || b == b'[')
                        .map_or(bytes.len(), |len| start + len);
                    if start == end {
                        return Err(error(offset, "expected a name after `.`"));
                    }
                    keys.push(StructuralKey::Named(String::from(&path[start..end])));
                    offset = end;
                }
                b'[' => {
                    let start = offset + 1;
                    let Some(len) = bytes[start..].iter().position(|&b| b == b']') else {
                        return Err(error(offset, "unclosed `[`"));
                    };
                    let end = start + len;
                    let index = path[start..end]
                        .parse::<usize>()
                        .map_err(|_| error(start, "expected an index inside `[]`"))?;
                    keys.push(StructuralKey::Indexed(index));
                    offset = end + 1;
                }
                _ => return Err(error(offset, "expected `.` or `[`")),
            }
        }

        Ok(Self(keys))
    }
}
