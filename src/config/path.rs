//! Path resolution: lexical normalization and `$VAR` substitution.
//!
//! Resolution never fails. An unset variable becomes an empty segment, which
//! is kept rather than dropped, so `/a/$UNSET/b` resolves to `/a//b` and
//! `$UNSET/x` resolves to `/x`.
//!
//! Segments are handled as [`OsStr`], so path bytes that are not UTF-8 pass
//! through untouched.
use std::ffi::{OsStr, OsString};
use std::path::{Component, Path, PathBuf};

/// Marker that starts a variable reference segment.
pub const VAR_MARKER: char = '$';

/// Resolve `path` against the process environment.
///
/// ```
/// use dotlink::config::path::resolve;
///
/// assert_eq!(resolve("/a/./b/../c//d/"), "/a/c/d");
/// ```
#[must_use]
pub fn resolve(path: &str) -> String {
    resolve_with(path, |name| std::env::var(name).ok())
}

/// Resolve `path`, looking variables up through `lookup`.
///
/// The path is normalized first, then every segment starting with `$` is
/// replaced by the variable it names (`$NAME` or `${NAME}`). Segments are
/// joined back with `/` without a second normalization pass.
#[must_use]
pub fn resolve_with(path: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    resolve_path_with(Path::new(path), lookup)
        .to_string_lossy()
        .into_owned()
}

/// [`resolve_with`] over a filesystem path.
#[must_use]
pub fn resolve_path_with(path: &Path, lookup: impl Fn(&str) -> Option<String>) -> PathBuf {
    let cleaned = Cleaned::of(path);
    if cleaned.segments.is_empty() {
        return cleaned.into_path();
    }
    let mut out = cleaned.head();
    for (i, segment) in cleaned.segments.iter().enumerate() {
        if i > 0 {
            out.push("/");
        }
        match segment.to_str().and_then(|s| s.strip_prefix(VAR_MARKER)) {
            Some(name) => out.push(lookup(variable_name(name)).unwrap_or_default()),
            None => out.push(segment),
        }
    }
    PathBuf::from(out)
}

/// Strip optional braces: `{HOME}` -> `HOME`.
fn variable_name(reference: &str) -> &str {
    reference
        .strip_prefix('{')
        .and_then(|inner| inner.strip_suffix('}'))
        .unwrap_or(reference)
}

/// Lexically normalize a `/`-separated path.
///
/// Removes `.` segments and duplicate or trailing separators, resolves `..`
/// against the preceding segment, and drops `..` directly under the root.
/// A leading `/` is preserved; an empty result becomes `.`.
///
/// ```
/// use dotlink::config::path::clean;
///
/// assert_eq!(clean("a/../../b"), "../b");
/// assert_eq!(clean("/../x"), "/x");
/// assert_eq!(clean(""), ".");
/// ```
#[must_use]
pub fn clean(path: &str) -> String {
    clean_path(Path::new(path)).to_string_lossy().into_owned()
}

/// [`clean`] over a filesystem path.
#[must_use]
pub fn clean_path(path: &Path) -> PathBuf {
    Cleaned::of(path).into_path()
}

/// A lexically normalized path split into its parts.
struct Cleaned<'a> {
    prefix: Option<&'a OsStr>,
    rooted: bool,
    segments: Vec<&'a OsStr>,
}

impl<'a> Cleaned<'a> {
    fn of(path: &'a Path) -> Self {
        let mut cleaned = Self {
            prefix: None,
            rooted: false,
            segments: Vec::new(),
        };
        for component in path.components() {
            match component {
                Component::Prefix(prefix) => cleaned.prefix = Some(prefix.as_os_str()),
                Component::RootDir => cleaned.rooted = true,
                Component::CurDir => {}
                Component::ParentDir => match cleaned.segments.last() {
                    Some(last) if *last != ".." => {
                        cleaned.segments.pop();
                    }
                    _ if cleaned.rooted => {}
                    _ => cleaned.segments.push(component.as_os_str()),
                },
                Component::Normal(segment) => cleaned.segments.push(segment),
            }
        }
        cleaned
    }

    /// Prefix and root separator, if any.
    fn head(&self) -> OsString {
        let mut head = self.prefix.map(OsStr::to_os_string).unwrap_or_default();
        if self.rooted {
            head.push("/");
        }
        head
    }

    fn into_path(self) -> PathBuf {
        let mut out = self.head();
        if self.segments.is_empty() && out.is_empty() {
            return PathBuf::from(".");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                out.push("/");
            }
            out.push(segment);
        }
        PathBuf::from(out)
    }
}
