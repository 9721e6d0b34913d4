//! The build-variable record and its fragment format.
//!
//! A fragment is a TOML file whose keys are the five construction variables,
//! spelled exactly as the build engine knows them. A fragment may set any
//! subset; unset variables stay empty. The field set is closed: an unknown
//! key is a parse error, values are never validated.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A build-variable record: five independently overridable variables merged
/// into a compile/link environment by an external build engine.
///
/// CPPFLAGS and LINKFLAGS are flat shell-composed strings and may embed
/// backtick substitutions such as `` `xml2-config --cflags` ``; see
/// [`BuildVars::resolve`] for expanding them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct BuildVars {
    /// Preprocessor and compiler flags passed to the C/C++ front end.
    #[serde(rename = "CPPFLAGS")]
    pub cppflags: String,

    /// Flags passed to the linker.
    #[serde(rename = "LINKFLAGS")]
    pub linkflags: String,

    /// Preprocessor macro definitions, injected as `-D<define>`.
    #[serde(rename = "CPPDEFINES")]
    pub cppdefines: Vec<String>,

    /// Additional include-search directories, injected as `-I<dir>`.
    #[serde(rename = "CPPPATH")]
    pub cpppath: Vec<PathBuf>,

    /// Additional library-search directories, injected as `-L<dir>`.
    #[serde(rename = "LIBPATH")]
    pub libpath: Vec<PathBuf>,
}

impl BuildVars {
    /// Parse a record from TOML fragment text.
    pub fn from_toml_str(text: &str) -> crate::Result<Self> {
        let vars: BuildVars = toml::from_str(text)?;
        Ok(vars)
    }

    /// Load a record from a TOML fragment file.
    pub fn from_file(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Serialize the record back to its canonical TOML form.
    ///
    /// All five variables are written out, in the order the original
    /// fragment format declares them. Loading the result yields an equal
    /// record; serializing twice yields identical bytes.
    pub fn to_toml_string(&self) -> crate::Result<String> {
        let text = toml::to_string(self)?;
        Ok(text)
    }

    /// Whether every variable is unset.
    pub fn is_empty(&self) -> bool {
        self.cppflags.is_empty()
            && self.linkflags.is_empty()
            && self.cppdefines.is_empty()
            && self.cpppath.is_empty()
            && self.libpath.is_empty()
    }

    /// Append another fragment onto this one.
    ///
    /// Flag strings concatenate with a single separating space; list
    /// variables append in order, dropping entries already present. Existing
    /// elements are never reordered.
    pub fn merge(&mut self, other: BuildVars) {
        push_word(&mut self.cppflags, &other.cppflags);
        push_word(&mut self.linkflags, &other.linkflags);
        for define in other.cppdefines {
            push_unique(&mut self.cppdefines, define);
        }
        for dir in other.cpppath {
            push_unique(&mut self.cpppath, dir);
        }
        for dir in other.libpath {
            push_unique(&mut self.libpath, dir);
        }
    }

    /// Merge a sequence of fragments, left to right.
    pub fn merged<I>(fragments: I) -> Self
    where
        I: IntoIterator<Item = BuildVars>,
    {
        let mut vars = BuildVars::default();
        for fragment in fragments {
            vars.merge(fragment);
        }
        vars
    }

    /// Replace variables from the process environment.
    ///
    /// `FLAGSTONE_CPPFLAGS`, `FLAGSTONE_LINKFLAGS`, `FLAGSTONE_CPPDEFINES`,
    /// `FLAGSTONE_CPPPATH`, and `FLAGSTONE_LIBPATH` each override their
    /// variable wholesale when set. List-valued variables split on `:` like
    /// PATH; empty elements are skipped.
    pub fn apply_env_overrides(&mut self) {
        self.apply_env_overrides_from(|name| std::env::var(name).ok());
    }

    /// [`BuildVars::apply_env_overrides`] with an injectable lookup.
    pub fn apply_env_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("FLAGSTONE_CPPFLAGS") {
            self.cppflags = value;
        }
        if let Some(value) = lookup("FLAGSTONE_LINKFLAGS") {
            self.linkflags = value;
        }
        if let Some(value) = lookup("FLAGSTONE_CPPDEFINES") {
            self.cppdefines = split_path_list(&value).map(str::to_string).collect();
        }
        if let Some(value) = lookup("FLAGSTONE_CPPPATH") {
            self.cpppath = split_path_list(&value).map(PathBuf::from).collect();
        }
        if let Some(value) = lookup("FLAGSTONE_LIBPATH") {
            self.libpath = split_path_list(&value).map(PathBuf::from).collect();
        }
    }
}

/// Append a word (or word run) to a flag string with a single separating
/// space. Empty operands introduce no separator.
pub(crate) fn push_word(dst: &mut String, word: &str) {
    if word.is_empty() {
        return;
    }
    if !dst.is_empty() {
        dst.push(' ');
    }
    dst.push_str(word);
}

/// Append an element unless an equal one is already present.
pub(crate) fn push_unique<T: PartialEq>(list: &mut Vec<T>, item: T) {
    if !list.contains(&item) {
        list.push(item);
    }
}

fn split_path_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(':').filter(|part| !part.is_empty())
}
