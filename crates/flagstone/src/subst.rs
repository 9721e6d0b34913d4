//! Backtick command substitution for shell-composed flag strings.
//!
//! A fragment's CPPFLAGS/LINKFLAGS may embed `` `helper --args` `` spans the
//! way the build engine's shell would evaluate them. Loading preserves the
//! spans verbatim; [`BuildVars::resolve`] is the explicit pre-build step that
//! runs each helper and splices its output into the flag string.
//!
//! Helper contract: the program must spawn, exit 0, and print flags on
//! stdout. Surrounding whitespace is trimmed and internal whitespace runs
//! (including newlines) collapse to single spaces. Any deviation is a hard
//! error; there is no retry and no caching between resolve calls.

use crate::error::{FragmentError, Result};
use crate::vars::BuildVars;
use std::process::Command;

/// One piece of a shell-composed flag string.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    /// Literal text, passed through untouched.
    Text(&'a str),
    /// The body of a backtick span, without the backticks.
    Command(&'a str),
}

/// Split a flag string into literal text and backtick-span bodies.
pub(crate) fn segments(input: &str) -> Result<Vec<Segment<'_>>> {
    let mut parts = Vec::new();
    let mut rest = input;

    while let Some(start) = rest.find('`') {
        if start > 0 {
            parts.push(Segment::Text(&rest[..start]));
        }
        let after = &rest[start + 1..];
        match after.find('`') {
            Some(end) => {
                parts.push(Segment::Command(&after[..end]));
                rest = &after[end + 1..];
            }
            None => {
                return Err(FragmentError::UnterminatedSubstitution(after.to_string()));
            }
        }
    }

    if !rest.is_empty() {
        parts.push(Segment::Text(rest));
    }

    Ok(parts)
}

/// Expand every backtick substitution in a flag string.
pub fn expand_str(input: &str) -> Result<String> {
    let mut out = String::with_capacity(input.len());

    for segment in segments(input)? {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Command(body) => out.push_str(&run_helper(body)?),
        }
    }

    Ok(out)
}

/// Run one helper invocation and return its collapsed stdout.
fn run_helper(body: &str) -> Result<String> {
    let mut parts = body.split_whitespace();
    let program = parts.next().ok_or(FragmentError::EmptySubstitution)?;
    let args: Vec<&str> = parts.collect();

    // Debug: print the invocation (env var to enable)
    if std::env::var("FLAGSTONE_DEBUG").is_ok() {
        eprintln!("DEBUG: running helper `{}` {:?}", program, args);
    }

    let output = Command::new(program)
        .args(&args)
        .output()
        .map_err(|source| FragmentError::HelperSpawn {
            program: program.to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(FragmentError::HelperFailed {
            program: program.to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let flags = stdout.split_whitespace().collect::<Vec<_>>().join(" ");
    if flags.is_empty() {
        return Err(FragmentError::HelperEmptyOutput {
            program: program.to_string(),
        });
    }

    Ok(flags)
}

impl BuildVars {
    /// Expand every backtick substitution in CPPFLAGS and LINKFLAGS,
    /// returning a new record. List variables are copied through untouched;
    /// the record itself is never mutated.
    ///
    /// Substitutions run synchronously, left to right, exactly once per
    /// call. A missing helper, a non-zero exit, or empty output fails the
    /// whole resolve.
    pub fn resolve(&self) -> Result<BuildVars> {
        Ok(BuildVars {
            cppflags: expand_str(&self.cppflags)?,
            linkflags: expand_str(&self.linkflags)?,
            cppdefines: self.cppdefines.clone(),
            cpppath: self.cpppath.clone(),
            libpath: self.libpath.clone(),
        })
    }
}
