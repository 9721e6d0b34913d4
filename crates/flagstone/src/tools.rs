//! Helper-program discovery.
//!
//! The helpers a fragment leans on (`xml2-config`, `icu-config`, ...) must
//! be on PATH when the record is resolved. This module reads the helper
//! names out of a record and probes for them, so a missing helper surfaces
//! as a diagnosis instead of a mid-build shell failure.

use crate::error::{FragmentError, Result};
use crate::subst::{segments, Segment};
use crate::vars::{push_unique, BuildVars};
use std::path::PathBuf;
use std::process::Command;

/// The helper programs a record's backtick spans invoke, in first-seen
/// order, deduplicated. Spans with an empty body contribute nothing.
pub fn needed_tools(vars: &BuildVars) -> Result<Vec<String>> {
    let mut tools = Vec::new();

    for field in [&vars.cppflags, &vars.linkflags] {
        for segment in segments(field)? {
            if let Segment::Command(body) = segment {
                if let Some(program) = body.split_whitespace().next() {
                    push_unique(&mut tools, program.to_string());
                }
            }
        }
    }

    Ok(tools)
}

/// Locate a helper program on PATH.
///
/// Searches via `which`; a helper that cannot be located (or a system
/// without `which`) reports [`FragmentError::ToolNotFound`].
pub fn find_tool(name: &str) -> Result<PathBuf> {
    if let Ok(output) = Command::new("which").arg(name).output() {
        if output.status.success() {
            let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if !path.is_empty() {
                return Ok(PathBuf::from(path));
            }
        }
    }

    Err(FragmentError::ToolNotFound(name.to_string()))
}

/// Probe result for one helper program.
#[derive(Debug, Clone)]
pub struct ToolCheck {
    /// Helper program name as it appears in the fragment.
    pub name: String,
    /// Where the helper was found, if it was.
    pub path: Option<PathBuf>,
}

impl ToolCheck {
    /// Whether the helper is present on PATH.
    pub fn found(&self) -> bool {
        self.path.is_some()
    }
}

/// Probe every helper the record needs.
pub fn probe_tools(vars: &BuildVars) -> Result<Vec<ToolCheck>> {
    let mut checks = Vec::new();

    for name in needed_tools(vars)? {
        let path = find_tool(&name).ok();
        checks.push(ToolCheck { name, path });
    }

    Ok(checks)
}
