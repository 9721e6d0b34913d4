//! Build-variable fragments for C/C++ toolchains.
//!
//! This crate provides:
//! - Fragment format (`flagstone.toml`) carrying the five SCons-style
//!   construction variables
//! - Backtick substitution resolution (`` `xml2-config --cflags` ``)
//! - Rendering records to compiler and linker argument lists
//! - Import from compile_commands.json and SCons `custom.py` files
//!
//! # Example
//!
//! ```toml
//! # flagstone.toml
//! CPPFLAGS = "`xml2-config --cflags` -Wall -Wextra"
//! LINKFLAGS = "`xml2-config --libs`"
//! CPPDEFINES = ["LUA_EXTERN"]
//! CPPPATH = ["../../../icuwrap/src"]
//! LIBPATH = ["../../../icuwrap/build/debug"]
//! ```

mod vars;
mod words;
mod subst;
mod tools;
mod render;
mod scan;
mod scons;
mod error;

pub use vars::BuildVars;
pub use scan::{CompileCommand, CompileCommands};
pub use tools::{find_tool, needed_tools, probe_tools, ToolCheck};
pub use render::shell_line;
pub use subst::expand_str;
pub use error::{FragmentError, Result};
