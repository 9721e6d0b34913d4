//! Importing records from existing build metadata.
//!
//! CMake can emit a compile_commands.json with the exact compilation command
//! for each source file. flagstone reads those commands back into fragments:
//! classifiable arguments (`-I`/`-isystem`, `-D`, `-L`, `-l`/`-Wl,`) land in
//! the record's list variables and LINKFLAGS, everything else stays in
//! CPPFLAGS in its original order. Compilation bookkeeping (the compiler
//! itself, `-c`, `-o` and its operand, the source file) is dropped.

use crate::error::Result;
use crate::vars::{push_unique, push_word, BuildVars};
use crate::words;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A single entry from compile_commands.json.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileCommand {
    /// The working directory for compilation.
    pub directory: PathBuf,

    /// The source file path.
    pub file: PathBuf,

    /// The full compilation command (one shell-composed string).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// The compilation arguments (array form).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<String>>,

    /// Output file (optional).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

impl CompileCommand {
    /// The compilation arguments, shell-split when only the string form is
    /// present.
    pub fn args(&self) -> Result<Vec<String>> {
        if let Some(args) = &self.arguments {
            Ok(args.clone())
        } else if let Some(cmd) = &self.command {
            words::split(cmd)
        } else {
            Ok(Vec::new())
        }
    }

    /// Convert this command into a build-variable record.
    pub fn to_build_vars(&self) -> Result<BuildVars> {
        let args = self.args()?;
        if args.is_empty() {
            return Ok(BuildVars::default());
        }

        // args[0] is the compiler; flags start after it.
        let mut kept = Vec::new();
        let mut i = 1;
        while i < args.len() {
            let arg = &args[i];
            if arg == "-c" {
                i += 1;
            } else if arg == "-o" {
                i += 2;
            } else if self.names_source(arg) {
                i += 1;
            } else {
                kept.push(arg.clone());
                i += 1;
            }
        }

        Ok(BuildVars::from_compile_args(&kept))
    }

    fn names_source(&self, arg: &str) -> bool {
        if arg.is_empty() || arg.starts_with('-') {
            return false;
        }
        let path = Path::new(arg);
        path == self.file || self.file.ends_with(path)
    }
}

/// The contents of a compile_commands.json file.
#[derive(Debug, Clone)]
pub struct CompileCommands {
    commands: Vec<CompileCommand>,
}

impl CompileCommands {
    /// Load compile commands from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Parse compile commands from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let commands: Vec<CompileCommand> = serde_json::from_str(json)?;
        Ok(Self { commands })
    }

    /// All commands, in file order.
    pub fn commands(&self) -> &[CompileCommand] {
        &self.commands
    }

    /// Find the command for a specific source file.
    pub fn find_command(&self, source: &Path) -> Option<&CompileCommand> {
        self.commands
            .iter()
            .find(|cmd| cmd.file == source || cmd.file.ends_with(source))
    }

    /// Convert the whole command set into one record: every command's
    /// record merged in file order, list variables deduplicated.
    pub fn to_build_vars(&self) -> Result<BuildVars> {
        let mut vars = BuildVars::default();
        for cmd in &self.commands {
            vars.merge(cmd.to_build_vars()?);
        }
        Ok(vars)
    }
}

impl BuildVars {
    /// Build a record from an existing argument list.
    ///
    /// `-I`/`-isystem` directories (attached or separate operand) populate
    /// CPPPATH, `-D` defines CPPDEFINES, `-L` paths LIBPATH; `-l` libraries
    /// and `-Wl,` pass-throughs go to LINKFLAGS. Every other argument stays
    /// in CPPFLAGS in its original order. List entries deduplicate.
    pub fn from_compile_args(args: &[String]) -> BuildVars {
        let mut vars = BuildVars::default();

        let mut i = 0;
        while i < args.len() {
            let arg = &args[i];
            if arg == "-I" && i + 1 < args.len() {
                push_unique(&mut vars.cpppath, PathBuf::from(&args[i + 1]));
                i += 2;
            } else if arg == "-isystem" && i + 1 < args.len() {
                push_unique(&mut vars.cpppath, PathBuf::from(&args[i + 1]));
                i += 2;
            } else if arg == "-D" && i + 1 < args.len() {
                push_unique(&mut vars.cppdefines, args[i + 1].clone());
                i += 2;
            } else if arg == "-L" && i + 1 < args.len() {
                push_unique(&mut vars.libpath, PathBuf::from(&args[i + 1]));
                i += 2;
            } else if let Some(dir) = arg.strip_prefix("-I").filter(|rest| !rest.is_empty()) {
                push_unique(&mut vars.cpppath, PathBuf::from(dir));
                i += 1;
            } else if let Some(def) = arg.strip_prefix("-D").filter(|rest| !rest.is_empty()) {
                push_unique(&mut vars.cppdefines, def.to_string());
                i += 1;
            } else if let Some(dir) = arg.strip_prefix("-L").filter(|rest| !rest.is_empty()) {
                push_unique(&mut vars.libpath, PathBuf::from(dir));
                i += 1;
            } else if arg.starts_with("-l") || arg.starts_with("-Wl,") {
                push_word(&mut vars.linkflags, arg);
                i += 1;
            } else {
                push_word(&mut vars.cppflags, arg);
                i += 1;
            }
        }

        vars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compile_commands() {
        let json = r#"[
            {
                "directory": "/home/user/project/build",
                "file": "/home/user/project/src/main.cc",
                "command": "g++ -I/usr/include -I../include -DDEBUG=1 -std=c++17 -c main.cc"
            },
            {
                "directory": "/home/user/project/build",
                "file": "/home/user/project/src/utils.cc",
                "arguments": ["g++", "-I/usr/include", "-DNDEBUG", "-c", "utils.cc"]
            }
        ]"#;

        let cmds = CompileCommands::from_json_str(json).unwrap();
        assert_eq!(cmds.commands().len(), 2);

        let args = cmds.commands()[0].args().unwrap();
        assert_eq!(args[0], "g++");
        assert_eq!(args.len(), 7);
    }

    #[test]
    fn test_args_honors_quoting() {
        let cmd = CompileCommand {
            directory: PathBuf::from("/build"),
            file: PathBuf::from("src/main.cc"),
            command: Some(r#"g++ -DMSG="hello world" -c main.cc"#.to_string()),
            arguments: None,
            output: None,
        };

        let args = cmd.args().unwrap();
        assert_eq!(args, vec!["g++", "-DMSG=hello world", "-c", "main.cc"]);
    }

    #[test]
    fn test_find_command() {
        let json = r#"[
            {
                "directory": "/build",
                "file": "src/main.cc",
                "command": "g++ -c main.cc"
            }
        ]"#;

        let cmds = CompileCommands::from_json_str(json).unwrap();
        assert!(cmds.find_command(Path::new("src/main.cc")).is_some());
        assert!(cmds.find_command(Path::new("main.cc")).is_some());
        assert!(cmds.find_command(Path::new("src/other.cc")).is_none());
    }

    #[test]
    fn test_command_to_build_vars_drops_bookkeeping() {
        let cmd = CompileCommand {
            directory: PathBuf::from("/build"),
            file: PathBuf::from("/project/src/main.cc"),
            command: Some(
                "g++ -I/usr/include -isystem /opt/sdk/include -DDEBUG=1 -std=c++17 -O2 \
                 -c main.cc -o main.o"
                    .to_string(),
            ),
            arguments: None,
            output: None,
        };

        let vars = cmd.to_build_vars().unwrap();

        assert_eq!(vars.cppflags, "-std=c++17 -O2");
        assert_eq!(vars.cppdefines, vec!["DEBUG=1"]);
        assert_eq!(
            vars.cpppath,
            vec![PathBuf::from("/usr/include"), PathBuf::from("/opt/sdk/include")]
        );
        assert!(vars.libpath.is_empty());
        assert!(vars.linkflags.is_empty());
    }

    #[test]
    fn test_command_set_to_build_vars_dedups() {
        let json = r#"[
            {
                "directory": "/build",
                "file": "src/main.cc",
                "command": "g++ -I/usr/include -DNDEBUG -Wall -c src/main.cc"
            },
            {
                "directory": "/build",
                "file": "src/utils.cc",
                "command": "g++ -I/usr/include -Iinclude -DNDEBUG -Wall -c src/utils.cc"
            }
        ]"#;

        let cmds = CompileCommands::from_json_str(json).unwrap();
        let vars = cmds.to_build_vars().unwrap();

        assert_eq!(vars.cpppath, vec![PathBuf::from("/usr/include"), PathBuf::from("include")]);
        assert_eq!(vars.cppdefines, vec!["NDEBUG"]);
        // Flag strings append per command; only lists deduplicate.
        assert_eq!(vars.cppflags, "-Wall -Wall");
    }

    #[test]
    fn test_from_compile_args_classification() {
        let args: Vec<String> = [
            "-Wall", "-I", "include", "-DLUA_EXTERN", "-L", "../build/debug", "-llua5.1",
            "-Wl,--as-needed", "-L/usr/lib", "-pedantic",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let vars = BuildVars::from_compile_args(&args);

        assert_eq!(vars.cppflags, "-Wall -pedantic");
        assert_eq!(vars.cppdefines, vec!["LUA_EXTERN"]);
        assert_eq!(vars.cpppath, vec![PathBuf::from("include")]);
        assert_eq!(
            vars.libpath,
            vec![PathBuf::from("../build/debug"), PathBuf::from("/usr/lib")]
        );
        assert_eq!(vars.linkflags, "-llua5.1 -Wl,--as-needed");
    }

    #[test]
    fn test_from_compile_args_trailing_lone_flag() {
        let args: Vec<String> = ["-Wall", "-I"].iter().map(|s| s.to_string()).collect();
        let vars = BuildVars::from_compile_args(&args);

        // A dangling operand-taking flag stays in CPPFLAGS untouched.
        assert_eq!(vars.cppflags, "-Wall -I");
        assert!(vars.cpppath.is_empty());
    }
}
