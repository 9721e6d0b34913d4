//! Rendering records into compiler and linker arguments.
//!
//! flagstone never invokes the toolchain; it prepares the argument lists the
//! external build engine splices into its own compile/link commands. A
//! record that still carries backtick spans renders each span as one verbatim
//! word; resolve first for plain flags.

use crate::error::Result;
use crate::vars::BuildVars;
use crate::words;

impl BuildVars {
    /// The compile-side arguments: CPPFLAGS words, then `-D` defines, then
    /// `-I` include directories.
    pub fn compile_args(&self) -> Result<Vec<String>> {
        let mut args = words::split(&self.cppflags)?;
        for define in &self.cppdefines {
            args.push(format!("-D{}", define));
        }
        for dir in &self.cpppath {
            args.push(format!("-I{}", dir.display()));
        }
        Ok(args)
    }

    /// The link-side arguments: LINKFLAGS words, then `-L` search paths.
    pub fn link_args(&self) -> Result<Vec<String>> {
        let mut args = words::split(&self.linkflags)?;
        for dir in &self.libpath {
            args.push(format!("-L{}", dir.display()));
        }
        Ok(args)
    }
}

/// Join arguments into one copy-pasteable shell line.
///
/// Words are single-quoted when they contain anything a shell would
/// interpret. Words carrying a backtick span pass through unquoted so the
/// consumer's shell still evaluates the substitution.
pub fn shell_line(args: &[String]) -> String {
    args.iter()
        .map(|arg| quote_word(arg))
        .collect::<Vec<_>>()
        .join(" ")
}

fn quote_word(word: &str) -> String {
    if word.is_empty() {
        return "''".to_string();
    }
    if word.contains('`') {
        return word.to_string();
    }
    if word.chars().all(is_safe_char) {
        return word.to_string();
    }

    let mut quoted = String::from("'");
    for c in word.chars() {
        if c == '\'' {
            quoted.push_str(r"'\''");
        } else {
            quoted.push(c);
        }
    }
    quoted.push('\'');
    quoted
}

fn is_safe_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(c, '-' | '_' | '.' | '/' | '=' | '+' | ':' | ',' | '@' | '%')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn icuwrap_vars() -> BuildVars {
        BuildVars {
            cppflags: "`xml2-config --cflags` `icu-config --cppflags` -I/usr/include/lua5.1 \
                       -Wfatal-errors -Wswitch-default -Wswitch-enum -Wunused-parameter \
                       -Wfloat-equal -Wundef -pedantic -Wall -Wextra"
                .to_string(),
            linkflags: "`xml2-config --libs` `icu-config --ldflags`".to_string(),
            cppdefines: vec!["LUA_EXTERN".to_string()],
            cpppath: vec![PathBuf::from("../../../icuwrap/src")],
            libpath: vec![PathBuf::from("../../../icuwrap/build/debug")],
        }
    }

    #[test]
    fn test_compile_args_composition_order() {
        let args = icuwrap_vars().compile_args().unwrap();

        assert_eq!(args[0], "`xml2-config --cflags`");
        assert_eq!(args[1], "`icu-config --cppflags`");
        assert_eq!(args[2], "-I/usr/include/lua5.1");
        assert_eq!(args[args.len() - 2], "-DLUA_EXTERN");
        assert_eq!(args[args.len() - 1], "-I../../../icuwrap/src");
    }

    #[test]
    fn test_link_args_composition_order() {
        let args = icuwrap_vars().link_args().unwrap();

        assert_eq!(
            args,
            vec![
                "`xml2-config --libs`",
                "`icu-config --ldflags`",
                "-L../../../icuwrap/build/debug",
            ]
        );
    }

    #[test]
    fn test_render_empty_record() {
        let vars = BuildVars::default();
        assert!(vars.compile_args().unwrap().is_empty());
        assert!(vars.link_args().unwrap().is_empty());
    }

    #[test]
    fn test_define_with_value() {
        let vars = BuildVars {
            cppdefines: vec!["VERSION=\"1.2\"".to_string()],
            ..BuildVars::default()
        };
        assert_eq!(vars.compile_args().unwrap(), vec!["-DVERSION=\"1.2\""]);
    }

    #[test]
    fn test_shell_line_quotes_only_when_needed() {
        let args = vec![
            "-Wall".to_string(),
            "-DMSG=hello world".to_string(),
            "-DQ=don't".to_string(),
            "".to_string(),
        ];

        assert_eq!(
            shell_line(&args),
            r"-Wall '-DMSG=hello world' '-DQ=don'\''t' ''"
        );
    }

    #[test]
    fn test_shell_line_leaves_substitutions_bare() {
        let args = vec!["`xml2-config --libs`".to_string(), "-lm".to_string()];
        assert_eq!(shell_line(&args), "`xml2-config --libs` -lm");
    }

    #[test]
    fn test_shell_line_of_icuwrap_compile_args() {
        let line = shell_line(&icuwrap_vars().compile_args().unwrap());
        insta::assert_snapshot!(line, @"`xml2-config --cflags` `icu-config --cppflags` -I/usr/include/lua5.1 -Wfatal-errors -Wswitch-default -Wswitch-enum -Wunused-parameter -Wfloat-equal -Wundef -pedantic -Wall -Wextra -DLUA_EXTERN -I../../../icuwrap/src");
    }
}
