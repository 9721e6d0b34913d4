use clap::{Parser, Subcommand};
use flagstone::{probe_tools, shell_line, BuildVars, CompileCommands};
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "flagstone")]
#[command(author, version, about = "Declarative build-variable fragments for C/C++ toolchains")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the merged record for one or more fragment files
    Show {
        /// Fragment files, merged left to right
        #[arg(required = true)]
        fragments: Vec<PathBuf>,
    },

    /// Expand backtick substitutions and print the resolved record
    Resolve {
        /// Fragment files, merged left to right
        #[arg(required = true)]
        fragments: Vec<PathBuf>,
    },

    /// Print compiler or linker arguments for a record
    Flags {
        /// Fragment files, merged left to right
        #[arg(required = true)]
        fragments: Vec<PathBuf>,

        /// Print linker arguments instead of compiler arguments
        #[arg(long)]
        link: bool,

        /// Expand backtick substitutions before rendering
        #[arg(long)]
        resolve: bool,

        /// Print one shell-quoted line instead of one argument per line
        #[arg(long)]
        shell: bool,
    },

    /// Report whether the helper programs a record needs are on PATH
    Check {
        /// Fragment files, merged left to right
        #[arg(required = true)]
        fragments: Vec<PathBuf>,
    },

    /// Build a fragment from existing build metadata and print it
    Import {
        /// Read a compile_commands.json database
        #[arg(long, value_name = "FILE")]
        compile_commands: Option<PathBuf>,

        /// Only import the database entry for this source file
        #[arg(long, requires = "compile_commands", value_name = "SOURCE")]
        file: Option<PathBuf>,

        /// Read a SCons custom.py fragment
        #[arg(long, value_name = "FILE", conflicts_with = "compile_commands")]
        scons: Option<PathBuf>,

        /// Classify raw compiler arguments
        #[arg(
            trailing_var_arg = true,
            allow_hyphen_values = true,
            conflicts_with_all = ["compile_commands", "scons"]
        )]
        args: Vec<String>,
    },
}

/// Load every fragment, merge left to right, then apply FLAGSTONE_*
/// environment overrides.
fn load_merged(fragments: &[PathBuf]) -> Result<BuildVars> {
    let mut vars = BuildVars::default();
    for path in fragments {
        let loaded = BuildVars::from_file(path).into_diagnostic()?;
        vars.merge(loaded);
    }
    vars.apply_env_overrides();
    Ok(vars)
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Show { fragments } => {
            let vars = load_merged(&fragments)?;
            print!("{}", vars.to_toml_string().into_diagnostic()?);
        }

        Commands::Resolve { fragments } => {
            let vars = load_merged(&fragments)?.resolve().into_diagnostic()?;
            print!("{}", vars.to_toml_string().into_diagnostic()?);
        }

        Commands::Flags {
            fragments,
            link,
            resolve,
            shell,
        } => {
            let mut vars = load_merged(&fragments)?;
            if resolve {
                vars = vars.resolve().into_diagnostic()?;
            }

            let args = if link {
                vars.link_args().into_diagnostic()?
            } else {
                vars.compile_args().into_diagnostic()?
            };

            if shell {
                println!("{}", shell_line(&args));
            } else {
                for arg in &args {
                    println!("{}", arg);
                }
            }
        }

        Commands::Check { fragments } => {
            let vars = load_merged(&fragments)?;
            let checks = probe_tools(&vars).into_diagnostic()?;

            if checks.is_empty() {
                println!("no helper programs referenced");
                return Ok(());
            }

            let mut missing = 0;
            for check in &checks {
                match &check.path {
                    Some(path) => println!("{}: {}", check.name, path.display()),
                    None => {
                        println!("{}: MISSING", check.name);
                        missing += 1;
                    }
                }
            }
            if missing > 0 {
                return Err(miette::miette!(
                    "{} helper program(s) missing from PATH",
                    missing
                ));
            }
        }

        Commands::Import {
            compile_commands,
            file,
            scons,
            args,
        } => {
            let vars = if let Some(db_path) = compile_commands {
                let db = CompileCommands::from_file(&db_path).into_diagnostic()?;
                match file {
                    Some(source) => {
                        let cmd = db.find_command(&source).ok_or_else(|| {
                            miette::miette!("no compile command for {}", source.display())
                        })?;
                        cmd.to_build_vars().into_diagnostic()?
                    }
                    None => db.to_build_vars().into_diagnostic()?,
                }
            } else if let Some(py_path) = scons {
                BuildVars::from_scons_file(&py_path).into_diagnostic()?
            } else if args.is_empty() {
                return Err(miette::miette!(
                    "nothing to import: pass --compile-commands, --scons, or raw arguments"
                ));
            } else {
                BuildVars::from_compile_args(&args)
            };

            print!("{}", vars.to_toml_string().into_diagnostic()?);
        }
    }

    Ok(())
}
