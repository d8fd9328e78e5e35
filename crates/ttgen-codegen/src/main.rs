//! ttgenc: CLI driver for the L1 small-type emitters (enum/function-reference
//! value and template classes).
//!
//! Command-line parsing, file IO, and diagnostics formatting are explicitly
//! out of scope for the core generator (§1); this binary is the thin,
//! data-driven front door around it. `ValueNode`/`TemplateNode`/
//! `ReferenceNode` are externally-owned opaque trait objects (§3), so the
//! full statement-tree/ILT path has no JSON-serialisable fixture format —
//! driving it is a real checked-AST's job, exercised here through the crate's
//! test suite instead. What *is* plain data is `EnumDef`/`FuncRefDef`, so
//! that's what this CLI deserialises and drives `codegen::program` with.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use clap::{CommandFactory, Parser as ClapParser, Subcommand};
use clap_complete::{generate, Shell};
use serde::Deserialize;

use ttgen_codegen::codegen::enums::EnumDef;
use ttgen_codegen::codegen::funcref::FuncRefDef;
use ttgen_codegen::codegen::program::{generate_module, CheckedModule};
use ttgen_codegen::CompilationUnit;
use ttgen_core::GenOptions;

#[derive(ClapParser)]
#[command(name = "ttgenc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Enum/function-reference value and template class generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate value/template classes for a JSON type-definition fixture.
    Gen {
        /// Input JSON file describing enum and function-reference types.
        input: PathBuf,

        /// Directory to write the four sinks into (stdout if omitted).
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },

    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// The JSON shape `ttgenc gen` reads: a flat list of type definitions plus
/// optional generation options (§6 config knobs).
#[derive(Deserialize)]
struct TypesFixture {
    #[serde(default)]
    enums: Vec<EnumDef>,
    #[serde(default)]
    funcrefs: Vec<FuncRefDef>,
    #[serde(default)]
    options: GenOptions,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Gen { input, out_dir } => run_gen(&input, out_dir.as_deref()),
        Commands::Completions { shell } => run_completions(shell),
    }
}

fn run_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "ttgenc", &mut io::stdout());
}

fn run_gen(input: &Path, out_dir: Option<&Path>) {
    let source = match fs::read_to_string(input) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading {}: {e}", input.display());
            process::exit(1);
        }
    };

    let fixture: TypesFixture = match serde_json::from_str(&source) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error parsing {}: {e}", input.display());
            process::exit(1);
        }
    };

    let module = CheckedModule {
        enums: fixture.enums,
        funcrefs: fixture.funcrefs,
        functions: Vec::new(),
        altsteps: Vec::new(),
        testcases: Vec::new(),
    };

    let cu = match generate_module(fixture.options, &module) {
        Ok(cu) => cu,
        Err(e) => {
            eprintln!("Error generating code: {e}");
            process::exit(1);
        }
    };

    for warning in &cu.warnings {
        eprintln!("{warning}");
    }

    match out_dir {
        Some(dir) => write_sinks(dir, &cu),
        None => print_sinks(&cu),
    }
}

fn print_sinks(cu: &CompilationUnit) {
    println!("// --- class_defs ---");
    println!("{}", cu.class_defs);
    println!("// --- methods ---");
    println!("{}", cu.methods);
    if !cu.def_glob_vars.is_empty() {
        println!("// --- def_glob_vars ---");
        println!("{}", cu.def_glob_vars);
    }
    if !cu.src_glob_vars.is_empty() {
        println!("// --- src_glob_vars ---");
        println!("{}", cu.src_glob_vars);
    }
}

fn write_sinks(dir: &Path, cu: &CompilationUnit) {
    if let Err(e) = fs::create_dir_all(dir) {
        eprintln!("Error creating {}: {e}", dir.display());
        process::exit(1);
    }
    let files: [(&str, &str); 4] = [
        ("class_defs.hh", &cu.class_defs),
        ("methods.cc", &cu.methods),
        ("def_glob_vars.hh", &cu.def_glob_vars),
        ("src_glob_vars.cc", &cu.src_glob_vars),
    ];
    for (name, content) in files {
        let path = dir.join(name);
        if let Err(e) = fs::write(&path, content) {
            eprintln!("Error writing {}: {e}", path.display());
            process::exit(1);
        }
    }
    println!("Wrote class_defs.hh, methods.cc, def_glob_vars.hh, src_glob_vars.cc to {}", dir.display());
}
