//! Module Weaver CLI
//!
//! Usage:
//!   module-weaver [OPTIONS] [TEMPLATE]
//!
//! Options:
//!   -m, --modules <DIR>        Directory containing module files
//!   -c, --config <FILE>        Configuration file (TOML format)
//!       --dump <MODULE_FILE>   Parse a module file and print its summary
//!       --strict               Exit with status 2 if any warning was reported
//!   -h, --help                 Print help

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use module_weaver::{parse_module, weave, ModuleRegistry, WeaverConfig};

#[derive(Parser)]
#[command(name = "module-weaver")]
#[command(about = "Splice shader module code into shader templates")]
struct Cli {
    /// Template file (reads from stdin if not provided)
    template: Option<PathBuf>,

    /// Directory containing module files
    #[arg(short, long)]
    modules: Option<PathBuf>,

    /// Configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Parse a single module file and print its summary
    #[arg(long, value_name = "MODULE_FILE")]
    dump: Option<PathBuf>,

    /// Exit with status 2 if any warning was reported
    #[arg(long)]
    strict: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match WeaverConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                process::exit(1);
            }
        },
        None => WeaverConfig::default(),
    };
    if let Some(dir) = &cli.modules {
        config = config.with_modules_dir(dir);
    }

    if let Some(path) = &cli.dump {
        dump_module(path, &config);
        return;
    }

    let template = match &cli.template {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    process::exit(1);
                }
            }
        }
    };

    let mut registry = ModuleRegistry::with_config(config);
    let woven = weave(&template, &mut registry);
    println!("{}", woven.text());

    if cli.strict && !woven.is_clean() {
        eprintln!("{} warning(s) reported", woven.warnings.len());
        process::exit(2);
    }
}

fn dump_module(path: &Path, config: &WeaverConfig) {
    let source = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path.display(), e);
            process::exit(1);
        }
    };

    match parse_module(&config.module_name(path), &source) {
        Ok(module) => println!("{}", module),
        Err(e) => {
            eprint!("{}", e.format(&source, &path.display().to_string()));
            process::exit(1);
        }
    }
}
