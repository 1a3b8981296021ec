//! Schema Doc CLI
//!
//! Command-line interface for scaffolding, validating and documenting
//! hyper-schema directories.

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use schemadoc::{
    generate_json, render_text, scaffold, swagger, validate_tree, Meta, Session, SwaggerOptions,
    ValidateError,
};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schemadoc")]
#[command(about = "Generate API documentation from JSON hyper-schemas")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a starter YAML schema for a resource
    Init {
        /// Resource name, singular or plural (e.g. user)
        resource: String,
    },

    /// Convert YAML schemas to JSON
    Gen {
        /// Directory containing .yml/.yaml schemas
        #[arg(long)]
        src: PathBuf,

        /// Output directory (created if missing)
        #[arg(long)]
        dst: PathBuf,
    },

    /// Check every schema is a valid draft-4 JSON Schema
    Valid {
        /// Directory containing schemas
        #[arg(long)]
        src: PathBuf,

        /// Output results as JSON (for automation)
        #[arg(long)]
        json: bool,
    },

    /// Render a plain-text API reference
    Doc {
        /// Directory containing schemas
        #[arg(long)]
        src: PathBuf,

        /// JSON file with title, base_url, headers
        #[arg(long)]
        meta: Option<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Render a Swagger 2.0 document
    Swagger {
        /// Directory containing schemas
        #[arg(long)]
        src: PathBuf,

        /// JSON file with title, base_url, version
        #[arg(long)]
        meta: Option<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Emit JSON instead of YAML
        #[arg(long)]
        json: bool,
    },

    /// Print the synthesized example of each schema
    Example {
        /// Directory containing schemas
        #[arg(long)]
        src: PathBuf,

        /// Reference to synthesize instead of the root (e.g. #/definitions/id)
        #[arg(long)]
        pointer: Option<String>,

        /// Fail on cyclic references instead of cutting them to null
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { resource } => run_init(&resource),
        Commands::Gen { src, dst } => run_gen(&src, &dst),
        Commands::Valid { src, json } => run_valid(&src, json),
        Commands::Doc { src, meta, output } => run_doc(&src, meta.as_deref(), output.as_deref()),
        Commands::Swagger {
            src,
            meta,
            output,
            json,
        } => run_swagger(&src, meta.as_deref(), output.as_deref(), json),
        Commands::Example {
            src,
            pointer,
            strict,
        } => run_example(&src, pointer.as_deref(), strict),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

/// Print an error with a usage hint and return its exit code.
fn fail(command: &str, message: impl Display, code: i32) -> u8 {
    eprintln!("Error: {}", message);
    eprintln!("Run 'schemadoc {} --help' for usage.", command);
    code as u8
}

fn load_session(command: &str, src: &Path) -> Result<Session, u8> {
    let mut session = Session::new();
    let report = session
        .load_dir(src)
        .map_err(|e| fail(command, &e, e.exit_code()))?;
    if report.loaded.is_empty() {
        warn!(src = %src.display(), "no schema documents found");
    }
    Ok(session)
}

fn emit(output: Option<&Path>, content: &str) -> Result<(), u8> {
    match output {
        Some(path) => std::fs::write(path, content).map_err(|e| {
            eprintln!("Error writing to {}: {}", path.display(), e);
            3u8
        }),
        None => {
            print!("{}", content);
            Ok(())
        }
    }
}

fn run_init(resource: &str) -> Result<(), u8> {
    if resource.trim().is_empty() {
        return Err(fail("init", "resource name is empty", 2));
    }
    print!("{}", scaffold::render(resource));
    Ok(())
}

fn run_gen(src: &Path, dst: &Path) -> Result<(), u8> {
    let written = generate_json(src, dst).map_err(|e| fail("gen", &e, e.exit_code()))?;
    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}

fn run_valid(src: &Path, json_output: bool) -> Result<(), u8> {
    match validate_tree(src) {
        Ok(()) => {
            if json_output {
                println!(r#"{{"valid":true}}"#);
            } else {
                println!("ok.");
            }
            Ok(())
        }
        Err(ValidateError::Invalid { errors }) => {
            if json_output {
                let output = serde_json::json!({
                    "valid": false,
                    "errors": errors
                });
                println!("{}", output);
            } else {
                eprintln!("Validation failed:");
                for error in errors {
                    eprintln!("  {}", error);
                }
            }
            Err(1)
        }
        Err(e) => Err(fail("valid", &e, e.exit_code())),
    }
}

fn run_doc(src: &Path, meta: Option<&Path>, output: Option<&Path>) -> Result<(), u8> {
    let meta = Meta::load(meta).map_err(|e| fail("doc", &e, e.exit_code()))?;
    let session = load_session("doc", src)?;
    emit(output, &render_text(&session, &meta))
}

fn run_swagger(
    src: &Path,
    meta: Option<&Path>,
    output: Option<&Path>,
    json_output: bool,
) -> Result<(), u8> {
    let meta = Meta::load(meta).map_err(|e| fail("swagger", &e, e.exit_code()))?;
    let session = load_session("swagger", src)?;
    let document = swagger::convert(&session, &SwaggerOptions::from_meta(&meta));

    let rendered = if json_output {
        serde_json::to_string_pretty(&document)
            .map(|s| s + "\n")
            .map_err(|e| e.to_string())
    } else {
        serde_yaml::to_string(&document).map_err(|e| e.to_string())
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;

    emit(output, &rendered)
}

fn run_example(src: &Path, pointer: Option<&str>, strict: bool) -> Result<(), u8> {
    let session = load_session("example", src)?;

    let mut found = false;
    for root in session.roots() {
        let target = match pointer {
            Some(reference) => match root.resolve(reference) {
                Some(target) => target,
                None => continue,
            },
            None => root,
        };
        found = true;

        let value = if strict {
            target
                .try_example_value()
                .map_err(|e| fail("example", &e, e.exit_code()))?
        } else {
            target.example_value()
        };
        let rendered = serde_json::to_string_pretty(&value).map_err(|e| {
            eprintln!("Error serializing output: {}", e);
            2u8
        })?;
        println!("# {}", target.location());
        println!("{}", rendered);
    }

    match pointer {
        Some(reference) if !found => Err(fail(
            "example",
            format!("reference not found: {}", reference),
            2,
        )),
        _ => Ok(()),
    }
}
