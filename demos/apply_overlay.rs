//! Usage: `cargo run --example apply_overlay -- demos/data/web.config demos/data/web.release.config`

use clap::Parser;
use std::env;
use std::fs;
use std::path::PathBuf;
use xmloverlay::{Document, Transformer, TransformerConfig};

#[derive(Parser, Debug)]
#[command(version, about = "Applies an overlay transform to an XML file", long_about = None)]
struct Args {
    /// The document to transform
    target: PathBuf,

    /// The transform document
    transform: PathBuf,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Indentation added for each nesting level of inserted elements
    #[arg(long, default_value = "  ")]
    indent: String,

    /// Directive namespace URI
    #[arg(long)]
    namespace: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if env::var("RUST_LOG").is_err() {
        unsafe {
            env::set_var("RUST_LOG", "xmloverlay=info");
        }
    }
    env_logger::init();

    let args = Args::parse();

    let mut config = TransformerConfig::default().with_indent_unit(args.indent);
    if let Some(namespace) = args.namespace {
        config = config.with_directive_namespace(namespace);
    }

    let target_source = fs::read_to_string(&args.target)?;
    let transform_source = fs::read_to_string(&args.transform)?;

    let mut target = Document::parse(&target_source)?;
    Transformer::with_config(config).apply(&mut target, &transform_source)?;

    match args.output {
        Some(path) => {
            fs::write(&path, target.to_xml())?;
            eprintln!("✓ Wrote {}", path.display());
        }
        None => println!("{}", target),
    }
    Ok(())
}
