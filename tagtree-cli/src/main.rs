//! tagtree CLI
//!
//! Parses a markup document into a tag tree and prints it back out as
//! markup, as an element hierarchy, as JSON, or as the raw token stream.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use owo_colors::OwoColorize;
use serde::Serialize;
use tagtree_common::net::fetch_text_with_timeout;
use tagtree_dom::{NodeId, Tree};
use tagtree_markup::{
    Dialect, ParseIssue, Segment, Serializer, TagTokenizer, TreeBuilder, hierarchy,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "TAGTREE_LOG";

#[derive(Parser)]
#[command(name = "tagtree")]
#[command(about = "Tolerant markup parser: markup in, tag tree out")]
struct Args {
    /// Path, file:// URI or http(s):// URL of the document
    #[arg(required_unless_present = "markup", conflicts_with = "markup")]
    source: Option<String>,

    /// Parse this markup string instead of reading a source
    #[arg(long)]
    markup: Option<String>,

    /// Built-in dialect
    #[arg(long, value_enum, default_value_t = DialectArg::Html)]
    dialect: DialectArg,

    /// JSON dialect description; overrides --dialect
    #[arg(long)]
    dialect_file: Option<PathBuf>,

    /// What to print
    #[arg(long, value_enum, default_value_t = Format::Markup)]
    format: Format,

    /// Indent serialized markup with this many spaces instead of a tab
    #[arg(long)]
    indent_spaces: Option<usize>,

    /// Timeout in seconds for remote documents
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Print parse issues to stderr
    #[arg(long)]
    issues: bool,

    /// More logging (-v debug, -vv trace); TAGTREE_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum DialectArg {
    Html,
    Xml,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// Re-serialized markup
    Markup,
    /// Element hierarchy without text
    Tree,
    /// JSON dump of the tree
    Json,
    /// Token and text segments, one per line
    Tokens,
}

/// JSON view of one node.
#[derive(Serialize)]
struct JsonNode<'a> {
    tag_name: &'a str,
    attributes: Vec<JsonAttribute<'a>>,
    text_blocks: Vec<&'a str>,
    children: Vec<JsonNode<'a>>,
}

#[derive(Serialize)]
struct JsonAttribute<'a> {
    name: &'a str,
    value: &'a str,
}

impl<'a> JsonNode<'a> {
    fn build(tree: &'a Tree, id: NodeId) -> Self {
        let node = &tree[id];
        Self {
            tag_name: node.tag_name(),
            attributes: node
                .attributes()
                .iter()
                .map(|attribute| JsonAttribute {
                    name: &attribute.name,
                    value: &attribute.value,
                })
                .collect(),
            text_blocks: node.text_blocks().collect(),
            children: tree
                .children(id)
                .iter()
                .map(|&child| Self::build(tree, child))
                .collect(),
        }
    }
}

fn init_logging(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_dialect(args: &Args) -> Result<Dialect> {
    if let Some(path) = &args.dialect_file {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read dialect file {}", path.display()))?;
        return Dialect::from_json(&json)
            .with_context(|| format!("invalid dialect file {}", path.display()));
    }
    Ok(match args.dialect {
        DialectArg::Html => Dialect::html(),
        DialectArg::Xml => Dialect::xml(),
    })
}

fn load_markup(args: &Args) -> Result<String> {
    if let Some(markup) = &args.markup {
        return Ok(markup.clone());
    }
    let Some(source) = &args.source else {
        bail!("no source given; pass a path, a URL or --markup");
    };
    info!(%source, "fetching document");
    fetch_text_with_timeout(source, Duration::from_secs(args.timeout))
        .with_context(|| format!("failed to load {source}"))
}

fn print_tokens(markup: &str) {
    for segment in TagTokenizer::new(markup).segments() {
        match segment {
            Segment::Text(text) => println!("{:<14}{text:?}", "text".dimmed()),
            Segment::Tag(token) if token.is_comment_marker() => {
                println!("{:<14}{}", token.kind.magenta(), token.raw);
            }
            Segment::Tag(token) => println!("{:<14}{}", token.kind.cyan(), token.raw),
        }
    }
}

fn print_issues(issues: &[ParseIssue]) {
    for issue in issues {
        let label = if issue.is_error {
            "error".red().to_string()
        } else {
            "warning".yellow().to_string()
        };
        eprintln!("{label} (token {}): {}", issue.token_index, issue.message);
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let dialect = load_dialect(&args)?;
    let markup = load_markup(&args)?;
    debug!(bytes = markup.len(), "document loaded");

    if matches!(args.format, Format::Tokens) {
        print_tokens(&markup);
        return Ok(());
    }

    let (tree, issues) = TreeBuilder::new(&markup, &dialect)
        .run_with_issues()
        .context("failed to parse document")?;
    if args.issues {
        print_issues(&issues);
    }

    match args.format {
        Format::Markup => {
            let mut serializer = Serializer::new(&dialect);
            if let Some(spaces) = args.indent_spaces {
                serializer = serializer.with_indent(" ".repeat(spaces));
            }
            print!("{}", serializer.serialize(&tree));
        }
        Format::Tree => print!("{}", hierarchy(&tree, tree.root())),
        Format::Json => {
            let json = serde_json::to_string_pretty(&JsonNode::build(&tree, tree.root()))?;
            println!("{json}");
        }
        Format::Tokens => {}
    }
    Ok(())
}
