mod config;
mod server;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Result};
use argh::FromArgs;
use stackmap::{find_sourcemaps, load_sourcemap, MapSet, StackFrame};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;

/// Utility for symbolicating JavaScript stack traces with source maps.
#[derive(FromArgs, Debug)]
struct Cli {
    /// path to a TOML config file
    #[argh(option)]
    config: Option<PathBuf>,
    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs, Debug)]
#[argh(subcommand)]
enum Command {
    Resolve(ResolveArgs),
    Serve(ServeArgs),
    Lookup(LookupArgs),
    Dump(DumpArgs),
}

/// Read a stack trace as JSON from stdin and print the resolved frames.
#[derive(FromArgs, Debug)]
#[argh(subcommand, name = "resolve")]
struct ResolveArgs {
    /// the directory to search for source maps
    #[argh(positional)]
    root: Option<PathBuf>,
    /// a path prefix to skip while searching
    #[argh(option, short = 'i')]
    ignore: Vec<String>,
}

/// Serve the exception symbolication endpoint over HTTP.
#[derive(FromArgs, Debug)]
#[argh(subcommand, name = "serve")]
struct ServeArgs {
    /// the directory to search for source maps
    #[argh(positional)]
    root: Option<PathBuf>,
    /// a path prefix to skip while searching
    #[argh(option, short = 'i')]
    ignore: Vec<String>,
    /// the address to listen on
    #[argh(option)]
    listen: Option<String>,
}

/// Look up a single position in a source map.
#[derive(FromArgs, Debug)]
#[argh(subcommand, name = "lookup")]
struct LookupArgs {
    /// the source map to process
    #[argh(positional)]
    sourcemap: PathBuf,
    /// the 0 indexed line number
    #[argh(option, short = 'L')]
    line0: Option<u32>,
    /// the 1 indexed line number
    #[argh(option, short = 'l')]
    line: Option<u32>,
    /// the 0 indexed column number
    #[argh(option, short = 'C')]
    column0: Option<u32>,
    /// the 1 indexed column number
    #[argh(option, short = 'c')]
    column: Option<u32>,
}

impl LookupArgs {
    /// Returns the 1 indexed line and the 0 indexed column
    fn lookup_pos(&self) -> Result<(u32, u32)> {
        let line = match (self.line0, self.line) {
            (Some(line0), _) => match line0.checked_add(1) {
                Some(line) => line,
                None => bail!("line {line0} out of range"),
            },
            (None, Some(line)) => line,
            (None, None) => 1,
        };
        let column = match (self.column0, self.column) {
            (Some(column0), _) => column0,
            (None, Some(column)) => column.saturating_sub(1),
            (None, None) => bail!("no column given"),
        };
        Ok((line, column))
    }
}

/// Print the decoded mapping table of a source map.
#[derive(FromArgs, Debug)]
#[argh(subcommand, name = "dump")]
struct DumpArgs {
    /// the source map to process
    #[argh(positional)]
    sourcemap: PathBuf,
}

fn discover(config: &Config, root: Option<PathBuf>, ignore: &[String]) -> Result<MapSet> {
    let root = config.root(root.as_deref());
    let ignore = config.ignore(ignore);
    let maps = find_sourcemaps(&root, &ignore)?;
    info!(root = %root.display(), count = maps.len(), "loaded sourcemaps");
    Ok(maps)
}

fn resolve(config: &Config, args: ResolveArgs) -> Result<()> {
    let maps = discover(config, args.root, &args.ignore)?;

    print!("Enter Stacktrace JSON: ");
    io::stdout().flush()?;
    let mut raw = String::new();
    io::stdin().lock().read_line(&mut raw)?;
    if raw.trim().is_empty() {
        bail!("no stack trace given");
    }

    let trace = StackFrame::parse_trace(&raw)?;
    for frame in maps.resolve_all(&trace)? {
        println!("    {frame}");
    }
    Ok(())
}

fn lookup(args: LookupArgs) -> Result<()> {
    let sm = load_sourcemap(&args.sourcemap)?;
    println!("source map path: {:?}", args.sourcemap);

    let (line, column) = args.lookup_pos()?;
    println!("lookup line: {line}, column: {column}:");
    let token = sm.lookup_token(line, column)?;
    if let Some(name) = token.get_name() {
        println!("  name: {name:?}");
    } else {
        println!("  name: not found");
    }
    if let Some(source) = token.get_source() {
        println!("  source file: {source:?}");
    } else {
        println!("  source file: not found");
    }
    println!("  source line: {}", token.get_src_line());
    println!("  source column: {}", token.get_src_col());
    println!("  minified line: {}", token.get_dst_line());
    println!("  minified column: {}", token.get_dst_col());
    Ok(())
}

fn dump(args: DumpArgs) -> Result<()> {
    let sm = load_sourcemap(&args.sourcemap)?;
    for line in sm.get_table().lines() {
        println!("{line}");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args: Cli = argh::from_env();
    let config = Config::load(args.config.as_deref())?;

    match args.command {
        Command::Resolve(args) => resolve(&config, args),
        Command::Serve(args) => {
            let listen = config.listen(args.listen.as_deref());
            let maps = discover(&config, args.root, &args.ignore)?;
            server::run_server(maps, &listen).await
        }
        Command::Lookup(args) => lookup(args),
        Command::Dump(args) => dump(args),
    }
}
