//! Command-line front end for the `edgelist` binary.

use crate::error::ParseError;
use crate::formats::InputFormat;
use crate::mapping::NodeId;
use crate::session::{EdgeListParser, ParseStats};
use crate::{source, ParserConfig};
use anyhow::{Context, Result};
use clap::Parser;
use futures::StreamExt;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufWriter};
use tracing::{info, warn};

type DynReader = Box<dyn AsyncRead + Unpin + Send>;
type DynWriter = BufWriter<Box<dyn AsyncWrite + Unpin + Send>>;

#[derive(Debug, Parser)]
#[command(name = "edgelist", version, about = "Normalize an edge list into dense integer ids")]
pub struct Cli {
    /// Edge-list file to read; stdin when omitted
    pub input: Option<PathBuf>,

    /// Where to write normalized edges; stdout when omitted
    #[arg(long, value_name = "PATH")]
    pub edges: Option<PathBuf>,

    /// Where to write the label table
    #[arg(long, value_name = "PATH")]
    pub mappings: Option<PathBuf>,

    /// Comment marker characters, e.g. "#%"
    #[arg(long, value_name = "CHARS")]
    pub comment: Option<String>,

    /// Id given to the first label
    #[arg(long, value_name = "N")]
    pub id_base: Option<NodeId>,

    /// JSON parser config; replaces the environment-derived config
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// What a completed or failed run got through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub stats: ParseStats,
    pub labels: usize,
}

/// `--config` file if given, else defaults overlaid with the environment;
/// `--comment` and `--id-base` override either.
pub fn load_config(cli: &Cli) -> Result<ParserConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {:?}", path))?;
            ParserConfig::from_json(&content)?
        }
        None => ParserConfig::from_env()?,
    };

    if let Some(markers) = &cli.comment {
        config = config.with_comment_markers(markers.chars());
    }
    if let Some(id_base) = cli.id_base {
        config = config.with_id_base(id_base);
    }
    Ok(config)
}

/// Stream `input` through `parser`, writing one `"<source>\t<target>"` line
/// per edge as soon as it is produced.
///
/// I/O failures on `out` are returned as the outer error; a parse failure
/// stops the copy and comes back as the inner result, after everything
/// before it has been written.
pub async fn write_edges<R, W>(
    parser: &EdgeListParser,
    input: R,
    out: &mut W,
) -> io::Result<(ParseStats, Result<(), ParseError>)>
where
    R: AsyncRead,
    W: AsyncWrite + Unpin,
{
    let mut edges = parser.parse_stream(source::async_lines(input));
    let mut outcome = Ok(());
    while let Some(result) = edges.next().await {
        match result {
            Ok(edge) => {
                out.write_all(format!("{}\t{}\n", edge.source, edge.target).as_bytes())
                    .await?
            }
            Err(err) => {
                outcome = Err(err);
                break;
            }
        }
    }
    out.flush().await?;
    Ok((edges.stats(), outcome))
}

/// Write the current label table as `"<label>\t<id>"` lines in id order.
pub async fn write_mappings<W>(parser: &EdgeListParser, out: &mut W) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    for mapping in parser.snapshot_mappings() {
        out.write_all(format!("{}\t{}\n", mapping.label, mapping.id).as_bytes())
            .await?;
    }
    out.flush().await
}

async fn open_input(path: Option<&Path>) -> Result<DynReader> {
    match path {
        Some(path) => {
            if InputFormat::from_path(path).is_none() {
                warn!(path = %path.display(), "unrecognized extension, reading as edge list");
            }
            let file = File::open(path)
                .await
                .with_context(|| format!("Failed to open input: {:?}", path))?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(tokio::io::stdin())),
    }
}

async fn open_output(path: Option<&Path>) -> Result<DynWriter> {
    let out: Box<dyn AsyncWrite + Unpin + Send> = match path {
        Some(path) => Box::new(
            File::create(path)
                .await
                .with_context(|| format!("Failed to create output: {:?}", path))?,
        ),
        None => Box::new(tokio::io::stdout()),
    };
    Ok(BufWriter::new(out))
}

/// Run one normalization. The mapping table, when requested, is written even
/// if parsing fails, since it is valid up to the failing line.
pub async fn run(cli: &Cli) -> Result<RunSummary> {
    let config = load_config(cli)?;
    let parser = EdgeListParser::new(config);

    let input = open_input(cli.input.as_deref()).await?;
    let mut edges_out = open_output(cli.edges.as_deref()).await?;
    let (stats, outcome) = write_edges(&parser, input, &mut edges_out)
        .await
        .context("Failed to write edges")?;

    if let Some(path) = &cli.mappings {
        let mut out = open_output(Some(path)).await?;
        write_mappings(&parser, &mut out)
            .await
            .with_context(|| format!("Failed to write mappings: {:?}", path))?;
    }

    let summary = RunSummary {
        stats,
        labels: parser.mappings().len(),
    };
    info!(
        lines = stats.lines,
        edges = stats.edges,
        comments = stats.comments,
        labels = summary.labels,
        "edge list normalized"
    );
    outcome.context("Failed to parse edge list")?;
    Ok(summary)
}
