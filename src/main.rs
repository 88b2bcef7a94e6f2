/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use anyhow::{ensure, Result};
use clap::Parser;
use dsi_progress_logger::prelude::*;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use webgraph::prelude::BvGraph;
use webgraph::traits::RandomAccessGraph;
use webgraph_ppr::algo::ppr::*;
use webgraph_ppr::utils::{load_arc_list, Threads};

/// The format of the input graph.
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default)]
enum GraphFormat {
    /// A compressed graph, given by its basename.
    #[default]
    Bv,
    /// A text file with one arc per line.
    Arcs,
}

#[derive(Parser, Debug)]
#[command(
    name = "webgraph-ppr",
    about = "Computes approximate personalized PageRank vectors from a set of sources.",
    long_about = None
)]
struct CliArgs {
    /// The basename of the graph (or the path of the arc list).
    basename: PathBuf,

    #[arg(long, value_enum, default_value_t = GraphFormat::Bv)]
    /// The format of the graph.
    format: GraphFormat,

    #[arg(long)]
    /// The precomputed PPR vectors of the nodes [default: BASENAME.ppr].
    index: Option<PathBuf>,

    #[arg(long, default_value_t = PprConfig::DEFAULT_NITERS)]
    /// The number of push iterations.
    niters: usize,

    #[arg(short, long, default_value_t = PprConfig::DEFAULT_THRESHOLD)]
    /// Mass at or below this value is not propagated.
    threshold: f64,

    #[arg(long)]
    /// A file containing the number of sources followed by the sources; if
    /// missing, every node is a source.
    sources_file: Option<PathBuf>,

    #[arg(long, default_value_t = 1000)]
    /// The maximum number of sources read from the source file.
    num_sources: usize,

    #[arg(long)]
    /// Do not use precomputed PPR vectors.
    no_index: bool,

    #[arg(long, default_value_t = TopKWriter::DEFAULT_K)]
    /// The number of entries of each vector written by --save-prefix.
    topk: usize,

    #[arg(long)]
    /// Store the resulting vectors in quantized form in PREFIX.ppr.
    bin_prefix: Option<PathBuf>,

    #[arg(long)]
    /// Store the largest entries of each resulting vector in PREFIX.topk.
    save_prefix: Option<PathBuf>,

    #[arg(short = 'j', long)]
    /// The number of threads [default: the number of available cores].
    num_threads: Option<usize>,

    #[arg(long)]
    /// The minimum number of nodes processed by a parallel task.
    granularity: Option<usize>,
}

fn with_extension(prefix: &std::path::Path, extension: &str) -> PathBuf {
    let mut path = prefix.as_os_str().to_owned();
    path.push(".");
    path.push(extension);
    path.into()
}

fn main() -> Result<()> {
    let args = CliArgs::parse();

    stderrlog::new()
        .verbosity(2)
        .timestamp(stderrlog::Timestamp::Second)
        .init()?;

    ensure!(
        args.threshold >= 0.0,
        "The threshold must be nonnegative, got {}",
        args.threshold
    );

    match args.format {
        GraphFormat::Bv => {
            log::info!("Loading the graph from {}", args.basename.display());
            let start = Instant::now();
            let graph = BvGraph::with_basename(&args.basename).load()?;
            run(&graph, &args, start.elapsed())
        }
        GraphFormat::Arcs => {
            log::info!("Loading the arc list from {}", args.basename.display());
            let start = Instant::now();
            let graph = load_arc_list(&args.basename)?;
            run(&graph, &args, start.elapsed())
        }
    }
}

fn run<G: RandomAccessGraph + Sync>(graph: &G, args: &CliArgs, load_time: Duration) -> Result<()> {
    let num_nodes = graph.num_nodes();
    log::info!(
        "Loaded a graph with {} nodes and {} arcs in {:.3} seconds",
        num_nodes,
        graph.num_arcs(),
        load_time.as_secs_f64()
    );
    let mut pl = progress_logger![display_memory = true];
    let threads = Threads::from(args.num_threads).build();

    let sources = args
        .sources_file
        .as_ref()
        .map(|path| SourceSet::load(path, args.num_sources))
        .transpose()?;
    match &sources {
        Some(sources) => log::info!("{} sources", sources.len()),
        None => log::info!("Every node is a source"),
    }

    let config = PprConfig::default()
        .with_threshold(args.threshold)
        .with_niters(args.niters)
        .with_no_index(args.no_index)
        .with_sources(sources);

    let mut records = if config.no_index {
        vec![VertexRecord::default(); num_nodes]
    } else {
        let index = args
            .index
            .clone()
            .unwrap_or_else(|| with_extension(&args.basename, "ppr"));
        let start = Instant::now();
        let records = load_records(&index, Encoding::Quantized, Some(num_nodes))?;
        log::info!(
            "Loaded the index in {:.3} seconds",
            start.elapsed().as_secs_f64()
        );
        records
    };

    let mut ppr = MultiSourcePpr::new(graph, &config);
    if let Some(granularity) = args.granularity {
        ppr = ppr.with_granularity(granularity);
    }
    ppr.run(&mut records, &threads, &mut pl)?;

    let start = Instant::now();
    if let Some(prefix) = &args.bin_prefix {
        save_records(with_extension(prefix, "ppr"), &records, Encoding::Quantized)?;
    }
    if let Some(prefix) = &args.save_prefix {
        TopKWriter::new(args.topk).store(with_extension(prefix, "topk"), &records, &mut pl)?;
    }
    if args.bin_prefix.is_some() || args.save_prefix.is_some() {
        log::info!(
            "Saved the results in {:.3} seconds",
            start.elapsed().as_secs_f64()
        );
    }

    Ok(())
}
