//! SynfulCircuit - cached connectivity queries over synaptic link tables
//!
//! Main entry point for the `synful` CLI.

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process;
use synfulcircuit::cache::LinkCache;
use synfulcircuit::config::{validate_config_result, CircuitConfig};
use synfulcircuit::graph::{DirectedWeightedGraph, LinkRecord, SegmentId};
use synfulcircuit::style;

/// synful - query synaptic partners from a link database
#[derive(Parser, Debug)]
#[command(name = "synful")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: ~/.config/synful/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the SQLite link database
    #[arg(long, env = "SYNFUL_DB", global = true)]
    db: Option<PathBuf>,

    /// Name of the link table
    #[arg(long, global = true)]
    table: Option<String>,

    /// Minimum synapse score to keep a link (0 disables)
    #[arg(long, global = true)]
    score_threshold: Option<f64>,

    /// Keep links whose pre and post segment are the same
    #[arg(long, global = true)]
    keep_autapses: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone, Copy)]
struct PartnerArgs {
    /// Maximum number of partners to return
    #[arg(short = 'k', long)]
    top_k: Option<usize>,

    /// Minimum number of synapses for a partner to count
    #[arg(short, long)]
    weight_threshold: Option<u32>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the strongest upstream (pre-synaptic) partners of a segment
    Upstream {
        /// Segment id
        id: SegmentId,

        #[command(flatten)]
        partners: PartnerArgs,
    },

    /// List the strongest downstream (post-synaptic) partners of a segment
    Downstream {
        /// Segment id
        id: SegmentId,

        #[command(flatten)]
        partners: PartnerArgs,
    },

    /// List synaptic links of a segment
    Links {
        /// Segment id
        id: SegmentId,

        /// Only links between the segment and this partner (either direction)
        #[arg(short, long)]
        partner: Option<SegmentId>,

        /// Exclude links where the segment is post-synaptic
        #[arg(long)]
        no_input: bool,

        /// Exclude links where the segment is pre-synaptic
        #[arg(long)]
        no_output: bool,
    },

    /// Print the weighted connectivity graph around the given segments
    Graph {
        /// Segment ids to build the graph from
        #[arg(required = true)]
        ids: Vec<SegmentId>,

        /// Minimum edge weight
        #[arg(short, long, default_value = "0")]
        weight_threshold: u32,
    },

    /// Print the subcircuit of a segment and its top partners
    Subcircuit {
        /// Segment id
        id: SegmentId,

        #[command(flatten)]
        partners: PartnerArgs,
    },

    /// Print input and output synapse locations of a segment
    Sites {
        /// Segment id
        id: SegmentId,
    },

    /// Write a config file from the current settings
    InitConfig {
        /// Destination (default: ~/.config/synful/config.yaml)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
}

fn main() {
    if let Err(e) = synfulcircuit::logging::init() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", style::error("Error:"), e);
        process::exit(1);
    }
}

/// Load the config file and apply command-line overrides
fn resolve_config(cli: &Cli) -> synfulcircuit::Result<CircuitConfig> {
    let mut config = match &cli.config {
        Some(path) => CircuitConfig::load(path)?,
        None if CircuitConfig::default_path().exists() => CircuitConfig::load_default()?,
        None => CircuitConfig::default(),
    };

    if let Some(db) = &cli.db {
        config.store.path = db.clone();
    }
    if let Some(table) = &cli.table {
        config.store.table = table.clone();
    }
    if let Some(threshold) = cli.score_threshold {
        config.filters.score_threshold = threshold;
    }
    if cli.keep_autapses {
        config.filters.filter_autapses = false;
    }

    validate_config_result(&config)?;
    Ok(config)
}

fn run(cli: Cli) -> synfulcircuit::Result<()> {
    let config = resolve_config(&cli)?;

    if let Commands::InitConfig { path } = &cli.command {
        let path = path.clone().unwrap_or_else(CircuitConfig::default_path);
        config.save(&path)?;
        println!("{} {}", style::success("Wrote"), style::path(&path.display().to_string()));
        return Ok(());
    }

    let mut cache = LinkCache::from_config(&config)?;
    let partner_defaults = |args: PartnerArgs| {
        (
            args.top_k.unwrap_or(config.queries.top_k),
            args.weight_threshold.unwrap_or(config.queries.weight_threshold),
        )
    };

    match cli.command {
        Commands::Upstream { id, partners } => {
            let (top_k, weight_threshold) = partner_defaults(partners);
            let ids = cache.upstream_partners(id, top_k, weight_threshold)?;
            let graph = cache.links_to_graph(None, weight_threshold)?;
            print_partners(
                &format!("Upstream partners of {}", id),
                &ids,
                |p| graph.edge_weight(p, id),
                cli.json,
            )
        }
        Commands::Downstream { id, partners } => {
            let (top_k, weight_threshold) = partner_defaults(partners);
            let ids = cache.downstream_partners(id, top_k, weight_threshold)?;
            let graph = cache.links_to_graph(None, weight_threshold)?;
            print_partners(
                &format!("Downstream partners of {}", id),
                &ids,
                |p| graph.edge_weight(id, p),
                cli.json,
            )
        }
        Commands::Links {
            id,
            partner,
            no_input,
            no_output,
        } => {
            let links = cache.synaptic_links(id, partner, !no_input, !no_output)?;
            print_links(&links, config.filters.score_threshold, cli.json)
        }
        Commands::Graph {
            ids,
            weight_threshold,
        } => {
            let graph = cache.links_to_graph(Some(ids.as_slice()), weight_threshold)?;
            print_graph(&graph, cli.json)
        }
        Commands::Subcircuit { id, partners } => {
            let (top_k, weight_threshold) = partner_defaults(partners);
            let graph = cache.subcircuit(id, top_k, weight_threshold)?;
            print_graph(&graph, cli.json)
        }
        Commands::Sites { id } => {
            let sites = cache.synapse_sites(id)?;
            if cli.json {
                return print_json(&sites);
            }
            println!("{}", style::header(&format!("Synapse sites of {}", id)));
            println!("  input:  {}", style::count(sites.input.len()));
            for p in &sites.input {
                println!("    ({:.1}, {:.1}, {:.1})", p.x, p.y, p.z);
            }
            println!("  output: {}", style::count(sites.output.len()));
            for p in &sites.output {
                println!("    ({:.1}, {:.1}, {:.1})", p.x, p.y, p.z);
            }
            Ok(())
        }
        Commands::InitConfig { .. } => Ok(()),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> synfulcircuit::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Serialize)]
struct Partner {
    segment_id: SegmentId,
    weight: u32,
}

fn print_partners(
    title: &str,
    ids: &[SegmentId],
    weight_of: impl Fn(SegmentId) -> Option<u32>,
    json: bool,
) -> synfulcircuit::Result<()> {
    let partners = ids
        .iter()
        .map(|&segment_id| Partner {
            segment_id,
            weight: weight_of(segment_id).unwrap_or(0),
        })
        .collect::<Vec<_>>();

    if json {
        return print_json(&partners);
    }

    println!("{}", style::header(title));
    if partners.is_empty() {
        println!("  {}", style::dim("(none)"));
    }
    for p in &partners {
        println!(
            "  {}  {} synapses",
            style::segment_id(&p.segment_id.to_string()),
            style::weight_style(p.weight)
        );
    }
    Ok(())
}

fn print_links(links: &[LinkRecord], score_threshold: f64, json: bool) -> synfulcircuit::Result<()> {
    if json {
        return print_json(links);
    }

    println!("{} ({})", style::header("Synaptic links"), style::count(links.len()));
    for (i, link) in links.iter().enumerate() {
        println!(
            "  {:>4}  {} {} {}  score {}  cleft {:.1}  pre ({:.1}, {:.1}, {:.1})  post ({:.1}, {:.1}, {:.1})",
            i,
            style::segment_id(&link.segment_id_pre.to_string()),
            style::arrow(),
            style::segment_id(&link.segment_id_post.to_string()),
            style::score_style(link.score, score_threshold),
            link.cleft_score,
            link.pre.x,
            link.pre.y,
            link.pre.z,
            link.post.x,
            link.post.y,
            link.post.z,
        );
    }
    Ok(())
}

fn print_graph(graph: &DirectedWeightedGraph, json: bool) -> synfulcircuit::Result<()> {
    if json {
        return print_json(graph);
    }

    let stats = graph.stats();
    println!(
        "{} ({} nodes, {} edges, {} synapses)",
        style::header("Connectivity graph"),
        style::count(stats.node_count),
        style::count(stats.edge_count),
        stats.total_weight
    );
    for edge in graph.edges() {
        println!(
            "  {} {} {}  weight {}",
            style::segment_id(&edge.source.to_string()),
            style::arrow(),
            style::segment_id(&edge.target.to_string()),
            style::weight_style(edge.weight)
        );
    }
    Ok(())
}
