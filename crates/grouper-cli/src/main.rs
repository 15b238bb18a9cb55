mod tabular;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use grouper_core::config::AliasConfig;
use grouper_core::fuzzy::PairScore;
use grouper_core::{GrouperConfig, Resolver, extract};

use crate::tabular::{Format, default_output_path, read_table, write_table};

#[derive(Parser)]
#[command(name = "grouper", about = "Locality entity resolution for specimen records")]
struct Cli {
    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Group the localities of a CSV/TSV table and write the key table
    Resolve {
        /// Input table (.csv or .tsv)
        input: PathBuf,

        /// Output path (default: <input-stem>-key.<ext> beside the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the discovered alias map as JSON
        #[arg(long)]
        aliases_out: Option<PathBuf>,

        /// Override the locality column name
        #[arg(long)]
        locality_column: Option<String>,

        /// Override the grouping-key column name
        #[arg(long)]
        key_column: Option<String>,

        /// Override the cluster similarity threshold
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Print the normalized form and distance/direction signature of each text
    Normalize {
        #[arg(required = true)]
        texts: Vec<String>,
    },

    /// Report whether two tokens would be aliased by the fuzzy matcher
    AliasCheck {
        /// Candidate variant token
        original: String,
        /// Candidate canonical token
        canonical: String,
    },
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Resolve {
            input,
            output,
            config,
            aliases_out,
            locality_column,
            key_column,
            threshold,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(column) = locality_column {
                config.columns.locality = column.clone();
            }
            if let Some(column) = key_column {
                config.columns.key = column.clone();
            }
            if let Some(threshold) = threshold {
                config.cluster.similarity_threshold = *threshold;
            }
            cmd_resolve(config, input, output.as_deref(), aliases_out.as_deref())
        }
        Commands::Normalize { texts } => cmd_normalize(texts),
        Commands::AliasCheck {
            original,
            canonical,
        } => cmd_alias_check(original, canonical),
    }
}

fn load_config(path: Option<&Path>) -> Result<GrouperConfig> {
    let Some(path) = path else {
        return Ok(GrouperConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    GrouperConfig::from_toml_str(&text)
        .with_context(|| format!("invalid config {}", path.display()))
}

fn cmd_resolve(
    config: GrouperConfig,
    input: &Path,
    output: Option<&Path>,
    aliases_out: Option<&Path>,
) -> Result<()> {
    let format = Format::from_path(input)?;
    let output = output.map_or_else(|| default_output_path(input, format), Path::to_path_buf);
    let output_format = Format::from_path(&output)?;

    let resolver = Resolver::new(config).context("invalid configuration")?;
    let table = read_table(input, format)?;
    let resolved = resolver
        .resolve_table(&table)
        .with_context(|| format!("failed to resolve {}", input.display()))?;

    write_table(&output, output_format, &resolved.table)?;

    if let Some(path) = aliases_out {
        let json = resolved
            .resolution
            .aliases
            .to_json()
            .context("failed to serialize alias map")?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    let stats = &resolved.resolution.stats;
    println!(
        "{} records, {} locality groups, {} clusters ({} split), {} aliases, {} null, {} anchored -> {}",
        table.len(),
        stats.groups,
        stats.clusters,
        stats.split_clusters,
        stats.aliases,
        stats.nulls,
        stats.anchored,
        output.display()
    );
    Ok(())
}

fn cmd_normalize(texts: &[String]) -> Result<()> {
    let normalizer = grouper_core::Normalizer::default();
    for text in texts {
        let normalized = normalizer.normalize(Some(text));
        let signature = extract(&normalized);
        if signature.is_empty() {
            println!("{normalized}");
        } else {
            println!("{normalized}\t[{signature}]");
        }
    }
    Ok(())
}

fn cmd_alias_check(original: &str, canonical: &str) -> Result<()> {
    let config = AliasConfig::default();
    let original = original.to_lowercase();
    let canonical = canonical.to_lowercase();
    let score = PairScore::compute(&original, &canonical, &config);

    println!("Original length:  {}", original.chars().count());
    println!("Canonical length: {}", canonical.chars().count());
    println!("Length ratio:     {:.2}", score.length_ratio);
    println!("Fuzzy similarity: {:.2}", score.ratio);
    println!("Threshold:        {:.2}", score.threshold);
    if score.is_match(&config) {
        println!("aliasing would occur: {original} -> {canonical}");
    } else {
        println!("aliasing would not occur");
    }
    Ok(())
}
