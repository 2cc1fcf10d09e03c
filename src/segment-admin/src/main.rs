//! Segment Admin CLI — evaluate segments against a user file offline,
//! export members as CSV, and preview analysis prompts.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use segment_analysis::{AnalysisRequest, DEFAULT_SAMPLE_SIZE};
use segment_core::{Rule, Segment, User};
use segment_csv::{export_file_name, export_users, read_segments_file, read_users_file, ImportSchema};
use segment_engine::filter_users;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "segment-admin")]
#[command(about = "Segment Studio offline administration tool")]
#[command(version)]
struct Cli {
    /// CSV or JSON file with users
    #[arg(short, long, global = true, default_value = "users.csv")]
    users: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List segments in a segment file with their member counts
    List {
        /// JSON file with segment definitions
        #[arg(short, long)]
        segments: PathBuf,
    },

    /// Print the members of one segment as JSON
    Members {
        #[arg(short, long)]
        segments: PathBuf,

        /// Segment id
        #[arg(long)]
        id: String,
    },

    /// Filter users by ad-hoc rules given as a JSON array
    Filter {
        /// e.g. '[{"field":"postCount","operator":">","value":"30"}]'
        #[arg(short, long)]
        rules: String,
    },

    /// Export a segment's members as CSV
    Export {
        #[arg(short, long)]
        segments: PathBuf,

        #[arg(long)]
        id: String,

        /// Output directory (file name derives from the segment name)
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Print the analysis prompt for a segment
    Prompt {
        #[arg(short, long)]
        segments: PathBuf,

        #[arg(long)]
        id: String,

        #[arg(long, default_value_t = DEFAULT_SAMPLE_SIZE)]
        sample_size: usize,
    },
}

fn find_segment(path: &Path, id: &str) -> anyhow::Result<Segment> {
    read_segments_file(path)?
        .into_iter()
        .find(|s| s.id == id)
        .with_context(|| format!("segment '{id}' not found in {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();
    let schema = ImportSchema::default();
    let users: Vec<User> = read_users_file(&cli.users, &schema)
        .with_context(|| format!("failed to load users from {}", cli.users.display()))?;

    match cli.command {
        Commands::List { segments } => {
            for segment in read_segments_file(&segments)? {
                let members = filter_users(&users, &segment.rules);
                println!("{}\t{}\t{} members", segment.id, segment.name, members.len());
                for rule in &segment.rules {
                    println!("\t- {rule}");
                }
            }
        }

        Commands::Members { segments, id } => {
            let segment = find_segment(&segments, &id)?;
            let members = filter_users(&users, &segment.rules);
            println!("{}", serde_json::to_string_pretty(&members)?);
        }

        Commands::Filter { rules } => {
            let rules: Vec<Rule> =
                serde_json::from_str(&rules).context("rules must be a JSON array of rules")?;
            let members = filter_users(&users, &rules);
            println!("{}", serde_json::to_string_pretty(&members)?);
        }

        Commands::Export {
            segments,
            id,
            out_dir,
        } => {
            let segment = find_segment(&segments, &id)?;
            let members = filter_users(&users, &segment.rules);
            let Some(csv) = export_users(&members) else {
                bail!("No users in this segment to export.");
            };
            let path = out_dir.join(export_file_name(&segment.name));
            std::fs::write(&path, csv)?;
            info!(path = %path.display(), rows = members.len(), "Segment exported");
            println!("Wrote {} users to {}", members.len(), path.display());
        }

        Commands::Prompt {
            segments,
            id,
            sample_size,
        } => {
            let segment = find_segment(&segments, &id)?;
            let members = filter_users(&users, &segment.rules);
            let request = AnalysisRequest::new(&segment, &members, sample_size)?;
            println!("{}", request.render_prompt());
        }
    }

    Ok(())
}
