//! `bdecode` command-line tool: decodes a bencoded file and prints the tree.

use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use bdecode::bencode::{decode_with, DecodeOptions, DuplicateKeys, KeyOrder, Representation};
use bdecode::constants::DEFAULT_MAX_DEPTH;
use bdecode::load::load_file;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Bencoded file to decode (for example a .torrent file)
    #[arg(value_name = "FILE")]
    path: PathBuf,

    /// Decode without copying byte strings out of the file buffer
    #[arg(long, action = ArgAction::SetTrue)]
    borrowed: bool,

    /// Accept canonical bencode only (sorted unique keys, no leading zeros)
    #[arg(long, action = ArgAction::SetTrue)]
    strict: bool,

    /// Require dictionary keys in ascending order
    #[arg(long, action = ArgAction::SetTrue)]
    sorted_keys: bool,

    /// How to treat a dictionary key that appears twice (default: reject)
    #[arg(long, value_enum, conflicts_with_all = ["strict", "sorted_keys"])]
    duplicate_keys: Option<DuplicatePolicy>,

    /// Maximum list/dictionary nesting depth
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Print the tree on a single line
    #[arg(long, action = ArgAction::SetTrue)]
    compact: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

// Keeps clap out of the library's `DuplicateKeys`.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum DuplicatePolicy {
    Reject,
    FirstWins,
    LastWins,
}

impl From<DuplicatePolicy> for DuplicateKeys {
    fn from(policy: DuplicatePolicy) -> Self {
        match policy {
            DuplicatePolicy::Reject => DuplicateKeys::Reject,
            DuplicatePolicy::FirstWins => DuplicateKeys::FirstWins,
            DuplicatePolicy::LastWins => DuplicateKeys::LastWins,
        }
    }
}

impl Cli {
    fn decode_options(&self) -> DecodeOptions {
        // Sorted keys already reject repeats, so a duplicate policy only
        // applies without --strict or --sorted-keys.
        let base = if self.strict {
            DecodeOptions::strict()
        } else {
            let policy = self.duplicate_keys.map_or(DuplicateKeys::Reject, Into::into);
            DecodeOptions::default().with_duplicate_keys(policy)
        };
        let base = if self.sorted_keys {
            base.with_key_order(KeyOrder::Ascending)
        } else {
            base
        };
        let representation = if self.borrowed {
            Representation::Borrowed
        } else {
            Representation::Owned
        };
        base.with_max_depth(self.max_depth)
            .with_representation(representation)
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = cli.decode_options();
    let rendered = match options.representation {
        Representation::Borrowed => {
            let data = std::fs::read(&cli.path)
                .with_context(|| format!("failed to read {}", cli.path.display()))?;
            let value = decode_with(&data, &options)
                .with_context(|| format!("failed to decode {}", cli.path.display()))?;
            render(&value, cli.compact)
        }
        Representation::Owned => {
            let value = load_file(&cli.path, &options)?;
            render(&value, cli.compact)
        }
    };

    println!("{}", rendered);
    Ok(())
}

fn render(value: &bdecode::Value<'_>, compact: bool) -> String {
    if compact {
        value.to_string()
    } else {
        format!("{:#}", value)
    }
}
