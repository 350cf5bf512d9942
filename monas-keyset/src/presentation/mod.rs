//! Command-line surface of the keyset tool.

pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::infrastructure::WireFormat;

pub use commands::run;

#[derive(Parser, Debug)]
#[command(name = "monas-keyset")]
#[command(about = "Create and manage Tink-compatible keysets", version)]
pub struct Cli {
    /// TOML config file (default: $MONAS_KEYSET_CONFIG if set).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generates and adds a new key to a keyset.
    AddKey {
        #[command(flatten)]
        io: UpdateArgs,

        /// The key template name. Run list-key-templates to get supported names.
        #[arg(long)]
        key_template: String,
    },

    /// Creates a new keyset.
    CreateKeyset {
        #[command(flatten)]
        kek: KekArgs,

        #[command(flatten)]
        output: OutputArgs,

        /// The key template name (default: from config, else AES128_GCM).
        #[arg(long)]
        key_template: Option<String>,
    },

    /// Creates a public keyset from a private keyset.
    CreatePublicKeyset {
        #[command(flatten)]
        io: UpdateArgs,
    },

    /// Deletes a specified key in a keyset.
    DeleteKey(KeyIdArgs),

    /// Disables a specified key in a keyset.
    DisableKey(KeyIdArgs),

    /// Enables a specified key in a keyset.
    EnableKey(KeyIdArgs),

    /// Lists keys in a keyset.
    ListKeyset {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        kek: KekArgs,
    },

    /// Lists all supported key templates.
    ListKeyTemplates,

    /// Promotes a specified key to primary.
    PromoteKey(KeyIdArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct KekArgs {
    /// URI of the master key protecting the keyset, e.g. local-kms:///path/to/key.
    /// If missing, keysets are read and written in cleartext.
    #[arg(long)]
    pub master_key_uri: Option<String>,

    /// Credentials file for the master key. Only valid with --master-key-uri; must exist.
    #[arg(long, requires = "master_key_uri")]
    pub credential: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// The input filename, must exist, to read the keyset from or standard input if not specified.
    #[arg(long = "in")]
    pub input: Option<PathBuf>,

    /// The input format: json or binary (case-insensitive).
    #[arg(long)]
    pub in_format: Option<WireFormat>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// The output filename, must not exist, to write the keyset to or standard output if not specified.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// The output format: json or binary (case-insensitive).
    #[arg(long)]
    pub out_format: Option<WireFormat>,
}

/// Options of every command that reads a keyset and writes a new one.
#[derive(Args, Debug, Clone, Default)]
pub struct UpdateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub kek: KekArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct KeyIdArgs {
    #[command(flatten)]
    pub io: UpdateArgs,

    /// The target key id.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub key_id: u32,
}
