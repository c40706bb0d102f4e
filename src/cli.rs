//! CLI argument parsing.
use crate::report::OutputFormat;
use crate::scan::PackOrder;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "new-packs",
    version,
    about = "Report content packs released after a cutoff from an index archive",
    after_help = "Examples:\n  new-packs scan --entry-id 12@34 --since 2022-03-01T00:00:00Z --entries entries.json\n  new-packs scan --entry-id ./index.zip --since 2022-03-01T00:00:00Z --json\n  new-packs filter --index-dir /tmp/index --since 2022-03-01T00:00:00Z --order id",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Scan(ScanArgs),
    Filter(FilterArgs),
}

impl Command {
    pub fn common(&self) -> &CommonArgs {
        match self {
            Command::Scan(args) => &args.common,
            Command::Filter(args) => &args.common,
        }
    }
}

/// Flags shared by every command.
#[derive(Args, Debug, Default)]
pub struct CommonArgs {
    /// Ordering of the reported packs (default: directory listing order)
    #[arg(long, value_enum)]
    pub order: Option<PackOrder>,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,

    /// Config file (default: <config dir>/new-packs/config.json if present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log debug diagnostics to stderr
    #[arg(long)]
    pub verbose: bool,
}

impl CommonArgs {
    pub fn output_format(&self, configured: OutputFormat) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            configured
        }
    }
}

/// Extract an index archive and report packs created after the cutoff.
#[derive(Parser, Debug)]
#[command(about = "Extract an index archive and report new packs")]
pub struct ScanArgs {
    /// File entry id of the index archive
    #[arg(long, value_name = "ID")]
    pub entry_id: String,

    /// Cutoff timestamp, YYYY-MM-DDTHH:MM:SSZ
    #[arg(long, value_name = "TS", alias = "last-message-time-str")]
    pub since: String,

    /// JSON manifest mapping entry ids to host file entries (default: treat the id as a path)
    #[arg(long, value_name = "PATH")]
    pub entries: Option<PathBuf>,

    /// Directory to create the extraction scratch dir in
    #[arg(long, value_name = "DIR")]
    pub scratch_dir: Option<PathBuf>,

    /// Leave the extracted index on disk after the run
    #[arg(long)]
    pub keep_scratch: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Filter an already-extracted index directory.
#[derive(Parser, Debug)]
#[command(about = "Report new packs from an extracted index directory")]
pub struct FilterArgs {
    /// Extracted `index` directory holding one subdirectory per pack
    #[arg(long, value_name = "DIR")]
    pub index_dir: PathBuf,

    /// Cutoff timestamp, YYYY-MM-DDTHH:MM:SSZ
    #[arg(long, value_name = "TS", alias = "last-message-time-str")]
    pub since: String,

    #[command(flatten)]
    pub common: CommonArgs,
}
