use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Convert exported HTML tables into SQL INSERT statements",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Convert an HTML table export into SQL INSERT statements
    Run(RunArgs),
    /// Repair table markup with missing </tr> tags
    Repair(RepairArgs),
    /// Preview the parsed table as formatted text
    Preview(PreviewArgs),
    /// Export the parsed table as CSV
    Export(ExportArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Input HTML file ('-' for stdin); interactive menu when omitted
    pub input: Option<PathBuf>,
    /// Output SQL file; prompted for in interactive mode
    pub output: Option<PathBuf>,
    /// Tenant/subdomain label prepended as a constant column to every row
    #[arg(short, long)]
    pub tenant: Option<String>,
    /// Target table name (overrides the schema's table name)
    #[arg(long)]
    pub table: Option<String>,
    /// Schema YAML describing the target table (embedded default if omitted)
    #[arg(short, long)]
    pub schema: Option<PathBuf>,
    /// Emit a CREATE TABLE block before the INSERT statements
    #[arg(long = "create-table")]
    pub create_table: bool,
    /// Write NOW() into the record-creation and form-submission fields
    #[arg(long = "stamp-now")]
    pub stamp_now: bool,
    /// Skip the interactive confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct RepairArgs {
    /// Input HTML file to repair ('-' for stdin)
    #[arg(short, long)]
    pub input: PathBuf,
    /// Output file (defaults to <input>_fixed.<ext>)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Input HTML file to preview ('-' for stdin)
    #[arg(short, long)]
    pub input: PathBuf,
    /// Number of data rows to display
    #[arg(long, default_value_t = 5)]
    pub rows: usize,
    /// Number of leading columns to display (0 = all)
    #[arg(long, default_value_t = 8)]
    pub columns: usize,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Input HTML file to convert ('-' for stdin)
    #[arg(short, long)]
    pub input: PathBuf,
    /// Destination CSV file ('-' for stdout)
    #[arg(short, long)]
    pub output: PathBuf,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}
