use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// JSON report file or directory of reports to replay
    #[arg(short, long, default_value = ".")]
    pub reports_path: PathBuf,

    /// Path to a YAML policy file (scan options); when omitted, a11y.yaml is
    /// used if present, otherwise built-in defaults apply
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output results in JSON format
    #[arg(long, default_value_t = false)]
    pub json: bool,
}
