#[derive(clap::Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the JSON host configuration (can also be set via LOGSHIP_CONFIG env var)
    #[clap(short, long, env = "LOGSHIP_CONFIG", value_name = "PATH")]
    pub config: Option<std::path::PathBuf>,

    /// Source identifier reported for data read from stdin.
    #[clap(long, default_value = "stdin")]
    pub source: String,

    /// Treat every input line as a separate datagram instead of a byte stream.
    #[clap(long)]
    pub datagram: bool,

    /// Enable verbose informational messages.
    #[clap(long)]
    pub verbose: bool,
}

impl Args {
    pub fn config(&self) -> Option<&std::path::Path> {
        self.config.as_deref()
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}
