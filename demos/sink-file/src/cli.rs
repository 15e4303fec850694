#[derive(clap::Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the JSON host configuration; its "file_sink" section may set "path"
    #[clap(short, long, env = "LOGSHIP_CONFIG", value_name = "PATH")]
    pub config: Option<std::path::PathBuf>,

    /// Path to the output file when the configuration names none (can also be set via FILE_SINK_PATH env var)
    #[clap(
        short,
        long,
        env = "FILE_SINK_PATH",
        default_value = "/tmp/logship-sink.log"
    )]
    pub log_file: std::path::PathBuf,

    /// Application name stamped on entries that carry none.
    #[clap(long, default_value = "sink-file")]
    pub app: String,

    /// Enable verbose informational messages.
    #[clap(long)]
    pub verbose: bool,
}

impl Args {
    pub fn config(&self) -> Option<&std::path::Path> {
        self.config.as_deref()
    }

    pub fn log_file(&self) -> &std::path::Path {
        &self.log_file
    }
}
