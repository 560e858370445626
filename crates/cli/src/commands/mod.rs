use clap::Subcommand;
use diskcache::DiskCache;
use std::path::PathBuf;

pub mod entry;
pub mod maintenance;

#[derive(Subcommand)]
pub enum Commands {
    /// Print the stored bytes for a key
    Get {
        key: String,

        /// Write the bytes to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Store bytes under a key, replacing any existing entry
    #[command(group(
        clap::ArgGroup::new("source")
            .required(true)
            .args(["value", "file"]),
    ))]
    Set {
        key: String,

        /// Literal value to store
        #[arg(long)]
        value: Option<String>,

        /// Read the value from a file
        #[arg(long, value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Delete the entry for a key
    #[command(visible_alias = "rm")]
    Remove { key: String },

    /// Delete every entry
    Clear,

    /// Print the number of entries
    Count,

    /// Show entry count, sizes and the last sweep time
    Stats,

    /// Evict least recently used entries now
    Sweep,

    /// Print the file path an entry is stored at
    Path { key: String },
}

impl Commands {
    pub async fn execute(self, cache: DiskCache) -> eyre::Result<()> {
        match self {
            Commands::Get { key, output } => entry::get(&cache, &key, output.as_deref()),
            Commands::Set { key, value, file } => {
                entry::set(&cache, &key, value.as_deref(), file.as_deref())
            }
            Commands::Remove { key } => entry::remove(&cache, &key),
            Commands::Path { key } => entry::path(&cache, &key),
            Commands::Clear => maintenance::clear(&cache),
            Commands::Count => maintenance::count(&cache),
            Commands::Stats => maintenance::stats(&cache),
            Commands::Sweep => maintenance::sweep(cache).await,
        }
    }
}
