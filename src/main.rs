use clap::{Parser, Subcommand};
use metastore::{BlockStoreConfig, ClusterConfig, MetaStoreConfig};
use std::error::Error;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "metastore")]
#[command(version, about = "Replicated file metadata store and its block stores", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one metadata replica
    Metastore {
        /// Cluster config file (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Index of this replica in the config's `metastores` list
        #[arg(short, long)]
        id: usize,

        /// Write logs under this directory instead of stdout
        #[arg(long)]
        log_dir: Option<PathBuf>,
    },

    /// Run one block store shard
    Blockstore {
        /// Cluster config file (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Index of this shard in the config's `blockstores` list
        #[arg(short, long)]
        id: usize,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Metastore { config, id, log_dir } => {
            let cluster = ClusterConfig::from_file(&config)?;
            let process_id = cluster.metastore_addr(id)?.to_string();
            let logger = match log_dir {
                Some(dir) => metastore::create_root_logger_for_file(dir, process_id)?,
                None => metastore::create_root_logger_for_stdout(process_id),
            };

            let _metastore = metastore::try_create_metastore(MetaStoreConfig {
                cluster,
                my_index: id,
                logger: logger.clone(),
            })
            .await?;

            tokio::signal::ctrl_c().await?;
            slog::info!(logger, "Shutting down");
        }
        Commands::Blockstore { config, id } => {
            let cluster = ClusterConfig::from_file(&config)?;
            let logger = metastore::create_root_logger_for_stdout(cluster.blockstore_addr(id)?.to_string());

            let _blockstore = metastore::try_create_blockstore(BlockStoreConfig {
                cluster,
                my_index: id,
                logger: logger.clone(),
            })
            .await?;

            tokio::signal::ctrl_c().await?;
            slog::info!(logger, "Shutting down");
        }
    }

    Ok(())
}
