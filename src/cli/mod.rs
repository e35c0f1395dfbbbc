// CLI module for copystream
// Author: kelexine (https://github.com/kelexine)

use clap::Parser;

/// copystream - streaming AI product-copy generation server
#[derive(Parser, Debug)]
#[command(name = "copystream", version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file (defaults to ~/.copystream/config.toml)
    #[arg(long, env = "COPYSTREAM_CONFIG")]
    pub config: Option<String>,
}
