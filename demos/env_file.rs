//! Loading a `.env` style file before binding

use std::io::Write;

use envbind::{Bind, FromEnv};

#[derive(Debug, Default, Bind)]
struct Config {
    #[env(",required")]
    pub api_key: String,

    #[env(",default=info")]
    pub log_level: String,
}

fn main() -> anyhow::Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(file, "API_KEY=secret")?;
    writeln!(file, "LOG_LEVEL=debug")?;

    // Variables already present in the environment are kept
    envbind::load(&[file.path()])?;

    let config = Config::from_env()?;

    println!("Configuration loaded:");
    println!("  API key: {}", config.api_key);
    println!("  Log level: {}", config.log_level);

    Ok(())
}
