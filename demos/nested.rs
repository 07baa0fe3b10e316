//! Nested structs and prefixes

use envbind::{Bind, FromEnv, Params};

#[derive(Debug, Default, Bind)]
struct Config {
    // Reads APP_API_CORS_ORIGINS
    pub api: Api,

    // Reads APP_DB_URL, APP_DB_REPLICAS
    #[env("DB")]
    pub db: Database,
}

#[derive(Debug, Default, Bind)]
struct Api {
    pub cors: Cors,

    #[env(",default=8080")]
    pub port: u16,
}

#[derive(Debug, Default, Bind)]
struct Cors {
    #[env(",default=http://localhost:3000")]
    pub origins: Vec<String>,
}

#[derive(Debug, Default, Bind)]
struct Database {
    #[env(",required")]
    pub url: String,

    // Left as None unless APP_DB_REPLICAS is set
    #[env(",snv")]
    pub replicas: Option<Vec<String>>,
}

fn main() -> anyhow::Result<()> {
    std::env::set_var("APP_API_CORS_ORIGINS", "https://a.example,https://b.example");
    std::env::set_var("APP_DB_URL", "postgres://primary/app");

    let params = Params::default().with_prefix("APP");
    let config = Config::from_env_with(&params)?;

    println!("Configuration loaded:");
    println!("  CORS origins: {:?}", config.api.cors.origins);
    println!("  API port: {}", config.api.port);
    println!("  Database URL: {}", config.db.url);
    println!("  Replicas: {:?}", config.db.replicas);

    Ok(())
}
