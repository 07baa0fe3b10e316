//! Reading single values without a struct

use chrono::{DateTime, Utc};

fn main() -> anyhow::Result<()> {
    std::env::set_var("STARTED_AT", "1700000000");

    let port: u16 = envbind::get("PORT,default=8080", &[])?;
    let hosts: Vec<String> = envbind::get("HOSTS,default=a.local|b.local,sep=|", &[])?;
    let started_at: DateTime<Utc> = envbind::get("STARTED_AT", &["time_format=unix"])?;
    let home = envbind::get_string("HOME");

    println!("port: {port}");
    println!("hosts: {hosts:?}");
    println!("started at: {started_at}");
    println!("home: {home}");

    Ok(())
}
