//! Server command implementation

use std::path::Path;

use anyhow::Result;
use finsight_core::mail::MAIL_HOST_ENV;

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    allow_origin: Vec<String>,
    no_encrypt: bool,
) -> Result<()> {
    println!("🚀 Starting FinSight server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);

    if std::env::var(MAIL_HOST_ENV).is_ok() {
        println!("   📧 OTP email: ENABLED ({})", MAIL_HOST_ENV);
    } else {
        println!("   📧 OTP email: disabled (set {} to enable)", MAIL_HOST_ENV);
    }

    if allow_origin.is_empty() {
        println!("   🌐 CORS: same-origin only");
    } else {
        println!("   🌐 CORS origins: {}", allow_origin.join(", "));
    }

    if no_encrypt {
        println!("   ⚠️  Encryption DISABLED (--no-encrypt)");
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path, no_encrypt)?;

    let config = finsight_server::ServerConfig {
        allowed_origins: allow_origin,
    };

    finsight_server::serve(db, host, port, config).await?;

    Ok(())
}
