//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `shopdoc_core` linkage and the configured database end to end.
//! - Keep output deterministic for quick local sanity checks.

use log::info;
use shopdoc_core::db::migrations::latest_version;
use shopdoc_core::db::open_db;
use shopdoc_core::{
    CoreConfig, OrderService, ProductService, SqliteOrderStore, SqliteProductStore,
};
use std::process::ExitCode;

const PROBE_PAGE_SIZE: i64 = 20;

fn main() -> ExitCode {
    println!("shopdoc_core ping={}", shopdoc_core::ping());
    println!("shopdoc_core version={}", shopdoc_core::core_version());

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("shopdoc_cli error={message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let config = CoreConfig::from_env().map_err(|err| err.to_string())?;
    if let Some(log_dir) = config.log_dir.as_deref() {
        shopdoc_core::init_logging(config.log_level, log_dir)?;
    }

    let conn = open_db(&config.db_path).map_err(|err| err.to_string())?;
    info!(
        "event=cli_probe module=cli status=start db_path={}",
        config.db_path.display()
    );
    println!("schema_version={}", latest_version());

    let products = ProductService::new(
        SqliteProductStore::try_new(&conn).map_err(|err| err.to_string())?,
    );
    let orders =
        OrderService::new(SqliteOrderStore::try_new(&conn).map_err(|err| err.to_string())?);

    let product_page = products
        .list(Some(0), Some(PROBE_PAGE_SIZE))
        .map_err(|err| err.to_string())?;
    let order_page = orders
        .list(Some(0), Some(PROBE_PAGE_SIZE))
        .map_err(|err| err.to_string())?;
    println!("products_first_page={}", product_page.len());
    println!("orders_first_page={}", order_page.len());

    Ok(())
}
