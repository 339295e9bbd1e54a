use std::path::Path;

use donelist::db::Database;
use donelist::error::{Error, Result};

pub fn run(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(Error::io("failed to create directory"))?;
    }

    let db = Database::open(db_path)?;
    db.migrate()?;
    db.set_config("version", env!("CARGO_PKG_VERSION"))?;

    println!("Initialized donelist database at {}", db_path.display());
    Ok(())
}
