use std::path::Path;

use donelist::error::Result;
use donelist::web::{self, ServeOptions};

pub fn run(db_path: &Path, options: &ServeOptions) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()
        .map_err(donelist::error::Error::io("failed to start runtime"))?;
    runtime.block_on(web::serve(db_path, options))
}
