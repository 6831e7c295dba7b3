//! The `export` command.

use std::fs;
use std::path::Path;
use tradebook_store::{FileStore, LocalStore};

/// Writes the stored document as pretty-printed JSON.
pub fn run(path: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let store = FileStore::open(path)?;
    let Some(doc) = store.load() else {
        return Err(format!("no document stored at {}", path.display()).into());
    };

    let pretty = serde_json::to_string_pretty(&doc)?;
    match output {
        Some(dest) => {
            fs::write(dest, pretty.as_bytes())?;
            println!("Exported document to {}", dest.display());
        }
        None => println!("{pretty}"),
    }
    Ok(())
}
