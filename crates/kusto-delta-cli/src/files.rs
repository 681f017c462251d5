use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Reads one or more script sources into a single script. A directory
/// source contributes every `.kql` file under it, in path order.
pub fn read_scripts(paths: &[PathBuf]) -> Result<String> {
    let mut scripts = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut files = collect_kql_files(path)?;
            files.sort();
            for file in files {
                scripts.push(read_file(&file)?);
            }
        } else {
            scripts.push(read_file(path)?);
        }
    }
    Ok(scripts.join("\n\n"))
}

fn collect_kql_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let entries =
        fs::read_dir(dir).with_context(|| format!("cannot read folder `{}`", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            files.extend(collect_kql_files(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "kql") {
            files.push(path);
        }
    }
    Ok(files)
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("cannot read script `{}`", path.display()))
}

pub fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("cannot create folder `{}`", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("cannot write `{}`", path.display()))
}

/// Writes a multi-file delta layout under `root`.
pub fn write_folder(root: &Path, files: &[(String, String)]) -> Result<()> {
    for (relative, contents) in files {
        write_file(&root.join(relative), contents)?;
    }
    Ok(())
}
