use crate::ast::Program;
use crate::error::TessError;
use crate::parser;
use crate::scanner;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const MODULE_EXT: &str = "tess";
pub const PACKAGE_DIR: &str = ".tess_packages";
pub const LIBRARY_DIR: &str = "SAINT";

/// Every path tried for `name`, in search order.
pub fn candidates(root: &Path, name: &str) -> Vec<PathBuf> {
    let file = format!("{}.{}", name, MODULE_EXT);
    let mut paths = vec![
        root.join(&file),
        root.join(LIBRARY_DIR).join(&file),
        root.join(LIBRARY_DIR).join(name).join(&file),
    ];
    // Nested library names (`net/http`) get one more look under SAINT.
    if name.contains('/') {
        paths.push(root.join(LIBRARY_DIR).join(&file));
    }
    paths.push(root.join(PACKAGE_DIR).join(&file));
    paths
}

/// The first candidate that exists.
pub fn resolve(root: &Path, name: &str) -> Option<PathBuf> {
    let found = candidates(root, name).into_iter().find(|path| path.is_file());
    debug!(module = name, found = ?found, "resolve module");
    found
}

/// Reads and parses a module. Parse problems do not stop the load; they are
/// logged and whatever parsed is returned.
pub fn load(path: &Path) -> Result<Program, TessError> {
    let source = fs::read_to_string(path).map_err(|source| TessError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let outcome = parser::parse(&scanner::scan_tokens(&source));
    for diagnostic in &outcome.diagnostics {
        debug!(module = %path.display(), %diagnostic, "module parse diagnostic");
    }
    Ok(outcome.program)
}
