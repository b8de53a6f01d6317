use std::fs::{remove_dir_all, write};
use std::path::PathBuf;
use tempfile::TempDir;

/// a stylesheet holding two emotes and a rule that isn't one
#[allow(dead_code)]
pub const RAGE_CSS: &str = "a[href=\"/rage1\"]{background:url(x.png)}\n.other{color:red}\na[href^='/rage2']{background:url(y.png)}";

/// integration test helper: creates a temp directory, and writes `contents` to
/// a file named `filename` in the temp directory
pub fn setup_tmp_directory(
    contents: &str,
    filename: &str,
) -> Result<(TempDir, PathBuf), Box<dyn std::error::Error>> {
    let tmp_dir = TempDir::new()?;
    let file = tmp_dir.path().join(filename);
    write(&file, contents)?;
    Ok((tmp_dir, file))
}

/// integration test helper: removes a temporary directory, presumably created with
/// [setup_tmp_directory](fn.setup_tmp_directory.html)
pub fn teardown_tmp_directory(directory: TempDir) {
    remove_dir_all(directory).unwrap();
}
