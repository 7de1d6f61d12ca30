//! Remote URL construction

/// Host path used when neither the command line nor a config file names one.
pub const DEFAULT_HOST_PATH: &str = "https://github.com/lzorn-lzorn/";

const REPOSITORY_SUFFIX: &str = ".git";

/// Ensure the host path ends with exactly the separator it needs.
///
/// - `https://github.com/owner`  → `https://github.com/owner/`
/// - `https://github.com/owner/` → unchanged
pub fn normalize_host_path(host_path: &str) -> String {
    if host_path.ends_with('/') {
        host_path.to_string()
    } else {
        format!("{host_path}/")
    }
}

/// `host_path` + `repo_name` + `.git`, with one separator in between.
pub fn build_url(host_path: &str, repo_name: &str) -> String {
    format!("{}{}{}", normalize_host_path(host_path), repo_name, REPOSITORY_SUFFIX)
}
