//! Source host URLs and version labeling

/// Default source host every library archive is fetched from
pub const SOURCE_HOST: &str = "https://github.com/boostorg";

/// Map a user-facing version to the archive tag label.
///
/// `develop` and `master` pass through; release versions become
/// `boost-<version>`.
pub fn version_label(version: &str) -> String {
    match version {
        "develop" | "master" => version.to_string(),
        _ => format!("boost-{version}"),
    }
}

/// Archive URL for one library at one version label
pub fn archive_url(host_base: &str, library: &str, label: &str) -> String {
    format!("{host_base}/{library}/archive/{label}.tar.gz")
}

/// Directory name an archive unpacks to before it is renamed
pub fn unpacked_dir_name(library: &str, label: &str) -> String {
    format!("{library}-{label}")
}

/// Package data file name for one version label
pub fn package_data_file(label: &str) -> String {
    format!("package-data-{label}.json")
}
