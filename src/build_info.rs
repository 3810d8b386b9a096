//! Commit hash and build date, generated by `build.rs`.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// `"<commit> <date>"`, as shown in window titles and `--help` output.
pub fn build_label() -> String {
    format!("{BUILD_COMMIT} {BUILD_DATE}")
}
