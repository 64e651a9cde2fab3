use std::path::PathBuf;

pub fn fixture_path(area: &str, name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("podoc-babel")
        .join("tests")
        .join("fixtures")
        .join(area)
        .join(name)
}
