#![forbid(unsafe_code)]

use std::path::PathBuf;

pub(crate) const STORAGE_DIR_ENV: &str = "DESKBOARD_STORAGE_DIR";

pub(crate) fn parse_storage_dir() -> PathBuf {
    let mut args = std::env::args().skip(1);
    let mut storage_dir: Option<PathBuf> = None;
    while let Some(arg) = args.next() {
        if arg.as_str() == "--storage-dir"
            && let Some(value) = args.next()
        {
            storage_dir = Some(PathBuf::from(value));
        }
    }
    if let Some(dir) = storage_dir {
        return dir;
    }
    if let Some(dir) = std::env::var_os(STORAGE_DIR_ENV) {
        return PathBuf::from(dir);
    }
    PathBuf::from(".deskboard")
}
