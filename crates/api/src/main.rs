#![forbid(unsafe_code)]

mod ops;
mod server;
mod support;

pub(crate) use support::*;

use server::ApiServer;

const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

fn usage() -> &'static str {
    "dk_api — deskboard sync server (stdio, newline-delimited JSON)\n\n\
USAGE:\n\
  dk_api [--storage-dir DIR]\n\
\n\
FLAGS:\n\
  -h, --help       Print this help and exit\n\
  -V, --version    Print version and exit\n\
\n\
NOTES:\n\
  - Storage dir resolution: --storage-dir, then DESKBOARD_STORAGE_DIR, then ./.deskboard\n\
  - Ops: items_list, items_create, items_update, items_delete, status\n"
}

fn version_line() -> String {
    format!("dk_api {SERVER_VERSION}")
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = std::env::args().collect::<Vec<_>>();
    if args
        .iter()
        .any(|arg| matches!(arg.as_str(), "-h" | "--help"))
    {
        print!("{}", usage());
        return Ok(());
    }
    if args
        .iter()
        .any(|arg| matches!(arg.as_str(), "-V" | "--version"))
    {
        println!("{}", version_line());
        return Ok(());
    }

    let storage_dir = parse_storage_dir();
    let mut server = ApiServer::new(storage_dir);
    server::run_stdio(&mut server)
}
