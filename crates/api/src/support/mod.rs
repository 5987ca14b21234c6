#![forbid(unsafe_code)]

mod args;
mod respond;
mod runtime;
mod session_log;
mod time;

pub(crate) use args::*;
pub(crate) use respond::*;
pub(crate) use runtime::*;
pub(crate) use session_log::SessionLog;
pub(crate) use time::*;
