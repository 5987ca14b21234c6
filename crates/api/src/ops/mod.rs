#![forbid(unsafe_code)]

mod items;
mod status;
