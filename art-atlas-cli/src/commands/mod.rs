mod config;
mod enrich;
mod key;
mod locate;
mod resize;

pub(crate) use config::run_config;
pub(crate) use enrich::{EnrichArgs, run_enrich};
pub(crate) use key::run_key;
pub(crate) use locate::run_locate;
pub(crate) use resize::run_resize;
