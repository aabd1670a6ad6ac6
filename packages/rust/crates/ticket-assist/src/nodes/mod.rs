mod check;
mod plugin;
mod serve;

pub(crate) use check::run_check_mode;
pub(crate) use serve::run_serve_mode;
