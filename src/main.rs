mod app;
mod cli;
mod fs_walk;
mod output;
mod search;

use std::env;
use std::io;
use std::process;

use env_logger::Env;

// Usage: yre -E <pattern> [-o] [-r] [--color=WHEN] [path...]
fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cfg = match cli::parse_args(env::args_os()) {
        Ok(cfg) => cfg,
        Err(err) => err.exit(),
    };

    let stdout = io::stdout();
    let code = match app::run(&cfg, io::stdin().lock(), &mut stdout.lock()) {
        Ok(outcome) => outcome.exit_code(),
        Err(err) => {
            eprintln!("yre: {err:#}");
            2
        }
    };
    process::exit(code);
}
