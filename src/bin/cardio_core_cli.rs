use cardio_core::cli::{output, run_cli};

fn main() {
    cardio_core::init();
    if let Err(err) = run_cli() {
        output::error(err);
        std::process::exit(1);
    }
}
