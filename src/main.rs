use std::process::ExitCode;

fn main() -> ExitCode {
    skinmarket_lib::run()
}
