use std::process::ExitCode;

fn main() -> ExitCode {
    worklog_lib::run()
}
