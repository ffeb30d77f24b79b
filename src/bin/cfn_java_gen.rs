use cfn_java_codegen::cli::{run_cli, Cli};
use cfn_java_codegen::logging::{init_logging_with_config, LogConfig};
use cfn_java_codegen::{Error, ErrorKind};
use clap::Parser;
use std::process::exit;

/// Exit status for failures that are not library errors
const EXIT_FAILURE: i32 = 1;

fn main() {
    let cli = Cli::parse();

    let mut config = LogConfig::from_env();
    if cli.verbose {
        config = config.verbose();
    }
    if let Err(err) = init_logging_with_config(&config) {
        eprintln!("warning: {err:#}");
    }

    if let Err(err) = run_cli(cli) {
        eprintln!("error: {err:#}");
        let code = match err.downcast_ref::<Error>() {
            Some(err) => {
                if let Some(remedy) = err.remediation() {
                    eprintln!("{remedy}");
                } else if err.kind() == ErrorKind::Internal {
                    eprintln!("This looks like a bug or an inconsistent build tree ({}).", err.kind());
                }
                err.kind().exit_code()
            }
            None => EXIT_FAILURE,
        };
        exit(code);
    }
}
