//! tfctl - environment and layer aware Terraform wrapper

use std::process::ExitCode;

use clap::Parser;
use tfctl_cli::cli::{self, Cli};
use tfctl_cli::infra::config::EnvOverrides;
use tfctl_cli::{logging, output};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let json = cli.json;

    let env = match EnvOverrides::from_env() {
        Ok(env) => env,
        Err(e) => return report_error(&e, json),
    };
    let ansi = !cli.no_color
        && !output::no_color_requested(std::env::var_os("NO_COLOR").as_deref())
        && console::Term::stderr().is_term();
    logging::init(env.log.as_deref(), cli.verbose, ansi);

    match cli.run(env).await {
        Ok(code) => code,
        Err(e) => report_error(&e, json),
    }
}

fn report_error(err: &anyhow::Error, json: bool) -> ExitCode {
    let (code, kind) = cli::error_disposition(err);
    if json {
        match output::json::format_error(&format!("{err:#}"), kind) {
            Ok(text) => println!("{text}"),
            Err(_) => eprintln!("Error: {err:#}"),
        }
    } else {
        eprintln!("Error: {err:#}");
    }
    ExitCode::from(code)
}
