use std::process::ExitCode;

use clap::Parser;
use ipclock::args::Args;
use ipclock_config_file::IpClockConfigToml;

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match IpClockConfigToml::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => IpClockConfigToml::default(),
    };

    let clock = args.builder(config).build();
    log::info!("requesting {}", clock.request_url());
    match clock.now() {
        Ok(now) => {
            println!("Current time: {}", now.local().format("%Y-%m-%d %H:%M:%S %:z"));
            println!("Timezone: {}", now.timezone());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
