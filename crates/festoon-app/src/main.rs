/*!
`festoon`: hang lights along the top edge of every window.

Needs Accessibility permission (System Settings > Privacy & Security >
Accessibility). Set `FESTOON_CONFIG` to a JSON file to override defaults,
`RUST_LOG` to change verbosity.
*/

use std::process::ExitCode;

use festoon::Config;

fn main() -> ExitCode {
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

  if Config::disabled_by_env() {
    log::info!("Disabled by environment; exiting");
    return ExitCode::SUCCESS;
  }

  let config = match Config::load() {
    Ok(config) => config,
    Err(e) => {
      log::error!("{e}");
      return ExitCode::FAILURE;
    }
  };

  match festoon::platform::run(config) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      log::error!("{e}");
      ExitCode::FAILURE
    }
  }
}
