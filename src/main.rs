use dotenv::dotenv;
use lua_stage::config::Config;
use lua_stage::stager::Stager;
use std::io;
use std::process;

fn main() {
    dotenv().ok();
    env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };
    log::debug!("Project dir: {}", config.project_dir.display());

    let stager = Stager::new(&config.project_dir).verify_lua(config.verify_lua);
    let stdout = io::stdout();
    if let Err(e) = stager.run(&mut stdout.lock()) {
        log::error!("Pre-build staging failed: {}", e);
        eprintln!("error: {}", e);
        process::exit(1);
    }
}
