use anyhow::Result;
use clap::{App as ClapApp, Arg, SubCommand};
use flow::app::App;
use flow::config::Config;
use flow::logger::Logger;
use log::LevelFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let matches = ClapApp::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about("Personal tasks and calendar with remote sync")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("DIR")
                .help("Custom configuration directory")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Log debug messages"),
        )
        .subcommand(SubCommand::with_name("init").about("Write the configuration file"))
        .get_matches();

    let mut config = Config::new();
    config.load(matches.value_of("config"))?;

    let level = if matches.is_present("verbose") {
        LevelFilter::Debug
    } else {
        config.log_level_filter()?
    };
    if matches.subcommand_matches("init").is_some() {
        Logger::new(level).init()?;
        let path = config.save()?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    // The terminal UI owns the screen, so logs go to a file.
    Logger::to_file(level, &config.log_path()?)?.init()?;
    App::start(config).await
}
