mod shutdown;
mod stdio;

use std::{convert::Infallible, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use embassy_executor::Executor;
use jove_core::{
    mk_static,
    utils::{
        controllers::{ActuatorPort, MotorDriver},
        Dispatcher, Rational, TrainConfig, EVENT_CHANNEL,
    },
};
use stdio::StdoutPublisher;
use tracing::{error, info};

#[derive(Parser)]
#[command(version = "1.0")]
struct Opts
{
    /// JSON configuration file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,
    /// train name used to scope topics
    #[arg(long)]
    name: Option<String>,
    /// actuator port driven by the engine (A or B)
    #[arg(long, value_parser = parse_port)]
    engine_port: Option<ActuatorPort>,
    /// engine calibration threshold as num/den
    #[arg(long, value_parser = parse_rational)]
    calibration: Option<Rational>,
    /// driver velocity at full power
    #[arg(long, default_value_t = 100)]
    max_velocity: i32,
}

fn parse_port(s: &str) -> Result<ActuatorPort, String> {
    match s {
        "A" | "a" => Ok(ActuatorPort::A),
        "B" | "b" => Ok(ActuatorPort::B),
        other => Err(format!("unknown port `{other}`, expected A or B")),
    }
}

fn parse_rational(s: &str) -> Result<Rational, String> {
    s.parse().map_err(|e| format!("{e}"))
}

fn load_config(opts: &Opts) -> anyhow::Result<TrainConfig> {
    let mut config = match &opts.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => TrainConfig::default(),
    };
    if let Some(name) = &opts.name {
        config.name = name.clone();
    }
    if let Some(port) = opts.engine_port {
        config.engine_port = port;
    }
    if let Some(calibration) = opts.calibration {
        config.engine_calibration = calibration;
    }
    Ok(config)
}

/// Motor driver that logs to console.
struct ConsoleDriver {
    max_velocity: i32,
}

impl MotorDriver for ConsoleDriver {
    type Error = Infallible;

    fn max_velocity(&self) -> i32 {
        self.max_velocity
    }

    fn set_power(
        &mut self,
        a: i32,
        b: i32,
    ) -> Result<(), Self::Error> {
        info!(a, b, "MOTOR");
        Ok(())
    }
}

#[embassy_executor::task]
async fn engine_task(mut dispatcher: Dispatcher<ConsoleDriver, StdoutPublisher>) {
    match dispatcher.run(EVENT_CHANNEL.receiver()).await {
        Ok(()) => {
            info!("engine stopped");
            std::process::exit(0);
        }
        Err(never) => match never {},
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let opts: Opts = Opts::parse();
    let config = match load_config(&opts) {
        Ok(config) => config,
        Err(e) => {
            error!("configuration failed: {:#}", e);
            std::process::exit(2);
        }
    };
    info!(?config, "starting engine core");

    let scope = config.topic_scope();
    let driver = ConsoleDriver {
        max_velocity: opts.max_velocity,
    };
    let dispatcher = Dispatcher::from_config(&config, driver, StdoutPublisher::new(scope.clone()));

    if let Err(e) = shutdown::install_signal_handler() {
        error!("failed to install signal handler: {:?}", e);
        std::process::exit(1);
    }
    if let Err(e) = stdio::spawn_reader(scope) {
        error!("failed to start stdin reader: {:?}", e);
        std::process::exit(1);
    }

    let executor = mk_static!(Executor, Executor::new());
    executor.run(move |spawner| {
        spawner.spawn(engine_task(dispatcher)).unwrap();
    });
}
