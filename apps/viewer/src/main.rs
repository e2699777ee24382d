//! abmviz viewer: connects to the simulation server and redraws the agents
//! it reports at a fixed frame rate.

mod app;
mod error;
mod window;

use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use abmviz_client::Connection;
use abmviz_core::ViewerConfig;

use crate::app::{stay_offline, Viewer};
use crate::error::ViewerError;
use crate::window::WindowSink;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("abmviz viewer stopped: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), ViewerError> {
    let config = ViewerConfig::default();
    config.validate()?;

    // Drawing starts only once the server has accepted us.
    let connection = match Connection::open(&config.endpoint, config.max_message_bytes) {
        Ok(connection) => connection,
        Err(err) => {
            stay_offline(&err, || {
                thread::sleep(Duration::from_secs(60));
                true
            });
            return Ok(());
        }
    };
    let window = WindowSink::open(&config)?;

    let mut viewer = Viewer::new(&config, connection, window, Instant::now());
    viewer.run()
}
