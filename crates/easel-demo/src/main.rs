use easel_engine::logging::{init_logging, LoggingConfig};
use easel_engine::view::{View, ViewConfig};

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let mut view = View::open(ViewConfig::default())?;
    view.start()?;

    log::info!("window closed, exiting");
    Ok(())
}
