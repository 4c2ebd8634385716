use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use blockswap::block::loader as block_loader;
use blockswap::debug::DumpRequest;
use blockswap::settings::loader as settings_loader;
use blockswap::SwapPlugin;
use std::time::Duration;

// Host tick rate used when running standalone
pub const TICK_RATE: f64 = 20.0;

fn main() {
    let settings = settings_loader::load_settings_from_dir("data/settings");
    let catalog = block_loader::load_catalog_from_dir("data/catalog");
    let dump_only = std::env::args().nth(1).is_some_and(|arg| arg == "dump");

    let mut app = App::new();

    app.add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(
        Duration::from_secs_f64(1.0 / TICK_RATE),
    )))
    .add_plugins(LogPlugin::default())
    .add_plugins(SwapPlugin::new(settings, catalog));

    if dump_only {
        app.world_mut().send_event(DumpRequest::default());
        app.finish();
        app.cleanup();
        app.update();
        return;
    }

    app.run();
}
