use savestate::config::SaveConfig;
use savestate::game::GameWorld;
use savestate::input_system::{CONTROLS, ControlAction, InputSystem};
use savestate::save::{LoadOutcome, SaveError, SaveManager, SaveRegistry};
use std::io;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Optional JSON config next to the binary's working directory
const CONFIG_PATH: &str = "savestate.json";

fn load_config() -> Result<SaveConfig, SaveError> {
    let config = if std::path::Path::new(CONFIG_PATH).exists() {
        SaveConfig::load_from_file(CONFIG_PATH)?
    } else {
        SaveConfig::default()
    };
    Ok(config.with_env_overrides())
}

fn print_controls() {
    println!("\n=== Controls ===");
    for (keys, description) in CONTROLS {
        println!("  {:<12} {}", keys, description);
    }
    println!();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = load_config()?;
    let registry = SaveRegistry::new();
    let mut save_manager = SaveManager::new(&config, registry.clone())?;
    info!(path = %save_manager.save_path().display(), "Save system ready");

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    let mut world = GameWorld::new(registry, seed);
    world.start();

    print_controls();
    let mut input_system = InputSystem::new(io::stdin().lock());

    // One action per frame; autosave is checked after each one
    while let Some(action) = input_system.next_action()? {
        match action {
            ControlAction::SaveGame => {
                if let Err(e) = save_manager.save() {
                    error!("Save failed: {e}");
                }
            }
            ControlAction::LoadGame => match save_manager.load() {
                Ok(LoadOutcome::NothingToLoad) => println!("No save file found"),
                Ok(LoadOutcome::Loaded { restored, failed, .. }) => {
                    println!("Loaded {restored} entities ({failed} failed)");
                }
                Err(e) => error!("Load failed: {e}"),
            },
            ControlAction::NewGame => save_manager.new_game(),
            ControlAction::AdvanceDay => world.advance_day(),
            ControlAction::Tick(secs) => world.tick(secs),
            ControlAction::Status => {
                for line in world.status() {
                    println!("{line}");
                }
            }
            ControlAction::Quit => break,
        }

        if save_manager.should_autosave() {
            info!("Autosaving");
            if let Err(e) = save_manager.save() {
                warn!("Autosave failed: {e}");
            }
        }
    }

    info!("Goodbye");
    Ok(())
}
