use std::time::Duration;

use spritekit::runtime::run_for;
use spritekit::{Control, ElementConfig, Event, Game, GameConfig, GameError, Point, Registry};
use tracing::{debug, info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), GameError> {
    tracing_subscriber::fmt::init();

    let mut registry = Registry::new();
    registry.define("runner", |game: &mut Game, id| {
        game.set_hspeed(id, 120.0)?;
        game.on_collision(id, "wall.solid", move |event| {
            if let Event::CollisionStart { other, .. } = event {
                info!(runner = %id, wall = %other, "runner hit a wall");
            }
            Control::Continue
        })?;
        Ok(())
    })?;

    let mut game = Game::with_registry(GameConfig::from_env(), registry)?;
    let runner = game.spawn(ElementConfig::new("player").with_name("runner").with_behavior("runner").at(0.0, 100.0))?;

    let wall_x = rand::random_range(120.0..360.0);
    game.spawn(ElementConfig::new("wall").with_class("solid").at(wall_x, 80.0).sized(16.0, 64.0))?;
    game.attach_view(runner, Point::default())?;

    run_for(&mut game, Duration::from_secs(3)).await?;

    for event in game.drain_events() {
        match serde_json::to_string(&event) {
            Ok(json) => debug!(%json, "event"),
            Err(err) => warn!(error = %err, "event could not be serialized"),
        }
    }

    info!(x = game.x(runner)?, scroll_x = game.scroll().x, "demo finished");
    game.detach()?;
    Ok(())
}
