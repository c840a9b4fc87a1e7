//! Headless demo: spins a globe on a recording surface for a few seconds.
//!
//! Native only. In the browser the host drives `Planet::frame` itself.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::process::ExitCode;
    use std::time::Duration;

    use planetary::PlanetError;
    use planetary::config::{LoopConfig, env_parse};
    use planetary::input::{Button, PointerInput};
    use planetary::pings::PingOptions;
    use planetary::planet::Planet;
    use planetary::plugins::PluginRegistry;
    use planetary::projection::Point;
    use planetary::surface::RecordingSurface;
    use rand::Rng;
    use serde_json::json;
    use tokio::time::MissedTickBehavior;
    use tracing::{error, info};

    const DEMO_WORLD_FILE: &str = "tests/fixtures/two_squares.json";
    const DEMO_WIDTH: f64 = 960.0;
    const DEMO_HEIGHT: f64 = 500.0;
    const PING_COLORS: [&str; 5] = ["red", "yellow", "white", "orange", "green"];

    #[tokio::main(flavor = "current_thread")]
    pub async fn main() -> ExitCode {
        tracing_subscriber::fmt::init();

        match run().await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!(error = %e, "demo failed");
                ExitCode::FAILURE
            }
        }
    }

    async fn run() -> Result<(), PlanetError> {
        let world_file = std::env::var("PLANET_WORLD_FILE").unwrap_or_else(|_| DEMO_WORLD_FILE.to_owned());
        let seconds: u64 = env_parse("PLANET_DEMO_SECONDS", 3);
        let ping_every_ms: u64 = env_parse("PLANET_PING_EVERY_MS", 150).max(1);
        info!(%world_file, seconds, ping_every_ms, "demo configured");

        let registry = PluginRegistry::with_builtins();
        let mut planet =
            Planet::new(RecordingSurface::new(DEMO_WIDTH, DEMO_HEIGHT)).with_loop_config(LoopConfig::from_env());
        planet.load_named(
            &registry,
            "earth",
            &json!({
                "topojson": { "file": world_file },
                "oceans": { "fill": "#000080" },
                "land": { "fill": "#339966" },
                "borders": { "stroke": "#008000" },
            }),
        )?;
        planet.load_named(&registry, "pings", &json!({ "ttl": 3000 }))?;
        planet.load_named(&registry, "zoom", &json!({ "scaleExtent": [100, 300] }))?;
        planet.load_named(&registry, "drag", &serde_json::Value::Null)?;
        planet.start().await?;

        let input = planet.input_handle();
        let stop = planet.stop_handle();
        let pings = planet.pings();
        let centre = Point::new(DEMO_WIDTH / 2.0, DEMO_HEIGHT / 2.0);

        let driver = async move {
            let mut rng = rand::rng();
            let mut ticker = tokio::time::interval(Duration::from_millis(ping_every_ms));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let deadline = tokio::time::sleep(Duration::from_secs(seconds));
            tokio::pin!(deadline);

            let mut step: u64 = 0;
            loop {
                tokio::select! {
                    () = &mut deadline => break,
                    _ = ticker.tick() => {
                        if let Some(pings) = &pings {
                            let color = PING_COLORS[rng.random_range(0..PING_COLORS.len())];
                            let options = PingOptions::default().color(color).angle(rng.random_range(2.0..10.0));
                            pings.add(rng.random_range(-90.0..90.0), rng.random_range(-180.0..180.0), &options);
                        }
                        if step % 10 == 0 {
                            input.send(PointerInput::Down { at: centre, button: Button::Primary });
                            input.send(PointerInput::Move { at: Point::new(centre.x + 20.0, centre.y + 5.0) });
                            input.send(PointerInput::Up { at: centre, button: Button::Primary });
                        }
                        if step % 15 == 7 {
                            input.send(PointerInput::Wheel { dy: -120.0, line_mode: false });
                        }
                        step += 1;
                    }
                }
            }
            stop.stop();
        };

        let (result, ()) = tokio::join!(planet.run(), driver);
        result?;

        let projection = planet.projection();
        info!(
            planet = %planet.id(),
            frames = planet.frames(),
            commands = planet.surface().commands().len(),
            longitude = projection.rotation.longitude,
            latitude = projection.rotation.latitude,
            scale = projection.scale,
            live_pings = planet.pings().map_or(0, |p| p.len()),
            "demo finished"
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    demo::main()
}

#[cfg(target_arch = "wasm32")]
fn main() {}
