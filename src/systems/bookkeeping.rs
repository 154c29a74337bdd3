use anyhow::Result;
use tracing::debug;

use crate::{
    engine::{System, SystemContext},
    rng::SystemRng,
    stats::Bookkeeper,
    world::World,
};

/// Publishes the per-tick census and keeps the rolling histories.
pub struct BookkeepingSystem {
    books: Bookkeeper,
}

impl BookkeepingSystem {
    pub fn new(cumulative_window: usize) -> Self {
        Self {
            books: Bookkeeper::new(cumulative_window),
        }
    }

    pub fn books(&self) -> &Bookkeeper {
        &self.books
    }
}

impl System for BookkeepingSystem {
    fn name(&self) -> &str {
        "bookkeeping"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let census = self
            .books
            .record(world.tick(), &world.grid, &world.temperature, ctx.params);
        debug!(
            tick = census.tick,
            white = census.white,
            black = census.black,
            mean_temperature = census.mean_temperature,
            "census"
        );
        world.census = Some(census);
        Ok(())
    }
}
