use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    rng::SystemRng,
    world::World,
};

/// Rotates the terminator by one tick's worth of simulated time.
pub struct DayNightSystem;

impl DayNightSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DayNightSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for DayNightSystem {
    fn name(&self) -> &str {
        "day_night"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        world.day_night.advance(ctx.dt);
        Ok(())
    }
}
