use crate::ecs::components::{Behaviours, Sensors};

/// Run every bot's scripts against its own sensors.
pub fn update(world: &mut hecs::World, elapsed: f32) {
    for (_, (sensors, behaviours)) in world.query_mut::<(&mut Sensors, &Behaviours)>() {
        for behaviour in &behaviours.0 {
            behaviour.tick(elapsed, &mut sensors.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behaviour::Behaviour;
    use crate::sensor::Sensor;

    #[test]
    fn scripts_only_touch_their_own_bot() {
        let mut world = hecs::World::new();
        let scripted = world.spawn((
            Sensors(vec![Sensor::rangefinder().build(60).unwrap()]),
            Behaviours(vec![Behaviour::blinking(0, 2.0, 0.5).unwrap()]),
        ));
        let plain = world.spawn((
            Sensors(vec![Sensor::rangefinder().build(60).unwrap()]),
            Behaviours::default(),
        ));

        // Half a period in: the blinking sensor is off.
        update(&mut world, 1.0);
        assert!(!world.get::<&Sensors>(scripted).unwrap().0[0].is_enabled());
        assert!(world.get::<&Sensors>(plain).unwrap().0[0].is_enabled());
    }
}
