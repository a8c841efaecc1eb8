use glam::{IVec2, Vec2};

use crate::ecs::components::{Body, Contact, Drive, Position, Spin, Velocity};
use crate::geometry::project;
use crate::terrain::Terrain;

/// Scan the disc under the bot for ground pixels.
///
/// Visits every integer offset in the bounding square of the radius around
/// the floored center. O(radius²), the hot loop of a tick.
pub fn touch(pos: Vec2, body: &Body, terrain: &Terrain) -> Contact {
    let mut contact = Contact::clear(body.radius);
    let r = body.radius.floor() as i32;
    let center = pos.floor().as_ivec2();

    let mut hits = 0u32;
    let mut sum_x = 0i64;
    let mut sum_y = 0i64;
    for dx in -r..=r {
        for dy in -r..=r {
            let distance = ((dx * dx + dy * dy) as f32).sqrt();
            if distance > body.radius {
                continue;
            }
            if !terrain.is_ground(center + IVec2::new(dx, dy)) {
                continue;
            }
            hits += 1;
            sum_x += i64::from(dx);
            sum_y += i64::from(dy);
            if distance < contact.closest_pixel_distance {
                contact.closest_pixel_distance = distance;
            }
        }
    }

    if hits > 0 {
        let centroid = Vec2::new(sum_x as f32, sum_y as f32) / hits as f32;
        // A perfectly symmetric hit pattern has no direction.
        contact.direction = centroid.try_normalize().unwrap_or(Vec2::ZERO);
        contact.touching = true;
    }
    contact
}

/// Pop the bot out of the ground and reflect the normal velocity.
///
/// `restitution` is the multiple of the normal component removed: 1 stops
/// dead along the normal, 2 is a perfect bounce, more adds energy.
pub fn collide(pos: &mut Vec2, vel: &mut Vec2, body: &Body, contact: &Contact, restitution: f32) {
    let Some(normal_velocity) = project(*vel, contact.direction) else {
        return;
    };
    *pos -= contact.direction * (body.radius - contact.closest_pixel_distance);
    *vel -= normal_velocity * restitution;
}

/// Couple rolling and sliding at the contact point.
pub fn rotate(vel: &mut Vec2, spin: &mut Spin, body: &Body, contact: &Contact, accelerating: bool) {
    let dir = contact.direction;
    if dir == Vec2::ZERO {
        return;
    }
    // 2D cross product: the velocity component along the surface.
    let tangential = vel.x * dir.y - vel.y * dir.x;

    if accelerating {
        let normal = vel.dot(dir);
        *vel = dir * normal;
        // Drive torque and ground speed meet halfway.
        let mean = (tangential + body.radius * spin.omega) / 2.0;
        *vel += Vec2::new(dir.y, -dir.x) * (body.friction * mean);
        spin.omega = body.friction * mean / body.radius;
    } else {
        spin.omega = body.friction * tangential / body.radius;
    }
}

/// Touch test, then collision response and rolling for bots in contact.
pub fn update(world: &mut hecs::World, terrain: &Terrain, restitution: f32) {
    for (_, (pos, vel, spin, body, contact, drive)) in world.query_mut::<(
        &mut Position,
        &mut Velocity,
        &mut Spin,
        &Body,
        &mut Contact,
        Option<&Drive>,
    )>() {
        *contact = touch(pos.0, body, terrain);
        if !contact.touching {
            continue;
        }
        collide(&mut pos.0, &mut vel.0, body, contact, restitution);
        let accelerating = drive.is_some_and(Drive::is_accelerating);
        rotate(&mut vel.0, spin, body, contact, accelerating);
    }
}
