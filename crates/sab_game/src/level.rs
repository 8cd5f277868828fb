//! One playable stage: the tilemap, its props, and the actors moving over it.
//!
//! A frame runs in a fixed order: drop everything flagged for cleanup, apply
//! the level's tweens, update objects, then update entities in sequence
//! order. Entities see the rest of the level through a `World`, which is
//! built by splitting the entity vector around the one being updated.

use glam::Vec2;
use sab_core::geometry::{Collidable, Rect, Side};
use sab_core::render::RenderList;
use sab_core::timer::{Timer, TimerEvent, Tween};

use crate::background::Background;
use crate::entities::{Entity, EntityId, Others, Player, PlayerBody, Snail, World};
use crate::objects::{BlockHit, Consumer, GameObject, ObjectId, BLOCK_BOUNCE_DURATION};
use crate::services::{Services, SoundQueue};
use crate::tilemap::Tilemap;

/// Field a level tween writes to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenTarget {
    ObjectY(ObjectId),
}

/// Completions the level reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LevelSignal {
    /// A hit block reached the top of its bounce and must settle back.
    BlockRaised { block: ObjectId, rest_y: f32 },
}

/// A blocking object overlapping the player this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub id: ObjectId,
    pub hitbox: Rect,
    /// Side of the object the player is pressing against.
    pub side: Side,
}

/// Objects and level-wide flags. Split from `Level` so an entity can borrow
/// them while the entity vector is borrowed around it.
#[derive(Debug, Clone, Default)]
pub struct Playfield {
    pub(crate) objects: Vec<GameObject>,
    pub tweens: Timer<LevelSignal, TweenTarget>,
    /// Snails that have not been observed dead yet.
    pub num_of_snails: u32,
    pub is_won: bool,
    pub flag_spawned: bool,
    next_object_id: u32,
}

impl Playfield {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate_object_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next_object_id);
        self.next_object_id += 1;
        id
    }

    /// Appends to the draw order.
    pub fn add_object(&mut self, object: GameObject) {
        self.objects.push(object);
    }

    pub fn objects(&self) -> &[GameObject] {
        &self.objects
    }

    pub fn object(&self, id: ObjectId) -> Option<&GameObject> {
        self.objects.iter().find(|object| object.id() == id)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut GameObject> {
        self.objects.iter_mut().find(|object| object.id() == id)
    }

    /// Overlap pass for the player. Pickups are consumed on the spot; blocking
    /// objects are returned for the movement code to resolve.
    pub fn touch_objects(&mut self, player: &mut PlayerBody, sounds: &mut SoundQueue) -> Vec<Contact> {
        let player_box = player.hitbox();
        let Self {
            objects, is_won, ..
        } = self;

        let mut contacts = Vec::new();
        for object in objects.iter_mut() {
            let hitbox = object.hitbox();
            if !hitbox.overlaps(&player_box) {
                continue;
            }
            if object.body().flags.blocks() {
                contacts.push(Contact {
                    id: object.id(),
                    hitbox,
                    side: hitbox.contact_side(&player_box),
                });
            } else {
                object.consume(&mut Consumer {
                    player: &mut *player,
                    sounds: &mut *sounds,
                    level_won: &mut *is_won,
                });
            }
        }
        contacts
    }

    /// The player struck `id` from below.
    pub fn hit(&mut self, id: ObjectId, services: &mut Services) {
        let power_up_id = ObjectId(self.next_object_id);
        let Some(GameObject::Block(block)) = self.objects.iter_mut().find(|object| object.id() == id)
        else {
            return;
        };
        let mut hit = BlockHit {
            sounds: &mut services.sounds,
            rng: &mut services.rng,
            tweens: &mut self.tweens,
            power_up_id,
        };
        if let Some(power_up) = block.on_collision(&mut hit) {
            self.next_object_id += 1;
            self.objects.insert(0, power_up);
        }
    }

    fn advance_tweens(&mut self, dt: f64) {
        for event in self.tweens.update(dt) {
            match event {
                TimerEvent::Tweened {
                    target: TweenTarget::ObjectY(id),
                    value,
                } => {
                    if let Some(object) = self.object_mut(id) {
                        object.body_mut().position.y = value;
                    }
                }
                TimerEvent::Fired(LevelSignal::BlockRaised { block, rest_y }) => {
                    let Some(raised_y) = self.object(block).map(|object| object.body().position.y)
                    else {
                        continue;
                    };
                    self.tweens.tween(
                        vec![Tween::new(TweenTarget::ObjectY(block), raised_y, rest_y)],
                        BLOCK_BOUNCE_DURATION,
                        None,
                    );
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Level {
    pub tilemap: Tilemap,
    pub playfield: Playfield,
    entities: Vec<Entity>,
    background: Background,
    next_entity_id: u32,
}

impl Level {
    pub fn new(tilemap: Tilemap, background: Background) -> Self {
        Self {
            tilemap,
            playfield: Playfield::new(),
            entities: Vec::new(),
            background,
            next_entity_id: 0,
        }
    }

    pub fn allocate_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_entity_id);
        self.next_entity_id += 1;
        id
    }

    pub fn add_entity(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    /// Adds a snail and counts it as alive.
    pub fn add_snail(&mut self, snail: Snail) {
        self.playfield.num_of_snails += 1;
        self.entities.push(Entity::Snail(snail));
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id() == id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|entity| entity.id() == id)
    }

    pub fn entity_index(&self, id: EntityId) -> Option<usize> {
        self.entities.iter().position(|entity| entity.id() == id)
    }

    pub fn player(&self, id: EntityId) -> Option<&Player> {
        self.entity(id).and_then(Entity::as_player)
    }

    pub fn player_mut(&mut self, id: EntityId) -> Option<&mut Player> {
        self.entity_mut(id).and_then(Entity::as_player_mut)
    }

    /// Removes the player from the level, handing it back to the caller.
    pub fn take_player(&mut self, id: EntityId) -> Option<Player> {
        let index = self.entity_index(id)?;
        match self.entities.remove(index) {
            Entity::Player(player) => Some(player),
            other => {
                self.entities.insert(index, other);
                None
            }
        }
    }

    pub fn num_of_snails(&self) -> u32 {
        self.playfield.num_of_snails
    }

    pub fn is_won(&self) -> bool {
        self.playfield.is_won
    }

    pub fn canvas_dimensions(&self) -> Vec2 {
        self.tilemap.canvas_dimensions()
    }

    /// The entity at `index` plus a view of everything else.
    pub fn entity_with_world<'s>(
        &'s mut self,
        index: usize,
        services: &'s mut Services,
    ) -> Option<(&'s mut Entity, World<'s>)> {
        let Self {
            tilemap,
            playfield,
            entities,
            ..
        } = self;
        if index >= entities.len() {
            return None;
        }
        let (before, rest) = entities.split_at_mut(index);
        let (entity, after) = rest.split_first_mut()?;
        Some((
            entity,
            World {
                tilemap: &*tilemap,
                playfield,
                others: Others::new(before, after),
                services,
            },
        ))
    }

    pub fn update(&mut self, services: &mut Services, dt: f64) {
        self.clean_up();
        self.playfield.advance_tweens(dt);
        for object in &mut self.playfield.objects {
            object.update(dt);
        }
        for index in 0..self.entities.len() {
            if let Some((entity, mut world)) = self.entity_with_world(index, services) {
                entity.update(&mut world, dt);
            }
        }
    }

    fn clean_up(&mut self) {
        let playfield = &mut self.playfield;
        self.entities.retain(|entity| {
            if !entity.body().clean_up {
                return true;
            }
            if let Entity::Snail(snail) = entity {
                if !snail.body.death_counted {
                    playfield.num_of_snails = playfield.num_of_snails.saturating_sub(1);
                }
            }
            false
        });
        playfield
            .objects
            .retain(|object| !object.body().flags.clean_up);
    }

    pub fn render(&self, out: &mut RenderList) {
        self.background.render(out);
        self.tilemap.render(out);
        for object in &self.playfield.objects {
            object.render(out);
        }
        for entity in &self.entities {
            entity.render(out);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::flat_level;
    use super::*;
    use crate::assets::SoundName;
    use crate::config::{PlayerConfig, SnailConfig};
    use crate::objects::{Block, Bush, Coin, BLOCK_HIT_FRAME};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn player_body() -> PlayerBody {
        PlayerBody::new(EntityId(0), Vec2::new(32.0, 140.0), &PlayerConfig::default())
    }

    #[test]
    fn touch_reports_blockers_and_consumes_pickups() {
        let mut playfield = Playfield::new();
        let block_id = playfield.allocate_object_id();
        playfield.add_object(GameObject::Block(Block::new(block_id, Vec2::new(32.0, 160.0))));
        let coin_id = playfield.allocate_object_id();
        playfield.add_object(GameObject::Coin(Coin::new(coin_id, Vec2::new(40.0, 140.0))));
        let bush_id = playfield.allocate_object_id();
        playfield.add_object(GameObject::Bush(Bush::new(
            bush_id,
            Vec2::new(32.0, 144.0),
            &mut StdRng::seed_from_u64(1),
        )));

        let mut player = player_body();
        let mut sounds = SoundQueue::new();
        let contacts = playfield.touch_objects(&mut player, &mut sounds);

        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].id, block_id);
        assert_eq!(contacts[0].side, Side::Top);
        assert_eq!(player.score, 10);
        assert_eq!(sounds.play_count(SoundName::PickUp), 1);
        assert!(playfield.object(coin_id).expect("coin").body().flags.clean_up);
        assert!(!playfield.object(bush_id).expect("bush").body().flags.clean_up);
    }

    #[test]
    fn block_hit_inserts_power_up_first_and_bounces_back() {
        let mut level = flat_level(10, 12, 10);
        let block_id = level.playfield.allocate_object_id();
        level
            .playfield
            .add_object(GameObject::Block(Block::new(block_id, Vec2::new(64.0, 96.0))));
        let mut services = Services::seeded(3);

        level.playfield.hit(block_id, &mut services);
        level.playfield.hit(block_id, &mut services);

        let objects = level.playfield.objects();
        assert_eq!(objects.len(), 2);
        assert_ne!(objects[0].id(), block_id);
        assert!(matches!(objects[0], GameObject::Coin(_) | GameObject::Mushroom(_)));
        assert_eq!(services.sounds.play_count(SoundName::Reveal), 1);
        assert_eq!(services.sounds.play_count(SoundName::EmptyBlock), 1);
        match level.playfield.object(block_id) {
            Some(GameObject::Block(block)) => assert_eq!(block.current_frame(), BLOCK_HIT_FRAME),
            other => panic!("expected block, got {other:?}"),
        }

        level.update(&mut services, 0.1);
        let raised = level.playfield.object(block_id).expect("block").body().position.y;
        assert_eq!(raised, 91.0);
        let power_up = &level.playfield.objects()[0];
        assert_eq!(power_up.body().position.y, 96.0 - power_up.body().dimensions.y);

        level.update(&mut services, 0.1);
        let settled = level.playfield.object(block_id).expect("block").body().position.y;
        assert_eq!(settled, 96.0);
        assert!(level.playfield.tweens.is_empty());
    }

    #[test]
    fn cleanup_runs_before_update_and_keeps_snail_count_honest() {
        let mut level = flat_level(10, 12, 10);
        let coin_id = level.playfield.allocate_object_id();
        level
            .playfield
            .add_object(GameObject::Coin(Coin::new(coin_id, Vec2::new(0.0, 0.0))));
        let snail_id = level.allocate_entity_id();
        level.add_snail(Snail::new(
            snail_id,
            Vec2::new(64.0, 144.0),
            EntityId(99),
            &SnailConfig::default(),
        ));
        assert_eq!(level.num_of_snails(), 1);

        level.playfield.object_mut(coin_id).expect("coin").body_mut().flags.clean_up = true;
        level.entity_mut(snail_id).expect("snail").body_mut().clean_up = true;
        let mut services = Services::seeded(4);
        level.update(&mut services, 1.0 / 60.0);

        assert!(level.playfield.object(coin_id).is_none());
        assert!(level.entity(snail_id).is_none());
        assert_eq!(level.num_of_snails(), 0);
    }

    #[test]
    fn world_excludes_the_updating_entity() {
        let mut level = flat_level(10, 12, 10);
        let ids: Vec<EntityId> = (0..3)
            .map(|_| {
                let id = level.allocate_entity_id();
                level.add_snail(Snail::new(id, Vec2::ZERO, EntityId(99), &SnailConfig::default()));
                id
            })
            .collect();
        let mut services = Services::seeded(5);

        let (entity, world) = level.entity_with_world(1, &mut services).expect("split");
        assert_eq!(entity.id(), ids[1]);
        assert_eq!(world.others.len(), 2);
        assert!(world.others.find(ids[0]).is_some());
        assert!(world.others.find(ids[1]).is_none());
        assert!(world.others.find(ids[2]).is_some());

        assert!(level.entity_with_world(3, &mut services).is_none());
    }

    #[test]
    fn render_draws_back_to_front() {
        let mut level = flat_level(4, 4, 3);
        let coin_id = level.playfield.allocate_object_id();
        level
            .playfield
            .add_object(GameObject::Coin(Coin::new(coin_id, Vec2::ZERO)));
        let mut out = RenderList::new();
        level.render(&mut out);

        let images: Vec<&str> = out
            .commands()
            .iter()
            .filter_map(|command| match command {
                sab_core::render::DrawCommand::Sprite { image, .. } => Some(*image),
                _ => None,
            })
            .collect();
        assert_eq!(images.first(), Some(&"backgrounds"));
        assert_eq!(images.last(), Some(&"coin"));
    }
}
