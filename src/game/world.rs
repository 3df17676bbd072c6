// GameWorld struct and entity management
//
// This module contains the GameWorld struct which owns all savable entities
// and world state. Every entity is shared with the save registry through an
// Rc<RefCell<..>> handle so save/load can reach it without borrowing the
// whole world.

use crate::creature::Creature;
use crate::farm::FarmingManager;
use crate::inventory::{ContainerType, ItemContainer, PlayerItems};
use crate::item::{ItemRegistry, ItemStack};
use crate::player::Player;
use crate::resource::MineableResource;
use crate::save::{SaveRegistry, Saveable, UniqueId, share};
use crate::spawner::{PlacementRules, Prefab, ResourceSpawner, SpawnArea, SpawnTemplate};
use crate::tree::Tree;
use glam::{IVec2, IVec3, Vec2, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::info;

const STARTING_MONEY: u32 = 50;

/// GameWorld encapsulates all game entities and world state
pub struct GameWorld {
    pub item_registry: Rc<ItemRegistry>,
    pub player: Rc<RefCell<Player>>,
    pub player_items: Rc<RefCell<PlayerItems>>,
    pub chest: Rc<RefCell<ItemContainer>>,
    pub farm: Rc<RefCell<FarmingManager>>,
    pub rock: Rc<RefCell<MineableResource>>,
    pub oak: Rc<RefCell<Tree>>,
    pub slime: Rc<RefCell<Creature>>,
    pub spawner: Rc<RefCell<ResourceSpawner>>,
    registry: SaveRegistry,
    rng: Pcg32,
    day: u32,
}

impl GameWorld {
    /// Builds the starting world and registers every entity
    ///
    /// The spawner is not populated until [`GameWorld::start`].
    pub fn new(registry: SaveRegistry, seed: u64) -> Self {
        let item_registry = Rc::new(ItemRegistry::create_default());

        let player = share(Player::new(Vec3::ZERO));

        let player_items = share(PlayerItems::new(Rc::clone(&item_registry)));
        {
            let mut items = player_items.borrow_mut();
            items.add_money(STARTING_MONEY);
            // Starter kit always fits in an empty inventory
            let _ = items.add_item("wood", 3);
            let _ = items.add_item("carrot", 2);
        }

        let chest = share(ItemContainer::new(
            UniqueId::authored("chest_home"),
            Rc::clone(&item_registry),
        ));
        let _ = chest.borrow_mut().add_item("stone", 10);

        let farm = share(FarmingManager::new(Rc::clone(&item_registry)));
        {
            let mut farm = farm.borrow_mut();
            for x in 0..3 {
                farm.dig(IVec3::new(x, -2, 0));
            }
            let _ = farm.plant(IVec3::new(0, -2, 0), "carrot");
        }

        let rock = share(MineableResource::new(
            UniqueId::authored("rock_quarry"),
            Vec3::new(6.0, 2.0, 0.0),
            3,
            Some(10.0),
            ItemStack::new("stone", 2),
        ));
        let oak = share(Tree::new(
            UniqueId::authored("oak_by_house"),
            Vec3::new(-4.0, 3.0, 0.0),
            3.0,
            30.0,
        ));
        let slime = share(Creature::new(
            UniqueId::authored("slime_guard"),
            Vec3::new(8.0, -1.0, 0.0),
            3.0,
        ));

        let spawner = share(ResourceSpawner::new(
            UniqueId::authored("meadow_spawner"),
            meadow_templates(),
            SpawnArea::new(Vec2::new(10.0, 10.0), Vec2::new(30.0, 30.0))
                .with_blocked_cells((14..16).flat_map(|x| (10..30).map(move |y| IVec2::new(x, y)))),
            PlacementRules {
                min_distance: 1.5,
                max_attempts: 20,
            },
        ));

        registry.activate(player.clone());
        registry.activate(player_items.clone());
        registry.activate(chest.clone());
        registry.activate(farm.clone());
        registry.activate(rock.clone());
        registry.activate(oak.clone());
        registry.activate(slime.clone());
        registry.activate(spawner.clone());

        GameWorld {
            item_registry,
            player,
            player_items,
            chest,
            farm,
            rock,
            oak,
            slime,
            spawner,
            registry,
            rng: Pcg32::seed_from_u64(seed),
            day: 1,
        }
    }

    /// Populates the spawner unless a load already rebuilt it
    pub fn start(&mut self) {
        self.spawner.borrow_mut().start(&mut self.rng);
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn advance_day(&mut self) {
        self.farm.borrow_mut().advance_day();
        self.day += 1;
        info!(day = self.day, "A new day begins");
    }

    pub fn tick(&mut self, dt: f32) {
        self.player.borrow_mut().update(dt);
        self.rock.borrow_mut().update(dt);
        self.oak.borrow_mut().update(dt);
        self.slime.borrow_mut().update(dt);
        self.spawner.borrow_mut().update(dt);
    }

    /// Chops the oak next to the house, dropping wood into the inventory
    pub fn chop_oak(&mut self, damage: f32) -> Option<u32> {
        let wood = self.oak.borrow_mut().on_hit(damage, &mut self.rng)?;
        let _ = self.player_items.borrow_mut().add_item("wood", wood);
        Some(wood)
    }

    /// Removes the slime from the world, e.g. when it wanders off-screen
    pub fn despawn_slime(&self) {
        self.registry.deactivate(&self.slime);
    }

    pub fn respawn_slime(&self) {
        self.registry.activate(self.slime.clone());
    }

    /// One line per entity for the console
    pub fn status(&self) -> Vec<String> {
        let player = self.player.borrow();
        let items = self.player_items.borrow();
        let farm = self.farm.borrow();
        let rock = self.rock.borrow();
        let oak = self.oak.borrow();
        let slime = self.slime.borrow();
        let spawner = self.spawner.borrow();

        let hotbar_used = items.slots(ContainerType::Hotbar).iter_items().count();
        let spawned_active = spawner.children().iter().filter(|c| c.is_active()).count();

        vec![
            format!("Day {}", self.day),
            format!(
                "Player: health {:.1}, stamina {:.1}, at {}",
                player.health().current(),
                player.stamina().current(),
                player.position
            ),
            format!(
                "Items: {} money, {} wood, {} carrot, {} hotbar slots used",
                items.money(),
                items.item_count("wood"),
                items.item_count("carrot"),
                hotbar_used
            ),
            format!(
                "Chest: {} stone",
                self.chest.borrow().slots().count_item("stone")
            ),
            format!(
                "Farm: {} tilled, {} crops",
                farm.tilled_count(),
                farm.crop_count()
            ),
            format!(
                "Rock: health {}, destroyed {}",
                rock.health(),
                rock.is_destroyed()
            ),
            format!("Oak: health {:.1}, cut {}", oak.health(), oak.is_cut()),
            format!(
                "Slime: {} at {}",
                if slime.is_active() { "active" } else { "inactive" },
                slime.position
            ),
            format!(
                "Meadow: {} spawned ({} active), {:?}",
                spawner.children().len(),
                spawned_active,
                spawner.state()
            ),
            format!("Registered savables: {}", self.registry.len()),
        ]
    }
}

fn meadow_templates() -> Vec<SpawnTemplate> {
    vec![
        SpawnTemplate::new(
            "rock",
            6,
            Prefab::Rock {
                max_health: 3,
                respawn_secs: None,
            },
        ),
        SpawnTemplate::new(
            "tree",
            4,
            Prefab::Tree {
                max_health: 3.0,
                regrow_secs: 60.0,
            },
        ),
        SpawnTemplate::new("slime", 2, Prefab::Creature { max_health: 3.0 }),
        SpawnTemplate::new("bush", 5, Prefab::Decoration),
    ]
}
