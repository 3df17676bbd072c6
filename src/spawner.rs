//! Resource spawner
//!
//! A spawner scatters rocks, trees, creatures and decorations inside an area
//! and owns every child it creates. Children get generated identifiers that
//! change every run, so they are never registered with the save registry.
//! Instead the spawner persists one [`ChildRecord`] per child and rebuilds
//! the whole set from its templates on load.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized --start()---> PopulatedFresh
//!       |
//!       +------restore()----> PopulatedFromSave <--restore()-- (any state)
//! ```
//!
//! `start()` only populates an uninitialized spawner, so a spawner restored
//! before it started is not populated twice.

use crate::creature::Creature;
use crate::item::ItemStack;
use crate::resource::MineableResource;
use crate::save::{SaveError, Saveable, Snapshot, UniqueId};
use crate::transform::{Transform, cell_of};
use crate::tree::Tree;
use glam::{IVec2, Quat, Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, error, info, warn};

/// What a template instantiates
#[derive(Debug, Clone, PartialEq)]
pub enum Prefab {
    Rock {
        max_health: u32,
        /// `None` for nodes that never come back
        respawn_secs: Option<f32>,
    },
    Tree {
        max_health: f32,
        regrow_secs: f32,
    },
    Creature {
        max_health: f32,
    },
    /// Scenery with no state of its own
    Decoration,
}

/// One row of the spawner's configuration table
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnTemplate {
    /// Template identity written to the save file
    pub name: String,
    pub count: usize,
    pub prefab: Prefab,
}

impl SpawnTemplate {
    pub fn new(name: impl Into<String>, count: usize, prefab: Prefab) -> Self {
        SpawnTemplate {
            name: name.into(),
            count,
            prefab,
        }
    }
}

/// Rectangle children may be placed in, minus blocked grid cells
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnArea {
    pub min: Vec2,
    pub max: Vec2,
    /// Cells covered by water, paths, buildings and the like
    pub blocked_cells: HashSet<IVec2>,
    pub cell_size: f32,
}

impl SpawnArea {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        SpawnArea {
            min: min.min(max),
            max: max.max(min),
            blocked_cells: HashSet::new(),
            cell_size: 1.0,
        }
    }

    pub fn with_blocked_cells(mut self, cells: impl IntoIterator<Item = IVec2>) -> Self {
        self.blocked_cells.extend(cells);
        self
    }

    pub fn contains(&self, position: Vec3) -> bool {
        position.x >= self.min.x
            && position.x <= self.max.x
            && position.y >= self.min.y
            && position.y <= self.max.y
    }

    pub fn is_blocked(&self, position: Vec3) -> bool {
        self.blocked_cells
            .contains(&cell_of(position, self.cell_size))
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        Vec3::new(
            sample_axis(rng, self.min.x, self.max.x),
            sample_axis(rng, self.min.y, self.max.y),
            0.0,
        )
    }
}

fn sample_axis<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if lo < hi { rng.random_range(lo..hi) } else { lo }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementRules {
    pub min_distance: f32,
    /// Tries per child before it is given up on
    pub max_attempts: u32,
}

impl Default for PlacementRules {
    fn default() -> Self {
        PlacementRules {
            min_distance: 1.0,
            max_attempts: 20,
        }
    }
}

/// Behavior attached to a spawned child
pub enum ChildBody {
    Resource(MineableResource),
    Tree(Tree),
    Creature(Creature),
    Decoration,
}

impl ChildBody {
    fn instantiate(prefab: &Prefab, position: Vec3) -> Self {
        match *prefab {
            Prefab::Rock {
                max_health,
                respawn_secs,
            } => ChildBody::Resource(MineableResource::new(
                UniqueId::generated(),
                position,
                max_health,
                respawn_secs,
                ItemStack::new("stone", 2),
            )),
            Prefab::Tree {
                max_health,
                regrow_secs,
            } => ChildBody::Tree(Tree::new(
                UniqueId::generated(),
                position,
                max_health,
                regrow_secs,
            )),
            Prefab::Creature { max_health } => {
                ChildBody::Creature(Creature::new(UniqueId::generated(), position, max_health))
            }
            Prefab::Decoration => ChildBody::Decoration,
        }
    }

    /// The child's own capture/restore contract, if it has one
    pub fn as_saveable(&self) -> Option<&dyn Saveable> {
        match self {
            ChildBody::Resource(resource) => Some(resource),
            ChildBody::Tree(tree) => Some(tree),
            ChildBody::Creature(creature) => Some(creature),
            ChildBody::Decoration => None,
        }
    }

    pub fn as_saveable_mut(&mut self) -> Option<&mut dyn Saveable> {
        match self {
            ChildBody::Resource(resource) => Some(resource),
            ChildBody::Tree(tree) => Some(tree),
            ChildBody::Creature(creature) => Some(creature),
            ChildBody::Decoration => None,
        }
    }

    fn update(&mut self, dt: f32) {
        match self {
            ChildBody::Resource(resource) => resource.update(dt),
            ChildBody::Tree(tree) => tree.update(dt),
            ChildBody::Creature(creature) => creature.update(dt),
            ChildBody::Decoration => {}
        }
    }
}

pub struct SpawnedChild {
    /// Name of the template this child was built from
    pub template: String,
    pub transform: Transform,
    /// Only meaningful for bodies without their own contract
    active: bool,
    pub body: ChildBody,
}

impl SpawnedChild {
    /// A body with its own contract owns the flag, so a mined rock or a
    /// killed creature reads as inactive here too
    pub fn is_active(&self) -> bool {
        self.body
            .as_saveable()
            .map_or(self.active, |saveable| saveable.is_active())
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        if let Some(saveable) = self.body.as_saveable_mut() {
            saveable.set_active(active);
        }
    }
}

/// Persisted form of one spawned child
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildRecord {
    pub prefab_name: String,
    pub position: [f32; 3],
    /// Quaternion as x, y, z, w
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
    pub is_active: bool,
    /// The child's own snapshot, for children that have one
    #[serde(default)]
    pub object_state: Option<Box<Snapshot>>,
}

impl ChildRecord {
    pub fn transform(&self) -> Transform {
        Transform {
            position: Vec3::from_array(self.position),
            rotation: Quat::from_array(self.rotation),
            scale: Vec3::from_array(self.scale),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnerState {
    Uninitialized,
    PopulatedFresh,
    PopulatedFromSave,
}

pub struct ResourceSpawner {
    id: UniqueId,
    active: bool,
    templates: Vec<SpawnTemplate>,
    area: SpawnArea,
    rules: PlacementRules,
    children: Vec<SpawnedChild>,
    /// Grid cell -> indices into `children`
    occupancy: HashMap<IVec2, Vec<usize>>,
    state: SpawnerState,
}

impl ResourceSpawner {
    pub fn new(
        id: UniqueId,
        templates: Vec<SpawnTemplate>,
        area: SpawnArea,
        rules: PlacementRules,
    ) -> Self {
        ResourceSpawner {
            id,
            active: true,
            templates,
            area,
            rules,
            children: Vec::new(),
            occupancy: HashMap::new(),
            state: SpawnerState::Uninitialized,
        }
    }

    pub fn state(&self) -> SpawnerState {
        self.state
    }

    pub fn children(&self) -> &[SpawnedChild] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [SpawnedChild] {
        &mut self.children
    }

    pub fn templates(&self) -> &[SpawnTemplate] {
        &self.templates
    }

    /// Drops a template from the configuration table
    ///
    /// Children already built from it stay until the next spawn or restore.
    pub fn remove_template(&mut self, name: &str) -> Option<SpawnTemplate> {
        let index = self.templates.iter().position(|t| t.name == name)?;
        Some(self.templates.remove(index))
    }

    /// Indices of the children standing in a grid cell
    pub fn children_in_cell(&self, cell: IVec2) -> &[usize] {
        self.occupancy.get(&cell).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_cell_occupied(&self, cell: IVec2) -> bool {
        !self.children_in_cell(cell).is_empty()
    }

    /// Populates the spawner if nothing has populated it yet
    ///
    /// Returns true if it spawned.
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.state != SpawnerState::Uninitialized {
            debug!(id = self.id.as_str(), state = ?self.state, "Spawner already populated");
            return false;
        }
        self.spawn_initial(rng);
        true
    }

    /// Destroys every child and scatters a fresh set from the templates
    ///
    /// Returns how many children were placed. A child that finds no valid
    /// position within `max_attempts` tries is skipped.
    pub fn spawn_initial<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        self.children.clear();

        let mut failed = 0;
        for template_index in 0..self.templates.len() {
            let count = self.templates[template_index].count;
            for _ in 0..count {
                match self.find_position(rng) {
                    Some(position) => {
                        let child = self.instantiate(template_index, Transform::at(position));
                        self.children.push(child);
                    }
                    None => failed += 1,
                }
            }
        }

        self.rebuild_index();
        self.state = SpawnerState::PopulatedFresh;

        if failed > 0 {
            warn!(id = self.id.as_str(), failed, "Could not place every spawn");
        }
        info!(id = self.id.as_str(), placed = self.children.len(), "Spawner populated");
        self.children.len()
    }

    pub fn update(&mut self, dt: f32) {
        for child in &mut self.children {
            child.body.update(dt);
        }
    }

    fn find_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Vec3> {
        (0..self.rules.max_attempts)
            .map(|_| self.area.sample(rng))
            .find(|&position| self.is_valid_placement(position))
    }

    fn is_valid_placement(&self, position: Vec3) -> bool {
        self.area.contains(position)
            && !self.area.is_blocked(position)
            && self.children.iter().all(|child| {
                child.transform.position.distance(position) >= self.rules.min_distance
            })
    }

    fn instantiate(&self, template_index: usize, transform: Transform) -> SpawnedChild {
        let template = &self.templates[template_index];
        SpawnedChild {
            template: template.name.clone(),
            transform,
            active: true,
            body: ChildBody::instantiate(&template.prefab, transform.position),
        }
    }

    fn rebuild_index(&mut self) {
        self.occupancy.clear();
        for (index, child) in self.children.iter().enumerate() {
            let cell = cell_of(child.transform.position, self.area.cell_size);
            self.occupancy.entry(cell).or_default().push(index);
        }
    }
}

impl Saveable for ResourceSpawner {
    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn capture(&self) -> Snapshot {
        let records = self
            .children
            .iter()
            .map(|child| ChildRecord {
                prefab_name: child.template.clone(),
                position: child.transform.position.to_array(),
                rotation: child.transform.rotation.to_array(),
                scale: child.transform.scale.to_array(),
                is_active: child.is_active(),
                object_state: child
                    .body
                    .as_saveable()
                    .map(|saveable| Box::new(saveable.capture())),
            })
            .collect();
        Snapshot::Spawner(records)
    }

    fn restore(&mut self, snapshot: &Snapshot) -> Result<(), SaveError> {
        let Snapshot::Spawner(records) = snapshot else {
            return Err(SaveError::mismatch(self.id(), "spawner", snapshot));
        };

        self.state = SpawnerState::PopulatedFromSave;
        self.children.clear();

        let mut skipped = 0;
        for record in records {
            let Some(template_index) = self
                .templates
                .iter()
                .position(|t| t.name == record.prefab_name)
            else {
                warn!(
                    id = self.id.as_str(),
                    prefab = %record.prefab_name,
                    "No template for saved child, dropping it"
                );
                skipped += 1;
                continue;
            };

            let mut child = self.instantiate(template_index, record.transform());

            match (record.object_state.as_deref(), child.body.as_saveable_mut()) {
                (Some(nested), Some(saveable)) => {
                    if let Err(e) = saveable.restore(nested) {
                        error!(id = self.id.as_str(), prefab = %record.prefab_name, "Failed to restore child: {e}");
                    }
                }
                (Some(_), None) => {
                    warn!(prefab = %record.prefab_name, "Saved child state ignored, template has none");
                }
                _ => {}
            }
            // Last, so the nested restore cannot override the recorded flag
            child.set_active(record.is_active);

            self.children.push(child);
        }

        self.rebuild_index();
        debug!(
            id = self.id.as_str(),
            restored = self.children.len(),
            skipped,
            "Spawner restored"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn templates() -> Vec<SpawnTemplate> {
        vec![
            SpawnTemplate::new(
                "rock",
                3,
                Prefab::Rock {
                    max_health: 3,
                    respawn_secs: Some(30.0),
                },
            ),
            SpawnTemplate::new(
                "tree",
                2,
                Prefab::Tree {
                    max_health: 3.0,
                    regrow_secs: 20.0,
                },
            ),
            SpawnTemplate::new("slime", 1, Prefab::Creature { max_health: 3.0 }),
            SpawnTemplate::new("flowers", 2, Prefab::Decoration),
        ]
    }

    fn spawner() -> ResourceSpawner {
        ResourceSpawner::new(
            UniqueId::authored("meadow-spawner"),
            templates(),
            SpawnArea::new(Vec2::ZERO, Vec2::new(20.0, 20.0)),
            PlacementRules {
                min_distance: 1.0,
                max_attempts: 50,
            },
        )
    }

    fn count_template(spawner: &ResourceSpawner, name: &str) -> usize {
        spawner
            .children()
            .iter()
            .filter(|child| child.template == name)
            .count()
    }

    #[test]
    fn test_spawn_respects_placement_rules() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut spawner = spawner();

        assert_eq!(spawner.spawn_initial(&mut rng), 8);
        assert_eq!(spawner.state(), SpawnerState::PopulatedFresh);

        let children = spawner.children();
        for (i, a) in children.iter().enumerate() {
            assert!(spawner.area.contains(a.transform.position));
            for b in &children[i + 1..] {
                assert!(a.transform.position.distance(b.transform.position) >= 1.0);
            }
        }
    }

    #[test]
    fn test_blocked_area_places_nothing() {
        let mut rng = Pcg32::seed_from_u64(3);
        let area = SpawnArea::new(Vec2::ZERO, Vec2::new(2.0, 2.0)).with_blocked_cells([
            IVec2::new(0, 0),
            IVec2::new(0, 1),
            IVec2::new(1, 0),
            IVec2::new(1, 1),
        ]);
        let mut spawner = ResourceSpawner::new(
            UniqueId::generated(),
            templates(),
            area,
            PlacementRules::default(),
        );

        assert_eq!(spawner.spawn_initial(&mut rng), 0);
    }

    #[test]
    fn test_round_trip_reconstructs_every_child() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut source = spawner();
        source.start(&mut rng);
        let n = source.children().len();

        // Break a rock and hide a decoration so nested and node state differ
        if let ChildBody::Resource(rock) = &mut source.children_mut()[0].body {
            rock.on_hit(10);
        }
        source.children_mut()[n - 1].set_active(false);

        let before: Vec<(String, Transform, bool)> = source
            .children()
            .iter()
            .map(|c| (c.template.clone(), c.transform, c.is_active()))
            .collect();
        let snapshot = source.capture();

        let mut restored = spawner();
        restored.restore(&snapshot).unwrap();

        assert_eq!(restored.children().len(), n);
        for (child, (template, transform, active)) in restored.children().iter().zip(&before) {
            assert_eq!(&child.template, template);
            assert!(child.transform.approx_eq(transform, 1e-5));
            assert_eq!(child.is_active(), *active);
        }
        match &restored.children()[0].body {
            ChildBody::Resource(rock) => {
                assert!(rock.is_destroyed());
                assert!(rock.is_respawning());
            }
            _ => panic!("first child should be a rock"),
        }
        assert_eq!(restored.capture(), snapshot);
    }

    #[test]
    fn test_removed_template_drops_its_children() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut spawner = spawner();
        spawner.start(&mut rng);
        let n = spawner.children().len();
        let snapshot = spawner.capture();

        spawner.remove_template("slime");
        spawner.restore(&snapshot).unwrap();

        assert_eq!(spawner.children().len(), n - 1);
        assert_eq!(count_template(&spawner, "slime"), 0);
        assert_eq!(count_template(&spawner, "rock"), 3);
    }

    #[test]
    fn test_restore_rebuilds_occupancy_index() {
        let mut source = spawner();
        source.start(&mut Pcg32::seed_from_u64(1));
        let snapshot = source.capture();

        let mut target = spawner();
        target.start(&mut Pcg32::seed_from_u64(2));
        target.restore(&snapshot).unwrap();

        let indexed: usize = target.occupancy.values().map(Vec::len).sum();
        assert_eq!(indexed, target.children().len());
        for (index, child) in target.children().iter().enumerate() {
            let cell = cell_of(child.transform.position, 1.0);
            assert!(target.children_in_cell(cell).contains(&index));
        }
    }

    #[test]
    fn test_restore_before_start_prevents_double_population() {
        let mut source = spawner();
        source.start(&mut Pcg32::seed_from_u64(5));
        let snapshot = source.capture();

        let mut spawner = spawner();
        assert_eq!(spawner.state(), SpawnerState::Uninitialized);
        spawner.restore(&snapshot).unwrap();
        assert_eq!(spawner.state(), SpawnerState::PopulatedFromSave);

        assert!(!spawner.start(&mut Pcg32::seed_from_u64(6)));
        assert_eq!(spawner.children().len(), source.children().len());
    }

    #[test]
    fn test_restore_empty_record_list_clears_children() {
        let mut spawner = spawner();
        spawner.start(&mut Pcg32::seed_from_u64(9));

        spawner.restore(&Snapshot::Spawner(Vec::new())).unwrap();
        assert!(spawner.children().is_empty());
        assert!(spawner.occupancy.is_empty());
    }

    #[test]
    fn test_restore_rejects_other_kinds() {
        let mut spawner = spawner();
        spawner.start(&mut Pcg32::seed_from_u64(4));
        let n = spawner.children().len();

        let result = spawner.restore(&Snapshot::Farm(Default::default()));
        assert!(matches!(result, Err(SaveError::SnapshotMismatch { .. })));
        assert_eq!(spawner.children().len(), n);
        assert_eq!(spawner.state(), SpawnerState::PopulatedFresh);
    }

    #[test]
    fn test_child_record_json_shape() {
        let mut spawner = spawner();
        spawner.start(&mut Pcg32::seed_from_u64(8));

        let value = serde_json::to_value(spawner.capture()).unwrap();
        let first = &value["state"][0];
        assert_eq!(first["prefab_name"], "rock");
        assert_eq!(first["rotation"], serde_json::json!([0.0, 0.0, 0.0, 1.0]));
        assert_eq!(first["object_state"]["kind"], "resource");
    }

    #[test]
    fn test_destroyed_child_is_recorded_inactive() {
        let mut spawner = spawner();
        spawner.start(&mut Pcg32::seed_from_u64(12));

        let child = &mut spawner.children_mut()[0];
        if let ChildBody::Resource(rock) = &mut child.body {
            assert!(rock.on_hit(10).is_some());
        }
        assert!(!child.is_active());

        let Snapshot::Spawner(records) = spawner.capture() else {
            panic!("spawner should capture a spawner snapshot");
        };
        assert!(!records[0].is_active);
        assert!(records[1..].iter().all(|record| record.is_active));
    }

    #[test]
    fn test_rejected_child_state_keeps_fresh_child() {
        let mut source = spawner();
        source.start(&mut Pcg32::seed_from_u64(13));
        let Snapshot::Spawner(mut records) = source.capture() else {
            panic!("spawner should capture a spawner snapshot");
        };
        records[0].object_state = Some(Box::new(Snapshot::Farm(Default::default())));
        let expected = records[0].transform();

        let mut target = spawner();
        target.restore(&Snapshot::Spawner(records)).unwrap();

        assert_eq!(target.children().len(), source.children().len());
        let child = &target.children()[0];
        assert_eq!(child.template, "rock");
        assert!(child.transform.approx_eq(&expected, 1e-5));
        assert!(child.is_active());
        match &child.body {
            ChildBody::Resource(rock) => {
                assert_eq!(rock.health(), 3);
                assert!(!rock.is_destroyed());
            }
            _ => panic!("first child should be a rock"),
        }
    }
}
