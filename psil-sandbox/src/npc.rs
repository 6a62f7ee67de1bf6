//! The NPC table (`spec.md §4.I`): fixed-size, pre-allocated rows.

/// One NPC's state. `id == 0` denotes an empty slot (`spec.md §4.I`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NpcRow {
    pub id: u32,
    pub x: i32,
    pub y: i32,
    pub health: i32,
    pub energy: i32,
    pub hunger: i32,
    pub age: u32,
    pub food_eaten: u32,
    pub fitness: i64,
}

impl NpcRow {
    const fn empty() -> Self {
        Self { id: 0, x: 0, y: 0, health: 0, energy: 0, hunger: 0, age: 0, food_eaten: 0, fitness: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.id == 0
    }

    /// Reset the bookkeeping fields a fresh generation starts with
    /// (`spec.md §4.L` step 4), keeping `id` and position separate from
    /// this call since those are assigned by the caller.
    pub fn reset_for_new_generation(&mut self) {
        self.health = 100;
        self.energy = 100;
        self.age = 0;
        self.hunger = 0;
        self.food_eaten = 0;
        self.fitness = 0;
    }

    /// `spec.md §4.K` step 1.f.
    pub fn recompute_fitness(&mut self) {
        self.fitness = self.age as i64 + 10 * self.food_eaten as i64 + self.health as i64;
    }
}

/// A fixed-capacity table of NPC rows, indexed by row number.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NpcTable {
    rows: Vec<NpcRow>,
}

impl NpcTable {
    pub fn new(capacity: usize) -> Self {
        Self { rows: vec![NpcRow::empty(); capacity] }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, row: usize) -> &NpcRow {
        &self.rows[row]
    }

    pub fn get_mut(&mut self, row: usize) -> &mut NpcRow {
        &mut self.rows[row]
    }

    pub fn rows(&self) -> &[NpcRow] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [NpcRow] {
        &mut self.rows
    }

    /// First empty slot, or `None` if the table is full (`spec.md §4.I`).
    pub fn allocate(&self) -> Option<usize> {
        self.rows.iter().position(NpcRow::is_empty)
    }

    /// Zero `id`; the caller is responsible for clearing the tile occupant
    /// (`spec.md §4.I`), since that requires the tile world this table
    /// doesn't own.
    pub fn kill(&mut self, row: usize) {
        self.rows[row] = NpcRow::empty();
    }

    pub fn alive_count(&self) -> usize {
        self.rows.iter().filter(|r| !r.is_empty()).count()
    }
}
