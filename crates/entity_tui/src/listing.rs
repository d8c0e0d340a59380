use voxel_api_core::{EntityId, EntityInfo};

/// The entity table: rows sorted by id, a selection, and the first visible row.
///
/// The selection is always inside the visible window, and the window never
/// runs past the end of the list when the list is long enough to fill it.
#[derive(Debug, Clone)]
pub struct EntityList {
    entities: Vec<EntityInfo>,
    selected: usize,
    scroll_offset: usize,
    visible_rows: usize,
}

impl EntityList {
    pub fn new(visible_rows: usize) -> Self {
        Self {
            entities: Vec::new(),
            selected: 0,
            scroll_offset: 0,
            visible_rows: visible_rows.max(1),
        }
    }

    /// Swaps in a fresh listing, keeping the selection index where possible.
    pub fn replace(&mut self, mut entities: Vec<EntityInfo>) {
        entities.sort_by_key(|e| e.entity_id);
        self.entities = entities;
        self.clamp();
    }

    /// Swaps in a fresh listing and goes back to the top.
    pub fn reset(&mut self, entities: Vec<EntityInfo>) {
        self.selected = 0;
        self.scroll_offset = 0;
        self.replace(entities);
    }

    pub fn set_visible_rows(&mut self, rows: usize) {
        self.visible_rows = rows.max(1);
        self.clamp();
    }

    /// Returns whether the selection moved.
    pub fn select_next(&mut self) -> bool {
        if self.selected + 1 >= self.entities.len() {
            return false;
        }
        self.selected += 1;
        self.clamp();
        true
    }

    pub fn select_prev(&mut self) -> bool {
        if self.selected == 0 {
            return false;
        }
        self.selected -= 1;
        self.clamp();
        true
    }

    pub fn select_id(&mut self, entity_id: EntityId) -> bool {
        match self.entities.iter().position(|e| e.entity_id == entity_id) {
            Some(index) => {
                self.selected = index;
                self.clamp();
                true
            }
            None => false,
        }
    }

    pub fn selected(&self) -> Option<&EntityInfo> {
        self.entities.get(self.selected)
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    #[cfg(test)]
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    #[cfg(test)]
    pub fn visible_rows(&self) -> usize {
        self.visible_rows
    }

    /// Rows inside the window, paired with their absolute index.
    pub fn visible(&self) -> impl Iterator<Item = (usize, &EntityInfo)> {
        self.entities
            .iter()
            .enumerate()
            .skip(self.scroll_offset)
            .take(self.visible_rows)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn newest_id(&self) -> Option<EntityId> {
        self.entities.last().map(|e| e.entity_id)
    }

    /// Table title, e.g. `Entities (1-10 of 42)`.
    pub fn title(&self) -> String {
        if self.is_empty() {
            return "Entities (0)".to_string();
        }
        let start = self.scroll_offset + 1;
        let end = (self.scroll_offset + self.visible_rows).min(self.len());
        format!("Entities ({start}-{end} of {})", self.len())
    }

    fn clamp(&mut self) {
        if self.entities.is_empty() {
            self.selected = 0;
            self.scroll_offset = 0;
            return;
        }

        self.selected = self.selected.min(self.entities.len() - 1);
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + self.visible_rows {
            self.scroll_offset = self.selected + 1 - self.visible_rows;
        }
        self.scroll_offset = self
            .scroll_offset
            .min(self.entities.len().saturating_sub(self.visible_rows));
    }
}
