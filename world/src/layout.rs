//! Door grid geometry used for hit testing.

use bertha_knockout_core::{RoundConfig, ScreenPoint, SlotId, SlotRect};

/// Canvas width assumed until an adapter reports its real size.
pub(crate) const DEFAULT_CANVAS_WIDTH: f32 = 820.0;
/// Canvas height assumed until an adapter reports its real size (3:4 aspect).
pub(crate) const DEFAULT_CANVAS_HEIGHT: f32 = 1_093.0;

/// Vertical space reserved above the grid for the title banner.
const BANNER_OFFSET: f32 = 60.0;
/// Height trimmed from the usable area so the rows sit closer together.
const ROW_TIGHTENING: f32 = 40.0;

/// Door rectangles for every slot, indexed by [`SlotId`].
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct SlotLayout {
    rects: Vec<SlotRect>,
}

impl SlotLayout {
    /// Lays out `rows × columns` doors evenly over the canvas.
    pub(crate) fn new(config: &RoundConfig, width: f32, height: f32) -> Self {
        let padding = config.grid_padding;
        let usable_width = (width - padding * 2.0).max(0.0);
        let usable_height = (height - padding * 2.0 - ROW_TIGHTENING).max(0.0);
        let cell_width = usable_width / config.columns.max(1) as f32;
        let cell_height = usable_height / config.rows.max(1) as f32;

        let mut rects = Vec::with_capacity(config.slot_count() as usize);
        for row in 0..config.rows {
            for column in 0..config.columns {
                let center = ScreenPoint::new(
                    padding + column as f32 * cell_width + cell_width / 2.0,
                    padding + BANNER_OFFSET + row as f32 * cell_height + cell_height / 2.0,
                );
                rects.push(SlotRect::from_center(
                    center,
                    config.door_width,
                    config.door_height,
                ));
            }
        }

        Self { rects }
    }

    pub(crate) fn len(&self) -> usize {
        self.rects.len()
    }

    pub(crate) fn rect(&self, slot: SlotId) -> Option<SlotRect> {
        self.rects.get(slot.get() as usize).copied()
    }

    pub(crate) fn rects(&self) -> &[SlotRect] {
        &self.rects
    }

    pub(crate) fn slot_ids(&self) -> impl Iterator<Item = SlotId> + '_ {
        (0..self.rects.len()).map(|index| SlotId::new(index as u32))
    }

    /// Reports whether the point falls inside the door of `slot`.
    pub(crate) fn slot_contains(&self, slot: SlotId, point: ScreenPoint) -> bool {
        self.rect(slot).is_some_and(|rect| rect.contains(point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_has_row_major_slots() {
        let config = RoundConfig::default();
        let layout = SlotLayout::new(&config, 840.0, 1_000.0);

        assert_eq!(layout.len(), 8);
        let first = layout.rect(SlotId::new(0)).expect("first slot");
        let fifth = layout.rect(SlotId::new(4)).expect("fifth slot");

        // usable width 760 / 4 columns = 190 per cell.
        assert_eq!(first.center(), ScreenPoint::new(135.0, 100.0 + 440.0 / 2.0));
        assert_eq!(fifth.center().x, first.center().x);
        assert!(fifth.center().y > first.center().y);
        assert_eq!(first.width(), 120.0);
        assert_eq!(first.height(), 180.0);
    }

    #[test]
    fn slot_contains_checks_only_its_door() {
        let config = RoundConfig::default();
        let layout = SlotLayout::new(&config, 840.0, 1_000.0);
        let center = layout.rect(SlotId::new(1)).expect("slot").center();

        assert!(layout.slot_contains(SlotId::new(1), center));
        assert!(!layout.slot_contains(SlotId::new(0), center));
        assert!(!layout.slot_contains(SlotId::new(99), center));
    }
}
