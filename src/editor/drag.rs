use ratatui::layout::{Position, Rect};

use crate::model::tag::TagLabel;
use crate::util::unicode::display_width;

/// Horizontal padding inside a chip (one cell each side)
const CHIP_PADDING: u16 = 2;
/// Blank cells between neighbouring chips
const CHIP_GAP: u16 = 1;

/// Where one tag chip sits on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chip {
    pub label: TagLabel,
    pub rect: Rect,
}

/// Hit-test map of the tag strip: chips flow left to right and wrap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChipLayout {
    pub area: Rect,
    pub chips: Vec<Chip>,
}

impl ChipLayout {
    /// Lay out `labels` inside `area`. Chips that do not fit below the last
    /// row are left out; a label wider than the strip is clipped to it.
    pub fn compute(labels: &[TagLabel], area: Rect) -> Self {
        let mut chips = Vec::new();
        if area.width == 0 || area.height == 0 {
            return ChipLayout { area, chips };
        }
        let right = u32::from(area.x) + u32::from(area.width);
        let bottom = area.y.saturating_add(area.height);
        let mut x = area.x;
        let mut y = area.y;
        for label in labels {
            let width = chip_width(label).min(area.width);
            if x > area.x && u32::from(x) + u32::from(width) > right {
                x = area.x;
                y += 1;
            }
            if y >= bottom {
                break;
            }
            chips.push(Chip {
                label: label.clone(),
                rect: Rect::new(x, y, width, 1),
            });
            x = x.saturating_add(width.saturating_add(CHIP_GAP));
        }
        ChipLayout { area, chips }
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        self.area.contains(Position::new(column, row))
    }

    /// Index of the chip under the pointer
    pub fn hit(&self, column: u16, row: u16) -> Option<usize> {
        let pos = Position::new(column, row);
        self.chips.iter().position(|c| c.rect.contains(pos))
    }
}

/// Cells a chip needs for `label`, saturating for absurdly long labels
pub fn chip_width(label: &TagLabel) -> u16 {
    u16::try_from(display_width(label.as_str()))
        .unwrap_or(u16::MAX)
        .saturating_add(CHIP_PADDING)
}

/// Which side of the hovered chip the dragged tag would land on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropSide {
    Before,
    After,
}

/// Split `rect` at its horizontal midpoint; the pointer cell's centre decides.
pub fn drop_side(rect: Rect, column: u16) -> DropSide {
    let pointer = 2 * u32::from(column) + 1;
    let midpoint = 2 * u32::from(rect.x) + u32::from(rect.width);
    if pointer > midpoint {
        DropSide::After
    } else {
        DropSide::Before
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Drag,
    Up,
    /// Pointer left the window or the gesture was aborted by the host
    Leave,
}

/// A pointer event in terminal cell coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub column: u16,
    pub row: u16,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, column: u16, row: u16) -> Self {
        PointerEvent { kind, column, row }
    }
}

/// The move to apply to the collection when a drag is dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveCommand {
    pub label: TagLabel,
    pub to: usize,
}

/// An in-progress drag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub label: TagLabel,
    /// Position of the dragged tag when the drag began
    pub origin: usize,
    /// Visual order while dragging; the collection is untouched until drop
    pub preview: Vec<TagLabel>,
    /// Chip currently hovered and the side the tag would land on
    pub hover: Option<(TagLabel, DropSide)>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// What a pointer event did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    Ignored,
    Started,
    /// Preview order or hover side changed
    Previewed,
    /// Drop inside the strip; the caller commits the move
    Dropped(MoveCommand),
    /// Session discarded; the collection keeps its pre-drag order
    Cancelled,
}

/// Turns pointer gestures over the tag strip into collection moves.
///
/// One controller receives every pointer event for the strip and resolves
/// targets through the current [`ChipLayout`], so individual chips carry no
/// handlers. Reordering is previewed during the drag and committed once,
/// on drop.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Dragging(s) => Some(s),
            DragState::Idle => None,
        }
    }

    /// Dispatch one pointer event. `order` is the committed collection order
    /// and is only read when a drag starts.
    pub fn handle(
        &mut self,
        event: PointerEvent,
        layout: &ChipLayout,
        order: &[TagLabel],
    ) -> DragOutcome {
        match event.kind {
            PointerKind::Down => self.begin(event, layout, order),
            PointerKind::Drag => self.over(event, layout),
            PointerKind::Up => {
                if layout.contains(event.column, event.row) {
                    self.drop_session()
                } else {
                    self.cancel()
                }
            }
            PointerKind::Leave => self.cancel(),
        }
    }

    fn begin(&mut self, event: PointerEvent, layout: &ChipLayout, order: &[TagLabel]) -> DragOutcome {
        if self.is_dragging() {
            return DragOutcome::Ignored;
        }
        let Some(idx) = layout.hit(event.column, event.row) else {
            return DragOutcome::Ignored;
        };
        let label = layout.chips[idx].label.clone();
        let Some(origin) = order.iter().position(|l| *l == label) else {
            return DragOutcome::Ignored;
        };
        self.state = DragState::Dragging(DragSession {
            label,
            origin,
            preview: order.to_vec(),
            hover: None,
        });
        DragOutcome::Started
    }

    fn over(&mut self, event: PointerEvent, layout: &ChipLayout) -> DragOutcome {
        let DragState::Dragging(session) = &mut self.state else {
            return DragOutcome::Ignored;
        };
        let Some(idx) = layout.hit(event.column, event.row) else {
            return DragOutcome::Ignored;
        };
        let chip = &layout.chips[idx];
        if chip.label == session.label {
            return DragOutcome::Ignored;
        }
        let side = drop_side(chip.rect, event.column);
        let hover = Some((chip.label.clone(), side));
        if session.hover == hover {
            return DragOutcome::Ignored;
        }
        session.hover = hover;
        reposition(&mut session.preview, &session.label, &chip.label, side);
        DragOutcome::Previewed
    }

    fn drop_session(&mut self) -> DragOutcome {
        match std::mem::take(&mut self.state) {
            DragState::Dragging(session) => {
                let to = session
                    .preview
                    .iter()
                    .position(|l| *l == session.label)
                    .unwrap_or(session.origin);
                DragOutcome::Dropped(MoveCommand {
                    label: session.label,
                    to,
                })
            }
            DragState::Idle => DragOutcome::Ignored,
        }
    }

    /// Abort the drag, discarding the preview.
    pub fn cancel(&mut self) -> DragOutcome {
        match std::mem::take(&mut self.state) {
            DragState::Dragging(_) => DragOutcome::Cancelled,
            DragState::Idle => DragOutcome::Ignored,
        }
    }
}

/// Move `dragged` next to `target` in `order`.
fn reposition(order: &mut Vec<TagLabel>, dragged: &TagLabel, target: &TagLabel, side: DropSide) {
    let Some(from) = order.iter().position(|l| l == dragged) else {
        return;
    };
    let label = order.remove(from);
    let Some(at) = order.iter().position(|l| l == target) else {
        order.insert(from, label);
        return;
    };
    let at = match side {
        DropSide::Before => at,
        DropSide::After => at + 1,
    };
    order.insert(at, label);
}
