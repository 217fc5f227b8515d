#![allow(dead_code)]

//! Shared fixtures for gridshift integration tests.

use std::time::Duration;

use gridshift::{
    DragController, GeometryProvider, GridCallbacks, GridConfig, GridHost, Point, PointerEvent,
    PointerId, Rect, ScrollController, ScrollMetrics, Size,
};
use web_time::Instant;

pub const POINTER: PointerId = PointerId(7);
pub const FRAME: Duration = Duration::from_millis(16);

/// Scrollable viewport with a vertical offset.
#[derive(Debug, Clone)]
pub struct MockScroll {
    pub offset: f32,
    pub max_extent: f32,
    pub viewport: Rect,
    pub reversed: bool,
    pub writes: Vec<f32>,
}

impl ScrollController for MockScroll {
    fn metrics(&self) -> ScrollMetrics {
        ScrollMetrics {
            offset: self.offset,
            min_extent: 0.0,
            max_extent: self.max_extent,
            viewport: self.viewport,
            axis: gridshift::Axis::Vertical,
            reversed: self.reversed,
        }
    }

    fn set_offset(&mut self, offset: f32) {
        self.offset = offset;
        self.writes.push(offset);
    }
}

/// A fixed-column grid of equal cells laid out top to bottom.
#[derive(Debug, Clone)]
pub struct GridFixture {
    pub columns: usize,
    pub cell: Size,
    pub count: usize,
    /// Combine only items of equal parity.
    pub parity_combine: bool,
    pub scroll: Option<MockScroll>,
    pub reorders: Vec<(usize, usize)>,
    pub combines: Vec<(usize, usize)>,
}

impl GridFixture {
    pub fn new(columns: usize, count: usize) -> Self {
        Self {
            columns,
            cell: Size::new(100.0, 100.0),
            count,
            parity_combine: false,
            scroll: None,
            reorders: Vec::new(),
            combines: Vec::new(),
        }
    }

    /// Attach a scroll viewport `rows` cells tall.
    pub fn with_viewport_rows(mut self, rows: usize) -> Self {
        let total_rows = self.count.div_ceil(self.columns);
        let height = rows as f32 * self.cell.height;
        self.scroll = Some(MockScroll {
            offset: 0.0,
            max_extent: (total_rows as f32 * self.cell.height - height).max(0.0),
            viewport: Rect::new(0.0, 0.0, self.columns as f32 * self.cell.width, height),
            reversed: false,
            writes: Vec::new(),
        });
        self
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll.as_ref().map_or(0.0, |s| s.offset)
    }

    pub fn center_of(&self, index: usize) -> Point {
        self.rect_of(index).map_or(Point::ZERO, |r| r.center())
    }

    pub fn callbacks(&self) -> usize {
        self.reorders.len() + self.combines.len()
    }
}

impl GeometryProvider for GridFixture {
    fn item_count(&self) -> usize {
        self.count
    }

    fn rect_of(&self, index: usize) -> Option<Rect> {
        if index >= self.count {
            return None;
        }
        let col = index % self.columns;
        let row = index / self.columns;
        Some(Rect::new(
            col as f32 * self.cell.width,
            row as f32 * self.cell.height - self.scroll_offset(),
            self.cell.width,
            self.cell.height,
        ))
    }
}

impl GridCallbacks for GridFixture {
    fn can_combine(&self, dragged: usize, target: usize) -> bool {
        self.parity_combine && dragged % 2 == target % 2
    }

    fn on_reorder(&mut self, old_index: usize, new_index: usize) {
        self.reorders.push((old_index, new_index));
    }

    fn on_combine(&mut self, dragged: usize, target: usize) {
        self.combines.push((dragged, target));
    }
}

impl GridHost for GridFixture {
    fn scroll_controller(&mut self) -> Option<&mut dyn ScrollController> {
        self.scroll.as_mut().map(|s| s as &mut dyn ScrollController)
    }
}

/// A controller with every fixture item registered under identity `100 + i`.
pub fn controller_for(grid: &GridFixture, config: GridConfig) -> DragController {
    let mut controller = DragController::new(config).expect("valid config");
    for index in 0..grid.count {
        controller.register_item(grid, 100 + index as u64, index);
    }
    controller
}

/// Drives a controller with a clock that only moves when asked.
pub struct Driver {
    pub controller: DragController,
    pub grid: GridFixture,
    pub now: Instant,
    pub position: Point,
}

impl Driver {
    pub fn new(grid: GridFixture, config: GridConfig) -> Self {
        let controller = controller_for(&grid, config);
        Self {
            controller,
            grid,
            now: Instant::now(),
            position: Point::ZERO,
        }
    }

    pub fn down_on(&mut self, index: usize) -> gridshift::DragTransition {
        self.position = self.grid.center_of(index);
        self.controller
            .pointer_down(
                &mut self.grid,
                index,
                &PointerEvent::down(POINTER, self.position),
                self.now,
            )
            .expect("pointer down")
    }

    pub fn move_to(&mut self, to: Point) -> gridshift::DragTransition {
        self.position = to;
        self.controller
            .pointer_move(&mut self.grid, &PointerEvent::moved(POINTER, to), self.now)
    }

    pub fn up(&mut self) -> gridshift::DragTransition {
        self.controller
            .pointer_up(&mut self.grid, &PointerEvent::up(POINTER, self.position), self.now)
    }

    pub fn advance(&mut self, by: Duration) -> gridshift::DragTransition {
        self.now += by;
        self.controller.tick(&mut self.grid, self.now)
    }

    /// Tick frame by frame until nothing animates or `limit` frames pass.
    pub fn settle(&mut self, limit: usize) -> Vec<gridshift::DragTransition> {
        let mut transitions = Vec::new();
        for _ in 0..limit {
            let t = self.advance(FRAME);
            let done = t.is_noop() || !self.controller.has_pending_animations();
            transitions.push(t);
            if done && self.controller.phase().is_idle() {
                break;
            }
        }
        transitions
    }
}
