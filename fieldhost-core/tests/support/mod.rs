#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use fieldhost_core::{
    AlwaysFocusable, DisplaySurface, FocusClassifier, ItemDescriptor, ItemId, Rect,
    ResourceError, ResourceFactory, SurfaceError, VirtualizationSettings, VirtualizingPanel,
};

/// Route engine logs to the test harness. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("fieldhost_core=debug")),
        )
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Widget {
    pub id: ItemId,
    pub serial: u32,
    pub handle: bool,
}

impl Widget {
    pub fn new(id: ItemId, serial: u32) -> Self {
        Self {
            id,
            serial,
            handle: true,
        }
    }
}

#[derive(Debug, Default)]
pub struct SurfaceLog {
    pub attach_calls: Vec<Vec<ItemId>>,
    pub detach_calls: Vec<Vec<ItemId>>,
    pub attached: Vec<ItemId>,
    pub positions: Vec<(ItemId, Rect)>,
    pub tab_indices: Vec<(ItemId, usize)>,
    pub released: Vec<ItemId>,
    pub disposed: Vec<ItemId>,
    pub snapshots: usize,
    /// Batch positions the next attach calls reject.
    pub reject_attach: Vec<usize>,
    pub reject_detach: Vec<usize>,
}

impl SurfaceLog {
    pub fn is_attached(&self, id: &str) -> bool {
        self.attached.iter().any(|attached| attached.as_str() == id)
    }

    pub fn was_disposed(&self, id: &str) -> bool {
        self.disposed.iter().any(|disposed| disposed.as_str() == id)
    }
}

/// Display surface fake that records every call into a shared log.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub log: Rc<RefCell<SurfaceLog>>,
}

impl DisplaySurface for RecordingSurface {
    type Resource = Widget;
    type Snapshot = Vec<ItemId>;

    fn bulk_attach(&mut self, batch: &[&Widget]) -> Result<(), SurfaceError> {
        let mut log = self.log.borrow_mut();
        log.attach_calls.push(batch.iter().map(|w| w.id.clone()).collect());
        let rejected: Vec<usize> = log
            .reject_attach
            .iter()
            .copied()
            .filter(|pos| *pos < batch.len())
            .collect();
        for (pos, widget) in batch.iter().enumerate() {
            if !rejected.contains(&pos) {
                log.attached.push(widget.id.clone());
            }
        }
        if rejected.is_empty() {
            Ok(())
        } else {
            Err(SurfaceError::new(batch.len(), rejected, "attach rejected"))
        }
    }

    fn bulk_detach(&mut self, batch: &[&Widget]) -> Result<(), SurfaceError> {
        let mut log = self.log.borrow_mut();
        log.detach_calls.push(batch.iter().map(|w| w.id.clone()).collect());
        let rejected: Vec<usize> = log
            .reject_detach
            .iter()
            .copied()
            .filter(|pos| *pos < batch.len())
            .collect();
        for (pos, widget) in batch.iter().enumerate() {
            if !rejected.contains(&pos) {
                log.attached.retain(|id| id != &widget.id);
            }
        }
        if rejected.is_empty() {
            Ok(())
        } else {
            Err(SurfaceError::new(batch.len(), rejected, "detach rejected"))
        }
    }

    fn set_position(&mut self, resource: &mut Widget, bounds: Rect) {
        self.log.borrow_mut().positions.push((resource.id.clone(), bounds));
    }

    fn set_tab_index(&mut self, resource: &mut Widget, tab_index: usize) {
        self.log.borrow_mut().tab_indices.push((resource.id.clone(), tab_index));
    }

    fn release_handle(&mut self, resource: &mut Widget) {
        resource.handle = false;
        self.log.borrow_mut().released.push(resource.id.clone());
    }

    fn dispose(&mut self, resource: Widget) {
        self.log.borrow_mut().disposed.push(resource.id);
    }

    fn capture_snapshot(&mut self) -> Option<Vec<ItemId>> {
        let mut log = self.log.borrow_mut();
        log.snapshots += 1;
        Some(log.attached.clone())
    }
}

#[derive(Debug, Default)]
pub struct FactoryLog {
    pub created: Vec<ItemId>,
    pub restored: Vec<ItemId>,
    pub failing: HashSet<ItemId>,
    pub failing_restore: HashSet<ItemId>,
}

/// Factory fake: hands out serial-numbered widgets, fails creation for ids
/// in `failing` and handle restores for ids in `failing_restore`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedFactory {
    pub log: Rc<RefCell<FactoryLog>>,
}

impl ResourceFactory for ScriptedFactory {
    type Resource = Widget;

    fn create(&mut self, item: &ItemDescriptor) -> Result<Widget, ResourceError> {
        let mut log = self.log.borrow_mut();
        if log.failing.contains(&item.id) {
            return Err(ResourceError::construction(&item.id, "scripted failure"));
        }
        log.created.push(item.id.clone());
        Ok(Widget::new(item.id.clone(), log.created.len() as u32))
    }

    fn restore_handle(
        &mut self,
        item: &ItemDescriptor,
        resource: &mut Widget,
    ) -> Result<(), ResourceError> {
        let mut log = self.log.borrow_mut();
        if log.failing_restore.contains(&item.id) {
            return Err(ResourceError::handle_recreation(&item.id, "scripted failure"));
        }
        resource.handle = true;
        log.restored.push(item.id.clone());
        Ok(())
    }
}

pub type Panel<C = AlwaysFocusable> = VirtualizingPanel<RecordingSurface, ScriptedFactory, C>;

pub struct Fixture<C: FocusClassifier = AlwaysFocusable> {
    pub panel: Panel<C>,
    pub surface: Rc<RefCell<SurfaceLog>>,
    pub factory: Rc<RefCell<FactoryLog>>,
}

pub fn fixture_with<C: FocusClassifier>(
    classifier: C,
    settings: VirtualizationSettings,
) -> Fixture<C> {
    init_tracing();
    let surface = RecordingSurface::default();
    let factory = ScriptedFactory::default();
    let surface_log = Rc::clone(&surface.log);
    let factory_log = Rc::clone(&factory.log);
    Fixture {
        panel: VirtualizingPanel::with_settings(surface, factory, classifier, settings),
        surface: surface_log,
        factory: factory_log,
    }
}

/// `count` full-width rows of `row_height`, stacked from the origin.
pub fn stacked_form(count: usize, row_height: f32, settings: VirtualizationSettings) -> Fixture {
    let mut fixture = fixture_with(AlwaysFocusable, settings);
    for i in 0..count {
        fixture.panel.add_item(row(i, row_height)).expect("fresh id");
    }
    fixture
}

pub fn row(index: usize, row_height: f32) -> ItemDescriptor {
    ItemDescriptor::new(format!("f{index}"), "textbox")
        .with_bounds(Rect::new(0.0, index as f32 * row_height, 400.0, row_height))
}

pub fn id(value: &str) -> ItemId {
    ItemId::new(value)
}

pub fn ids(range: std::ops::RangeInclusive<usize>) -> Vec<ItemId> {
    range.map(|i| ItemId::new(format!("f{i}"))).collect()
}

pub fn viewport_at(y: f32) -> Rect {
    Rect::new(0.0, y, 800.0, 600.0)
}
