use crate::config::{CursorPath, ItemKind, ItemSpec, Scenario, ScenarioAction, ScheduledAction};
use anyhow::{Context, Result};
use glam::Vec3;
use hoverkit_core::{FrameTick, InteractionSettings, ManualClock};
use hoverkit_ui3d::{
    Checkbox, Color, DisplayMode, HoverItem, HoverManager, ItemBounds, ItemFlags, ItemHandle,
    MeshColorSink, MeshColorUpdater, Radio, SelectionEvent, SelectionEventKind, Selector, Sticky,
    TextItem,
};
use serde::Serialize;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, info};

pub struct HeadlessConfig {
    pub scenario: Scenario,
    /// Replaces the scenario's own settings when set.
    pub settings: Option<InteractionSettings>,
    /// Overrides the scenario's frame count when set.
    pub max_frames: Option<u64>,
    pub events_log: Option<PathBuf>,
}

/// One selection notification observed during a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventLine {
    pub tick: FrameTick,
    pub kind: SelectionEventKind,
    pub item: String,
}

#[derive(Debug, Default, Serialize)]
pub struct RunSummary {
    pub frames: u64,
    pub events: Vec<EventLine>,
    pub color_commits: usize,
}

impl RunSummary {
    pub fn count(&self, kind: SelectionEventKind) -> usize {
        self.events.iter().filter(|event| event.kind == kind).count()
    }
}

/// Mesh stand-in that only records color commits.
struct HeadlessMesh {
    mode: DisplayMode,
    commits: usize,
}

impl MeshColorSink for HeadlessMesh {
    fn display_mode(&self) -> DisplayMode {
        self.mode
    }

    fn did_rebuild_mesh(&self) -> bool {
        false
    }

    fn commit_colors(&mut self, color: Color) {
        self.commits += 1;
        tracing::trace!(?color, commits = self.commits, "Mesh color committed");
    }
}

struct MeshSlot {
    updater: MeshColorUpdater,
    mesh: HeadlessMesh,
}

pub fn run(cfg: HeadlessConfig) -> Result<RunSummary> {
    let scenario = cfg.scenario;
    let settings = cfg.settings.unwrap_or_else(|| scenario.settings.clone());
    let frames = cfg.max_frames.unwrap_or(scenario.frames);

    let clock = Arc::new(ManualClock::new());
    let mut manager = HoverManager::new(settings, clock.clone())
        .context("invalid interaction settings")?;

    let observed: Rc<RefCell<Vec<SelectionEvent>>> = Rc::new(RefCell::new(Vec::new()));
    let mut meshes: BTreeMap<ItemHandle, MeshSlot> = BTreeMap::new();
    for spec in &scenario.items {
        let handle = add_item(&mut manager, spec);
        let sink = Rc::clone(&observed);
        manager.subscribe(handle, move |event| sink.borrow_mut().push(event.clone()));
        meshes.insert(
            handle,
            MeshSlot {
                updater: MeshColorUpdater::default(),
                mesh: HeadlessMesh {
                    mode: spec.display_mode()?,
                    commits: 0,
                },
            },
        );
    }

    let mut log = match &cfg.events_log {
        Some(path) => Some(open_log(path)?),
        None => None,
    };

    info!(
        items = manager.item_count(),
        cursors = scenario.cursors.len(),
        frames,
        "Starting headless run"
    );

    let mut summary = RunSummary::default();
    for frame in 0..frames {
        for scheduled in scenario.actions.iter().filter(|s| s.frame == frame) {
            apply_action(&mut manager, scheduled);
        }

        let cursors = cursor_positions(&scenario.cursors, frame);
        let report = manager.update(&cursors);

        for event in observed.borrow_mut().drain(..) {
            let line = EventLine {
                tick: report.tick,
                kind: event.kind,
                item: event.item_id,
            };
            if let Some(writer) = log.as_mut() {
                serde_json::to_writer(&mut *writer, &line)?;
                writer.write_all(b"\n")?;
            }
            summary.events.push(line);
        }

        for slot in meshes.values_mut() {
            slot.updater.tree_update(&mut slot.mesh);
        }

        clock.advance_ms(scenario.frame_ms);
        summary.frames += 1;
    }

    if let Some(writer) = log.as_mut() {
        writer.flush()?;
    }

    summary.color_commits = meshes.values().map(|slot| slot.mesh.commits).sum();
    info!(
        frames = summary.frames,
        selected = summary.count(SelectionEventKind::Selected),
        deselected = summary.count(SelectionEventKind::Deselected),
        "Headless run finished"
    );
    Ok(summary)
}

fn add_item(manager: &mut HoverManager, spec: &ItemSpec) -> ItemHandle {
    let bounds = Some(ItemBounds::from_center_size(
        Vec3::from_array(spec.center),
        Vec3::from_array(spec.size),
    ));
    match spec.kind {
        ItemKind::Selector => {
            manager.add_item(Selector::new(&spec.id).with_action(spec.action), bounds)
        }
        ItemKind::Sticky => manager.add_item(Sticky::new(&spec.id), bounds),
        ItemKind::Checkbox => manager.add_item(Checkbox::new(&spec.id), bounds),
        ItemKind::Radio => manager.add_item(Radio::new(&spec.id, &spec.group), bounds),
        ItemKind::Text => manager.add_item(TextItem::new(&spec.id, &spec.text), bounds),
    }
}

fn apply_action(manager: &mut HoverManager, scheduled: &ScheduledAction) {
    debug!(frame = scheduled.frame, action = ?scheduled.action, "Applying scripted action");
    match &scheduled.action {
        ScenarioAction::Prevent { display, item } => set_veto(manager, display, item, true),
        ScenarioAction::Allow { display, item } => set_veto(manager, display, item, false),
        ScenarioAction::SetFlags {
            item,
            enabled,
            visible,
        } => {
            let Some(target) = manager.find(item).and_then(|h| manager.item_mut(h)) else {
                return;
            };
            let mut flags = target.flags();
            if let Some(enabled) = enabled {
                flags.set(ItemFlags::ENABLED, *enabled);
            }
            if let Some(visible) = visible {
                flags.set(ItemFlags::VISIBLE, *visible);
            }
            target.set_flags(flags);
        }
    }
}

fn set_veto(manager: &mut HoverManager, display: &str, item: &Option<String>, prevent: bool) {
    match item {
        Some(id) => {
            if let Some(handle) = manager.find(id) {
                manager.prevent_selection_via_display(handle, display, prevent);
            }
        }
        None => manager.prevent_all_via_display(display, prevent),
    }
}

fn cursor_positions(paths: &[CursorPath], frame: u64) -> Vec<Vec3> {
    paths
        .iter()
        .map(|path| Vec3::from_array(path.position_at(frame)))
        .collect()
}

fn open_log(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)
        .with_context(|| format!("failed to create event log {}", path.display()))?;
    Ok(BufWriter::new(file))
}
