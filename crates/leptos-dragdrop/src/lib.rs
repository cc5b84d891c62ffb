//! Leptos DragDrop Utilities
//!
//! Native HTML5 drag-and-drop for Leptos.
//! Draggables carry a string id; drop zones are identified by a data
//! attribute read from the element the listener is bound to, never by the
//! zone's visible text.

use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// MIME type used for the dragged id in the DataTransfer payload
pub const DRAG_MIME: &str = "text/plain";

/// DnD state signals
#[derive(Clone, Copy)]
pub struct DndSignals {
    pub dragging_id_read: ReadSignal<Option<String>>,
    pub dragging_id_write: WriteSignal<Option<String>>,
    /// Attribute value of the zone currently hovered
    pub over_zone_read: ReadSignal<Option<String>>,
    pub over_zone_write: WriteSignal<Option<String>>,
    /// True for a short moment after a drop so the trailing click can be ignored
    pub drag_just_ended_read: ReadSignal<bool>,
    pub drag_just_ended_write: WriteSignal<bool>,
}

pub fn create_dnd_signals() -> DndSignals {
    let (dragging_id_read, dragging_id_write) = signal(None::<String>);
    let (over_zone_read, over_zone_write) = signal(None::<String>);
    let (drag_just_ended_read, drag_just_ended_write) = signal(false);
    DndSignals {
        dragging_id_read,
        dragging_id_write,
        over_zone_read,
        over_zone_write,
        drag_just_ended_read,
        drag_just_ended_write,
    }
}

impl DndSignals {
    pub fn is_dragging(&self, item_id: &str) -> bool {
        self.dragging_id_read
            .with(|dragging| dragging.as_deref() == Some(item_id))
    }

    pub fn is_over(&self, zone: &str) -> bool {
        self.over_zone_read.with(|over| over.as_deref() == Some(zone))
    }
}

/// End drag operation
pub fn end_drag(dnd: &DndSignals) {
    dnd.dragging_id_write.set(None);
    dnd.over_zone_write.set(None);
    dnd.drag_just_ended_write.set(true);

    if let Some(win) = web_sys::window() {
        let clear = dnd.drag_just_ended_write;
        let cb = wasm_bindgen::closure::Closure::<dyn FnMut()>::new(move || {
            clear.try_set(false);
        });
        let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), 100);
        cb.forget();
    }
}

/// Read a data attribute from the element the listener is attached to
pub fn zone_value(ev: &web_sys::Event, attribute: &str) -> Option<String> {
    ev.current_target()
        .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
        .and_then(|el| el.get_attribute(attribute))
}

/// Create dragstart handler for a draggable item
pub fn make_on_dragstart(dnd: DndSignals, item_id: String) -> impl Fn(web_sys::DragEvent) + Clone + 'static {
    move |ev: web_sys::DragEvent| {
        if let Some(transfer) = ev.data_transfer() {
            let _ = transfer.set_data(DRAG_MIME, &item_id);
            transfer.set_effect_allowed("move");
        }
        dnd.dragging_id_write.set(Some(item_id.clone()));
    }
}

/// Create dragend handler; fires on the source whether or not a drop happened
pub fn make_on_dragend(dnd: DndSignals) -> impl Fn(web_sys::DragEvent) + Copy + 'static {
    move |_ev: web_sys::DragEvent| {
        if dnd.dragging_id_read.get_untracked().is_some() {
            end_drag(&dnd);
        }
    }
}

/// Create dragover handler for a zone. Prevents the default so the zone accepts drops.
pub fn make_on_dragover(dnd: DndSignals, attribute: &'static str) -> impl Fn(web_sys::DragEvent) + Copy + 'static {
    move |ev: web_sys::DragEvent| {
        ev.prevent_default();
        if let Some(transfer) = ev.data_transfer() {
            transfer.set_drop_effect("move");
        }
        let zone = zone_value(&ev, attribute);
        if dnd.over_zone_read.get_untracked() != zone {
            dnd.over_zone_write.set(zone);
        }
    }
}

/// Create dragleave handler
pub fn make_on_dragleave(dnd: DndSignals) -> impl Fn(web_sys::DragEvent) + Copy + 'static {
    move |_ev: web_sys::DragEvent| {
        dnd.over_zone_write.set(None);
    }
}

/// Create drop handler for a zone.
///
/// `on_drop` receives the dragged id and the raw attribute value of the zone
/// (`None` when the zone has no such attribute). Interpreting the value is
/// left to the caller.
pub fn make_on_drop<F>(dnd: DndSignals, attribute: &'static str, on_drop: F) -> impl Fn(web_sys::DragEvent) + Clone + 'static
where
    F: Fn(String, Option<String>) + Clone + 'static,
{
    move |ev: web_sys::DragEvent| {
        ev.prevent_default();
        let from_transfer = ev
            .data_transfer()
            .and_then(|transfer| transfer.get_data(DRAG_MIME).ok())
            .filter(|id| !id.is_empty());
        let dragged = from_transfer.or_else(|| dnd.dragging_id_read.get_untracked());
        let zone = zone_value(&ev, attribute);
        end_drag(&dnd);
        if let Some(id) = dragged {
            on_drop(id, zone);
        }
    }
}
