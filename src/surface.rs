//! The rendering surface a flip plays on.
//!
//! A surface owns four nested layers: the host element, the outer container
//! animated by the transition driver, a rotation wrapper, and the image
//! itself. Everything the controller does to the page goes through
//! [`Surface`], so the controller can be driven against a real DOM binding or
//! the in-memory [`RecordingSurface`].

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;
use std::time::Duration;

use serde::Serialize;

use crate::geometry::BoundingBox;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layer {
    Host,
    Outer,
    Rotation,
    Image,
}

pub trait Surface {
    /// Inline style assignment. An empty value clears the property.
    fn set_style(&self, layer: Layer, property: &str, value: &str);

    /// Custom property on the host, read by the transition's "from" state.
    fn set_custom_property(&self, name: &str, value: &str);

    fn add_class(&self, layer: Layer, class: &str);

    fn remove_class(&self, layer: Layer, class: &str);

    /// Current layout box of the host; `None` once it has left the document.
    fn bounding_box(&self) -> Option<BoundingBox>;

    fn is_connected(&self) -> bool {
        self.bounding_box().is_some()
    }

    /// Resolves when the running transition on `layer` ends.
    fn transition_end(&self, layer: Layer) -> impl Future<Output = ()>;
}

impl<T: Surface + ?Sized> Surface for &T {
    fn set_style(&self, layer: Layer, property: &str, value: &str) {
        (**self).set_style(layer, property, value);
    }

    fn set_custom_property(&self, name: &str, value: &str) {
        (**self).set_custom_property(name, value);
    }

    fn add_class(&self, layer: Layer, class: &str) {
        (**self).add_class(layer, class);
    }

    fn remove_class(&self, layer: Layer, class: &str) {
        (**self).remove_class(layer, class);
    }

    fn bounding_box(&self) -> Option<BoundingBox> {
        (**self).bounding_box()
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn transition_end(&self, layer: Layer) -> impl Future<Output = ()> {
        (**self).transition_end(layer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum StyleOp {
    SetStyle {
        layer: Layer,
        property: String,
        value: String,
    },
    SetCustomProperty {
        name: String,
        value: String,
    },
    AddClass {
        layer: Layer,
        class: String,
    },
    RemoveClass {
        layer: Layer,
        class: String,
    },
}

/// In-memory surface that records every operation.
///
/// Layout follows the browser: a host with `display: none` measures as an
/// empty box at the origin.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    layout: Cell<Option<BoundingBox>>,
    transition_time: Duration,
    ops: RefCell<Vec<StyleOp>>,
    styles: RefCell<BTreeMap<(Layer, String), String>>,
    classes: RefCell<BTreeSet<(Layer, String)>>,
    custom: RefCell<BTreeMap<String, String>>,
    ended: RefCell<Vec<Layer>>,
}

impl RecordingSurface {
    /// A connected, initially hidden host that lays out at `layout` once shown.
    pub fn new(layout: BoundingBox) -> Self {
        let surface = Self {
            layout: Cell::new(Some(layout)),
            ..Self::default()
        };
        surface
            .styles
            .borrow_mut()
            .insert((Layer::Host, "display".into()), "none".into());
        surface
    }

    /// Transitions take `d` of (tokio) time to end instead of ending at the
    /// next poll.
    pub fn with_transition_time(mut self, d: Duration) -> Self {
        self.transition_time = d;
        self
    }

    pub fn set_layout(&self, layout: BoundingBox) {
        self.layout.set(Some(layout));
    }

    /// Simulate removal from the document.
    pub fn detach(&self) {
        self.layout.set(None);
    }

    pub fn ops(&self) -> Vec<StyleOp> {
        self.ops.borrow().clone()
    }

    pub fn take_ops(&self) -> Vec<StyleOp> {
        std::mem::take(&mut *self.ops.borrow_mut())
    }

    pub fn style(&self, layer: Layer, property: &str) -> Option<String> {
        self.styles
            .borrow()
            .get(&(layer, property.to_owned()))
            .cloned()
    }

    pub fn has_class(&self, layer: Layer, class: &str) -> bool {
        self.classes.borrow().contains(&(layer, class.to_owned()))
    }

    pub fn custom_property(&self, name: &str) -> Option<String> {
        self.custom.borrow().get(name).cloned()
    }

    /// Layers whose transition end has fired, in order.
    pub fn ended(&self) -> Vec<Layer> {
        self.ended.borrow().clone()
    }

    /// Current inline styles, for comparing whole-surface state.
    pub fn snapshot(&self) -> (BTreeMap<(Layer, String), String>, BTreeSet<(Layer, String)>) {
        (self.styles.borrow().clone(), self.classes.borrow().clone())
    }

    fn hidden(&self) -> bool {
        self.style(Layer::Host, "display").as_deref() == Some("none")
    }
}

impl Surface for RecordingSurface {
    fn set_style(&self, layer: Layer, property: &str, value: &str) {
        self.ops.borrow_mut().push(StyleOp::SetStyle {
            layer,
            property: property.to_owned(),
            value: value.to_owned(),
        });
        let key = (layer, property.to_owned());
        let mut styles = self.styles.borrow_mut();
        if value.is_empty() {
            styles.remove(&key);
        } else {
            styles.insert(key, value.to_owned());
        }
    }

    fn set_custom_property(&self, name: &str, value: &str) {
        self.ops.borrow_mut().push(StyleOp::SetCustomProperty {
            name: name.to_owned(),
            value: value.to_owned(),
        });
        self.custom
            .borrow_mut()
            .insert(name.to_owned(), value.to_owned());
    }

    fn add_class(&self, layer: Layer, class: &str) {
        self.ops.borrow_mut().push(StyleOp::AddClass {
            layer,
            class: class.to_owned(),
        });
        self.classes.borrow_mut().insert((layer, class.to_owned()));
    }

    fn remove_class(&self, layer: Layer, class: &str) {
        self.ops.borrow_mut().push(StyleOp::RemoveClass {
            layer,
            class: class.to_owned(),
        });
        self.classes.borrow_mut().remove(&(layer, class.to_owned()));
    }

    fn bounding_box(&self) -> Option<BoundingBox> {
        let layout = self.layout.get()?;
        if self.hidden() {
            return Some(BoundingBox::default());
        }
        Some(layout)
    }

    async fn transition_end(&self, layer: Layer) {
        if self.transition_time.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.transition_time).await;
        }
        self.ended.borrow_mut().push(layer);
    }
}
