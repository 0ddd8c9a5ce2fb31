//! Host-document capability surface: node resolution, element creation,
//! attachment, and activation wiring.
//!
//! This module contains the trait engine consumers implement to bridge a
//! real host document, plus an in-memory implementation used by tests and
//! as a safe default for headless operation.

use std::collections::HashMap;
use std::sync::Mutex;

/// Identifies a node owned by a host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u64);

/// Kinds of elements the factory can construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// A drawing-surface element
    Surface,
    /// A download trigger control
    Trigger,
    /// A generic container
    Container,
}

/// Property bag passed to the element factory.
#[derive(Debug, Clone, Copy, Default)]
pub struct ElementProps {
    pub width: u32,
    pub height: u32,
}

/// Invoked when a bound trigger is activated. Returning `Some(location)`
/// suppresses the trigger's default action and redirects the host browsing
/// context to `location`; `None` leaves the context where it is.
pub type ActivationHandler = Box<dyn Fn() -> Option<String> + Send + Sync>;

/// Capability trait for the host document.
pub trait HostDom: Send + Sync {
    /// Resolve a target identifier to a single node, or `None` when nothing
    /// matches.
    fn resolve(&self, target: &str) -> Option<NodeId>;

    /// Construct a new, unattached element of the given kind.
    fn create_element(&self, kind: ElementKind, props: ElementProps) -> NodeId;

    /// Append `child` under `parent`.
    fn append_child(&self, parent: NodeId, child: NodeId);

    /// Bind an activation handler to a node, replacing any previous one.
    fn bind_activation(&self, node: NodeId, handler: ActivationHandler);
}

struct NodeRecord {
    kind: ElementKind,
    props: ElementProps,
    children: Vec<NodeId>,
}

#[derive(Default)]
struct HostState {
    next_id: u64,
    nodes: HashMap<NodeId, NodeRecord>,
    registry: HashMap<String, NodeId>,
    handlers: HashMap<NodeId, ActivationHandler>,
    location: Option<String>,
}

/// In-memory host document.
///
/// Comes with a root container addressable as `"root"`; further targets are
/// registered with [`MemoryHost::register`]. Activation and the recorded
/// browsing-context location make the download path observable in tests.
pub struct MemoryHost {
    state: Mutex<HostState>,
}

impl MemoryHost {
    pub fn new() -> Self {
        let host = Self {
            state: Mutex::new(HostState::default()),
        };
        host.register("root", ElementKind::Container);
        host
    }

    /// Register a node addressable by `target` and return its id.
    pub fn register(&self, target: &str, kind: ElementKind) -> NodeId {
        let mut state = self.state.lock().expect("host state poisoned");
        let id = NodeId(state.next_id);
        state.next_id += 1;
        state.nodes.insert(
            id,
            NodeRecord {
                kind,
                props: ElementProps::default(),
                children: Vec::new(),
            },
        );
        state.registry.insert(target.to_string(), id);
        id
    }

    /// Fire the activation handler bound to `node`. Returns `true` when a
    /// handler ran and redirected the browsing context.
    pub fn activate(&self, node: NodeId) -> bool {
        // The handler may re-enter the host (e.g. to encode a surface), so
        // run it outside the state lock.
        let handler = {
            let mut state = self.state.lock().expect("host state poisoned");
            state.handlers.remove(&node)
        };
        let Some(handler) = handler else {
            return false;
        };
        let redirected = handler();
        let mut state = self.state.lock().expect("host state poisoned");
        state.handlers.insert(node, handler);
        match redirected {
            Some(location) => {
                state.location = Some(location);
                true
            }
            None => false,
        }
    }

    /// Where the browsing context was last redirected to, if anywhere.
    pub fn location(&self) -> Option<String> {
        self.state
            .lock()
            .expect("host state poisoned")
            .location
            .clone()
    }

    /// Children of `node`, in append order.
    pub fn children_of(&self, node: NodeId) -> Vec<NodeId> {
        self.state
            .lock()
            .expect("host state poisoned")
            .nodes
            .get(&node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// The kind a node was created with.
    pub fn node_kind(&self, node: NodeId) -> Option<ElementKind> {
        self.state
            .lock()
            .expect("host state poisoned")
            .nodes
            .get(&node)
            .map(|n| n.kind)
    }

    /// The property bag a node was created with.
    pub fn node_props(&self, node: NodeId) -> Option<ElementProps> {
        self.state
            .lock()
            .expect("host state poisoned")
            .nodes
            .get(&node)
            .map(|n| n.props)
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HostDom for MemoryHost {
    fn resolve(&self, target: &str) -> Option<NodeId> {
        self.state
            .lock()
            .expect("host state poisoned")
            .registry
            .get(target)
            .copied()
    }

    fn create_element(&self, kind: ElementKind, props: ElementProps) -> NodeId {
        let mut state = self.state.lock().expect("host state poisoned");
        let id = NodeId(state.next_id);
        state.next_id += 1;
        state.nodes.insert(
            id,
            NodeRecord {
                kind,
                props,
                children: Vec::new(),
            },
        );
        id
    }

    fn append_child(&self, parent: NodeId, child: NodeId) {
        let mut state = self.state.lock().expect("host state poisoned");
        if let Some(node) = state.nodes.get_mut(&parent) {
            node.children.push(child);
        }
    }

    fn bind_activation(&self, node: NodeId, handler: ActivationHandler) {
        let mut state = self.state.lock().expect("host state poisoned");
        state.handlers.insert(node, handler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_container_resolves() {
        let host = MemoryHost::new();
        let root = host.resolve("root").expect("root registered");
        assert_eq!(host.node_kind(root), Some(ElementKind::Container));
        assert_eq!(host.resolve("#nope"), None);
    }

    #[test]
    fn created_elements_attach_in_order() {
        let host = MemoryHost::new();
        let root = host.resolve("root").unwrap();
        let a = host.create_element(
            ElementKind::Surface,
            ElementProps {
                width: 10,
                height: 10,
            },
        );
        let b = host.create_element(ElementKind::Trigger, ElementProps::default());
        host.append_child(root, a);
        host.append_child(root, b);
        assert_eq!(host.children_of(root), vec![a, b]);
        assert_eq!(host.node_props(a).unwrap().width, 10);
    }

    #[test]
    fn activation_redirects_and_records_location() {
        let host = MemoryHost::new();
        let trigger = host.register("#save", ElementKind::Trigger);
        assert!(!host.activate(trigger), "nothing bound yet");

        host.bind_activation(trigger, Box::new(|| Some("data:image/png;base64,".into())));
        assert!(host.activate(trigger));
        assert_eq!(host.location().as_deref(), Some("data:image/png;base64,"));
    }
}
