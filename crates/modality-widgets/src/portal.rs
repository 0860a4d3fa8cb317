//! Portal host elements.
//!
//! A portal renders a subtree at the end of the body instead of at its
//! logical position, so the modal stacks above the page.

use modality_core::{Document, DomError, NodeId};
use tracing::trace;

/// Class set on portal hosts.
pub const PORTAL_CLASS: &str = "modality-portal";

/// A host element owned by one component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Portal {
    host: NodeId,
}

impl Portal {
    /// Append a host element to `target`, or to the body.
    pub fn mount(doc: &mut Document, target: Option<NodeId>) -> Result<Self, DomError> {
        let parent = target.unwrap_or_else(|| doc.body());
        let host = doc.append_element(parent, "div")?;
        doc.set_attribute(host, "class", PORTAL_CLASS);
        trace!(host = %host, parent = %parent, "portal mounted");
        Ok(Self { host })
    }

    /// The host element.
    #[must_use]
    pub const fn host(&self) -> NodeId {
        self.host
    }

    /// Detach the host and everything rendered into it.
    pub fn unmount(self, doc: &mut Document) -> Result<(), DomError> {
        trace!(host = %self.host, "portal unmounted");
        doc.remove(self.host)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_portal_appends_to_body() {
        let mut doc = Document::new();
        let app = doc.append_element(doc.body(), "div").unwrap();
        let portal = Portal::mount(&mut doc, None).unwrap();

        assert_eq!(doc.children(doc.body()), &[app, portal.host()]);
        assert_eq!(doc.attribute(portal.host(), "class"), Some(PORTAL_CLASS));

        portal.unmount(&mut doc).unwrap();
        assert_eq!(doc.children(doc.body()), &[app]);
    }

    #[test]
    fn test_portal_into_custom_target() {
        let mut doc = Document::new();
        let target = doc.append_element(doc.body(), "div").unwrap();
        let portal = Portal::mount(&mut doc, Some(target)).unwrap();
        assert_eq!(doc.parent(portal.host()), Some(target));
    }

    #[test]
    fn test_unknown_target_is_an_error() {
        let mut doc = Document::new();
        let ghost = NodeId::new(404);
        assert_eq!(
            Portal::mount(&mut doc, Some(ghost)),
            Err(DomError::UnknownNode(ghost))
        );
    }
}
