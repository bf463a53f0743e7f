use bevy::prelude::*;

use super::objects::{ObjectKind, SceneObject};
use crate::engine::coordinates::DomainPosition;

#[derive(Debug, Clone, PartialEq)]
pub struct PendingMove {
    pub id: String,
    pub target: DomainPosition,
}

/// Buffered work released by [`SceneBuffer::flush`], in enqueue order.
#[derive(Debug, Default, PartialEq)]
pub struct FlushedBuffer {
    pub inserts: Vec<SceneObject>,
    pub moves: Vec<PendingMove>,
}

/// Holds inserts and moves issued before the scene exists.
#[derive(Resource, Debug, Default)]
pub struct SceneBuffer {
    ready: bool,
    flushed: bool,
    pending_inserts: Vec<SceneObject>,
    pending_moves: Vec<PendingMove>,
}

impl SceneBuffer {
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Buffer the object while not ready. Returns it back when it must be
    /// inserted immediately.
    pub fn enqueue_or_insert(&mut self, object: SceneObject) -> Option<SceneObject> {
        if self.ready {
            return Some(object);
        }
        debug!("Buffering object '{}' until the viewer is ready", object.name);
        self.pending_inserts.push(object);
        None
    }

    /// Buffer a move while not ready. A later move for the same id replaces
    /// the target but keeps its original queue position. Returns `true` when
    /// the move must be applied immediately.
    pub fn enqueue_or_move(&mut self, id: &str, target: DomainPosition) -> bool {
        if self.ready {
            return true;
        }
        match self.pending_moves.iter_mut().find(|m| m.id == id) {
            Some(pending) => pending.target = target,
            None => self.pending_moves.push(PendingMove {
                id: id.to_string(),
                target,
            }),
        }
        false
    }

    /// Mark the buffer ready and hand over everything queued. Only the first
    /// call returns work.
    pub fn flush(&mut self) -> Option<FlushedBuffer> {
        if self.flushed {
            return None;
        }
        self.flushed = true;
        self.ready = true;
        Some(FlushedBuffer {
            inserts: std::mem::take(&mut self.pending_inserts),
            moves: std::mem::take(&mut self.pending_moves),
        })
    }

    pub fn has_pending(&self, id: &str) -> bool {
        self.pending_inserts
            .iter()
            .any(|object| object.names().contains(&id))
    }

    /// Patch the colour of a beam that has not been inserted yet.
    pub fn recolor_pending(&mut self, id: &str, colour: &str) -> bool {
        let Some(node) = self
            .pending_inserts
            .iter_mut()
            .find_map(|object| object.find_mut(id))
        else {
            return false;
        };
        match &mut node.kind {
            ObjectKind::Beam(shape) => {
                shape.color = colour.to_string();
                true
            }
            _ => false,
        }
    }

    /// Drop all pending work. The buffer stays closed afterwards.
    pub fn clear(&mut self) {
        self.pending_inserts.clear();
        self.pending_moves.clear();
        self.ready = false;
        self.flushed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(name: &str) -> SceneObject {
        SceneObject::group(name, DomainPosition::ORIGIN, Vec::new())
    }

    #[test]
    fn nothing_is_released_before_flush() {
        let mut buffer = SceneBuffer::default();
        assert!(buffer.enqueue_or_insert(group("a")).is_none());
        assert!(!buffer.enqueue_or_move("a", DomainPosition::new(1.0, 0.0, 0.0)));
        assert!(!buffer.is_ready());
        assert!(buffer.has_pending("a"));
    }

    #[test]
    fn flush_releases_in_enqueue_order_exactly_once() {
        let mut buffer = SceneBuffer::default();
        buffer.enqueue_or_insert(group("a"));
        buffer.enqueue_or_insert(group("b"));
        buffer.enqueue_or_move("b", DomainPosition::new(1.0, 0.0, 0.0));
        buffer.enqueue_or_move("a", DomainPosition::new(2.0, 0.0, 0.0));
        buffer.enqueue_or_move("b", DomainPosition::new(3.0, 0.0, 0.0));

        let flushed = buffer.flush().unwrap();
        let names: Vec<_> = flushed.inserts.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(
            flushed.moves,
            vec![
                PendingMove {
                    id: "b".into(),
                    target: DomainPosition::new(3.0, 0.0, 0.0)
                },
                PendingMove {
                    id: "a".into(),
                    target: DomainPosition::new(2.0, 0.0, 0.0)
                },
            ]
        );

        assert!(buffer.flush().is_none());
        assert!(buffer.is_ready());
        assert!(buffer.enqueue_or_insert(group("c")).is_some());
        assert!(buffer.enqueue_or_move("c", DomainPosition::ORIGIN));
    }

    #[test]
    fn recolours_pending_beams() {
        let mut buffer = SceneBuffer::default();
        buffer.enqueue_or_insert(SceneObject::group(
            "station-1",
            DomainPosition::ORIGIN,
            vec![SceneObject::beam("1", 1.0, 1.0, 1.0, "#bfbfbf")],
        ));

        assert!(buffer.recolor_pending("1", "#f7d0d0"));
        assert!(!buffer.recolor_pending("station-1", "#f7d0d0"));
        assert!(!buffer.recolor_pending("missing", "#f7d0d0"));

        let flushed = buffer.flush().unwrap();
        match &flushed.inserts[0].children[0].kind {
            ObjectKind::Beam(shape) => assert_eq!(shape.color, "#f7d0d0"),
            other => panic!("expected beam, got {other:?}"),
        }
    }

    #[test]
    fn cleared_buffer_never_flushes() {
        let mut buffer = SceneBuffer::default();
        buffer.enqueue_or_insert(group("a"));
        buffer.clear();
        assert!(buffer.flush().is_none());
        assert!(!buffer.has_pending("a"));
    }
}
