//! Annotation bookkeeping, independent of rendering and input.

use bevy::prelude::*;

/// Stable identity for one annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnnotationId(pub u64);

/// A numbered point of interest on the model surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Annotation {
    pub id: AnnotationId,
    /// Display number, assigned at creation and never reused for renumbering.
    pub number: u32,
    /// World-space surface position.
    pub position: Vec3,
}

/// All annotations placed in this session.
#[derive(Resource, Default)]
pub struct AnnotationStore {
    next_id: u64,
    items: Vec<Annotation>,
}

impl AnnotationStore {
    pub fn add(&mut self, position: Vec3) -> AnnotationId {
        self.next_id += 1;
        let id = AnnotationId(self.next_id);
        let number = self.items.len() as u32 + 1;
        self.items.push(Annotation {
            id,
            number,
            position,
        });
        id
    }

    pub fn remove(&mut self, id: AnnotationId) -> bool {
        let before = self.items.len();
        self.items.retain(|a| a.id != id);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Pick the annotation closest to the pointer in NDC space, if any lies
/// within `threshold`.
///
/// Operates on pre-projected positions so it stays a pure function; callers
/// project with the active camera and skip annotations behind it.
pub fn closest_within(
    pointer_ndc: Vec2,
    projected: &[(AnnotationId, Vec2)],
    threshold: f32,
) -> Option<AnnotationId> {
    projected
        .iter()
        .map(|(id, ndc)| (*id, ndc.distance(pointer_ndc)))
        .filter(|(_, dist)| *dist <= threshold)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_assigns_sequential_numbers() {
        let mut store = AnnotationStore::default();
        store.add(Vec3::ZERO);
        store.add(Vec3::X);
        let numbers: Vec<u32> = store.iter().map(|a| a.number).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn test_remove_keeps_existing_numbers() {
        let mut store = AnnotationStore::default();
        let first = store.add(Vec3::ZERO);
        store.add(Vec3::X);
        assert!(store.remove(first));
        assert_eq!(store.len(), 1);
        // survivor keeps its original display number
        assert_eq!(store.iter().next().unwrap().number, 2);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut store = AnnotationStore::default();
        store.add(Vec3::ZERO);
        assert!(!store.remove(AnnotationId(999)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_ids_are_not_reused_after_clear() {
        let mut store = AnnotationStore::default();
        let first = store.add(Vec3::ZERO);
        store.clear();
        let second = store.add(Vec3::ZERO);
        assert_ne!(first, second);
    }

    #[test]
    fn test_closest_within_picks_nearest() {
        let projected = vec![
            (AnnotationId(1), Vec2::new(0.5, 0.5)),
            (AnnotationId(2), Vec2::new(0.52, 0.5)),
        ];
        let picked = closest_within(Vec2::new(0.53, 0.5), &projected, 0.1);
        assert_eq!(picked, Some(AnnotationId(2)));
    }

    #[test]
    fn test_closest_within_respects_threshold() {
        let projected = vec![(AnnotationId(1), Vec2::new(0.9, 0.9))];
        assert_eq!(closest_within(Vec2::ZERO, &projected, 0.1), None);
    }

    #[test]
    fn test_closest_within_empty_is_none() {
        assert_eq!(closest_within(Vec2::ZERO, &[], 0.1), None);
    }
}
