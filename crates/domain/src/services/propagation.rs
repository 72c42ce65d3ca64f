//! Confirmation propagation.
//!
//! When an invited guest attends, their direct inviter becomes confirmed.
//! Propagation is exactly one hop: confirming the inviter never re-evaluates
//! the inviter's own inviter. Among several attending invitees of the same
//! guest, the one whose compare-and-swap the store accepts first is recorded
//! as the confirmer.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::RsvpError;
use crate::models::Rsvp;
use crate::store::RsvpStore;

/// What a propagation attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropagationOutcome {
    /// Root or non-attending RSVP: nothing to propagate.
    NotApplicable,
    /// The inviter is a leaf and was confirmed at creation.
    ParentIsLeaf { parent_id: Uuid },
    /// This RSVP confirmed its inviter.
    Confirmed { parent_id: Uuid },
    /// Another invitee confirmed the inviter first.
    AlreadyConfirmed { parent_id: Uuid },
}

#[derive(Clone)]
pub struct ConfirmationPropagator {
    rsvps: Arc<dyn RsvpStore>,
}

impl ConfirmationPropagator {
    pub fn new(rsvps: Arc<dyn RsvpStore>) -> Self {
        Self { rsvps }
    }

    /// Apply the confirmation condition of `child`'s inviter.
    ///
    /// Losing the race to another invitee is a normal outcome, not an error.
    pub async fn propagate(&self, child: &Rsvp) -> Result<PropagationOutcome, RsvpError> {
        let parent_id = match child.invited_by_rsvp_id {
            Some(parent_id) if child.is_attending => parent_id,
            _ => return Ok(PropagationOutcome::NotApplicable),
        };

        let parent = self.rsvps.get(parent_id).await?;

        if parent.degree.is_leaf() {
            return Ok(PropagationOutcome::ParentIsLeaf { parent_id });
        }

        // A declined RSVP must stay unconfirmed forever.
        if !parent.is_attending {
            tracing::warn!(
                rsvp_id = %child.id,
                parent_id = %parent_id,
                "Unexpected attending invitee of a non-attending guest"
            );
            return Err(RsvpError::InviterNotAttending);
        }

        if self
            .rsvps
            .compare_and_swap_confirmation(parent_id, child.id)
            .await?
        {
            tracing::info!(
                rsvp_id = %child.id,
                parent_id = %parent_id,
                party_id = %child.party_id,
                degree = %parent.degree,
                "Confirmed inviter"
            );
            Ok(PropagationOutcome::Confirmed { parent_id })
        } else {
            tracing::debug!(
                rsvp_id = %child.id,
                parent_id = %parent_id,
                "Inviter already confirmed by an earlier invitee"
            );
            Ok(PropagationOutcome::AlreadyConfirmed { parent_id })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Degree, NewRsvp};
    use crate::store::InMemoryStore;

    async fn create(
        store: &InMemoryStore,
        contact: &str,
        is_attending: bool,
        degree: Degree,
        parent: Option<Uuid>,
    ) -> Rsvp {
        store
            .create(NewRsvp {
                party_id: Uuid::nil(),
                guest_name: format!("Guest {}", contact),
                guest_contact: contact.to_string(),
                is_attending,
                degree,
                invited_by_rsvp_id: parent,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_root_rsvp_is_not_applicable() {
        let store = Arc::new(InMemoryStore::new());
        let propagator = ConfirmationPropagator::new(store.clone());
        let root = create(&store, "+15550000001", true, Degree::ROOT, None).await;

        assert_eq!(
            propagator.propagate(&root).await.unwrap(),
            PropagationOutcome::NotApplicable
        );
    }

    #[tokio::test]
    async fn test_declined_child_does_not_confirm() {
        let store = Arc::new(InMemoryStore::new());
        let propagator = ConfirmationPropagator::new(store.clone());
        let parent = create(&store, "+15550000001", true, Degree::ROOT, None).await;
        let child = create(&store, "+15550000002", false, Degree::ROOT.next().unwrap(), Some(parent.id)).await;

        assert_eq!(
            propagator.propagate(&child).await.unwrap(),
            PropagationOutcome::NotApplicable
        );
        assert!(!store.get(parent.id).await.unwrap().is_confirmed);
    }

    #[tokio::test]
    async fn test_first_child_confirms_second_loses() {
        let store = Arc::new(InMemoryStore::new());
        let propagator = ConfirmationPropagator::new(store.clone());
        let two = Degree::ROOT.next().unwrap();
        let parent = create(&store, "+15550000001", true, Degree::ROOT, None).await;
        let a = create(&store, "+15550000002", true, two, Some(parent.id)).await;
        let b = create(&store, "+15550000003", true, two, Some(parent.id)).await;

        assert_eq!(
            propagator.propagate(&a).await.unwrap(),
            PropagationOutcome::Confirmed { parent_id: parent.id }
        );
        assert_eq!(
            propagator.propagate(&b).await.unwrap(),
            PropagationOutcome::AlreadyConfirmed { parent_id: parent.id }
        );

        let parent = store.get(parent.id).await.unwrap();
        assert!(parent.is_confirmed);
        assert_eq!(parent.confirmed_by_rsvp_id, Some(a.id));
    }

    #[tokio::test]
    async fn test_single_hop_only() {
        let store = Arc::new(InMemoryStore::new());
        let propagator = ConfirmationPropagator::new(store.clone());
        let two = Degree::ROOT.next().unwrap();
        let g1 = create(&store, "+15550000001", true, Degree::ROOT, None).await;
        let g2 = create(&store, "+15550000002", true, two, Some(g1.id)).await;
        let g3 = create(&store, "+15550000003", true, Degree::MAX, Some(g2.id)).await;

        propagator.propagate(&g3).await.unwrap();

        assert!(store.get(g2.id).await.unwrap().is_confirmed);
        let g1 = store.get(g1.id).await.unwrap();
        assert!(!g1.is_confirmed);
        assert_eq!(g1.confirmed_by_rsvp_id, None);
    }

    #[tokio::test]
    async fn test_non_attending_parent_is_rejected() {
        let store = Arc::new(InMemoryStore::new());
        let propagator = ConfirmationPropagator::new(store.clone());
        let two = Degree::ROOT.next().unwrap();
        let parent = create(&store, "+15550000001", false, Degree::ROOT, None).await;
        let child = create(&store, "+15550000002", true, two, Some(parent.id)).await;

        assert_eq!(
            propagator.propagate(&child).await.unwrap_err(),
            RsvpError::InviterNotAttending
        );
        assert!(!store.get(parent.id).await.unwrap().is_confirmed);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_children_single_confirmer() {
        let store = Arc::new(InMemoryStore::new());
        let propagator = ConfirmationPropagator::new(store.clone());
        let two = Degree::ROOT.next().unwrap();
        let parent = create(&store, "+15550000000", true, Degree::ROOT, None).await;

        let mut children = Vec::new();
        for i in 1..=8 {
            children.push(create(&store, &format!("+1555000000{}", i), true, two, Some(parent.id)).await);
        }

        let handles: Vec<_> = children
            .iter()
            .cloned()
            .map(|child| {
                let propagator = propagator.clone();
                tokio::spawn(async move { propagator.propagate(&child).await.unwrap() })
            })
            .collect();

        let mut winners = Vec::new();
        for (handle, child) in handles.into_iter().zip(children.iter()) {
            if let PropagationOutcome::Confirmed { .. } = handle.await.unwrap() {
                winners.push(child.id);
            }
        }

        assert_eq!(winners.len(), 1);
        let parent = store.get(parent.id).await.unwrap();
        assert_eq!(parent.confirmed_by_rsvp_id, Some(winners[0]));
    }
}
