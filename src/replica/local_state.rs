use crate::replica::peers::ReplicaId;
use std::fmt;
use std::sync::Arc;

/// Term is a logical election epoch. It never decreases on a given replica.
#[derive(Copy, Clone, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub struct Term(u64);

impl Term {
    pub(crate) fn new(term: u64) -> Self {
        Term(term)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Terms come from peers, so the largest one is reachable. It sticks there.
    pub(crate) fn incr(&mut self) {
        self.0 = self.0.saturating_add(1);
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// PersistentLocalState holds the term and the vote record, the two pieces of replica state that
/// election safety depends on.
///
/// Store methods are CAS-like: they return true iff they mutated state.
pub(crate) trait PersistentLocalState {
    /// Set current term to `new_term` iff it is larger than current term. Clears the vote.
    fn store_term_if_increased(&mut self, new_term: Term) -> bool;

    /// Store our vote iff `expected_current_term` is the current term and we have not voted in
    /// it yet.
    fn store_vote_for_term_if_unvoted(&mut self, expected_current_term: Term, vote: ReplicaId) -> bool;

    /// Return the new term. Used when transitioning to candidate.
    fn increment_term_and_vote_for_self(&mut self) -> Term;

    fn current_term(&self) -> Term;
    fn voted_for_current_term(&self) -> (Term, Option<Arc<ReplicaId>>);
}

// Metadata lives only in memory for the lifetime of the process, so there is nothing to gain
// from putting term/vote on disk.
pub(crate) struct VolatileLocalState {
    current_term: Term,
    voted_for_this_term: Option<Arc<ReplicaId>>,
    my_replica_id: Arc<ReplicaId>,
}

impl VolatileLocalState {
    pub(crate) fn new(my_replica_id: ReplicaId) -> Self {
        VolatileLocalState {
            current_term: Term::new(0),
            voted_for_this_term: None,
            my_replica_id: Arc::new(my_replica_id),
        }
    }
}

impl PersistentLocalState for VolatileLocalState {
    fn store_term_if_increased(&mut self, new_term: Term) -> bool {
        if new_term <= self.current_term {
            return false;
        }

        self.current_term = new_term;
        self.voted_for_this_term = None;
        true
    }

    fn store_vote_for_term_if_unvoted(&mut self, expected_term: Term, vote: ReplicaId) -> bool {
        if expected_term != self.current_term || self.voted_for_this_term.is_some() {
            return false;
        }

        self.voted_for_this_term.replace(Arc::new(vote));
        true
    }

    fn increment_term_and_vote_for_self(&mut self) -> Term {
        self.current_term.incr();
        self.voted_for_this_term.replace(self.my_replica_id.clone());

        self.current_term
    }

    fn current_term(&self) -> Term {
        self.current_term
    }

    fn voted_for_current_term(&self) -> (Term, Option<Arc<ReplicaId>>) {
        (self.current_term, self.voted_for_this_term.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn term_only_moves_forward() {
        let mut state = VolatileLocalState::new(ReplicaId::new("me"));
        assert!(state.store_term_if_increased(Term::new(3)));
        assert!(!state.store_term_if_increased(Term::new(3)));
        assert!(!state.store_term_if_increased(Term::new(2)));
        assert_eq!(state.current_term(), Term::new(3));
    }

    #[test]
    fn one_vote_per_term() {
        let mut state = VolatileLocalState::new(ReplicaId::new("me"));
        state.store_term_if_increased(Term::new(1));

        assert!(!state.store_vote_for_term_if_unvoted(Term::new(2), ReplicaId::new("a")));
        assert!(state.store_vote_for_term_if_unvoted(Term::new(1), ReplicaId::new("a")));
        assert!(!state.store_vote_for_term_if_unvoted(Term::new(1), ReplicaId::new("b")));

        let (term, voted_for) = state.voted_for_current_term();
        assert_eq!(term, Term::new(1));
        assert_eq!(voted_for.as_deref(), Some(&ReplicaId::new("a")));

        // New term resets the vote record.
        assert!(state.store_term_if_increased(Term::new(2)));
        assert_eq!(state.voted_for_current_term().1, None);
        assert!(state.store_vote_for_term_if_unvoted(Term::new(2), ReplicaId::new("b")));
    }

    #[test]
    fn candidate_votes_for_self() {
        let mut state = VolatileLocalState::new(ReplicaId::new("me"));
        assert_eq!(state.increment_term_and_vote_for_self(), Term::new(1));
        assert_eq!(state.voted_for_current_term().1.as_deref(), Some(&ReplicaId::new("me")));
        assert!(!state.store_vote_for_term_if_unvoted(Term::new(1), ReplicaId::new("a")));
    }

    #[test]
    fn largest_term_saturates() {
        let mut state = VolatileLocalState::new(ReplicaId::new("me"));
        state.store_term_if_increased(Term::new(u64::MAX));
        assert_eq!(state.increment_term_and_vote_for_self(), Term::new(u64::MAX));
        assert_eq!(state.voted_for_current_term().1.as_deref(), Some(&ReplicaId::new("me")));
    }
}
