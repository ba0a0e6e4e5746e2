use model::Survey;
use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
};

struct Candidate {
    score: usize,
    seq: Reverse<usize>,
    survey: Survey,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.score == other.score && self.seq == other.seq
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score.cmp(&other.score).then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Max-heap of scored candidate surveys. Equal scores pop in insertion order,
/// though nothing may rely on that beyond determinism.
#[derive(Default)]
pub struct Ranker {
    heap: BinaryHeap<Candidate>,
    next_seq: usize,
}

impl Ranker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, score: usize, survey: Survey) {
        let seq = Reverse(self.next_seq);
        self.next_seq += 1;
        self.heap.push(Candidate { score, seq, survey });
    }

    /// Removes and returns the highest-scored survey, if any.
    pub fn pop_highest(&mut self) -> Option<Survey> {
        self.heap.pop().map(|candidate| candidate.survey)
    }
}

#[cfg(test)]
mod tests {
    use super::Ranker;
    use model::{Survey, SurveyData};

    fn survey(id: &str) -> Survey {
        Survey { id: id.into(), data: SurveyData::default() }
    }

    #[test]
    fn pops_in_descending_score_order() {
        let mut ranker = Ranker::new();
        ranker.push(3, survey("a"));
        ranker.push(1, survey("b"));
        ranker.push(2, survey("c"));

        assert_eq!(ranker.pop_highest().unwrap().id, "a");
        assert_eq!(ranker.pop_highest().unwrap().id, "c");
        assert_eq!(ranker.pop_highest().unwrap().id, "b");
        assert!(ranker.pop_highest().is_none());
    }

    #[test]
    fn empty_ranker_yields_nothing() {
        assert!(Ranker::new().pop_highest().is_none());
    }
}
