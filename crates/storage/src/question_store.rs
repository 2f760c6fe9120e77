use trivia_core::model::Question;

/// Ordered, in-memory list of the questions fetched for the current session.
#[derive(Debug, Clone, Default)]
pub struct QuestionStore {
    questions: Vec<Question>,
}

impl QuestionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop whatever the store held and take `questions` in order.
    pub fn replace(&mut self, questions: Vec<Question>) {
        self.questions = questions;
    }

    pub fn clear(&mut self) {
        self.questions.clear();
    }

    /// Question at a 0-based position.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&Question> {
        self.questions.get(position)
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        u32::try_from(self.questions.len()).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(n: u32) -> Question {
        Question::new(format!("Q{n}"), format!("A{n}"), Vec::new()).unwrap()
    }

    #[test]
    fn replace_discards_previous_contents() {
        let mut store = QuestionStore::new();
        store.replace(vec![question(1), question(2), question(3)]);
        assert_eq!(store.total(), 3);

        store.replace(vec![question(4)]);
        assert_eq!(store.total(), 1);
        assert_eq!(store.get(0).unwrap().text(), "Q4");
        assert!(store.get(1).is_none());
    }

    #[test]
    fn clear_empties_the_store() {
        let mut store = QuestionStore::new();
        store.replace(vec![question(1)]);
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.total(), 0);
    }
}
