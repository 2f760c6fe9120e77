use trivia_core::model::Score;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

pub(crate) fn score_from_i64(v: i64) -> Result<Score, StorageError> {
    u32::try_from(v)
        .map(Score::new)
        .map_err(|_| StorageError::Serialization(format!("score out of range: {v}")))
}

pub(crate) fn score_to_i64(score: Score) -> i64 {
    i64::from(score.value())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_scores_are_rejected() {
        assert!(matches!(
            score_from_i64(-10),
            Err(StorageError::Serialization(_))
        ));
        assert_eq!(score_from_i64(40).unwrap().value(), 40);
    }
}
