use std::sync::Arc;

use storage::SessionTokenHolder;
use trivia_core::model::{Question, SessionSelection};
use trivia_core::text::decode_html_entities;

use crate::api::{QuestionQuery, RawQuestion, ResponseCode, TriviaApi};
use crate::error::FetchError;

/// Fetches a session's questions and maps them to plain-text `Question`s.
///
/// A single attempt per call; callers decide whether to try again.
#[derive(Clone)]
pub struct QuestionFetcher {
    api: Arc<dyn TriviaApi>,
    tokens: SessionTokenHolder,
}

impl QuestionFetcher {
    #[must_use]
    pub fn new(api: Arc<dyn TriviaApi>, tokens: SessionTokenHolder) -> Self {
        Self { api, tokens }
    }

    /// Fetch questions for `selection` using the held session token (if any).
    ///
    /// When the server reports the token as unknown, the holder is cleared.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` for transport failures, non-2xx statuses, malformed
    /// bodies, or non-zero API response codes.
    pub async fn fetch(&self, selection: &SessionSelection) -> Result<Vec<Question>, FetchError> {
        let token = self.tokens.query_value();
        if token.is_empty() {
            tracing::warn!("fetching questions without a session token, repeats are possible");
        }

        let result = self.fetch_with_token(selection, token).await;
        if let Err(FetchError::Api(ResponseCode::TokenNotFound)) = &result {
            tracing::warn!("session token no longer recognized, dropping it");
            self.tokens.clear();
        }
        result
    }

    /// Fetch questions with an explicit token value (empty for none).
    ///
    /// # Errors
    ///
    /// See [`QuestionFetcher::fetch`].
    pub async fn fetch_with_token(
        &self,
        selection: &SessionSelection,
        token: String,
    ) -> Result<Vec<Question>, FetchError> {
        let query = QuestionQuery::new(selection, token);
        let envelope = self.api.questions(&query).await.inspect_err(|err| {
            tracing::error!(error = %err, "question fetch failed");
        })?;

        match ResponseCode::from(envelope.response_code) {
            ResponseCode::Success => {}
            code => {
                tracing::error!(%code, "question fetch refused by api");
                return Err(FetchError::Api(code));
            }
        }

        let questions = envelope
            .results
            .into_iter()
            .map(map_question)
            .collect::<Result<Vec<_>, _>>()?;
        tracing::info!(
            count = questions.len(),
            difficulty = %selection.difficulty(),
            category = %selection.category(),
            "questions fetched"
        );
        Ok(questions)
    }
}

fn map_question(raw: RawQuestion) -> Result<Question, FetchError> {
    Question::new(
        decode_html_entities(&raw.question),
        decode_html_entities(&raw.correct_answer),
        raw.incorrect_answers
            .iter()
            .map(|answer| decode_html_entities(answer))
            .collect(),
    )
    .map_err(|err| FetchError::Malformed(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeApi, numbered_questions, questions_ok, raw_question};
    use trivia_core::model::SessionToken;

    fn fetcher(api: &Arc<FakeApi>, tokens: &SessionTokenHolder) -> QuestionFetcher {
        QuestionFetcher::new(Arc::clone(api) as Arc<dyn TriviaApi>, tokens.clone())
    }

    #[tokio::test]
    async fn decodes_html_in_question_and_answers() {
        let api = Arc::new(FakeApi::default());
        api.push_questions(questions_ok(vec![raw_question(
            "Who wrote &quot;Don Quixote&quot;?",
            "Miguel de Cervantes",
            &["Lope de Vega", "Garc&iacute;a M&aacute;rquez"],
        )]));
        let tokens = SessionTokenHolder::new();

        let questions = fetcher(&api, &tokens)
            .fetch(&SessionSelection::default())
            .await
            .unwrap();

        assert_eq!(questions[0].text(), "Who wrote \"Don Quixote\"?");
        assert_eq!(questions[0].incorrect_answers()[1], "García Márquez");
    }

    #[tokio::test]
    async fn sends_held_token_or_empty() {
        let api = Arc::new(FakeApi::default());
        api.push_questions(numbered_questions(1));
        api.push_questions(numbered_questions(1));
        let tokens = SessionTokenHolder::new();
        let fetcher = fetcher(&api, &tokens);

        fetcher.fetch(&SessionSelection::default()).await.unwrap();
        assert_eq!(api.last_query().unwrap().token, "");

        tokens.set_once(SessionToken::new("tok").unwrap());
        fetcher.fetch(&SessionSelection::default()).await.unwrap();
        assert_eq!(api.last_query().unwrap().token, "tok");
    }

    #[tokio::test]
    async fn http_failure_is_returned_as_is() {
        let api = Arc::new(FakeApi::default());
        api.push_questions(Err(FetchError::RemoteFailure { status: 500 }));
        let tokens = SessionTokenHolder::new();

        let err = fetcher(&api, &tokens)
            .fetch(&SessionSelection::default())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::RemoteFailure { status: 500 }));
    }

    #[tokio::test]
    async fn unknown_token_is_dropped() {
        let api = Arc::new(FakeApi::default());
        api.push_questions(Ok(crate::api::QuestionsEnvelope {
            response_code: 3,
            results: Vec::new(),
        }));
        let tokens = SessionTokenHolder::new();
        tokens.set_once(SessionToken::new("stale").unwrap());

        let err = fetcher(&api, &tokens)
            .fetch(&SessionSelection::default())
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Api(ResponseCode::TokenNotFound)));
        assert!(tokens.is_empty());
    }

    #[tokio::test]
    async fn blank_question_text_is_malformed() {
        let api = Arc::new(FakeApi::default());
        api.push_questions(questions_ok(vec![raw_question("", "x", &[])]));
        let tokens = SessionTokenHolder::new();

        let err = fetcher(&api, &tokens)
            .fetch(&SessionSelection::default())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
    }
}
