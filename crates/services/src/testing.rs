//! Scripted `TriviaApi` double for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::{
    CategoriesEnvelope, QuestionQuery, QuestionsEnvelope, RawCategory, RawQuestion, TokenCommand,
    TokenEnvelope, TriviaApi,
};
use crate::error::FetchError;

#[derive(Default)]
pub(crate) struct FakeApi {
    questions: Mutex<VecDeque<Result<QuestionsEnvelope, FetchError>>>,
    categories: Mutex<VecDeque<Result<CategoriesEnvelope, FetchError>>>,
    tokens: Mutex<VecDeque<Result<TokenEnvelope, FetchError>>>,
    pub(crate) question_queries: Mutex<Vec<QuestionQuery>>,
    pub(crate) token_commands: Mutex<Vec<TokenCommand>>,
}

impl FakeApi {
    pub(crate) fn push_questions(&self, response: Result<QuestionsEnvelope, FetchError>) {
        self.questions.lock().unwrap().push_back(response);
    }

    pub(crate) fn push_categories(&self, response: Result<CategoriesEnvelope, FetchError>) {
        self.categories.lock().unwrap().push_back(response);
    }

    pub(crate) fn push_token(&self, response: Result<TokenEnvelope, FetchError>) {
        self.tokens.lock().unwrap().push_back(response);
    }

    pub(crate) fn last_query(&self) -> Option<QuestionQuery> {
        self.question_queries.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl TriviaApi for FakeApi {
    async fn questions(&self, query: &QuestionQuery) -> Result<QuestionsEnvelope, FetchError> {
        self.question_queries.lock().unwrap().push(query.clone());
        self.questions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(FetchError::Connectivity("no scripted response".into())))
    }

    async fn categories(&self) -> Result<CategoriesEnvelope, FetchError> {
        self.categories
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(FetchError::Connectivity("no scripted response".into())))
    }

    async fn token(&self, command: &TokenCommand) -> Result<TokenEnvelope, FetchError> {
        self.token_commands.lock().unwrap().push(command.clone());
        self.tokens
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(FetchError::Connectivity("no scripted response".into())))
    }
}

pub(crate) fn raw_question(text: &str, correct: &str, incorrect: &[&str]) -> RawQuestion {
    RawQuestion {
        kind: "multiple".into(),
        difficulty: "easy".into(),
        category: "General Knowledge".into(),
        question: text.into(),
        correct_answer: correct.into(),
        incorrect_answers: incorrect.iter().map(|s| (*s).to_owned()).collect(),
    }
}

pub(crate) fn questions_ok(results: Vec<RawQuestion>) -> Result<QuestionsEnvelope, FetchError> {
    Ok(QuestionsEnvelope {
        response_code: 0,
        results,
    })
}

pub(crate) fn numbered_questions(count: usize) -> Result<QuestionsEnvelope, FetchError> {
    questions_ok(
        (1..=count)
            .map(|n| raw_question(&format!("Question {n}"), &format!("Answer {n}"), &["Wrong"]))
            .collect(),
    )
}

pub(crate) fn token_ok(token: &str) -> Result<TokenEnvelope, FetchError> {
    Ok(TokenEnvelope {
        response_code: 0,
        response_message: "Token Generated Successfully!".into(),
        token: token.into(),
    })
}

pub(crate) fn categories_ok(pairs: &[(u32, &str)]) -> Result<CategoriesEnvelope, FetchError> {
    Ok(CategoriesEnvelope {
        trivia_categories: pairs
            .iter()
            .map(|(id, name)| RawCategory {
                id: *id,
                name: (*name).to_owned(),
            })
            .collect(),
    })
}
