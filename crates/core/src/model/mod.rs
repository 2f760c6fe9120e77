mod category;
mod ids;
mod question;
mod score;
mod selection;
mod session;
mod token;

pub use category::Category;
pub use ids::CategoryId;
pub use question::{Question, QuestionError};
pub use score::{CORRECT_ANSWER_AWARD, HighScore, Score};
pub use selection::{Difficulty, QuestionAmount, SelectionError, SessionSelection};
pub use session::{QuizPhase, QuizUiState};
pub use token::SessionToken;
