mod category;
mod question;
mod token;

pub use category::CategoryFetcher;
pub use question::QuestionFetcher;
pub use token::TokenFetcher;
