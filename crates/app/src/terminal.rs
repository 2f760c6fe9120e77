//! Line-based play loop on stdin/stdout.

use std::io::Write;
use std::sync::Arc;

use rand::Rng;
use services::{
    AnswerFeedback, AppServices, FeedbackCue, FetchFailureKind, QuizError, QuizSession,
    shuffled_options,
};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use trivia_core::model::{
    Category, CategoryId, Difficulty, QuestionAmount, QuizPhase, Score, SessionSelection,
};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Debug, Error)]
enum PlayError {
    #[error("unknown category id {0}, see `trivia categories`")]
    UnknownCategory(u32),
}

/// Rings the terminal bell: once for a correct answer, twice for a wrong one.
struct TerminalBell;

impl AnswerFeedback for TerminalBell {
    fn on_answer(&self, cue: FeedbackCue) {
        let bell = match cue {
            FeedbackCue::Correct => "\x07",
            FeedbackCue::Incorrect => "\x07\x07",
        };
        let mut out = std::io::stdout();
        if let Err(err) = out.write_all(bell.as_bytes()).and_then(|()| out.flush()) {
            tracing::debug!(error = %err, ?cue, "terminal bell not written");
        }
    }
}

struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
    fn stdin() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// `None` once stdin is closed.
    async fn read(&mut self, label: &str) -> std::io::Result<Option<String>> {
        print!("{label}");
        std::io::stdout().flush()?;
        Ok(self
            .lines
            .next_line()
            .await?
            .map(|line| line.trim().to_owned()))
    }

    async fn confirm(&mut self, label: &str) -> std::io::Result<bool> {
        Ok(matches!(
            self.read(label).await?.as_deref(),
            Some("y" | "Y" | "yes")
        ))
    }
}

#[derive(Clone, Copy)]
enum Flow {
    Finished(Score),
    Quit(Score),
}

pub(crate) async fn play(
    services: &AppServices,
    difficulty: Difficulty,
    amount: QuestionAmount,
    category: Option<u32>,
) -> CliResult<()> {
    let report = services.bootstrap().await;
    if report.categories_loaded.is_none() {
        println!("Category list unavailable, continuing anyway.");
    }

    let category = resolve_category(services, category)?;
    let selection = SessionSelection::new(difficulty, amount, category);
    let mut session = services.quiz_session(Arc::new(TerminalBell));
    let mut prompt = Prompt::stdin();
    let mut rng = rand::rng();

    println!(
        "{} questions, {} difficulty, {}.",
        selection.amount(),
        selection.difficulty().label(),
        selection.category().name()
    );

    loop {
        if let Err(err) = session.start(selection.clone()).await {
            println!("Could not start the quiz: {err}");
            if let Some(hint) = retry_hint(&err) {
                println!("{hint}");
            }
            if prompt.confirm("Retry? [y/N] ").await? {
                continue;
            }
            return Ok(());
        }

        let flow = run_game(&mut session, &mut prompt, &mut rng).await?;
        let score = match flow {
            Flow::Finished(score) | Flow::Quit(score) => score,
        };
        println!();
        println!("Game over. Final score: {score}");
        println!("High score: {}", services.high_scores().get().await?);

        if matches!(flow, Flow::Finished(_)) {
            session.play_again()?;
        }
        if !prompt.confirm("Play again? [y/N] ").await? {
            return Ok(());
        }
    }
}

fn retry_hint(err: &QuizError) -> Option<&'static str> {
    match err {
        QuizError::Fetch(fetch) => Some(match fetch.kind() {
            FetchFailureKind::Connectivity => "Check your network connection.",
            FetchFailureKind::RemoteFailure => "The trivia service had a problem, try again shortly.",
        }),
        QuizError::NoQuestions => Some("Try another category or difficulty."),
        _ => None,
    }
}

fn resolve_category(services: &AppServices, requested: Option<u32>) -> CliResult<Category> {
    let Some(id) = requested else {
        return Ok(Category::general_knowledge());
    };
    let catalog = services.catalog();
    if let Some(category) = catalog.find(CategoryId::new(id)) {
        return Ok(category);
    }
    if catalog.is_empty() {
        tracing::warn!(id, "category list empty, using the id unchecked");
        return Ok(Category::new(CategoryId::new(id), format!("category {id}")));
    }
    Err(PlayError::UnknownCategory(id).into())
}

async fn run_game<R: Rng + ?Sized>(
    session: &mut QuizSession,
    prompt: &mut Prompt,
    rng: &mut R,
) -> CliResult<Flow> {
    loop {
        match session.phase() {
            QuizPhase::InProgress => {
                let state = session.snapshot();
                let Some(question) = state.current_question() else {
                    return Ok(Flow::Finished(state.score()));
                };
                let options = shuffled_options(question, rng);

                println!();
                println!(
                    "Question {}/{}  (score {})",
                    state.index(),
                    state.total(),
                    state.score()
                );
                println!("{}", question.text());
                for (n, option) in options.iter().enumerate() {
                    println!("  {}. {option}", n + 1);
                }

                let label = format!("Answer [1-{}, p=pause, q=quit]: ", options.len());
                let Some(line) = prompt.read(&label).await? else {
                    return Ok(Flow::Quit(session.exit().await?.score()));
                };
                match line.as_str() {
                    "p" => {
                        session.pause()?;
                    }
                    "q" => return Ok(Flow::Quit(session.exit().await?.score())),
                    raw => {
                        let choice = raw
                            .parse::<usize>()
                            .ok()
                            .and_then(|n| n.checked_sub(1))
                            .and_then(|n| options.get(n));
                        let Some(choice) = choice else {
                            println!("Pick a number between 1 and {}.", options.len());
                            continue;
                        };
                        let outcome = session.answer_at(state.index(), choice).await?;
                        if outcome.was_correct {
                            println!("Correct!");
                        } else {
                            println!("Wrong, the answer was {}.", question.correct_answer());
                        }
                    }
                }
            }
            QuizPhase::Paused => match prompt.read("Paused [r=resume, q=quit]: ").await?.as_deref() {
                Some("r") => {
                    session.resume()?;
                }
                Some("q") | None => return Ok(Flow::Quit(session.exit().await?.score())),
                Some(_) => {}
            },
            _ => return Ok(Flow::Finished(session.snapshot().score())),
        }
    }
}

pub(crate) async fn list_categories(services: &AppServices) -> CliResult<()> {
    let count = services.category_fetcher().refresh().await?;
    tracing::debug!(count, "categories listed");
    for category in services.catalog().list() {
        println!("{:>4}  {}", category.id().value(), category.name());
    }
    Ok(())
}

pub(crate) async fn show_high_score(services: &AppServices) -> CliResult<()> {
    match services.high_scores().record().await? {
        Some(record) => println!(
            "High score: {} (set {})",
            record.score(),
            record.achieved_at().format("%Y-%m-%d %H:%M UTC")
        ),
        None => println!("High score: 0"),
    }
    Ok(())
}
