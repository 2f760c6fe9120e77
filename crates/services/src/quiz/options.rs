use rand::Rng;
use rand::seq::SliceRandom;

use trivia_core::model::Question;

/// Answer options in presentation order: correct and incorrect answers shuffled together.
pub fn shuffled_options<R: Rng + ?Sized>(question: &Question, rng: &mut R) -> Vec<String> {
    let mut options: Vec<String> = question.options().into_iter().map(str::to_owned).collect();
    options.shuffle(rng);
    options
}
