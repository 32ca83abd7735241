pub mod render;
pub mod view_state;

pub use view_state::{QuestionUiState, QuizViewState};
