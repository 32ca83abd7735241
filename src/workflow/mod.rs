pub mod session;

pub use session::{ActiveTab, AppState, ReviewSession, SubmitOutcome};
