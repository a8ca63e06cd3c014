pub mod competition;
pub mod status;

pub use competition::CompetitionRecord;
pub use status::{CompetitionStatus, ParseStatusError, Phase};
