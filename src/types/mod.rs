pub mod error;
pub mod language;
pub mod records;
pub mod word;

pub use error::{ErrorCategory, Result, TermError};
pub use language::Language;
pub use records::{
    Availability, RATING_FAILED, Rating, SearchEvaluation, SocialAvailability, SocialPlatform,
    TranslatedText, Translation, WebifiedEntry, social_available_count,
};
pub use word::{Word, clean_text};
