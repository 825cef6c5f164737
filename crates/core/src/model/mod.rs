mod card;
mod ids;
mod seed;

pub use card::{Card, CardStatus, CardStatusError};
pub use ids::{CardId, ParseIdError};
pub use seed::SeedCard;
