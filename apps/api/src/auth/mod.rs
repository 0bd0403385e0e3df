// Authentication: credential store, token issuer/verifier, and the access gate.
// Handlers downstream of the gate trust `CurrentHunter` but still scope every
// résumé operation to its owner.

pub mod credentials;
pub mod gate;
pub mod handlers;
pub mod password;
pub mod token;

pub use gate::{require_hunter, CurrentHunter};
pub use token::TokenIssuer;
