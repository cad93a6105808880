/**
 * Responsibility
 *  - expose the extractor types handlers take
 *  - keep the wiring (header parsing, rejection mapping) private
 */
mod current_user;

pub use current_user::{ActiveUser, AdminUser, AppJson, NurseUser};
