pub mod account;
pub mod profile;
pub mod submission;
pub mod timestamp;

pub use account::{Account, AccountStats, AccountView, Role};
pub use profile::Profile;
pub use submission::{Submission, SubmissionForm};
