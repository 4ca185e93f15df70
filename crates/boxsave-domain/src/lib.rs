//! boxsave-domain
//!
//! Pure domain models (Campaign, SavingsBox, PaymentRecord, Profile, drafts).
//! No I/O, no storage. Only data types, validation and core enums.

pub mod campaign;
pub mod common;
pub mod draft;
pub mod payment;
pub mod profile;
pub mod savings_box;

pub use campaign::*;
pub use common::*;
pub use draft::*;
pub use payment::*;
pub use profile::*;
pub use savings_box::*;
