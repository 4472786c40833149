// Browsing, export and analytics over stored records.
// Everything here works on the filtered view, never on the raw store.

pub mod analytics;
pub mod export;
pub mod filter;
pub mod handlers;

pub use filter::ResumeFilter;
