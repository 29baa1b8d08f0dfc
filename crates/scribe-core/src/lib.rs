//! Scribe Core - meeting transcripts to ticket specifications
//!
//! Turns free-form meeting transcripts into a structured document of epics
//! and tickets, pauses for a human review, and exports an approved document
//! as a ticket batch.
//!
//! - Splits transcripts into speaker-attributed units
//! - Finds requirement candidates with the pattern library
//! - Groups candidates into epics and merges duplicates
//! - Maps each epic to ordered, templated tickets
//! - Raises a clarification for everything it cannot decide
//!
//! # Core Concepts
//!
//! - [`Scribe`]: The pipeline facade, configuration plus compiled patterns
//! - [`StructuredDocument`]: The reviewable output, persisted as JSON
//! - [`ReviewSession`]: The human checkpoint state machine
//! - [`TicketBatch`]: The export handed to a [`TicketTracker`]
//!
//! The pipeline is total: a transcript with nothing recognizable yields an
//! empty document with a clarification rather than an error. Errors are
//! reserved for configuration, hand-edited documents, illegal review
//! transitions and tracker failures.
//!
//! # Example
//!
//! ```rust
//! use scribe_core::{Decision, Scribe, ScribeConfig};
//!
//! let scribe = Scribe::new(ScribeConfig::default())?;
//! let doc = scribe.process_text(
//!     "Sarah: We need a Medication Log with Active and History tabs.\n\
//!      Lee: Nurses should be able to view medications.",
//! );
//! assert_eq!(doc.epics[0].epic_name, "Medication Log");
//!
//! let mut review = scribe.review(doc);
//! println!("{}", review.present()?);
//! review.decide(Decision::Proceed)?;
//! let approved = review.into_approved()?;
//! assert!(approved.ticket_count() > 0);
//! # Ok::<(), scribe_core::ScribeError>(())
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod batch;
pub mod checkpoint;
pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod mapping;
pub mod metadata;
pub mod pipeline;
pub mod reduce;
pub mod schema;
pub mod segment;
pub mod summary;
pub mod templates;
pub mod types;

pub use batch::{
    source_digest, submit_batch, BatchMetadata, BatchTicket, CreatedTicket, CreationSummary,
    DryRunTracker, FailedTicket, TicketBatch, TicketTracker,
};
pub use checkpoint::{Decision, ReviewSession, ReviewState};
pub use config::{PriorityTable, ScribeConfig};
pub use document::StructuredDocument;
pub use error::{CheckpointError, ConfigError, SchemaError, ScribeError, SubmissionError};
pub use pipeline::Scribe;
pub use summary::summarize;
pub use types::{
    ActionItem, Clarification, ColumnSpec, Epic, FieldSpec, FieldType, MeetingMetadata, Priority,
    RbacMap, Scope, SearchSpec, Ticket, TicketDetails, TicketType, Transcript, UNKNOWN, UNSPECIFIED,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with Scribe Core
    pub use crate::{
        submit_batch, Decision, DryRunTracker, Priority, ReviewSession, ReviewState, Scribe,
        ScribeConfig, ScribeError, StructuredDocument, TicketBatch, TicketTracker, TicketType,
        Transcript,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn full_flow_with_dry_run() {
        let scribe = Scribe::new(ScribeConfig::default()).unwrap();
        let transcript = Transcript::new(
            "Sarah: We need a Medication Log with Active and History tabs.\n\
             Lee: Nurses should be able to view medications.",
        )
        .with_source("standup.txt");
        let doc = scribe.process(&transcript);

        let mut review = scribe.review(doc);
        review.present().unwrap();
        review.decide(Decision::Proceed).unwrap();
        let approved = review.into_approved().unwrap();

        let batch = scribe.batch(&approved, &transcript);
        assert_eq!(batch.source_transcript, "standup.txt");
        assert_eq!(batch.total_tickets, approved.ticket_count());

        let summary = submit_batch(&batch, &mut DryRunTracker::new(), None);
        assert!(summary.is_complete());
    }
}
